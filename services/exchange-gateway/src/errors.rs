use crate::rate_source::RateSourceError;
use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, GatewayError>;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred on the server.";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    UpstreamUnavailable(RateSourceError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<exchange_core::Error> for GatewayError {
    fn from(err: exchange_core::Error) -> Self {
        use exchange_core::Error as Core;

        let message = err.to_string();
        if err.is_not_found() {
            return GatewayError::NotFound(message);
        }

        match err {
            Core::DuplicateEmail => GatewayError::Conflict(message),
            Core::InvalidCredentials => GatewayError::Unauthorized(message),
            Core::Config(_) => GatewayError::Internal(message),
            _ => GatewayError::Validation(message),
        }
    }
}

impl From<RateSourceError> for GatewayError {
    fn from(err: RateSourceError) -> Self {
        match err {
            RateSourceError::InvalidCode(_) => GatewayError::Validation(err.to_string()),
            RateSourceError::NoHistory(_) => GatewayError::NotFound(err.to_string()),
            other => GatewayError::UpstreamUnavailable(other),
        }
    }
}

impl ResponseError for GatewayError {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            GatewayError::Internal(detail) => {
                error!("Unexpected server error: {}", detail);
                INTERNAL_MESSAGE.to_string()
            }
            GatewayError::UpstreamUnavailable(cause) => {
                error!("Rate source failure: {:?}", cause);
                self.to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            // duplicate registrations answer 400 like any other bad form
            GatewayError::Conflict(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    GatewayError::Validation(format!("Invalid JSON body: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    GatewayError::Validation(format!("Invalid path parameter: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    GatewayError::Validation(format!("Invalid query string: {}", err)).into()
}
