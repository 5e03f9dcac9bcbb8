use crate::errors::{
    json_error_handler, path_error_handler, query_error_handler, GatewayError, Result,
};
use crate::models::{
    numeric_text, CreateAlertRequest, HealthResponse, HistoryQuery, HistoryResponse,
    LoginRequest, RegisterRequest, TradeRequest,
};
use crate::rate_source::{clamp_history_days, RateSourceError};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use exchange_core::{validation, AlertId, TradeOrder, UserId, UserProfile};
use serde_json::json;
use tracing::info;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "Backend is running.".to_string(),
    })
}

/// Register a user and open their wallet
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    let user = state.store.create_user(
        request.name.as_deref().unwrap_or_default(),
        request.email.as_deref().unwrap_or_default(),
        request.password.as_deref().unwrap_or_default(),
    )?;

    Ok(HttpResponse::Created().json(UserProfile::from(&user)))
}

/// Plain credential check, no session is issued
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let user = state.store.authenticate(
        request.email.as_deref().unwrap_or_default(),
        request.password.as_deref().unwrap_or_default(),
    )?;

    info!("User {} logged in", user.user_id);
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// Upstream rate table, passed through unchanged
pub async fn get_rates(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot = state.rates.fetch_current_rates().await?;
    Ok(HttpResponse::Ok().json(snapshot.into_raw()))
}

/// Daily mid rates for one currency
pub async fn get_rate_history(
    state: web::Data<AppState>,
    code: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    let raw_code = code.into_inner();
    let code = validation::currency_code(&raw_code)
        .map_err(|_| RateSourceError::InvalidCode(raw_code.clone()))?;
    let days = clamp_history_days(query.requested_days());

    let rates = state.rates.fetch_history(&code, days).await?;
    if rates.is_empty() {
        return Err(RateSourceError::NoHistory(code).into());
    }

    Ok(HttpResponse::Ok().json(HistoryResponse { code, rates }))
}

pub async fn get_wallets(
    state: web::Data<AppState>,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse> {
    let user = state.store.require_user(*user_id)?;
    Ok(HttpResponse::Ok().json(state.store.wallets_for_user(user.user_id)))
}

/// Buy or sell against the base-currency wallet
pub async fn execute_trade(
    state: web::Data<AppState>,
    user_id: web::Path<UserId>,
    request: web::Json<TradeRequest>,
) -> Result<HttpResponse> {
    let user = state.store.require_user(*user_id)?;
    let order = TradeOrder::parse(
        request.side.as_deref(),
        request.currency_pair.as_deref(),
        numeric_text(request.amount.as_ref()).as_deref(),
        numeric_text(request.rate.as_ref()).as_deref(),
    )?;

    let receipt = state.trades.execute(user.user_id, order)?;
    Ok(HttpResponse::Created().json(receipt))
}

pub async fn get_transactions(
    state: web::Data<AppState>,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse> {
    let user = state.store.require_user(*user_id)?;
    Ok(HttpResponse::Ok().json(state.store.transactions_for_user(user.user_id)))
}

pub async fn list_alerts(
    state: web::Data<AppState>,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse> {
    let user = state.store.require_user(*user_id)?;
    Ok(HttpResponse::Ok().json(state.alerts.list(user.user_id)))
}

pub async fn create_alert(
    state: web::Data<AppState>,
    user_id: web::Path<UserId>,
    request: web::Json<CreateAlertRequest>,
) -> Result<HttpResponse> {
    let alert = state.alerts.create_from_input(
        *user_id,
        request.currency_pair.as_deref(),
        request.direction.as_deref(),
        numeric_text(request.threshold_value.as_ref()).as_deref(),
    )?;

    Ok(HttpResponse::Created().json(alert))
}

pub async fn delete_alert(
    state: web::Data<AppState>,
    path: web::Path<(UserId, AlertId)>,
) -> Result<HttpResponse> {
    let (user_id, alert_id) = path.into_inner();
    state.alerts.delete(user_id, alert_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "Alert deleted."
    })))
}

/// Evaluate the user's alerts against a fresh rate table
pub async fn check_alerts(
    state: web::Data<AppState>,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse> {
    let user = state.store.require_user(*user_id)?;

    let snapshot = state.rates.fetch_current_rates().await?;
    let mid_rates = snapshot.mid_rates().map_err(GatewayError::from)?;
    let triggered = state.alerts.check_triggered(user.user_id, &mid_rates);

    Ok(HttpResponse::Ok().json(triggered))
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health_check))
                .route("/auth/register", web::post().to(register))
                .route("/auth/login", web::post().to(login))
                .route("/rates", web::get().to(get_rates))
                .route("/rates/history/{code}", web::get().to(get_rate_history))
                .route("/users/{user_id}/wallets", web::get().to(get_wallets))
                .route("/users/{user_id}/trade", web::post().to(execute_trade))
                .route(
                    "/users/{user_id}/transactions",
                    web::get().to(get_transactions),
                )
                .service(
                    web::resource("/users/{user_id}/alerts")
                        .route(web::get().to(list_alerts))
                        .route(web::post().to(create_alert)),
                )
                .route("/users/{user_id}/alerts/check", web::get().to(check_alerts))
                .route(
                    "/users/{user_id}/alerts/{alert_id}",
                    web::delete().to(delete_alert),
                ),
        );
}
