pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod rate_source;
pub mod state;

pub use config::Config;
pub use errors::{GatewayError, Result};
pub use rate_source::{NbpRateClient, RateSource, RateSourceError};
pub use state::AppState;
