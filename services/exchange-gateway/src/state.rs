use crate::rate_source::RateSource;
use exchange_core::{AlertEngine, LedgerStore, TradeExecutor};
use std::sync::Arc;
use tracing::info;

/// Shared services handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LedgerStore>,
    pub trades: TradeExecutor,
    pub alerts: AlertEngine,
    pub rates: Arc<dyn RateSource>,
}

impl AppState {
    pub fn new(store: Arc<LedgerStore>, rates: Arc<dyn RateSource>) -> Self {
        AppState {
            trades: TradeExecutor::new(store.clone()),
            alerts: AlertEngine::new(store.clone()),
            store,
            rates,
        }
    }

    /// Register the account the mobile client's "test login" expects
    pub fn seed_demo_user(&self) -> exchange_core::Result<()> {
        if self.store.find_user_by_email(DEMO_EMAIL).is_some() {
            return Ok(());
        }

        let user = self.store.create_user("Test User", DEMO_EMAIL, "test123")?;
        info!("Seeded demo user {} ({})", user.user_id, user.email);
        Ok(())
    }
}

pub const DEMO_EMAIL: &str = "test@example.com";
