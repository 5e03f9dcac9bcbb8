use config::{ConfigError, Environment, File};
use exchange_core::LedgerConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub rates: RatesConfig,
    pub ledger: LedgerConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RatesConfig {
    /// Current table endpoint (NBP table A by default)
    pub current_url: String,
    /// History endpoint; `/{CODE}/last/{days}` is appended
    pub history_base_url: String,
    pub current_timeout_secs: u64,
    pub history_timeout_secs: u64,
}

impl RatesConfig {
    pub fn current_timeout(&self) -> Duration {
        Duration::from_secs(self.current_timeout_secs)
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history_timeout_secs)
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            current_url: "https://api.nbp.pl/api/exchangerates/tables/A?format=json".to_string(),
            history_base_url: "https://api.nbp.pl/api/exchangerates/rates/A".to_string(),
            current_timeout_secs: 5,
            history_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DemoConfig {
    /// Register the mobile client's test account at startup
    pub seed_user: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let rates = RatesConfig::default();
        let ledger = LedgerConfig::default();

        let mut builder = config::Config::builder()
            // Start with default configuration
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4000)?
            .set_default("server.workers", 4)?
            .set_default("rates.current_url", rates.current_url)?
            .set_default("rates.history_base_url", rates.history_base_url)?
            .set_default("rates.current_timeout_secs", rates.current_timeout_secs)?
            .set_default("rates.history_timeout_secs", rates.history_timeout_secs)?
            .set_default("ledger.base_currency", ledger.base_currency)?
            .set_default("ledger.starting_balance", ledger.starting_balance.to_string())?
            .set_default("demo.seed_user", false)?;

        // Add environment-specific config file if it exists
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(File::with_name(&config_file).required(false));
        } else {
            builder = builder.add_source(
                File::with_name(&format!("config/{}", environment)).required(false),
            );
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("EXCHANGE_GATEWAY")
                .separator("__")
                .try_parsing(true),
        );

        // Special handling for common env vars
        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        if let Ok(url) = env::var("EXTERNAL_RATES_API_URL") {
            builder = builder.set_override("rates.current_url", url)?;
        }

        if let Ok(url) = env::var("EXTERNAL_HISTORY_API_URL") {
            builder = builder.set_override("rates.history_base_url", url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }

        if self.server.workers == 0 {
            return Err("At least one worker is required".to_string());
        }

        if self.rates.current_url.is_empty() || self.rates.history_base_url.is_empty() {
            return Err("Rate source URLs are required".to_string());
        }

        if self.rates.current_timeout_secs == 0 || self.rates.history_timeout_secs == 0 {
            return Err("Rate source timeouts must be positive".to_string());
        }

        self.ledger.validate().map_err(|e| e.to_string())
    }
}
