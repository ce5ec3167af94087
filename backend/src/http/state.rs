//! Application state for the HTTP server.

use chrono::Duration;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ServerConfig;
use crate::db::repositories::LocalRepository;
use crate::db::repository::AccountRepository;
use crate::models::UserRecord;
use crate::services::accounts::AccountService;
use crate::services::analysis::FortuneAnalyzer;
use crate::services::series::SeriesBank;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Birthday analysis over the process-wide series bank
    pub analyzer: FortuneAnalyzer,
    /// Login and registration rules
    pub accounts: AccountService,
    /// Configuration the server was started with
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state from already built parts.
    pub fn new(analyzer: FortuneAnalyzer, accounts: AccountService, config: ServerConfig) -> Self {
        Self {
            analyzer,
            accounts,
            config: Arc::new(config),
        }
    }

    /// Build the series bank and an in-memory account store from `config`.
    pub fn from_config(config: ServerConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let repository = seeded_repository(&config, clock.as_ref());
        Self::with_parts(config, repository, clock)
    }

    /// Build state around an injected store and clock.
    pub fn with_parts(
        config: ServerConfig,
        repository: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let bank = Arc::new(SeriesBank::generate(config.series_seed));
        let analyzer = FortuneAnalyzer::new(bank, config.window_policy);
        let accounts =
            AccountService::new(repository, clock, Duration::seconds(config.code_ttl_secs));
        Self::new(analyzer, accounts, config)
    }
}

/// In-memory store holding the configured seed account, if any.
pub fn seeded_repository(config: &ServerConfig, clock: &dyn Clock) -> Arc<dyn AccountRepository> {
    let users = config
        .seed_account
        .iter()
        .map(|seed| UserRecord::new(&seed.email, &seed.name, &seed.password, clock.now()));
    Arc::new(LocalRepository::with_users(users))
}
