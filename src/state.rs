use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    db::Database,
    llm::{ChatCompletion, CompletionClient},
    utils::login_guard::{LoginAttempts, LoginGuard},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub login_attempts: Arc<dyn LoginAttempts>,
    pub completion: Arc<dyn ChatCompletion>,
}

impl AppState {
    /// Production wiring: in-memory login guard and the HTTP completion client.
    pub fn new(config: Config) -> Self {
        Self {
            db: Database::new(&config),
            login_attempts: Arc::new(LoginGuard::default()),
            completion: Arc::new(CompletionClient::new(&config)),
            config,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn LoginAttempts> {
    fn from_ref(state: &AppState) -> Self {
        state.login_attempts.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ChatCompletion> {
    fn from_ref(state: &AppState) -> Self {
        state.completion.clone()
    }
}
