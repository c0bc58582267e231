pub mod auth;
pub mod health;
pub mod index;

use std::sync::Arc;

use crate::config::Config;
use crate::logging::LoggerHandle;
use crate::repository::{ReadinessCheck, UserStore};

/// Shared state for all route handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserStore>,
    pub readiness: Arc<dyn ReadinessCheck>,
    pub logger: LoggerHandle,
}
