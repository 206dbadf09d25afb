//! CLI command implementations

use std::sync::Arc;

use buildcity_store::KeyValueStore;

use crate::config::AppConfig;
use crate::output::OutputFormat;

pub mod calc;
pub mod gate;
pub mod meals;
pub mod onboarding;
pub mod projects;
pub mod settings;

/// Everything a command needs
pub struct AppContext {
    pub store: Arc<dyn KeyValueStore>,
    pub config: AppConfig,
    pub format: OutputFormat,
}
