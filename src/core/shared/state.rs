use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::intake::service::IntakeService;
use crate::intake::store::LeadStore;

/// Shared across all handlers behind an `Arc`.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn LeadStore>,
    pub intake: IntakeService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn LeadStore>) -> Self {
        let intake = IntakeService::new(store.clone(), config.intake.clone());
        Self {
            config,
            store,
            intake,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &"<dyn LeadStore>")
            .finish()
    }
}
