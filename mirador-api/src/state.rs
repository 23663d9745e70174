use mirador_desk::Desk;
use mirador_store::app_config::BusinessRules;
use mirador_store::SyncBridge;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<SyncBridge>,
    pub desk: Desk,
    pub business_rules: BusinessRules,
}
