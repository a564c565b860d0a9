use crate::services::ai::LanguageModel;
use crate::services::uploads::UploadStore;
use crate::services::vapi::VapiClient;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub ai: Arc<dyn LanguageModel>,
    pub session_key: Vec<u8>,
    pub uploads: UploadStore,
    pub vapi: VapiClient,
}

pub type SharedState = Arc<AppState>;
