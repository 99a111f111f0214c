use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<FileStore>,
}
