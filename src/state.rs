use std::sync::Arc;

use crate::{config::AppConfig, db::OrmConn, services::upload_service::FileStore};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub files: FileStore,
}

impl AppState {
    pub fn new(orm: OrmConn, config: AppConfig) -> Self {
        let files = FileStore::new(&config.upload_dir);
        Self {
            orm,
            config: Arc::new(config),
            files,
        }
    }
}
