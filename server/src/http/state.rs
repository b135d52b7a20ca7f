use crate::config::Config;
use crate::db::DbPool;
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: DbPool,
    pub jwt_secret: String,
    pub start_time: SystemTime,
}

impl AppState {
    pub fn new(config: Arc<Config>, db_pool: DbPool) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            config,
            db_pool,
            start_time: SystemTime::now(),
        }
    }
}
