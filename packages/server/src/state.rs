use std::sync::Arc;

use common::FileStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::identity::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub identity: Arc<dyn IdentityProvider>,
    pub files: Arc<dyn FileStore>,
}
