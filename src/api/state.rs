use std::sync::Arc;

use crate::config::AppConfig;
use crate::fetch::ClashApi;

#[derive(Clone)]
pub struct AppState {
    pub clash: Arc<dyn ClashApi>,
    pub config: Arc<AppConfig>,
}
