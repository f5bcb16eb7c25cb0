use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::distribution::DistributionProvider;
use crate::services::reference_data::AirlineCache;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub distribution: Box<dyn DistributionProvider>,
    pub airlines: AirlineCache,
}
