use std::env;
use std::net::SocketAddr;

use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Firestore,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Seconds between background reloads; 0 disables them.
    pub reload_interval_secs: u64,
    /// Account used by the local backend.
    pub local_user_id: String,
    pub local_password: Option<String>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let backend = match env::var("STORE_BACKEND").as_deref() {
            Err(_) | Ok("sqlite") => StoreBackend::Sqlite,
            Ok("firestore") => StoreBackend::Firestore,
            Ok(other) => {
                return Err(AppError::Config(format!("Unknown STORE_BACKEND: {}", other)));
            }
        };

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://classboard.db".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid BIND_ADDR: {}", e)))?;

        let reload_interval_secs = match env::var("RELOAD_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid RELOAD_INTERVAL_SECS: {}", e)))?,
            Err(_) => 0,
        };

        let local_user_id = env::var("LOCAL_USER_ID").unwrap_or_else(|_| "local".to_string());
        let local_password = env::var("LOCAL_PASSWORD").ok();

        Ok(Self {
            backend,
            database_url,
            bind_addr,
            reload_interval_secs,
            local_user_id,
            local_password,
        })
    }
}
