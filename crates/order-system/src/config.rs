//! Configuration loader
//!
//! Reads the order system's settings from environment variables. A `.env`
//! file in the working directory is loaded first when present.
//!
//! ## Environment Variables
//! - `REDDIO_URL`: SDK base URL (overrides `REDDIO_ENV`)
//! - `REDDIO_ENV`: `prod` or `dev` preset, used when `REDDIO_URL` is unset
//! - `REDDIO_API_KEY`: merchant API key
//! - `ORDER_SYSTEM_ADDR`: listen address
//! - `ORDER_SYSTEM_DB`: SQLite database path
//! - `ORDER_SYSTEM_DB_POOL_SIZE`: connection pool size
//! - `ORDER_SYSTEM_RUN_DEMO`: run the SDK walkthrough at startup (true/false)

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use reddio_pay::Environment;
use tracing::warn;

use crate::errors::{AppError, Result};

const DEFAULT_API_KEY: &str = "mock_api_key";
const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "orders.db";
const DEFAULT_POOL_SIZE: u32 = 4;

/// Order system settings.
#[derive(Clone)]
pub struct AppConfig {
    /// Payment service base URL.
    pub reddio_url: String,
    /// Merchant API key exchanged for access tokens.
    pub reddio_api_key: String,
    /// Address the HTTP server binds.
    pub listen_addr: SocketAddr,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Maximum pooled connections, at least 1.
    pub database_pool_size: u32,
    /// Run the payment API walkthrough before serving.
    pub run_demo: bool,
}

impl AppConfig {
    /// Load `.env` (if any) and then read the environment.
    ///
    /// # Errors
    /// Returns `AppError::Config` if `ORDER_SYSTEM_ADDR` is not a socket
    /// address.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_env()
    }

    /// Read settings from the process environment, applying defaults.
    ///
    /// # Errors
    /// Returns `AppError::Config` if `ORDER_SYSTEM_ADDR` is not a socket
    /// address.
    pub fn from_env() -> Result<Self> {
        let reddio_url = env_opt("REDDIO_URL")
            .unwrap_or_else(|| environment_preset().base_url().to_string());
        let reddio_api_key =
            env_opt("REDDIO_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string());

        let addr = env_opt("ORDER_SYSTEM_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let listen_addr = addr.parse::<SocketAddr>().map_err(|e| {
            AppError::Config(format!("Invalid ORDER_SYSTEM_ADDR '{addr}': {e}"))
        })?;

        let database_path =
            PathBuf::from(env_opt("ORDER_SYSTEM_DB").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()));
        let database_pool_size = env_parse("ORDER_SYSTEM_DB_POOL_SIZE", DEFAULT_POOL_SIZE).max(1);
        let run_demo = env_bool("ORDER_SYSTEM_RUN_DEMO", true);

        Ok(Self { reddio_url, reddio_api_key, listen_addr, database_path, database_pool_size, run_demo })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("reddio_url", &self.reddio_url)
            .field("reddio_api_key", &"<redacted>")
            .field("listen_addr", &self.listen_addr)
            .field("database_path", &self.database_path)
            .field("database_pool_size", &self.database_pool_size)
            .field("run_demo", &self.run_demo)
            .finish()
    }
}

fn environment_preset() -> Environment {
    match env_opt("REDDIO_ENV").map(|s| s.to_ascii_lowercase()).as_deref() {
        None | Some("prod" | "production") => Environment::Production,
        Some("dev" | "development") => Environment::Development,
        Some(other) => {
            warn!(value = other, "unknown REDDIO_ENV, using production");
            Environment::Production
        }
    }
}

/// Non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + fmt::Display,
{
    match env_opt(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "invalid numeric value, using default");
            default
        }),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Anything else falls back to `default`.
fn env_bool(key: &str, default: bool) -> bool {
    match env_opt(key).map(|s| s.to_ascii_lowercase()).as_deref() {
        None => default,
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        Some(other) => {
            warn!(key, value = other, default, "invalid boolean value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 7] = [
        "REDDIO_URL",
        "REDDIO_ENV",
        "REDDIO_API_KEY",
        "ORDER_SYSTEM_ADDR",
        "ORDER_SYSTEM_DB",
        "ORDER_SYSTEM_DB_POOL_SIZE",
        "ORDER_SYSTEM_RUN_DEMO",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = AppConfig::from_env().expect("defaults load");
        assert_eq!(config.reddio_url, "https://reddio-service-prod.reddio.com");
        assert_eq!(config.reddio_api_key, "mock_api_key");
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_path, PathBuf::from("orders.db"));
        assert_eq!(config.database_pool_size, 4);
        assert!(config.run_demo);
    }

    #[test]
    fn test_overrides_from_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REDDIO_URL", "http://localhost:9000");
        std::env::set_var("REDDIO_API_KEY", "live-key");
        std::env::set_var("ORDER_SYSTEM_ADDR", "127.0.0.1:3000");
        std::env::set_var("ORDER_SYSTEM_DB", "/tmp/orders-test.db");
        std::env::set_var("ORDER_SYSTEM_DB_POOL_SIZE", "8");
        std::env::set_var("ORDER_SYSTEM_RUN_DEMO", "off");

        let config = AppConfig::from_env().expect("config loads");
        assert_eq!(config.reddio_url, "http://localhost:9000");
        assert_eq!(config.reddio_api_key, "live-key");
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/orders-test.db"));
        assert_eq!(config.database_pool_size, 8);
        assert!(!config.run_demo);

        clear_env();
    }

    #[test]
    fn test_dev_environment_preset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REDDIO_ENV", "dev");
        let config = AppConfig::from_env().expect("config loads");
        assert_eq!(config.reddio_url, "https://reddio-service-dev.reddio.com");

        // An explicit URL wins over the preset.
        std::env::set_var("REDDIO_URL", "http://override");
        let config = AppConfig::from_env().expect("config loads");
        assert_eq!(config.reddio_url, "http://override");

        clear_env();
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ORDER_SYSTEM_DB_POOL_SIZE", "lots");
        std::env::set_var("ORDER_SYSTEM_RUN_DEMO", "maybe");
        let config = AppConfig::from_env().expect("config loads");
        assert_eq!(config.database_pool_size, 4);
        assert!(config.run_demo);

        std::env::set_var("ORDER_SYSTEM_DB_POOL_SIZE", "0");
        let config = AppConfig::from_env().expect("config loads");
        assert_eq!(config.database_pool_size, 1);

        clear_env();
    }

    #[test]
    fn test_invalid_listen_addr_is_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ORDER_SYSTEM_ADDR", "not-an-address");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        clear_env();
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("REDDIO_API_KEY", "top-secret-key");
        let config = AppConfig::from_env().expect("config loads");
        assert!(!format!("{config:?}").contains("top-secret-key"));

        clear_env();
    }
}
