use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let env = parse_environment(&or_default("PROMOCHECK_ENV", "development"));
    let bind_addr = parse_addr("PROMOCHECK_BIND_ADDR", "127.0.0.1:5000")?;
    let log_level = or_default("PROMOCHECK_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "PROMOCHECK_CATALOG_PATH",
        "./config/catalog.yaml",
    ));
    let screenshots_dir = PathBuf::from(or_default("PROMOCHECK_SCREENSHOTS_DIR", "./screenshots"));
    let frontend_dir = optional_path("PROMOCHECK_FRONTEND_DIR");
    let chrome_path = optional_path("PROMOCHECK_CHROME_PATH");
    let headless = parse_bool("PROMOCHECK_HEADLESS", "true")?;

    let navigation_timeout_secs = parse_u64("PROMOCHECK_NAVIGATION_TIMEOUT_SECS", "30")?;
    if navigation_timeout_secs == 0 {
        return Err(invalid(
            "PROMOCHECK_NAVIGATION_TIMEOUT_SECS",
            "timeout must be greater than zero".to_string(),
        ));
    }
    let settle_delay_ms = parse_u64("PROMOCHECK_SETTLE_DELAY_MS", "3000")?;
    let scroll_step_px = parse_u32("PROMOCHECK_SCROLL_STEP_PX", "100")?;
    if scroll_step_px == 0 {
        return Err(invalid(
            "PROMOCHECK_SCROLL_STEP_PX",
            "scroll step must be greater than zero".to_string(),
        ));
    }
    let scroll_interval_ms = parse_u64("PROMOCHECK_SCROLL_INTERVAL_MS", "100")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        screenshots_dir,
        frontend_dir,
        chrome_path,
        headless,
        navigation_timeout_secs,
        settle_delay_ms,
        scroll_step_px,
        scroll_interval_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
