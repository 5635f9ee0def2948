use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// YAML file holding the discount label table and excluded headings.
    pub catalog_path: PathBuf,
    /// Directory receiving one full-page image per test run.
    pub screenshots_dir: PathBuf,
    /// Built UI served at `/` when present.
    pub frontend_dir: Option<PathBuf>,
    /// Explicit browser executable; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    pub navigation_timeout_secs: u64,
    pub settle_delay_ms: u64,
    pub scroll_step_px: u32,
    pub scroll_interval_ms: u64,
}
