pub mod app_config;
pub mod catalog;
pub mod config;
pub mod outcome;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    load_catalog, CatalogConfig, DiscountLabelTable, ExcludedHeadings, NO_DISCOUNT_LABEL,
    SPECIAL_DISCOUNT_LABEL,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use outcome::{ErrorInfo, ErrorKind, TestCase, TestOutcome};
pub use products::{BadgeSet, ProductRecord, Verdict};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
