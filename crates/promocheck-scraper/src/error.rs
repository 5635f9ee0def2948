use promocheck_core::{ErrorInfo, ErrorKind};
use thiserror::Error;

/// Failures raised by a rendering backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("page script failed: {0}")]
    Script(String),

    #[error("failed to read rendered document: {0}")]
    Document(String),

    #[error("failed to capture page image: {0}")]
    Capture(String),
}

impl RenderError {
    /// Returns `true` for failures that happen while loading the target page.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            RenderError::Navigation { .. } | RenderError::NavigationTimeout { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("invalid test input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to store screenshot at {path}: {source}")]
    Screenshot {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScraperError {
    /// Converts the error into the serializable form recorded on an outcome.
    #[must_use]
    pub fn to_error_info(&self) -> ErrorInfo {
        let kind = match self {
            ScraperError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ScraperError::Render(RenderError::Capture(_)) | ScraperError::Screenshot { .. } => {
                ErrorKind::Screenshot
            }
            ScraperError::Render(e) if e.is_navigation() => ErrorKind::Navigation,
            ScraperError::Render(_) => ErrorKind::Render,
        };
        ErrorInfo::new(kind, self.to_string())
    }
}
