//! Storage for full-page images, one file per test run.

use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ScraperError;

/// URL prefix under which the server exposes the screenshot directory.
pub const SCREENSHOT_URL_PREFIX: &str = "/screenshots";

/// Writes images into a single directory and returns their public reference.
///
/// File names combine a millisecond timestamp with a random suffix so
/// concurrent runs never overwrite each other.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Saves `png` and returns its reference, e.g.
    /// `/screenshots/screenshot_1700000000000_1a2b3c4d.png`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Screenshot`] if the directory cannot be created
    /// or the file cannot be written.
    pub async fn save(&self, png: &[u8]) -> Result<String, ScraperError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ScraperError::Screenshot {
                path: self.dir.display().to_string(),
                source,
            })?;

        let file_name = unique_file_name();
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, png)
            .await
            .map_err(|source| ScraperError::Screenshot {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!(path = %path.display(), bytes = png.len(), "screenshot saved");
        Ok(format!("{SCREENSHOT_URL_PREFIX}/{file_name}"))
    }
}

fn unique_file_name() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "screenshot_{}_{}.png",
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}
