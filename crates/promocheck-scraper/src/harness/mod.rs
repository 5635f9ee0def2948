//! Per-URL test orchestration.
//!
//! [`Harness::run_test`] drives one rendering session from navigation to
//! screenshot and turns every failure after input validation into a failed
//! [`TestOutcome`]. [`Harness::run_batch`] (in `batch`) fans a set of cases
//! out concurrently.

mod batch;

pub use batch::BatchReport;

use std::sync::Arc;
use std::time::{Duration, Instant};

use promocheck_core::{AppConfig, CatalogConfig, ProductRecord, TestCase, TestOutcome};

use crate::error::ScraperError;
use crate::extract::{CatalogDocument, ProductExtractor};
use crate::renderer::{RenderSession, Renderer};
use crate::screenshots::ScreenshotStore;

/// Timing knobs for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
    pub scroll_step_px: u32,
    pub scroll_interval: Duration,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            scroll_step_px: config.scroll_step_px,
            scroll_interval: Duration::from_millis(config.scroll_interval_ms),
        }
    }
}

pub struct Harness {
    renderer: Arc<dyn Renderer>,
    extractor: ProductExtractor,
    screenshots: ScreenshotStore,
    settings: RunSettings,
}

impl Harness {
    #[must_use]
    pub fn new(
        renderer: Arc<dyn Renderer>,
        catalog: Arc<CatalogConfig>,
        screenshots: ScreenshotStore,
        settings: RunSettings,
    ) -> Self {
        Self {
            renderer,
            extractor: ProductExtractor::new(catalog),
            screenshots,
            settings,
        }
    }

    /// Runs one test case end to end.
    ///
    /// The rendering session is closed on every path once it has been opened.
    /// If driving the page panics, the session is only dropped; renderers
    /// release their resources on drop for that case.
    /// Navigation, rendering and screenshot failures are recorded on the
    /// returned outcome rather than returned as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidInput`] when the URL is empty. No session
    /// is opened in that case.
    pub async fn run_test(&self, case: &TestCase) -> Result<TestOutcome, ScraperError> {
        validate(case)?;

        let started = Instant::now();
        tracing::info!(url = %case.url, expected = ?case.expected_count, "test run started");

        let mut session = match self.renderer.open_session().await {
            Ok(session) => session,
            Err(e) => return Ok(self.failed(case, &e.into(), started)),
        };

        let result = self.drive(session.as_mut(), case).await;

        if let Err(e) = session.close().await {
            tracing::warn!(url = %case.url, error = %e, "failed to close rendering session");
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => return Ok(self.failed(case, &e, started)),
        };

        if let Some(alert) = outcome.alert_message() {
            tracing::warn!(url = %case.url, "{alert}");
        }
        tracing::info!(
            url = %case.url,
            products = outcome.actual_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "test run finished"
        );
        Ok(outcome)
    }

    async fn drive(
        &self,
        session: &mut dyn RenderSession,
        case: &TestCase,
    ) -> Result<TestOutcome, ScraperError> {
        let settings = self.settings;

        session
            .navigate(&case.url, settings.navigation_timeout)
            .await?;
        session.wait_settle(settings.settle_delay).await?;
        session
            .scroll_to_bottom(settings.scroll_step_px, settings.scroll_interval)
            .await?;

        let title = session.title().await?;
        let html = session.document_html().await?;
        let products = self.extract(&html);

        let png = session.capture_full_page().await?;
        let screenshot_ref = self.screenshots.save(&png).await?;

        Ok(TestOutcome::completed(case, title, products, screenshot_ref))
    }

    /// Parsing stays in a sync scope: the parsed document is not `Send`.
    fn extract(&self, html: &str) -> Vec<ProductRecord> {
        let document = CatalogDocument::parse(html);
        self.extractor.extract(&document)
    }

    fn failed(&self, case: &TestCase, error: &ScraperError, started: Instant) -> TestOutcome {
        tracing::error!(
            url = %case.url,
            error = %error,
            elapsed_ms = started.elapsed().as_millis(),
            "test run failed"
        );
        TestOutcome::failed(case, error.to_error_info())
    }
}

fn validate(case: &TestCase) -> Result<(), ScraperError> {
    if case.url.trim().is_empty() {
        return Err(ScraperError::InvalidInput {
            reason: "url must not be empty".to_string(),
        });
    }
    Ok(())
}
