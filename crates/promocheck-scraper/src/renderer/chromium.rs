//! Chromium renderer using chromiumoxide.
//!
//! Each session launches its own browser process so test cases never share
//! cookies, storage, or a crashed tab.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use promocheck_core::AppConfig;
use tokio::task::JoinHandle;

use super::{RenderSession, Renderer};
use crate::error::RenderError;

/// Upper bound for the auto-scroll loop on pages that keep growing.
const SCROLL_LIMIT_MS: u64 = 60_000;

/// Launches a Chromium process per session.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    chrome_path: Option<PathBuf>,
    headless: bool,
}

impl ChromiumRenderer {
    /// `chrome_path` of `None` lets chromiumoxide locate an installed browser.
    #[must_use]
    pub fn new(chrome_path: Option<PathBuf>, headless: bool) -> Self {
        Self {
            chrome_path,
            headless,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.chrome_path.clone(), config.headless)
    }

    fn browser_config(&self) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--window-size=1920,1080");
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if !self.headless {
            builder = builder.with_head();
        }
        builder.build().map_err(RenderError::Launch)
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let (browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "chromium handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let session = ChromiumSession::without_page(browser, handler_task);
                session.shutdown().await;
                return Err(RenderError::Launch(format!("failed to open page: {e}")));
            }
        };

        tracing::debug!(headless = self.headless, "chromium session opened");
        Ok(Box::new(ChromiumSession {
            browser,
            page: Some(page),
            handler_task,
        }))
    }
}

/// A browser process with one page.
///
/// Dropping a session without [`RenderSession::close`] (a panicking test
/// case) still stops the handler task, and chromiumoxide kills the child
/// process when `browser` drops.
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

impl ChromiumSession {
    fn without_page(browser: Browser, handler_task: JoinHandle<()>) -> Self {
        Self {
            browser,
            page: None,
            handler_task,
        }
    }

    fn page(&self) -> Result<&Page, RenderError> {
        self.page
            .as_ref()
            .ok_or_else(|| RenderError::Document("session has no open page".to_string()))
    }

    async fn evaluate(&self, expression: String) -> Result<(), RenderError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(RenderError::Script)?;
        self.page()?
            .evaluate_expression(params)
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(())
    }

    async fn shutdown(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!(error = %e, "failed to close chromium page");
            }
        }
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "failed to close chromium");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!(error = %e, "failed to reap chromium process");
        }
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError> {
        let page = self.page()?;
        let load = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, CdpError>(())
        };

        match tokio::time::timeout(timeout, load).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(RenderError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    async fn wait_settle(&mut self, delay: Duration) -> Result<(), RenderError> {
        tokio::time::sleep(delay).await;
        Ok(())
    }

    async fn scroll_to_bottom(
        &mut self,
        step_px: u32,
        interval: Duration,
    ) -> Result<(), RenderError> {
        self.evaluate(auto_scroll_script(step_px, interval)).await
    }

    async fn title(&self) -> Result<String, RenderError> {
        let title = self
            .page()?
            .get_title()
            .await
            .map_err(|e| RenderError::Document(e.to_string()))?;
        Ok(title.unwrap_or_default())
    }

    async fn document_html(&self) -> Result<String, RenderError> {
        self.page()?
            .content()
            .await
            .map_err(|e| RenderError::Document(e.to_string()))
    }

    async fn capture_full_page(&self) -> Result<Vec<u8>, RenderError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page()?
            .screenshot(params)
            .await
            .map_err(|e| RenderError::Capture(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.shutdown().await;
        Ok(())
    }
}

/// Scrolls by `step_px` every `interval` until the viewport reaches the end
/// of the document, or [`SCROLL_LIMIT_MS`] elapses.
fn auto_scroll_script(step_px: u32, interval: Duration) -> String {
    let interval_ms = interval.as_millis().max(1);
    format!(
        r"new Promise((resolve) => {{
            const started = Date.now();
            let scrolled = 0;
            const timer = setInterval(() => {{
                window.scrollBy(0, {step_px});
                scrolled += {step_px};
                const bottom = document.body.scrollHeight - window.innerHeight;
                if (scrolled >= bottom || Date.now() - started > {SCROLL_LIMIT_MS}) {{
                    clearInterval(timer);
                    resolve(scrolled);
                }}
            }}, {interval_ms});
        }})"
    )
}
