//! Renderer abstraction for browser-driven page loading.
//!
//! The harness only talks to these traits; the Chromium backend lives in
//! [`chromium`], and tests substitute an in-memory implementation.

pub mod chromium;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RenderError;

/// A browser engine able to open isolated rendering sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Opens a fresh session. Sessions are never shared between test cases.
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// One isolated page. Every opened session must be closed by its owner.
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Loads `url`, failing with a navigation error on network failure or
    /// when loading takes longer than `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError>;

    /// Waits for client-side rendering to finish after navigation.
    async fn wait_settle(&mut self, delay: Duration) -> Result<(), RenderError>;

    /// Scrolls in `step_px` increments every `interval` until the bottom of
    /// the page is reached, so lazily-loaded items are present.
    async fn scroll_to_bottom(&mut self, step_px: u32, interval: Duration)
        -> Result<(), RenderError>;

    async fn title(&self) -> Result<String, RenderError>;

    /// Serialized HTML of the rendered document.
    async fn document_html(&self) -> Result<String, RenderError>;

    /// PNG bytes of the full scrollable page.
    async fn capture_full_page(&self) -> Result<Vec<u8>, RenderError>;

    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}
