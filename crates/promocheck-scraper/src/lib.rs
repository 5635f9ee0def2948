pub mod error;
pub mod extract;
pub mod harness;
pub mod price;
pub mod reconcile;
pub mod renderer;
pub mod screenshots;

pub use error::{RenderError, ScraperError};
pub use extract::{CatalogDocument, ProductExtractor};
pub use harness::{BatchReport, Harness, RunSettings};
pub use price::{format_price, parse_price};
pub use reconcile::{discount_pct, reconcile, Reconciliation};
pub use renderer::chromium::ChromiumRenderer;
pub use renderer::{RenderSession, Renderer};
pub use screenshots::{ScreenshotStore, SCREENSHOT_URL_PREFIX};
