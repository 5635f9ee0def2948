//! Per-URL test inputs and results.

use serde::{Deserialize, Serialize};

use crate::products::ProductRecord;

/// One URL to check, with the number of products the operator expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub url: String,
    #[serde(default)]
    pub expected_count: Option<usize>,
}

impl TestCase {
    #[must_use]
    pub fn new(url: impl Into<String>, expected_count: Option<usize>) -> Self {
        Self {
            url: url.into(),
            expected_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before any rendering session was opened.
    InvalidInput,
    /// Timeout or network failure while loading the page.
    Navigation,
    /// The renderer failed after the page loaded (settle, query, title).
    Render,
    /// The page image could not be captured or stored.
    Screenshot,
    /// The test task itself died.
    Internal,
}

/// Serializable failure recorded on a [`TestOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of running one [`TestCase`]. Assembled once, never mutated.
///
/// `actual_count` always equals `products.len()`, and `mismatch` is `true`
/// exactly when an expectation was given and differs from `actual_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    url: String,
    title: String,
    products: Vec<ProductRecord>,
    actual_count: usize,
    expected_count: Option<usize>,
    mismatch: bool,
    alert_message: Option<String>,
    screenshot_ref: String,
    error: Option<ErrorInfo>,
}

impl TestOutcome {
    /// Builds the outcome of a run that reached extraction.
    #[must_use]
    pub fn completed(
        case: &TestCase,
        title: impl Into<String>,
        products: Vec<ProductRecord>,
        screenshot_ref: impl Into<String>,
    ) -> Self {
        let actual_count = products.len();
        let mismatch = case
            .expected_count
            .is_some_and(|expected| expected != actual_count);
        let alert_message = case
            .expected_count
            .filter(|_| mismatch)
            .map(|expected| count_mismatch_message(expected, actual_count));

        Self {
            url: case.url.clone(),
            title: title.into(),
            products,
            actual_count,
            expected_count: case.expected_count,
            mismatch,
            alert_message,
            screenshot_ref: screenshot_ref.into(),
            error: None,
        }
    }

    /// Builds the outcome of a run that failed before producing products.
    #[must_use]
    pub fn failed(case: &TestCase, error: ErrorInfo) -> Self {
        Self {
            url: case.url.clone(),
            title: String::new(),
            products: Vec::new(),
            actual_count: 0,
            expected_count: case.expected_count,
            mismatch: false,
            alert_message: None,
            screenshot_ref: String::new(),
            error: Some(error),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    #[must_use]
    pub fn actual_count(&self) -> usize {
        self.actual_count
    }

    #[must_use]
    pub fn expected_count(&self) -> Option<usize> {
        self.expected_count
    }

    #[must_use]
    pub fn mismatch(&self) -> bool {
        self.mismatch
    }

    #[must_use]
    pub fn alert_message(&self) -> Option<&str> {
        self.alert_message.as_deref()
    }

    #[must_use]
    pub fn screenshot_ref(&self) -> &str {
        &self.screenshot_ref
    }

    #[must_use]
    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

fn count_mismatch_message(expected: usize, actual: usize) -> String {
    format!("Expected {expected} products, but found {actual}")
}
