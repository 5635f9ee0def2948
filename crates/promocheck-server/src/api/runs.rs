use axum::{extract::State, http::StatusCode, Extension, Json};
use promocheck_core::{ProductRecord, TestCase, TestOutcome, Verdict};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiFailure, AppState};

/// `expectedProducts` arrives either as a number or as the raw text of a
/// form field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum ExpectedProducts {
    Count(i64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RunTestRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub expected_products: Option<ExpectedProducts>,
}

impl RunTestRequest {
    /// Converts the request into a [`TestCase`]. The URL is validated by the
    /// harness so batch and single runs reject it the same way.
    fn into_test_case(self) -> Result<TestCase, String> {
        let expected = parse_expected(self.expected_products.as_ref())?;
        Ok(TestCase::new(self.url.trim(), expected))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RunBatchRequest {
    #[serde(default)]
    pub tests: Vec<RunTestRequest>,
}

/// Wire shape of a [`ProductRecord`]: same fields, camelCase keys.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductView {
    name: String,
    badges: Vec<String>,
    price_original: Option<Decimal>,
    price_current: Option<Decimal>,
    computed_discount_pct: Option<i64>,
    verdict: Verdict,
}

impl From<&ProductRecord> for ProductView {
    fn from(product: &ProductRecord) -> Self {
        Self {
            name: product.name.clone(),
            badges: product.badges.iter().map(str::to_string).collect(),
            price_original: product.price_original,
            price_current: product.price_current,
            computed_discount_pct: product.computed_discount_pct,
            verdict: product.verdict,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RunTestResponse {
    success: bool,
    url: String,
    title: String,
    products: Vec<ProductView>,
    screenshot_ref: String,
    mismatch: bool,
    alert_message: Option<String>,
    actual_count: usize,
    expected_count: Option<usize>,
}

impl From<&TestOutcome> for RunTestResponse {
    fn from(outcome: &TestOutcome) -> Self {
        Self {
            success: !outcome.mismatch(),
            url: outcome.url().to_string(),
            title: outcome.title().to_string(),
            products: outcome.products().iter().map(ProductView::from).collect(),
            screenshot_ref: outcome.screenshot_ref().to_string(),
            mismatch: outcome.mismatch(),
            alert_message: outcome.alert_message().map(str::to_string),
            actual_count: outcome.actual_count(),
            expected_count: outcome.expected_count(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BatchFailure {
    success: bool,
    url: String,
    message: &'static str,
    error: String,
    error_kind: Option<promocheck_core::ErrorKind>,
}

impl From<&TestOutcome> for BatchFailure {
    fn from(outcome: &TestOutcome) -> Self {
        Self {
            success: false,
            url: outcome.url().to_string(),
            message: "test run failed",
            error: outcome
                .error()
                .map(|e| e.message.clone())
                .unwrap_or_default(),
            error_kind: outcome.error().map(|e| e.kind),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RunBatchResponse {
    results: Vec<RunTestResponse>,
    failures: Vec<BatchFailure>,
}

pub(super) async fn run_test(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<RunTestRequest>,
) -> Result<Json<RunTestResponse>, ApiFailure> {
    let case = request
        .into_test_case()
        .map_err(|reason| ApiFailure::bad_request(req_id.0.clone(), reason))?;
    tracing::info!(request_id = %req_id.0, url = %case.url, "run-test requested");

    let outcome = state.harness.run_test(&case).await.map_err(|e| {
        ApiFailure::bad_request(req_id.0.clone(), e.to_string())
    })?;

    match outcome.error() {
        None => Ok(Json(RunTestResponse::from(&outcome))),
        Some(error) => Err(ApiFailure::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            req_id.0,
            "test run failed",
            error.message.clone(),
            Some(error.kind),
        )),
    }
}

pub(super) async fn run_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<RunBatchRequest>,
) -> Result<Json<RunBatchResponse>, ApiFailure> {
    let submitted = request.tests.len();
    let cases = request
        .tests
        .into_iter()
        .filter(|t| !t.url.trim().is_empty())
        .map(RunTestRequest::into_test_case)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|reason| ApiFailure::bad_request(req_id.0.clone(), reason))?;

    if cases.is_empty() {
        return Err(ApiFailure::bad_request(
            req_id.0,
            "at least one test with a non-empty url is required",
        ));
    }
    tracing::info!(
        request_id = %req_id.0,
        cases = cases.len(),
        dropped = submitted - cases.len(),
        "run-batch requested"
    );

    let report = state.harness.run_batch(cases).await;
    let (succeeded, failed) = report.partition();

    Ok(Json(RunBatchResponse {
        results: succeeded.iter().map(RunTestResponse::from).collect(),
        failures: failed.iter().map(BatchFailure::from).collect(),
    }))
}

/// Missing or blank means "no expectation"; anything else must be a
/// non-negative integer.
fn parse_expected(raw: Option<&ExpectedProducts>) -> Result<Option<usize>, String> {
    match raw {
        None => Ok(None),
        Some(ExpectedProducts::Count(n)) => usize::try_from(*n)
            .map(Some)
            .map_err(|_| format!("expectedProducts must be a non-negative integer, got {n}")),
        Some(ExpectedProducts::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<usize>().map(Some).map_err(|_| {
                format!("expectedProducts must be a non-negative integer, got {text:?}")
            })
        }
    }
}
