//! `run` command: one batch of checks from the terminal.

use std::path::Path;
use std::sync::Arc;

use promocheck_core::{AppConfig, ProductRecord, TestCase, TestOutcome, Verdict};
use promocheck_scraper::{
    format_price, BatchReport, ChromiumRenderer, Harness, RunSettings, ScreenshotStore,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CasesFile {
    tests: Vec<TestCase>,
}

/// Reads test cases from a YAML file shaped like:
///
/// ```yaml
/// tests:
///   - url: https://shop.example/ofertas
///     expected_count: 24
///   - url: https://shop.example/hot-sale
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub(crate) fn load_cases_file(path: &Path) -> anyhow::Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let file: CasesFile = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(file.tests)
}

/// Pairs positional URLs with `--expected` values by position, then appends
/// the cases loaded from file.
///
/// # Errors
///
/// Returns an error if more expectations than URLs were given, or if no case
/// remains.
pub(crate) fn build_cases(
    urls: &[String],
    expected: &[usize],
    file_cases: Vec<TestCase>,
) -> anyhow::Result<Vec<TestCase>> {
    if expected.len() > urls.len() {
        anyhow::bail!(
            "got {} --expected values for {} urls; each value pairs with the url in the same position",
            expected.len(),
            urls.len()
        );
    }

    let mut cases: Vec<TestCase> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| TestCase::new(url.as_str(), expected.get(i).copied()))
        .collect();
    cases.extend(file_cases);

    if cases.is_empty() {
        anyhow::bail!("no test cases; pass URLs or --file");
    }
    Ok(cases)
}

/// Runs every case against a local Chromium and prints the report.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, or when any case failed
/// or reported a count mismatch (so the process exits non-zero).
pub(crate) async fn run_checks(
    config: &AppConfig,
    cases: Vec<TestCase>,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = Arc::new(promocheck_core::load_catalog(&config.catalog_path)?);
    let harness = Arc::new(Harness::new(
        Arc::new(ChromiumRenderer::from_config(config)),
        catalog,
        ScreenshotStore::new(&config.screenshots_dir),
        RunSettings::from_config(config),
    ));

    let report = harness.run_batch(cases).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    let failed = report.failed().count();
    let mismatched = report.succeeded().filter(|o| o.mismatch()).count();
    if failed > 0 || mismatched > 0 {
        anyhow::bail!(
            "{failed} failed and {mismatched} mismatched of {} checks",
            report.outcomes().len()
        );
    }
    Ok(())
}

/// Plain-text report: one summary row per URL, then the products whose
/// badge disagrees with their prices.
pub(crate) fn render_report(report: &BatchReport) -> String {
    let mut out = format!(
        "{:<8}{:<10}{:<10}{:<12}URL\n",
        "STATUS", "PRODUCTS", "EXPECTED", "MISMATCHES"
    );
    for outcome in report.outcomes() {
        let expected = outcome
            .expected_count()
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        out.push_str(&format!(
            "{:<8}{:<10}{:<10}{:<12}{}\n",
            status(outcome),
            outcome.actual_count(),
            expected,
            verdict_mismatches(outcome).count(),
            outcome.url()
        ));
    }

    for outcome in report.outcomes() {
        if let Some(error) = outcome.error() {
            out.push_str(&format!("\n{}\n  error: {}\n", outcome.url(), error.message));
            continue;
        }
        if let Some(alert) = outcome.alert_message() {
            out.push_str(&format!("\n{}\n  {alert}\n", outcome.url()));
        }
        let mut mismatches = verdict_mismatches(outcome).peekable();
        if mismatches.peek().is_some() {
            out.push_str(&format!("\n{} ({})\n", outcome.url(), outcome.screenshot_ref()));
        }
        for product in mismatches {
            out.push_str(&product_line(product));
        }
    }
    out
}

fn product_line(product: &ProductRecord) -> String {
    let badges: Vec<&str> = product.badges.iter().collect();
    format!(
        "  {}: {} -> {} ({}%) badges [{}]\n",
        product.name,
        product.price_original.map_or_else(|| "?".to_string(), format_price),
        product.price_current.map_or_else(|| "?".to_string(), format_price),
        product
            .computed_discount_pct
            .map_or_else(|| "?".to_string(), |p| p.to_string()),
        badges.join(", ")
    )
}

fn status(outcome: &TestOutcome) -> &'static str {
    if outcome.is_failure() {
        "FAIL"
    } else if outcome.mismatch() {
        "COUNT"
    } else {
        "OK"
    }
}

fn verdict_mismatches(
    outcome: &TestOutcome,
) -> impl Iterator<Item = &ProductRecord> {
    outcome
        .products()
        .iter()
        .filter(|p| p.verdict == Verdict::Mismatch)
}
