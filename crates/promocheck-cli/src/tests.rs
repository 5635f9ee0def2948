use super::*;

use std::str::FromStr;

use promocheck_core::{
    BadgeSet, ErrorInfo, ErrorKind, ProductRecord, TestCase, TestOutcome, Verdict,
};
use promocheck_scraper::BatchReport;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn parses_run_with_urls_and_expectations() {
    let cli = Cli::try_parse_from([
        "promocheck-cli",
        "run",
        "https://shop.example/a",
        "https://shop.example/b",
        "--expected",
        "12",
        "--expected",
        "3",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            ref urls,
            ref expected,
            file: None,
            json: false,
        }) if urls.len() == 2 && expected == &[12, 3]
    ));
}

#[test]
fn parses_run_with_file_and_json() {
    let cli = Cli::try_parse_from(["promocheck-cli", "run", "--file", "cases.yaml", "--json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            ref urls,
            file: Some(ref f),
            json: true,
            ..
        }) if urls.is_empty() && f == &PathBuf::from("cases.yaml")
    ));
}

#[test]
fn rejects_non_numeric_expectation() {
    let result = Cli::try_parse_from([
        "promocheck-cli",
        "run",
        "https://shop.example",
        "--expected",
        "muchos",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_catalog_check() {
    let cli = Cli::try_parse_from(["promocheck-cli", "catalog", "check"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::Check { path: None }
        })
    ));
}

#[test]
fn parses_catalog_check_with_path() {
    let cli = Cli::try_parse_from(["promocheck-cli", "catalog", "check", "--path", "x.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::Check { path: Some(ref p) }
        }) if p == &PathBuf::from("x.yaml")
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["promocheck-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

// ---------------------------------------------------------------------------
// case building
// ---------------------------------------------------------------------------

#[test]
fn build_cases_pairs_expectations_by_position() {
    let urls = vec!["https://a".to_string(), "https://b".to_string()];
    let cases = run::build_cases(&urls, &[7], Vec::new()).unwrap();
    assert_eq!(
        cases,
        vec![
            TestCase::new("https://a", Some(7)),
            TestCase::new("https://b", None),
        ]
    );
}

#[test]
fn build_cases_rejects_extra_expectations() {
    let urls = vec!["https://a".to_string()];
    assert!(run::build_cases(&urls, &[1, 2], Vec::new()).is_err());
}

#[test]
fn build_cases_requires_at_least_one_case() {
    assert!(run::build_cases(&[], &[], Vec::new()).is_err());
}

#[test]
fn build_cases_appends_file_cases() {
    let urls = vec!["https://a".to_string()];
    let cases = run::build_cases(&urls, &[], vec![TestCase::new("https://f", Some(2))]).unwrap();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[1].url, "https://f");
}

#[test]
fn load_cases_file_reads_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cases.yaml");
    std::fs::write(
        &path,
        "tests:\n  - url: https://shop.example/ofertas\n    expected_count: 24\n  - url: https://shop.example/hot-sale\n",
    )
    .unwrap();

    let cases = run::load_cases_file(&path).unwrap();
    assert_eq!(
        cases,
        vec![
            TestCase::new("https://shop.example/ofertas", Some(24)),
            TestCase::new("https://shop.example/hot-sale", None),
        ]
    );
}

#[test]
fn load_cases_file_reports_bad_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cases.yaml");
    std::fs::write(&path, "tests: [url: ").unwrap();
    let err = run::load_cases_file(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse"));
}

// ---------------------------------------------------------------------------
// report rendering
// ---------------------------------------------------------------------------

fn product(
    name: &str,
    badge: &str,
    original: &str,
    current: &str,
    pct: i64,
    verdict: Verdict,
) -> ProductRecord {
    ProductRecord {
        name: name.to_string(),
        badges: [badge].into_iter().collect::<BadgeSet>(),
        price_original: Some(dec(original)),
        price_current: Some(dec(current)),
        computed_discount_pct: Some(pct),
        verdict,
    }
}

#[test]
fn report_lists_status_rows_and_mismatched_products() {
    let report = BatchReport::from(vec![
        TestOutcome::completed(
            &TestCase::new("https://shop.example/a", Some(2)),
            "A",
            vec![
                product("Yerba", "20% off", "1234.50", "987.60", 20, Verdict::Match),
                product("Arroz", "25% off", "1234.50", "987.60", 20, Verdict::Mismatch),
            ],
            "/screenshots/a.png",
        ),
        TestOutcome::completed(
            &TestCase::new("https://shop.example/b", Some(5)),
            "B",
            Vec::new(),
            "/screenshots/b.png",
        ),
        TestOutcome::failed(
            &TestCase::new("https://down.example", None),
            ErrorInfo::new(
                ErrorKind::Navigation,
                "navigation to https://down.example timed out after 30s",
            ),
        ),
    ]);

    let text = run::render_report(&report);

    assert!(text.starts_with("STATUS"));
    assert!(text.contains("OK      2         2         1           https://shop.example/a"));
    assert!(text.contains("COUNT   0         5         0           https://shop.example/b"));
    assert!(text.contains("FAIL    0         -         0           https://down.example"));
    assert!(text.contains("Arroz: $1.234,50 -> $987,60 (20%) badges [25% off]"));
    assert!(!text.contains("Yerba:"));
    assert!(text.contains("Expected 5 products, but found 0"));
    assert!(text.contains("error: navigation to https://down.example timed out after 30s"));
}

#[test]
fn report_marks_missing_prices_and_ends_rows_with_newlines() {
    let mut arroz = product("Arroz", "25% off", "1234.50", "987.60", 20, Verdict::Mismatch);
    arroz.price_original = None;
    arroz.computed_discount_pct = None;
    let report = BatchReport::from(vec![TestOutcome::completed(
        &TestCase::new("https://shop.example/a", None),
        "A",
        vec![arroz],
        "/screenshots/a.png",
    )]);

    let text = run::render_report(&report);

    assert!(text.contains("  Arroz: ? -> $987,60 (?%) badges [25% off]\n"));
    assert!(text.contains("https://shop.example/a (/screenshots/a.png)\n"));
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().next(), Some("STATUS  PRODUCTS  EXPECTED  MISMATCHES  URL"));
}
