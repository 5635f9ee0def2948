use std::io::Write;

use super::*;

const SAMPLE: &str = r#"
discount_labels:
  "842124": "20% off"
  "910391": "2x1"
excluded_headings:
  - "Inicio"
  - "Nuestras marcas"
"#;

#[test]
fn resolve_returns_mapped_label() {
    let table: DiscountLabelTable = [("842124", "20% off")].into_iter().collect();
    assert_eq!(table.resolve("842124"), "20% off");
}

#[test]
fn resolve_unknown_id_falls_back_to_special_discount() {
    let table: DiscountLabelTable = [("842124", "20% off")].into_iter().collect();
    assert_eq!(table.resolve("999999"), SPECIAL_DISCOUNT_LABEL);
    assert_eq!(table.resolve(""), SPECIAL_DISCOUNT_LABEL);
}

#[test]
fn excluded_headings_match_exactly() {
    let headings: ExcludedHeadings = ["Inicio"].into_iter().collect();
    assert!(headings.contains("Inicio"));
    assert!(!headings.contains("inicio"));
    assert!(!headings.contains("Inicio "));
}

#[test]
fn parse_catalog_reads_both_tables() {
    let catalog = parse_catalog(SAMPLE).unwrap();
    assert_eq!(catalog.discount_labels.len(), 2);
    assert_eq!(catalog.discount_labels.resolve("910391"), "2x1");
    assert_eq!(catalog.excluded_headings.len(), 2);
    assert!(catalog.excluded_headings.contains("Nuestras marcas"));
}

#[test]
fn parse_catalog_allows_missing_sections() {
    let catalog = parse_catalog("discount_labels: {}\n").unwrap();
    assert!(catalog.discount_labels.is_empty());
    assert!(catalog.excluded_headings.is_empty());
}

#[test]
fn parse_catalog_rejects_non_numeric_id() {
    let err = parse_catalog("discount_labels:\n  \"abc\": \"10% off\"\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("abc")),
        "got: {err:?}"
    );
}

#[test]
fn parse_catalog_rejects_blank_label() {
    let err = parse_catalog("discount_labels:\n  \"123\": \"  \"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
}

#[test]
fn parse_catalog_rejects_duplicate_heading() {
    let err = parse_catalog("excluded_headings:\n  - Inicio\n  - Inicio\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
        "got: {err:?}"
    );
}

#[test]
fn parse_catalog_rejects_malformed_yaml() {
    let err = parse_catalog("discount_labels: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::CatalogFileParse(_)), "got: {err:?}");
}

#[test]
fn load_catalog_reports_missing_file() {
    let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::CatalogFileIo { ref path, .. } if path.contains("nonexistent")),
        "got: {err:?}"
    );
}

#[test]
fn load_catalog_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.discount_labels.resolve("842124"), "20% off");
}

#[test]
fn shipped_catalog_file_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.discount_labels.resolve("842124"), "20% off");
    assert_eq!(catalog.discount_labels.resolve("823750"), "40% off");
    assert!(catalog.excluded_headings.contains("Nuevos productos"));
}
