//! Static storefront tables: badge identifier → display label, and headings
//! that reuse product-title markup without being products.
//!
//! Both tables are loaded once at process start and shared read-only across
//! every test run.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Label reported for a badge whose identifier is not in the table.
pub const SPECIAL_DISCOUNT_LABEL: &str = "Special discount";

/// Label reported for a product that carries no recognizable badge.
pub const NO_DISCOUNT_LABEL: &str = "No discount";

/// Mapping from opaque badge identifier to human-readable label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountLabelTable {
    labels: HashMap<String, String>,
}

impl DiscountLabelTable {
    #[must_use]
    pub fn new(labels: HashMap<String, String>) -> Self {
        Self { labels }
    }

    /// Resolves `badge_id` to its display label, falling back to
    /// [`SPECIAL_DISCOUNT_LABEL`] for unknown identifiers.
    #[must_use]
    pub fn resolve(&self, badge_id: &str) -> &str {
        self.labels
            .get(badge_id)
            .map_or(SPECIAL_DISCOUNT_LABEL, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DiscountLabelTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Headings that share the product-title markup but are navigation or
/// marketing blocks. Matching is exact, on the trimmed heading text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedHeadings {
    headings: HashSet<String>,
}

impl ExcludedHeadings {
    #[must_use]
    pub fn contains(&self, heading: &str) -> bool {
        self.headings.contains(heading)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExcludedHeadings {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            headings: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parsed contents of the catalog YAML file.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub discount_labels: DiscountLabelTable,
    pub excluded_headings: ExcludedHeadings,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    discount_labels: HashMap<String, String>,
    #[serde(default)]
    excluded_headings: Vec<String>,
}

/// Load and validate the catalog configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML already held in memory.
///
/// # Errors
///
/// Returns `ConfigError::CatalogFileParse` for malformed YAML and
/// `ConfigError::Validation` for semantically invalid entries.
pub fn parse_catalog(content: &str) -> Result<CatalogConfig, ConfigError> {
    let file: CatalogFile =
        serde_yaml::from_str(content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&file)?;

    Ok(CatalogConfig {
        discount_labels: DiscountLabelTable::new(file.discount_labels),
        excluded_headings: file.excluded_headings.into_iter().collect(),
    })
}

fn validate_catalog(file: &CatalogFile) -> Result<(), ConfigError> {
    for (id, label) in &file.discount_labels {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::Validation(format!(
                "badge id '{id}' must be a non-empty string of digits"
            )));
        }
        if label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "badge id '{id}' maps to an empty label"
            )));
        }
    }

    let mut seen = HashSet::new();
    for heading in &file.excluded_headings {
        if heading.trim().is_empty() {
            return Err(ConfigError::Validation(
                "excluded heading must be non-empty".to_string(),
            ));
        }
        if !seen.insert(heading.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate excluded heading: '{heading}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
