use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of comparing the discount a badge claims with the discount the
/// listed prices imply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// A badge percentage equals the computed percentage.
    Match,
    /// Badges claim a percentage but none equals the computed one.
    Mismatch,
    /// Missing prices, or no badge claims a percentage.
    NotApplicable,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Match => write!(f, "match"),
            Verdict::Mismatch => write!(f, "mismatch"),
            Verdict::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Insertion-ordered set of badge labels. Inserting a label that is already
/// present is a no-op, so a badge rendered twice in markup appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeSet(Vec<String>);

impl BadgeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `label`, returning `false` when it was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.0.contains(&label) {
            return false;
        }
        self.0.push(label);
        true
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BadgeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// One product extracted from a catalog page, with its reconciled discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub badges: BadgeSet,
    /// Struck-through (pre-sale) price, when one could be parsed.
    pub price_original: Option<Decimal>,
    pub price_current: Option<Decimal>,
    /// Discount implied by the two prices, rounded to a whole percentage.
    pub computed_discount_pct: Option<i64>,
    pub verdict: Verdict,
}
