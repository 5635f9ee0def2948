//! Reconciliation of badge-claimed discounts against listed prices.

use std::str::FromStr;
use std::sync::LazyLock;

use promocheck_core::{BadgeSet, Verdict};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

static CLAIMED_PCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*%").expect("valid claimed-percentage regex"));

/// Computed discount and verdict for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub computed_pct: Option<i64>,
    pub verdict: Verdict,
}

/// Compares the discount implied by `original`/`current` with every
/// percentage claimed in `badges`.
///
/// - Either price missing (or an unusable original): no percentage, `NotApplicable`.
/// - No badge carries a percentage: `NotApplicable`, there is no claim to check.
/// - Some claimed percentage equals the computed one: `Match`.
/// - Otherwise: `Mismatch`.
#[must_use]
pub fn reconcile(
    original: Option<Decimal>,
    current: Option<Decimal>,
    badges: &BadgeSet,
) -> Reconciliation {
    let Some(computed_pct) = original.zip(current).and_then(|(o, c)| discount_pct(o, c)) else {
        return Reconciliation {
            computed_pct: None,
            verdict: Verdict::NotApplicable,
        };
    };

    let claims: Vec<Decimal> = badges.iter().flat_map(claimed_percentages).collect();
    let computed = Decimal::from(computed_pct);

    let verdict = if claims.is_empty() {
        Verdict::NotApplicable
    } else if claims.contains(&computed) {
        Verdict::Match
    } else {
        Verdict::Mismatch
    };

    Reconciliation {
        computed_pct: Some(computed_pct),
        verdict,
    }
}

/// Discount percentage implied by a price pair, rounded half away from zero
/// (`19.5` → `20`, `-0.5` → `-1`).
///
/// Returns `None` when `original` is not positive.
#[must_use]
pub fn discount_pct(original: Decimal, current: Decimal) -> Option<i64> {
    if original <= Decimal::ZERO {
        return None;
    }
    let pct = original
        .checked_sub(current)?
        .checked_div(original)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Percentages written in a badge label, e.g. `"20% off"` → `[20]`.
fn claimed_percentages(label: &str) -> Vec<Decimal> {
    CLAIMED_PCT_RE
        .captures_iter(label)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| Decimal::from_str(&m.as_str().replace(',', ".")).ok())
        .collect()
}
