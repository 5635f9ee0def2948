//! Product extraction from a rendered WooCommerce catalog page.
//!
//! Each product is anchored on its title heading. Badges and prices are only
//! looked up inside the title's product container so data from neighbouring
//! products never leaks across records.

use std::sync::{Arc, LazyLock};

use promocheck_core::{BadgeSet, CatalogConfig, ProductRecord, NO_DISCOUNT_LABEL};
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::price::parse_price;
use crate::reconcile::reconcile;

static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h2.woocommerce-loop-product__title").expect("valid title selector")
});

static CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".product, .product-card, li.product, article.product")
        .expect("valid container selector")
});

static BADGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[class*="br_alabel"]"#).expect("valid badge selector")
});

static BADGE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"berocket_alabel_id_(\d+)").expect("valid badge id regex"));

static SCREEN_READER_TEXT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".screen-reader-text").expect("valid screen reader selector"));

static STRUCK_PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("del").expect("valid struck price selector"));

static INSERTED_PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ins").expect("valid inserted price selector"));

static BARE_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".price .woocommerce-Price-amount, .woocommerce-Price-amount")
        .expect("valid bare price selector")
});

/// Accessibility-text prefixes announcing the pre-sale price (en / es).
const ORIGINAL_PRICE_PREFIXES: [&str; 2] = ["original price was:", "el precio original era:"];

/// Accessibility-text prefixes announcing the sale price (en / es).
const CURRENT_PRICE_PREFIXES: [&str; 2] = ["current price is:", "el precio actual es:"];

/// A rendered page, parsed and ready to be queried.
pub struct CatalogDocument {
    html: Html,
}

impl CatalogDocument {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }
}

/// Extracts product records using the shared catalog tables.
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    catalog: Arc<CatalogConfig>,
}

impl ProductExtractor {
    #[must_use]
    pub fn new(catalog: Arc<CatalogConfig>) -> Self {
        Self { catalog }
    }

    /// Returns one record per product title, in document order.
    ///
    /// Headings listed as excluded, and headings with no text, are skipped.
    /// A product whose prices cannot be read still yields a record, with a
    /// `NotApplicable` verdict.
    #[must_use]
    pub fn extract(&self, document: &CatalogDocument) -> Vec<ProductRecord> {
        document
            .html
            .select(&TITLE)
            .filter_map(|title| self.extract_product(title))
            .collect()
    }

    fn extract_product(&self, title: ElementRef<'_>) -> Option<ProductRecord> {
        let name = element_text(title);
        if name.is_empty() {
            return None;
        }
        if self.catalog.excluded_headings.contains(&name) {
            tracing::debug!(heading = %name, "skipping excluded heading");
            return None;
        }

        let container = product_container(title);

        let mut badges = self.collect_badges(container);
        if badges.is_empty() {
            badges.insert(NO_DISCOUNT_LABEL);
        }

        let prices = locate_prices(container);
        let reconciliation = reconcile(prices.original, prices.current, &badges);

        Some(ProductRecord {
            name,
            badges,
            price_original: prices.original,
            price_current: prices.current,
            computed_discount_pct: reconciliation.computed_pct,
            verdict: reconciliation.verdict,
        })
    }

    fn collect_badges(&self, container: ElementRef<'_>) -> BadgeSet {
        container
            .select(&BADGE)
            .filter_map(badge_id)
            .map(|id| self.catalog.discount_labels.resolve(id))
            .collect()
    }
}

/// Nearest enclosing product container, else the title's parent element.
fn product_container(title: ElementRef<'_>) -> ElementRef<'_> {
    title
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| CONTAINER.matches(el))
        .or_else(|| title.parent().and_then(ElementRef::wrap))
        .unwrap_or(title)
}

fn badge_id(badge: ElementRef<'_>) -> Option<&str> {
    let class = badge.value().attr("class")?;
    BADGE_ID_RE
        .captures(class)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PriceSlots {
    original: Option<Decimal>,
    current: Option<Decimal>,
}

type PriceStrategy = fn(ElementRef<'_>) -> PriceSlots;

/// Price sources in priority order. A slot keeps the first value found.
const PRICE_STRATEGIES: [PriceStrategy; 3] = [accessible_prices, marked_up_prices, bare_price];

fn locate_prices(container: ElementRef<'_>) -> PriceSlots {
    PRICE_STRATEGIES
        .iter()
        .fold(PriceSlots::default(), |found, strategy| {
            if found.original.is_some() && found.current.is_some() {
                return found;
            }
            let next = strategy(container);
            PriceSlots {
                original: found.original.or(next.original),
                current: found.current.or(next.current),
            }
        })
}

/// Screen-reader text such as `"Original price was: $1.234,50."`.
fn accessible_prices(container: ElementRef<'_>) -> PriceSlots {
    let mut slots = PriceSlots::default();
    for el in container.select(&SCREEN_READER_TEXT) {
        let text = element_text(el);
        if slots.original.is_none() {
            slots.original = strip_any_prefix(&text, &ORIGINAL_PRICE_PREFIXES).and_then(parse_price);
        }
        if slots.current.is_none() {
            slots.current = strip_any_prefix(&text, &CURRENT_PRICE_PREFIXES).and_then(parse_price);
        }
    }
    slots
}

/// Struck-through `<del>` for the original price, `<ins>` for the current one.
fn marked_up_prices(container: ElementRef<'_>) -> PriceSlots {
    let first_price = |selector: &Selector| {
        container
            .select(selector)
            .next()
            .and_then(|el| parse_price(&element_text(el)))
    };
    PriceSlots {
        original: first_price(&STRUCK_PRICE),
        current: first_price(&INSERTED_PRICE),
    }
}

/// A single unmarked price, read as the current price when nothing is struck through.
fn bare_price(container: ElementRef<'_>) -> PriceSlots {
    if container.select(&STRUCK_PRICE).next().is_some() {
        return PriceSlots::default();
    }
    PriceSlots {
        original: None,
        current: container
            .select(&BARE_PRICE)
            .next()
            .and_then(|el| parse_price(&element_text(el))),
    }
}

fn strip_any_prefix<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| {
        let head = text.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| text.get(prefix.len()..))
            .flatten()
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
