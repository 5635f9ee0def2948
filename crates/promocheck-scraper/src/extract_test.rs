use std::str::FromStr;

use promocheck_core::{ExcludedHeadings, Verdict, SPECIAL_DISCOUNT_LABEL};

use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn extractor() -> ProductExtractor {
    let catalog = CatalogConfig {
        discount_labels: [
            ("842124", "20% off"),
            ("137355", "25% off"),
            ("842109", "Hot Sale"),
        ]
        .into_iter()
        .collect(),
        excluded_headings: ["Nuestras marcas", "Inicio"]
            .into_iter()
            .collect::<ExcludedHeadings>(),
    };
    ProductExtractor::new(Arc::new(catalog))
}

fn extract(html: &str) -> Vec<ProductRecord> {
    extractor().extract(&CatalogDocument::parse(html))
}

/// A WooCommerce loop item with sale markup and accessibility text.
fn sale_item(name: &str, badge_ids: &[&str], original: &str, current: &str) -> String {
    let badges: String = badge_ids
        .iter()
        .map(|id| {
            format!(
                r#"<div class="berocket_better_labels br_alabel br_alabel_image berocket_alabel_id_{id}"><span><img src="x.png"></span></div>"#
            )
        })
        .collect();
    format!(
        r#"<li class="product type-product">
             <a href="/p">{badges}
               <h2 class="woocommerce-loop-product__title">{name}</h2>
               <span class="price">
                 <del aria-hidden="true"><span class="woocommerce-Price-amount amount"><bdi><span class="woocommerce-Price-currencySymbol">$</span>{original}</bdi></span></del>
                 <span class="screen-reader-text">Original price was: ${original}.</span>
                 <ins aria-hidden="true"><span class="woocommerce-Price-amount amount"><bdi><span class="woocommerce-Price-currencySymbol">$</span>{current}</bdi></span></ins>
                 <span class="screen-reader-text">Current price is: ${current}.</span>
               </span>
             </a>
           </li>"#
    )
}

fn page(items: &[String]) -> String {
    format!(
        r#"<html><body><ul class="products">{}</ul></body></html>"#,
        items.concat()
    )
}

#[test]
fn extracts_name_badges_prices_and_verdict() {
    let html = page(&[sale_item("Galletitas Chocolinas", &["842124"], "1.234,50", "987,60")]);
    let products = extract(&html);

    assert_eq!(products.len(), 1);
    let p = &products[0];
    assert_eq!(p.name, "Galletitas Chocolinas");
    assert_eq!(p.badges.iter().collect::<Vec<_>>(), vec!["20% off"]);
    assert_eq!(p.price_original, Some(dec("1234.50")));
    assert_eq!(p.price_current, Some(dec("987.60")));
    assert_eq!(p.computed_discount_pct, Some(20));
    assert_eq!(p.verdict, Verdict::Match);
}

#[test]
fn wrong_badge_yields_mismatch() {
    let html = page(&[sale_item("Yerba Mate", &["137355"], "1.234,50", "987,60")]);
    let products = extract(&html);
    assert_eq!(products[0].verdict, Verdict::Mismatch);
}

#[test]
fn preserves_document_order() {
    let html = page(&[
        sale_item("Primero", &[], "100,00", "80,00"),
        sale_item("Segundo", &[], "100,00", "80,00"),
        sale_item("Tercero", &[], "100,00", "80,00"),
    ]);
    let names: Vec<String> = extract(&html).into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Primero", "Segundo", "Tercero"]);
}

#[test]
fn excluded_headings_are_skipped_anywhere_in_the_page() {
    let html = page(&[
        r#"<div><h2 class="woocommerce-loop-product__title">Inicio</h2></div>"#.to_string(),
        sale_item("Aceite", &[], "100,00", "80,00"),
        r#"<section><h2 class="woocommerce-loop-product__title"> Nuestras marcas </h2></section>"#
            .to_string(),
        sale_item("Arroz", &[], "100,00", "80,00"),
    ]);
    let names: Vec<String> = extract(&html).into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Aceite", "Arroz"]);
}

#[test]
fn empty_heading_is_not_a_product() {
    let html = page(&[
        r#"<li class="product"><h2 class="woocommerce-loop-product__title">   </h2></li>"#
            .to_string(),
    ]);
    assert!(extract(&html).is_empty());
}

#[test]
fn duplicate_badges_appear_once_in_first_seen_order() {
    let html = page(&[sale_item(
        "Fideos",
        &["842109", "842124", "842109", "842124"],
        "100,00",
        "80,00",
    )]);
    let products = extract(&html);
    assert_eq!(
        products[0].badges.iter().collect::<Vec<_>>(),
        vec!["Hot Sale", "20% off"]
    );
}

#[test]
fn distinct_ids_resolving_to_same_label_dedupe_on_label() {
    let html = page(&[sale_item("Harina", &["111", "222"], "100,00", "80,00")]);
    let products = extract(&html);
    assert_eq!(
        products[0].badges.iter().collect::<Vec<_>>(),
        vec![SPECIAL_DISCOUNT_LABEL]
    );
}

#[test]
fn product_without_badges_gets_no_discount_label() {
    let html = page(&[sale_item("Sal", &[], "100,00", "80,00")]);
    let products = extract(&html);
    assert_eq!(
        products[0].badges.iter().collect::<Vec<_>>(),
        vec![NO_DISCOUNT_LABEL]
    );
    assert_eq!(products[0].computed_discount_pct, Some(20));
    assert_eq!(products[0].verdict, Verdict::NotApplicable);
}

#[test]
fn badge_without_identifier_is_ignored() {
    let html = page(&[r#"<li class="product">
          <div class="br_alabel br_alabel_template"></div>
          <h2 class="woocommerce-loop-product__title">Te</h2>
        </li>"#
        .to_string()]);
    let products = extract(&html);
    assert_eq!(
        products[0].badges.iter().collect::<Vec<_>>(),
        vec![NO_DISCOUNT_LABEL]
    );
}

#[test]
fn sibling_products_do_not_share_badges_or_prices() {
    let html = page(&[
        sale_item("Con promo", &["842124"], "1.000,00", "800,00"),
        r#"<li class="product"><h2 class="woocommerce-loop-product__title">Sin promo</h2>
             <span class="price"><span class="woocommerce-Price-amount amount"><bdi>$500,00</bdi></span></span>
           </li>"#
            .to_string(),
    ]);
    let products = extract(&html);
    assert_eq!(products.len(), 2);
    assert_eq!(
        products[1].badges.iter().collect::<Vec<_>>(),
        vec![NO_DISCOUNT_LABEL]
    );
    assert_eq!(products[1].price_original, None);
    assert_eq!(products[1].price_current, Some(dec("500.00")));
    assert_eq!(products[1].verdict, Verdict::NotApplicable);
}

#[test]
fn falls_back_to_del_and_ins_without_accessibility_text() {
    let html = page(&[r#"<div class="product-card">
          <h2 class="woocommerce-loop-product__title">Queso</h2>
          <span class="price"><del>$2.000,00</del> <ins>$1.500,00</ins></span>
        </div>"#
        .to_string()]);
    let products = extract(&html);
    assert_eq!(products[0].price_original, Some(dec("2000.00")));
    assert_eq!(products[0].price_current, Some(dec("1500.00")));
    assert_eq!(products[0].computed_discount_pct, Some(25));
}

#[test]
fn accessibility_text_wins_over_markup() {
    let html = page(&[r#"<li class="product">
          <h2 class="woocommerce-loop-product__title">Leche</h2>
          <del>$9.999,00</del><ins>$1,00</ins>
          <span class="screen-reader-text">Original price was: $100,00.</span>
          <span class="screen-reader-text">Current price is: $90,00.</span>
        </li>"#
        .to_string()]);
    let products = extract(&html);
    assert_eq!(products[0].price_original, Some(dec("100.00")));
    assert_eq!(products[0].price_current, Some(dec("90.00")));
}

#[test]
fn missing_slot_is_filled_from_later_source() {
    let html = page(&[r#"<li class="product">
          <h2 class="woocommerce-loop-product__title">Manteca</h2>
          <del>$200,00</del><ins>$150,00</ins>
          <span class="screen-reader-text">Current price is: $160,00.</span>
        </li>"#
        .to_string()]);
    let products = extract(&html);
    assert_eq!(products[0].price_original, Some(dec("200.00")));
    assert_eq!(products[0].price_current, Some(dec("160.00")));
}

#[test]
fn spanish_accessibility_text_is_recognized() {
    let html = page(&[r#"<li class="product">
          <h2 class="woocommerce-loop-product__title">Café</h2>
          <span class="screen-reader-text">El precio original era: $1.000,00.</span>
          <span class="screen-reader-text">El precio actual es: $700,00.</span>
        </li>"#
        .to_string()]);
    let products = extract(&html);
    assert_eq!(products[0].price_original, Some(dec("1000.00")));
    assert_eq!(products[0].price_current, Some(dec("700.00")));
    assert_eq!(products[0].computed_discount_pct, Some(30));
}

#[test]
fn bare_price_is_ignored_when_struck_price_exists() {
    let html = page(&[r#"<li class="product">
          <h2 class="woocommerce-loop-product__title">Pan</h2>
          <del>precio anterior</del>
          <span class="woocommerce-Price-amount">$300,00</span>
        </li>"#
        .to_string()]);
    let products = extract(&html);
    assert_eq!(products[0].price_original, None);
    assert_eq!(products[0].price_current, None);
    assert_eq!(products[0].verdict, Verdict::NotApplicable);
}

#[test]
fn unparsable_prices_still_yield_a_record() {
    let html = page(&[sale_item("Agua", &["842124"], "consultar", "consultar")]);
    let products = extract(&html);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price_original, None);
    assert_eq!(products[0].price_current, None);
    assert_eq!(products[0].computed_discount_pct, None);
    assert_eq!(products[0].verdict, Verdict::NotApplicable);
}

#[test]
fn title_without_container_uses_parent_element() {
    let html = r#"<html><body>
        <div class="grid-cell">
          <div class="br_alabel berocket_alabel_id_842124"></div>
          <h2 class="woocommerce-loop-product__title">Suelto</h2>
          <del>$100,00</del><ins>$80,00</ins>
        </div>
        <div class="grid-cell">
          <h2 class="woocommerce-loop-product__title">Otro</h2>
        </div>
      </body></html>"#;
    let products = extract(html);
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].verdict, Verdict::Match);
    assert_eq!(
        products[1].badges.iter().collect::<Vec<_>>(),
        vec![NO_DISCOUNT_LABEL]
    );
    assert_eq!(products[1].price_current, None);
}

#[test]
fn other_headings_are_not_products() {
    let html = r#"<html><body><h2>Ofertas</h2><h2 class="section-title">Promos</h2></body></html>"#;
    assert!(extract(html).is_empty());
}

#[test]
fn strip_any_prefix_is_case_insensitive() {
    assert_eq!(
        strip_any_prefix("ORIGINAL PRICE WAS: $5", &ORIGINAL_PRICE_PREFIXES),
        Some(" $5")
    );
    assert_eq!(strip_any_prefix("Precio", &ORIGINAL_PRICE_PREFIXES), None);
}
