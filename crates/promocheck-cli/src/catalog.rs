use std::path::Path;

/// Loads and validates the catalog file, printing a short summary.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub(crate) fn run_catalog_check(path: &Path) -> anyhow::Result<()> {
    let catalog = promocheck_core::load_catalog(path)?;
    println!(
        "catalog ok: {} discount labels, {} excluded headings ({})",
        catalog.discount_labels.len(),
        catalog.excluded_headings.len(),
        path.display()
    );
    Ok(())
}
