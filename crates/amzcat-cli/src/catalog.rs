//! Read-mostly catalog commands: `list`, `show`, `delete`, `export`.

use std::path::{Path, PathBuf};

use amzcat_core::ProductRecord;
use amzcat_store::{export_file_name, CatalogStore, ExportFormat};
use chrono::Utc;

const TITLE_WIDTH: usize = 50;

/// Print the catalog as a table, newest first.
pub(crate) fn run_list(store: &CatalogStore) {
    let products = store.list();
    if products.is_empty() {
        println!("catalog is empty; run `extract <url> --save` first");
        return;
    }

    println!("{}", list_header());
    for product in &products {
        println!("{}", list_row(product));
    }
}

fn list_header() -> String {
    format!(
        "{:<6}{:<13}{:<14}{:<8}{:<8}TITLE",
        "ID", "ASIN", "PRICE", "RATING", "IMAGES"
    )
}

fn list_row(product: &ProductRecord) -> String {
    let title = if product.title.chars().count() > TITLE_WIDTH {
        format!(
            "{}...",
            product.title.chars().take(TITLE_WIDTH).collect::<String>()
        )
    } else {
        product.title.clone()
    };
    let images = format!(
        "{}/{}",
        product.downloaded_image_count(),
        product.images.len()
    );
    format!(
        "{:<6}{:<13}{:<14}{:<8}{:<8}{}",
        product.id.unwrap_or_default(),
        dash_if_empty(&product.asin),
        dash_if_empty(&product.offer_price),
        dash_if_empty(&product.rating),
        images,
        title
    )
}

fn dash_if_empty(value: &str) -> &str {
    if value.is_empty() {
        "\u{2014}"
    } else {
        value
    }
}

/// Print one product as pretty JSON.
///
/// # Errors
///
/// Returns an error if no product has `id`.
pub(crate) fn run_show(store: &CatalogStore, id: i64) -> anyhow::Result<()> {
    let product = store
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("product #{id} not found; run `list` to see ids"))?;
    println!("{}", serde_json::to_string_pretty(product)?);
    Ok(())
}

/// Remove a product from the catalog.
///
/// # Errors
///
/// Returns an error if no product has `id` or the catalog write fails.
pub(crate) async fn run_delete(store: &mut CatalogStore, id: i64) -> anyhow::Result<()> {
    let removed = store.delete(id).await?;
    println!("deleted #{id} ({})", removed.display_key());
    Ok(())
}

/// Render the catalog and write it to `out`, or to a dated file in the
/// working directory.
///
/// # Errors
///
/// Returns an error for an unknown format or when the file cannot be
/// written.
pub(crate) async fn run_export(
    store: &CatalogStore,
    format: &str,
    out: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    let format: ExportFormat = format.parse()?;
    let products = store.list();
    let body = format.render(&products)?;

    let path = out.map_or_else(
        || PathBuf::from(export_file_name(format, Utc::now())),
        Path::to_path_buf,
    );
    tokio::fs::write(&path, &body)
        .await
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;

    tracing::info!(%format, products = products.len(), path = %path.display(), "catalog exported");
    println!("exported {} products to {}", products.len(), path.display());
    Ok(path)
}
