//! `images` command: download a stored product's gallery.

use std::path::Path;

use amzcat_core::AppConfig;
use amzcat_scraper::{ImageDownloadOutcome, ProductPageClient};
use amzcat_store::CatalogStore;

/// Download every image of product `id` into `dir` and persist which ones
/// were saved. Individual download failures are reported, not propagated.
///
/// Returns the number of images saved.
///
/// # Errors
///
/// Returns an error if the product does not exist, `dir` cannot be
/// created, or the catalog write fails.
pub(crate) async fn run_images(
    config: &AppConfig,
    store: &mut CatalogStore,
    id: i64,
    dir: &Path,
) -> anyhow::Result<usize> {
    let client = ProductPageClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build product page client: {e}"))?;
    download_into(&client, store, id, dir).await
}

async fn download_into(
    client: &ProductPageClient,
    store: &mut CatalogStore,
    id: i64,
    dir: &Path,
) -> anyhow::Result<usize> {
    let mut record = store
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("product #{id} not found; run `list` to see ids"))?;

    if record.images.is_empty() {
        println!("product #{id} has no images");
        return Ok(0);
    }

    let outcomes = client.download_images(&mut record, dir).await?;
    let saved: Vec<String> = outcomes
        .iter()
        .filter(|o| o.succeeded())
        .map(|o| o.url.clone())
        .collect();

    for outcome in &outcomes {
        println!("{}", outcome_line(outcome));
    }

    store.mark_images_downloaded(id, &saved).await?;
    println!(
        "{} of {} images saved to {}",
        saved.len(),
        outcomes.len(),
        dir.display()
    );
    Ok(saved.len())
}

fn outcome_line(outcome: &ImageDownloadOutcome) -> String {
    match &outcome.path {
        Some(path) => format!("  saved   {}", path.display()),
        None => format!(
            "  failed  {} ({})",
            outcome.url,
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
    }
}
