//! `extract` command: fetch one product page and optionally store it.

use amzcat_core::{AppConfig, ProductRecord};
use amzcat_scraper::ProductPageClient;
use amzcat_store::CatalogStore;

/// Fetch `url`, print the extracted record as pretty JSON and, when `save`
/// is set, add it to the catalog.
///
/// # Errors
///
/// Returns an error if the URL is not an Amazon product URL, the page
/// cannot be fetched, or the catalog write fails.
pub(crate) async fn run_extract(
    config: &AppConfig,
    store: &mut CatalogStore,
    url: &str,
    save: bool,
) -> anyhow::Result<()> {
    let client = ProductPageClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build product page client: {e}"))?;

    let record = client.fetch_product(url).await?;
    print_extracted(&record)?;

    if save {
        let stored = store.add(record).await?;
        println!(
            "saved as #{} ({})",
            stored.id.unwrap_or_default(),
            stored.display_key()
        );
    }

    Ok(())
}

fn print_extracted(record: &ProductRecord) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    if record.title.is_empty() {
        tracing::warn!(url = %record.url, "no title found; the page may be a captcha or a non-product page");
    }
    Ok(())
}
