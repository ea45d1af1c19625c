//! Product URL validation and URL-derived naming helpers.

use crate::error::ScraperError;

/// Registrable suffixes that follow the `amazon` label on storefront hosts.
const STOREFRONT_SUFFIXES: &[&str] = &[
    "com", "ca", "com.mx", "com.br", "co.uk", "de", "fr", "it", "es", "nl", "se", "pl",
    "com.be", "com.tr", "ae", "sa", "eg", "in", "co.jp", "sg", "com.au", "cn",
];

/// Checks that `url` is an `http(s)` URL on an Amazon storefront host.
///
/// Any regional storefront qualifies (`amazon.com`, `www.amazon.in`,
/// `smile.amazon.co.uk`, ...).
///
/// # Errors
///
/// Returns [`ScraperError::InvalidProductUrl`] when the URL does not parse,
/// uses another scheme, or points at a non-Amazon host.
pub fn validate_product_url(url: &str) -> Result<reqwest::Url, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidProductUrl {
        url: url.to_owned(),
        reason,
    };

    let parsed = reqwest::Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", parsed.scheme())));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| invalid("URL has no host".to_owned()))?;
    if !is_storefront_host(host) {
        return Err(invalid(format!("\"{host}\" is not an Amazon storefront")));
    }

    Ok(parsed)
}

/// `true` when `host` is `amazon.<suffix>` or a subdomain of it.
fn is_storefront_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    STOREFRONT_SUFFIXES.iter().any(|suffix| {
        let apex = format!("amazon.{suffix}");
        host == apex || host.ends_with(&format!(".{apex}"))
    })
}

/// Returns the lowercase file extension of the URL's last path segment, or
/// `"jpg"` when there is none.
pub(crate) fn image_extension(url: &str) -> String {
    let last_segment = reqwest::Url::parse(url).ok().and_then(|u| {
        u.path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_owned))
    });

    last_segment
        .as_deref()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| (1..=4).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "jpg".to_owned())
}
