//! Per-field extraction routines.
//!
//! Each routine degrades to the field's empty default when nothing on the
//! page qualifies. None of them can fail.

use std::sync::LazyLock;

use amzcat_core::{ProductImage, MAX_CATEGORIES, MAX_COLORS, MAX_IMAGES};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::chain::{first_attr, node_text, push_unique, Chain};
use super::observer::{ExtractEvent, ExtractObserver, Field};
use super::selectors;

static BRAND_FROM_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][a-zA-Z0-9\s&]+?)(?:\s|-)").expect("valid regex")
});

static ASIN_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([A-Z0-9]{10})(?:[/?#]|$)").expect("valid regex"));

static ASIN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{10}$").expect("valid regex"));

static RATING_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*out\s+of\s+5").expect("valid regex")
});

static COUNT_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("valid regex"));

/// Amazon image size token, e.g. `._AC_US40_.` or `._SX300_SY300_QL70_.`.
static IMAGE_SIZE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\._[A-Z]{2}[A-Z0-9_,]*_\.").expect("valid regex"));

const HIGH_RES_TOKEN: &str = "._AC_SL1500_.";

static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static BOLD_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-text-bold").expect("valid selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("valid selector"));

pub(crate) fn title(doc: &Html, observer: &dyn ExtractObserver) -> String {
    resolve_first(&selectors::TITLE, doc, observer, |t| non_empty(t.trim()))
}

/// Byline brand, else the capitalized word run leading the title.
///
/// The title heuristic picks up any capitalized lead word, so a title such as
/// "Premium Wireless Speaker" yields the brand "Premium".
pub(crate) fn brand(doc: &Html, title: &str, observer: &dyn ExtractObserver) -> String {
    let byline = selectors::BRAND.first(doc, observer, |raw| {
        let text = raw.trim();
        let lower = text.to_lowercase();
        if lower.contains("visit") || lower.contains("store") {
            return None;
        }
        non_empty(strip_brand_prefix(text).trim())
    });
    if let Some(brand) = byline {
        return brand;
    }

    if let Some(brand) = brand_from_title(title) {
        observer.on_event(&ExtractEvent::FieldDerived {
            field: Field::Brand,
            source: "title",
        });
        return brand;
    }

    selectors::BRAND.report_missing(observer);
    String::new()
}

pub(crate) fn brand_from_title(title: &str) -> Option<String> {
    BRAND_FROM_TITLE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| non_empty(m.as_str().trim()))
}

fn strip_brand_prefix(text: &str) -> &str {
    for prefix in ["brand:", "by "] {
        if text
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        {
            return &text[prefix.len()..];
        }
    }
    text
}

/// Direct model selectors first, then every row of every technical-details
/// table whose label mentions a model but not a model number.
pub(crate) fn model(doc: &Html, observer: &dyn ExtractObserver) -> String {
    if let Some(model) = selectors::MODEL.first(doc, observer, |t| non_empty(t.trim())) {
        return model;
    }

    for (_, _, tables) in selectors::SPEC_TABLES.groups(doc) {
        for table in tables {
            let found = table.select(&TR).filter_map(row_pair).find_map(|(label, value)| {
                let label = label.to_lowercase();
                (label.contains("model") && !label.contains("number")).then_some(value)
            });
            if let Some(model) = found {
                observer.on_event(&ExtractEvent::FieldDerived {
                    field: Field::Model,
                    source: "technical details table",
                });
                return model;
            }
        }
    }

    selectors::MODEL.report_missing(observer);
    String::new()
}

/// ASIN from the URL path when present, else from page attributes.
pub(crate) fn asin(doc: &Html, url: &str, observer: &dyn ExtractObserver) -> String {
    if let Some(asin) = asin_from_url(url) {
        observer.on_event(&ExtractEvent::FieldDerived {
            field: Field::Asin,
            source: "url",
        });
        return asin;
    }
    resolve_first(&selectors::ASIN, doc, observer, |raw| {
        let value = raw.trim();
        ASIN_SHAPE.is_match(value).then(|| value.to_string())
    })
}

pub(crate) fn asin_from_url(url: &str) -> Option<String> {
    ASIN_IN_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Star rating from text such as "4.5 out of 5 stars".
pub(crate) fn rating(doc: &Html, observer: &dyn ExtractObserver) -> String {
    resolve_first(&selectors::RATING, doc, observer, parse_rating)
}

pub(crate) fn parse_rating(text: &str) -> Option<String> {
    RATING_TEXT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Rating count from text such as "1,234 ratings".
pub(crate) fn rating_count(doc: &Html, observer: &dyn ExtractObserver) -> String {
    resolve_first(&selectors::RATING_COUNT, doc, observer, parse_count)
}

pub(crate) fn parse_count(text: &str) -> Option<String> {
    COUNT_TEXT.find(text).map(|m| m.as_str().replace(',', ""))
}

/// Union of swatch names across every color selector.
pub(crate) fn colors(doc: &Html, observer: &dyn ExtractObserver) -> Vec<String> {
    let mut colors = Vec::new();
    let mut first_hit = None;

    for (idx, _, nodes) in selectors::COLORS.groups(doc) {
        for node in nodes {
            let Some(name) = swatch_name(node) else {
                continue;
            };
            if push_unique(&mut colors, name, MAX_COLORS) {
                first_hit.get_or_insert(idx);
            }
        }
    }

    report_union(&selectors::COLORS, first_hit, observer);
    colors
}

fn swatch_name(node: ElementRef<'_>) -> Option<String> {
    let raw = first_attr(node, &["title", "alt"])
        .or_else(|| non_empty(&node_text(node)))
        .or_else(|| {
            node.select(&IMG)
                .find_map(|img| first_attr(img, &["alt"]).or_else(|| first_attr(img, &["title"])))
        })?;
    let name = raw.strip_prefix("Click to select ").unwrap_or(&raw).trim();
    (name.chars().count() > 1).then(|| name.to_string())
}

/// Feature bullets from the first selector that yields any, each prefixed
/// with "• " and joined by newlines.
pub(crate) fn about(doc: &Html, observer: &dyn ExtractObserver) -> String {
    for (idx, _, nodes) in selectors::ABOUT.groups(doc) {
        let items: Vec<String> = nodes
            .into_iter()
            .map(node_text)
            .filter(|t| t.chars().count() > 10 && !t.to_lowercase().contains("see more"))
            .collect();
        if !items.is_empty() {
            observer.on_event(&ExtractEvent::FieldResolved {
                field: Field::About,
                strategy: idx,
            });
            return items
                .iter()
                .map(|item| format!("• {item}"))
                .collect::<Vec<_>>()
                .join("\n");
        }
    }
    selectors::ABOUT.report_missing(observer);
    String::new()
}

/// "Label: Value" lines from the first row selector that yields any rows.
pub(crate) fn technical_data(doc: &Html, observer: &dyn ExtractObserver) -> String {
    for (idx, _, nodes) in selectors::SPEC_ROWS.groups(doc) {
        let lines: Vec<String> = nodes
            .into_iter()
            .filter_map(row_pair)
            .map(|(label, value)| format!("{label}: {value}"))
            .collect();
        if !lines.is_empty() {
            observer.on_event(&ExtractEvent::FieldResolved {
                field: Field::TechnicalData,
                strategy: idx,
            });
            return lines.join("\n");
        }
    }
    selectors::SPEC_ROWS.report_missing(observer);
    String::new()
}

/// Splits a technical-details row into a cleaned `(label, value)` pair.
///
/// Recognizes `<th>`/`<td>` rows, two-cell `<td>` rows, and detail bullets
/// whose label sits in a bold span. Placeholder values are dropped.
pub(crate) fn row_pair(row: ElementRef<'_>) -> Option<(String, String)> {
    let (label, value) = if let (Some(th), Some(td)) =
        (row.select(&TH).next(), row.select(&TD).next())
    {
        (node_text(th), node_text(td))
    } else if let [first, second, ..] = row.select(&TD).collect::<Vec<_>>()[..] {
        (node_text(first), node_text(second))
    } else {
        let bold = row.select(&BOLD_LABEL).next()?;
        let label = node_text(bold);
        let full = node_text(row);
        let value = full.strip_prefix(label.as_str()).unwrap_or(&full).to_string();
        (label, value)
    };

    let label = clean_cell(&label);
    let value = clean_cell(&value);
    if label.is_empty() || value.is_empty() || value == "N/A" || value == "-" {
        return None;
    }
    Some((label, value))
}

fn clean_cell(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{200e}' | '\u{200f}' | '\u{200b}'))
        .collect();
    stripped
        .trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Gallery images across every image selector, upgraded to the high
/// resolution rendition and de-duplicated by URL.
pub(crate) fn images(doc: &Html, observer: &dyn ExtractObserver) -> Vec<ProductImage> {
    let mut images: Vec<ProductImage> = Vec::new();
    let mut first_hit = None;

    'groups: for (idx, strategy, nodes) in selectors::IMAGES.groups(doc) {
        for node in nodes {
            if images.len() >= MAX_IMAGES {
                break 'groups;
            }
            let Some(raw) = strategy.read(node) else {
                continue;
            };
            let url = upgrade_image_url(&raw);
            if !url.contains("amazon")
                || url.contains("sprite")
                || images.iter().any(|i| i.url == url)
            {
                continue;
            }
            let alt = node.value().attr("alt").unwrap_or_default().trim();
            images.push(ProductImage::new(url, alt));
            first_hit.get_or_insert(idx);
        }
    }

    report_union(&selectors::IMAGES, first_hit, observer);
    images
}

pub(crate) fn upgrade_image_url(url: &str) -> String {
    IMAGE_SIZE_TOKEN
        .replace_all(url, HIGH_RES_TOKEN)
        .into_owned()
}

/// Breadcrumb trail from the first selector that yields any usable crumb.
pub(crate) fn categories(doc: &Html, observer: &dyn ExtractObserver) -> Vec<String> {
    for (idx, _, nodes) in selectors::CATEGORIES.groups(doc) {
        let mut crumbs = Vec::new();
        for node in nodes {
            let text = node_text(node);
            if text.chars().count() > 2 && !text.to_lowercase().contains("amazon") {
                push_unique(&mut crumbs, text, MAX_CATEGORIES);
            }
        }
        if !crumbs.is_empty() {
            observer.on_event(&ExtractEvent::FieldResolved {
                field: Field::Categories,
                strategy: idx,
            });
            return crumbs;
        }
    }
    selectors::CATEGORIES.report_missing(observer);
    Vec::new()
}

/// Runs a first-match chain and reports a miss when nothing qualifies.
pub(crate) fn resolve_first<F>(
    chain: &Chain,
    doc: &Html,
    observer: &dyn ExtractObserver,
    accept: F,
) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    chain.first(doc, observer, accept).unwrap_or_else(|| {
        chain.report_missing(observer);
        String::new()
    })
}

fn report_union(chain: &Chain, first_hit: Option<usize>, observer: &dyn ExtractObserver) {
    match first_hit {
        Some(strategy) => observer.on_event(&ExtractEvent::FieldResolved {
            field: chain.field(),
            strategy,
        }),
        None => chain.report_missing(observer),
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
