//! CSS selector chains for Amazon product detail pages.
//!
//! Each chain lists strategies from most to least specific. Amazon serves
//! several templates (desktop, mobile, regional, A/B cohorts) and a field
//! usually exists in only one of them, so order here decides which markup
//! wins when more than one is present. Update this file, not the field
//! logic, when the markup changes.

use std::sync::LazyLock;

use super::chain::{Chain, Strategy};
use super::observer::Field;

/// Attribute preference when resolving a gallery image URL.
const IMAGE_ATTRS: &[&str] = &["data-old-hires", "data-a-hires", "src", "data-src"];

pub(crate) static TITLE: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Title,
        &[
            Strategy::text("#productTitle"),
            Strategy::text("#title span"),
            Strategy::text("h1.a-size-large span"),
            Strategy::text("h1#title"),
            Strategy::text(".product-title-word-break"),
        ],
    )
});

pub(crate) static BRAND: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Brand,
        &[
            Strategy::text("#bylineInfo"),
            Strategy::text(".po-brand .po-break-word"),
            Strategy::text("tr.po-brand td.a-span9 span"),
            Strategy::text("#brand"),
            Strategy::text("a#brand"),
        ],
    )
});

pub(crate) static MODEL: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Model,
        &[
            Strategy::text(".po-model_name .po-break-word"),
            Strategy::text("tr.po-model_name td.a-span9 span"),
            Strategy::text("#model_number"),
        ],
    )
});

/// Technical-details tables scanned row by row for a model name.
pub(crate) static SPEC_TABLES: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Model,
        &[
            Strategy::text("#productDetails_techSpec_section_1"),
            Strategy::text("#technicalSpecifications_section_1"),
            Strategy::text("#productDetails_detailBullets_sections1"),
            Strategy::text("table.prodDetTable"),
            Strategy::text("table.a-keyvalue"),
        ],
    )
});

pub(crate) static ASIN: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Asin,
        &[
            Strategy::attr("input#ASIN", &["value"]),
            Strategy::attr("input[name='ASIN']", &["value"]),
            Strategy::attr("[data-asin]", &["data-asin"]),
            Strategy::attr("[data-csa-c-asin]", &["data-csa-c-asin"]),
        ],
    )
});

pub(crate) static OFFER_PRICE: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::OfferPrice,
        &[
            Strategy::text(".priceToPay .a-offscreen"),
            Strategy::text("#corePrice_feature_div .a-price .a-offscreen"),
            Strategy::text("#priceblock_dealprice"),
            Strategy::text("#priceblock_ourprice"),
            Strategy::text("#price_inside_buybox"),
            Strategy::text(".a-price:not(.a-text-price) .a-offscreen"),
        ],
    )
});

pub(crate) static ORIGINAL_PRICE: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::OriginalPrice,
        &[
            Strategy::text(".basisPrice .a-offscreen"),
            Strategy::text("#corePriceDisplay_desktop_feature_div .a-text-price .a-offscreen"),
            Strategy::text(".a-price[data-a-strike='true'] .a-offscreen"),
            Strategy::text("#listPrice"),
            Strategy::text(".a-text-price .a-offscreen"),
        ],
    )
});

pub(crate) static DISCOUNT: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Discount,
        &[
            Strategy::text("#corePriceDisplay_desktop_feature_div .savingsPercentage"),
            Strategy::text(".savingsPercentage"),
            Strategy::text("#regularprice_savings"),
            Strategy::text("#dealprice_savings .priceBlockSavingsString"),
            Strategy::text(".reinventPriceSavingsPercentageMargin"),
        ],
    )
});

pub(crate) static RATING: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Rating,
        &[
            Strategy::text("#acrPopover span.a-icon-alt"),
            Strategy::attr("#acrPopover", &["title"]),
            Strategy::text("span[data-hook='rating-out-of-text']"),
            Strategy::text("i.a-icon-star span.a-icon-alt"),
            Strategy::text("#averageCustomerReviews .a-icon-alt"),
        ],
    )
});

pub(crate) static RATING_COUNT: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::RatingCount,
        &[
            Strategy::text("#acrCustomerReviewText"),
            Strategy::text("span[data-hook='total-review-count']"),
            Strategy::text("#acrCustomerReviewLink span"),
        ],
    )
});

pub(crate) static COLORS: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Colors,
        &[
            Strategy::text("#variation_color_name li"),
            Strategy::text("#inline-twister-expander-content-color_name li"),
            Strategy::text("#tp-inline-twister-dim-values-container li"),
            Strategy::text("#variation_color_name .selection"),
        ],
    )
});

pub(crate) static ABOUT: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::About,
        &[
            Strategy::text("#feature-bullets ul li span.a-list-item"),
            Strategy::text("#feature-bullets li"),
            Strategy::text("#productFactsDesktopExpander ul li span.a-list-item"),
            Strategy::text("#productDescription p"),
            Strategy::text("#bookDescription_feature_div span"),
        ],
    )
});

/// Row-level selectors for the technical details section.
pub(crate) static SPEC_ROWS: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::TechnicalData,
        &[
            Strategy::text("#productDetails_techSpec_section_1 tr"),
            Strategy::text("#technicalSpecifications_section_1 tr"),
            Strategy::text("#productDetails_detailBullets_sections1 tr"),
            Strategy::text("#prodDetails table tr"),
            Strategy::text("table.a-keyvalue tr"),
            Strategy::text("#detailBullets_feature_div li"),
        ],
    )
});

pub(crate) static IMAGES: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Images,
        &[
            Strategy::attr("#landingImage", IMAGE_ATTRS),
            Strategy::attr("#imgTagWrapperId img", IMAGE_ATTRS),
            Strategy::attr("#imgBlkFront", IMAGE_ATTRS),
            Strategy::attr("#altImages li.imageThumbnail img", IMAGE_ATTRS),
            Strategy::attr("#altImages img", IMAGE_ATTRS),
            Strategy::attr("#main-image-container img", IMAGE_ATTRS),
            Strategy::attr("img.a-dynamic-image", IMAGE_ATTRS),
        ],
    )
});

pub(crate) static CATEGORIES: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new(
        Field::Categories,
        &[
            Strategy::text("#wayfinding-breadcrumbs_feature_div ul li a"),
            Strategy::text("#wayfinding-breadcrumbs_container ul li a"),
            Strategy::text(".a-breadcrumb li a"),
            Strategy::text("nav[aria-label='Breadcrumb'] a"),
        ],
    )
});
