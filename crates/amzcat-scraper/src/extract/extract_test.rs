use std::cell::RefCell;

use amzcat_core::{MAX_CATEGORIES, MAX_COLORS, MAX_IMAGES};

use super::*;

const PRODUCT_URL: &str =
    "https://www.amazon.com/Sony-WH-1000XM4-Canceling-Headphones/dp/B0863TXGM3/ref=sr_1_1?keywords=sony";
const BARE_URL: &str = "https://www.amazon.com/gp/product";

fn page(body: &str) -> Html {
    Html::parse_document(&format!("<html><head></head><body>{body}</body></html>"))
}

fn extract_quiet(doc: &Html, url: &str) -> ProductRecord {
    extract_with_observer(doc, url, &NoopObserver)
}

fn extract_recording(doc: &Html, url: &str) -> (ProductRecord, Vec<String>) {
    let events = RefCell::new(Vec::new());
    let record = extract_with_observer(doc, url, &|event: &ExtractEvent<'_>| {
        events.borrow_mut().push(format!("{event:?}"));
    });
    (record, events.into_inner())
}

const FULL_PAGE: &str = r#"
<div id="wayfinding-breadcrumbs_feature_div"><ul>
  <li><a href="/electronics">Electronics</a></li>
  <li><span>›</span></li>
  <li><a href="/headphones">Headphones</a></li>
  <li><a href="/basics">Amazon Basics</a></li>
  <li><a href="/headphones">Headphones</a></li>
</ul></div>
<div id="title_feature_div">
  <span id="productTitle">
      Sony WH-1000XM4 Wireless Noise Cancelling Headphones
  </span>
</div>
<a id="bylineInfo" href="/stores/Sony">Visit the Sony Store</a>
<table><tr class="po-brand"><td class="a-span3">Brand</td>
  <td class="a-span9"><span class="po-break-word">Sony</span></td></tr></table>
<input type="hidden" id="ASIN" name="ASIN" value="B0863FE6LS">
<div id="averageCustomerReviews">
  <span id="acrPopover" title="4.5 out of 5 stars"><span class="a-icon-alt">4.5 out of 5 stars</span></span>
  <span id="acrCustomerReviewText">1,234 ratings</span>
</div>
<div id="corePriceDisplay_desktop_feature_div">
  <span class="savingsPercentage">-29%</span>
  <span class="a-price priceToPay"><span class="a-offscreen">$248.00</span></span>
  <span class="a-price a-text-price" data-a-strike="true"><span class="a-offscreen">$349.99</span></span>
</div>
<div id="variation_color_name">
  <span class="selection">Midnight Blue</span>
  <ul>
    <li title="Click to select Black"><img alt="Black"></li>
    <li title="Click to select Silver"></li>
    <li title="Click to select Black"></li>
  </ul>
</div>
<div id="feature-bullets"><ul>
  <li><span class="a-list-item">Industry-leading noise cancellation</span></li>
  <li><span class="a-list-item">Short</span></li>
  <li><span class="a-list-item">See more product details</span></li>
  <li><span class="a-list-item">Up to 30 hours of battery life</span></li>
</ul></div>
<table id="productDetails_techSpec_section_1">
  <tr><th> Model Name </th><td>&lrm;WH-1000XM4</td></tr>
  <tr><th>Item Weight</th><td>&lrm;8.96 ounces</td></tr>
  <tr><th>Model Number</th><td>WH1000XM4/B</td></tr>
  <tr><th>Color</th><td>N/A</td></tr>
</table>
<div id="imgTagWrapperId">
  <img id="landingImage" alt="Sony headphones"
       src="https://m.media-amazon.com/images/I/71o8Q5XJS5L._AC_SX300_SY300_QL70_.jpg"
       data-old-hires="https://m.media-amazon.com/images/I/71o8Q5XJS5L._AC_SL1500_.jpg">
</div>
<div id="altImages"><ul>
  <li class="imageThumbnail"><img src="https://m.media-amazon.com/images/I/71o8Q5XJS5L._AC_US40_.jpg"></li>
  <li class="imageThumbnail"><img alt="Side view" src="https://m.media-amazon.com/images/I/81yk2ZNDtuL._AC_US40_.jpg"></li>
  <li><img src="https://m.media-amazon.com/images/G/01/sprite-icons._AC_US40_.png"></li>
  <li><img src="https://example.com/other.jpg"></li>
</ul></div>
"#;

// -----------------------------------------------------------------------
// Full page
// -----------------------------------------------------------------------

#[test]
fn full_page_extracts_every_field() {
    let record = extract_quiet(&page(FULL_PAGE), PRODUCT_URL);

    assert_eq!(record.title, "Sony WH-1000XM4 Wireless Noise Cancelling Headphones");
    assert_eq!(record.brand, "Sony");
    assert_eq!(record.model, "WH-1000XM4");
    assert_eq!(record.asin, "B0863TXGM3");
    assert_eq!(record.offer_price, "$248.00");
    assert_eq!(record.original_price, "$349.99");
    assert_eq!(record.offer_percentage, "29% off");
    assert_eq!(record.amount_saved, "101.99");
    assert_eq!(record.rating, "4.5");
    assert_eq!(record.rating_count, "1234");
    assert_eq!(record.colors, vec!["Black", "Silver", "Midnight Blue"]);
    assert_eq!(
        record.about_item,
        "• Industry-leading noise cancellation\n• Up to 30 hours of battery life"
    );
    assert_eq!(
        record.technical_data,
        "Model Name: WH-1000XM4\nItem Weight: 8.96 ounces\nModel Number: WH1000XM4/B"
    );
    assert_eq!(record.categories, vec!["Electronics", "Headphones"]);
    assert_eq!(record.tags, vec!["Sony", "Highly Rated", "Good Deal", "Wireless"]);
}

#[test]
fn full_page_images_are_upgraded_and_deduplicated() {
    let record = extract_quiet(&page(FULL_PAGE), PRODUCT_URL);
    let urls: Vec<&str> = record.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://m.media-amazon.com/images/I/71o8Q5XJS5L._AC_SL1500_.jpg",
            "https://m.media-amazon.com/images/I/81yk2ZNDtuL._AC_SL1500_.jpg",
        ]
    );
    assert_eq!(record.images[0].alt, "Sony headphones");
    assert_eq!(record.images[1].alt, "Side view");
    assert!(record.images.iter().all(|i| !i.downloaded));
}

#[test]
fn extractor_leaves_caller_fields_unset() {
    let record = extract_quiet(&page(FULL_PAGE), PRODUCT_URL);
    assert!(record.id.is_none());
    assert!(record.url.is_empty());
    assert!(record.extracted_at.is_none());
    assert!(record.updated_at.is_none());
}

#[test]
fn extraction_is_repeatable() {
    let doc = page(FULL_PAGE);
    assert_eq!(extract_quiet(&doc, PRODUCT_URL), extract_quiet(&doc, PRODUCT_URL));
}

// -----------------------------------------------------------------------
// Empty and blank documents
// -----------------------------------------------------------------------

#[test]
fn document_without_matches_yields_defaults() {
    let record = extract_quiet(&page("<p>Nothing to see</p>"), BARE_URL);
    assert_eq!(record, ProductRecord::default());
}

#[test]
fn blank_html_is_rejected_by_parse_page() {
    assert!(matches!(parse_page("  \n\t "), Err(ScraperError::EmptyDocument)));
    assert!(matches!(
        extract_html("", PRODUCT_URL),
        Err(ScraperError::EmptyDocument)
    ));
}

#[test]
fn extract_html_parses_and_extracts() {
    let html = format!("<html><body>{FULL_PAGE}</body></html>");
    let record = extract_html(&html, PRODUCT_URL).expect("extract");
    assert_eq!(record.asin, "B0863TXGM3");
    assert_eq!(record.brand, "Sony");
}

// -----------------------------------------------------------------------
// Title and brand
// -----------------------------------------------------------------------

#[test]
fn title_falls_back_to_later_selectors() {
    let (record, events) =
        extract_recording(&page(r#"<div id="title"><span> Lamp Shade Deluxe </span></div>"#), BARE_URL);
    assert_eq!(record.title, "Lamp Shade Deluxe");
    assert!(events.contains(&"FieldResolved { field: Title, strategy: 1 }".to_string()));
}

#[test]
fn brand_strips_brand_prefix() {
    let record = extract_quiet(&page(r#"<a id="bylineInfo">Brand: Anker</a>"#), BARE_URL);
    assert_eq!(record.brand, "Anker");
}

#[test]
fn brand_strips_by_prefix() {
    let record = extract_quiet(&page(r#"<a id="bylineInfo">by Penguin Books</a>"#), BARE_URL);
    assert_eq!(record.brand, "Penguin Books");
}

#[test]
fn brand_is_derived_from_title_when_byline_is_noise() {
    let body = r#"
        <span id="productTitle">Premium Wireless Bluetooth Speaker</span>
        <a id="bylineInfo">Visit the Store</a>
    "#;
    let (record, events) = extract_recording(&page(body), BARE_URL);
    assert_eq!(record.brand, "Premium");
    assert!(events.contains(&"FieldDerived { field: Brand, source: \"title\" }".to_string()));
}

#[test]
fn brand_from_title_handles_hyphen_terminator() {
    assert_eq!(fields::brand_from_title("Anker-Soundcore 2").as_deref(), Some("Anker"));
    assert_eq!(fields::brand_from_title("lowercase start"), None);
    assert_eq!(fields::brand_from_title("Single"), None);
}

// -----------------------------------------------------------------------
// Model
// -----------------------------------------------------------------------

#[test]
fn model_prefers_direct_selector() {
    let body = r#"
        <table><tr class="po-model_name"><td class="a-span3">Model Name</td>
        <td class="a-span9"><span class="po-break-word">Soundcore 2</span></td></tr></table>
        <table id="productDetails_techSpec_section_1"><tr><th>Model</th><td>Other</td></tr></table>
    "#;
    assert_eq!(extract_quiet(&page(body), BARE_URL).model, "Soundcore 2");
}

#[test]
fn model_scan_continues_across_tables() {
    let body = r#"
        <table id="productDetails_techSpec_section_1">
          <tr><th>Item model number</th><td>A3102</td></tr>
        </table>
        <table class="a-keyvalue">
          <tr><th>Model</th><td>X200</td></tr>
        </table>
    "#;
    assert_eq!(extract_quiet(&page(body), BARE_URL).model, "X200");
}

// -----------------------------------------------------------------------
// ASIN
// -----------------------------------------------------------------------

#[test]
fn asin_from_url_wins_over_page() {
    let record = extract_quiet(&page(FULL_PAGE), PRODUCT_URL);
    assert_eq!(record.asin, "B0863TXGM3");
}

#[test]
fn asin_from_url_accepts_segment_at_end_or_before_query() {
    assert_eq!(
        fields::asin_from_url("https://www.amazon.in/dp/B08N5WRWNW").as_deref(),
        Some("B08N5WRWNW")
    );
    assert_eq!(
        fields::asin_from_url("https://www.amazon.in/dp/B08N5WRWNW?th=1").as_deref(),
        Some("B08N5WRWNW")
    );
    assert_eq!(fields::asin_from_url("https://www.amazon.in/dp/b08n5wrwnw"), None);
    assert_eq!(fields::asin_from_url("https://www.amazon.in/dp/B08N5WRWNWX"), None);
}

#[test]
fn asin_falls_back_to_page_attributes() {
    let body = r#"
        <input type="hidden" id="ASIN" value="b0863txgm3">
        <div data-asin=""></div>
        <div data-asin="B0863TXGM3"></div>
    "#;
    assert_eq!(extract_quiet(&page(body), BARE_URL).asin, "B0863TXGM3");
}

// -----------------------------------------------------------------------
// Pricing
// -----------------------------------------------------------------------

#[test]
fn no_price_selectors_means_no_price_fields() {
    let record = extract_quiet(&page(r#"<span id="productTitle">Lamp</span>"#), BARE_URL);
    assert!(record.original_price.is_empty());
    assert!(record.offer_price.is_empty());
    assert!(record.offer_percentage.is_empty());
    assert!(record.amount_saved.is_empty());
}

#[test]
fn only_offer_price_is_mirrored_into_original() {
    let body = r#"<span class="a-price priceToPay"><span class="a-offscreen">₹1,999.00</span></span>"#;
    let record = extract_quiet(&page(body), BARE_URL);
    assert_eq!(record.offer_price, "₹1,999.00");
    assert_eq!(record.original_price, record.offer_price);
    assert!(record.amount_saved.is_empty());
    assert!(record.offer_percentage.is_empty());
}

#[test]
fn only_original_price_is_mirrored_into_offer() {
    let record = extract_quiet(&page(r#"<span id="listPrice">$50.00</span>"#), BARE_URL);
    assert_eq!(record.original_price, "$50.00");
    assert_eq!(record.offer_price, "$50.00");
}

#[test]
fn savings_and_percentage_are_computed_without_discount_text() {
    let body = r#"
        <span id="priceblock_ourprice">$75.00</span>
        <span class="basisPrice"><span class="a-offscreen">$100.00</span></span>
    "#;
    let record = extract_quiet(&page(body), BARE_URL);
    assert_eq!(record.amount_saved, "25.00");
    assert_eq!(record.offer_percentage, "25% off");
}

#[test]
fn page_discount_text_wins_over_computed_percentage() {
    let body = r#"
        <span id="priceblock_ourprice">$75.00</span>
        <span class="basisPrice"><span class="a-offscreen">$100.00</span></span>
        <span class="savingsPercentage">-40%</span>
    "#;
    let record = extract_quiet(&page(body), BARE_URL);
    assert_eq!(record.amount_saved, "25.00");
    assert_eq!(record.offer_percentage, "40% off");
}

#[test]
fn computed_percentage_rounds_half_away_from_zero() {
    let body = r#"
        <span id="priceblock_ourprice">$7.00</span>
        <span class="basisPrice"><span class="a-offscreen">$8.00</span></span>
    "#;
    let record = extract_quiet(&page(body), BARE_URL);
    assert_eq!(record.amount_saved, "1.00");
    assert_eq!(record.offer_percentage, "13% off");
}

#[test]
fn offer_above_original_has_no_savings() {
    let body = r#"
        <span id="priceblock_ourprice">$120.00</span>
        <span class="basisPrice"><span class="a-offscreen">$100.00</span></span>
    "#;
    let record = extract_quiet(&page(body), BARE_URL);
    assert_eq!(record.offer_price, "$120.00");
    assert_eq!(record.original_price, "$100.00");
    assert!(record.amount_saved.is_empty());
    assert!(record.offer_percentage.is_empty());
}

#[test]
fn price_without_currency_glyph_is_skipped() {
    let body = r#"
        <span id="priceblock_ourprice">Currently unavailable.</span>
        <span id="price_inside_buybox">$19.99</span>
    "#;
    assert_eq!(extract_quiet(&page(body), BARE_URL).offer_price, "$19.99");
}

#[test]
fn unparseable_price_skips_savings_and_reports_it() {
    let body = r#"
        <span id="priceblock_ourprice">$1.00</span>
        <span class="basisPrice"><span class="a-offscreen">$1.2.3</span></span>
    "#;
    let (record, events) = extract_recording(&page(body), BARE_URL);
    assert_eq!(record.original_price, "$1.2.3");
    assert!(record.amount_saved.is_empty());
    assert!(events.iter().any(|e| e.starts_with("SavingsSkipped")));
}

#[test]
fn discount_text_requires_percent_sign() {
    assert_eq!(pricing::normalize_discount("-25%").as_deref(), Some("25% off"));
    assert_eq!(pricing::normalize_discount("Save 12.5 %").as_deref(), Some("12.5% off"));
    assert_eq!(pricing::normalize_discount("Save $25"), None);
}

#[test]
fn parse_amount_strips_currency_and_separators() {
    use rust_decimal::Decimal;
    use std::str::FromStr;

    assert_eq!(
        pricing::parse_amount("₹2,999.00"),
        Some(Decimal::from_str("2999.00").expect("decimal"))
    );
    assert_eq!(pricing::parse_amount("$"), None);
}

// -----------------------------------------------------------------------
// Rating
// -----------------------------------------------------------------------

#[test]
fn rating_and_count_are_normalized() {
    assert_eq!(fields::parse_rating("4.5 out of 5 stars").as_deref(), Some("4.5"));
    assert_eq!(fields::parse_rating("4 OUT OF 5"), Some("4".to_string()));
    assert_eq!(fields::parse_rating("Be the first to review"), None);
    assert_eq!(fields::parse_count("1,234 ratings").as_deref(), Some("1234"));
}

#[test]
fn rating_reads_title_attribute_when_alt_span_missing() {
    let body = r#"<span id="acrPopover" title="4.2 out of 5 stars"></span>"#;
    assert_eq!(extract_quiet(&page(body), BARE_URL).rating, "4.2");
}

// -----------------------------------------------------------------------
// Lists and caps
// -----------------------------------------------------------------------

#[test]
fn colors_union_is_capped_and_unique() {
    let swatches: String = (0..15)
        .map(|i| format!(r#"<li title="Click to select Shade {i}"></li>"#))
        .collect();
    let body = format!(
        r#"<div id="variation_color_name"><ul>{swatches}<li title="X"></li></ul></div>
           <div id="inline-twister-expander-content-color_name"><ul><li>Shade 0</li></ul></div>"#
    );
    let record = extract_quiet(&page(&body), BARE_URL);
    assert_eq!(record.colors.len(), MAX_COLORS);
    assert_eq!(record.colors[0], "Shade 0");
    assert!(!record.colors.contains(&"X".to_string()));
}

#[test]
fn colors_fall_back_to_nested_image_alt() {
    let body = r#"<div id="tp-inline-twister-dim-values-container"><ul>
        <li><img alt="Forest Green"></li></ul></div>"#;
    assert_eq!(extract_quiet(&page(body), BARE_URL).colors, vec!["Forest Green"]);
}

#[test]
fn images_are_capped() {
    let thumbs: String = (0..10)
        .map(|i| format!(r#"<li class="imageThumbnail"><img src="https://m.media-amazon.com/images/I/img{i}._AC_US40_.jpg"></li>"#))
        .collect();
    let body = format!(r#"<div id="altImages"><ul>{thumbs}</ul></div>"#);
    let record = extract_quiet(&page(&body), BARE_URL);
    assert_eq!(record.images.len(), MAX_IMAGES);
    assert_eq!(
        record.images[0].url,
        "https://m.media-amazon.com/images/I/img0._AC_SL1500_.jpg"
    );
}

#[test]
fn categories_are_capped() {
    let crumbs: String = (0..8)
        .map(|i| format!(r#"<li><a>Department {i}</a></li>"#))
        .collect();
    let body = format!(r#"<div id="wayfinding-breadcrumbs_feature_div"><ul>{crumbs}</ul></div>"#);
    let record = extract_quiet(&page(&body), BARE_URL);
    assert_eq!(record.categories.len(), MAX_CATEGORIES);
}

#[test]
fn about_stops_at_first_selector_with_items() {
    let body = r#"
        <div id="feature-bullets"><ul><li><span class="a-list-item">Ships with a braided cable</span></li></ul></div>
        <div id="productDescription"><p>A long product description paragraph.</p></div>
    "#;
    assert_eq!(
        extract_quiet(&page(body), BARE_URL).about_item,
        "• Ships with a braided cable"
    );
}

#[test]
fn detail_bullets_provide_technical_data() {
    let body = r#"<div id="detailBullets_feature_div"><ul>
        <li><span class="a-list-item"><span class="a-text-bold">Manufacturer &rlm; : &lrm;</span><span>Anker</span></span></li>
        <li><span class="a-list-item"><span class="a-text-bold">ASIN &rlm; : &lrm;</span><span>B07XYZ1234</span></span></li>
        <li><span class="a-list-item"><span class="a-text-bold">Batteries &rlm; : &lrm;</span><span>-</span></span></li>
    </ul></div>"#;
    assert_eq!(
        extract_quiet(&page(body), BARE_URL).technical_data,
        "Manufacturer: Anker\nASIN: B07XYZ1234"
    );
}

// -----------------------------------------------------------------------
// Tags
// -----------------------------------------------------------------------

#[test]
fn premium_speaker_gets_keyword_and_rating_tags() {
    let body = r#"
        <span id="productTitle">Premium Wireless Bluetooth Speaker</span>
        <span id="acrPopover"><span class="a-icon-alt">4.6 out of 5 stars</span></span>
    "#;
    let record = extract_quiet(&page(body), BARE_URL);
    for tag in ["Wireless", "Bluetooth", "Premium", "Highly Rated"] {
        assert!(record.tags.contains(&tag.to_string()), "missing {tag}");
    }
    assert!(record.tags.len() <= amzcat_core::MAX_TAGS);
    let mut unique = record.tags.clone();
    unique.dedup();
    assert_eq!(unique, record.tags);
}
