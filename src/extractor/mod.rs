//! Product extraction from retailer search-result pages
//!
//! A [`RetailerLayout`] describes where a retailer keeps each field; a
//! [`ProductSource`] fetches a search page and runs the layout over it.
//! Extraction is best-effort: a candidate with no name is skipped, a candidate
//! that fails mid-way is logged and skipped, missing optional fields fall back
//! to the placeholder constants in [`crate::models`].

pub mod rules;
pub mod source;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::models::{
    IMAGE_PLACEHOLDER, PRICE_UNAVAILABLE, PRODUCT_URL_PLACEHOLDER, ProductListing, ProductRecord,
};
use rules::{RuleChain, element_price, element_text, image_source};

pub use source::HtmlSearchSource;

/// Extraction failures. These never reach the caller of the search tool;
/// they degrade to mock listings instead.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Retailer responded with HTTP {0}")]
    Status(u16),

    #[error("Selector error: {0}")]
    Selector(String),

    #[error("Invalid product link '{href}': {message}")]
    Link { href: String, message: String },
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        ExtractionError::Network(err.to_string())
    }
}

/// A retailer that can be searched for product listings. Implementations block.
pub trait ProductSource: Send + Sync {
    fn retailer(&self) -> &str;

    fn search(
        &self,
        query: &str,
        theme: &str,
        max_results: usize,
    ) -> Result<Vec<ProductListing>, ExtractionError>;
}

/// Where a retailer's search page keeps each product field
#[derive(Debug)]
pub struct RetailerLayout {
    retailer: String,
    origin: Url,
    search_path: String,
    container: Selector,
    id_attr: String,
    item_path_marker: String,
    link: Selector,
    name: RuleChain,
    price: RuleChain,
    image: RuleChain,
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector(format!("{css}: {e}")))
}

impl RetailerLayout {
    /// Walmart search results, rooted at `origin` (normally `https://www.walmart.com`)
    pub fn walmart(origin: &str) -> Result<Self, ExtractionError> {
        let origin = Url::parse(origin).map_err(|e| ExtractionError::Link {
            href: origin.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            retailer: "Walmart".to_string(),
            origin,
            search_path: "/search".to_string(),
            container: selector("div[data-item-id]")?,
            id_attr: "data-item-id".to_string(),
            item_path_marker: "/ip/".to_string(),
            link: selector("a[href]")?,
            name: RuleChain::from_selectors(
                &[
                    "span[data-automation-id='product-title']",
                    "span.w_iUH7",
                    "span.normal",
                ],
                element_text,
            )?,
            price: RuleChain::from_selectors(
                &[
                    "span[data-automation-id='product-price-1']",
                    "div[data-automation-id='product-price']",
                    "div.b_Wu1_",
                    "span.price-main",
                ],
                element_price,
            )?,
            image: RuleChain::from_selectors(
                &[
                    "img[data-automation-id='product-image']",
                    "img.absolute",
                    "img",
                ],
                image_source,
            )?,
        })
    }

    pub fn retailer(&self) -> &str {
        &self.retailer
    }

    /// Search endpoint for `query`, URL-encoded
    pub fn search_url(&self, query: &str) -> Result<Url, ExtractionError> {
        let mut url = self
            .origin
            .join(&self.search_path)
            .map_err(|e| ExtractionError::Link {
                href: self.search_path.clone(),
                message: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    /// Extract at most `max_results` listings from a parsed search page
    pub fn extract(&self, document: &Html, theme: &str, max_results: usize) -> Vec<ProductListing> {
        let candidates: Vec<ElementRef<'_>> = document.select(&self.container).collect();
        tracing::debug!("Found {} candidates on {}", candidates.len(), self.retailer);

        let mut listings = Vec::new();
        for (idx, item) in candidates.into_iter().enumerate() {
            if listings.len() >= max_results {
                break;
            }
            match self.extract_candidate(item, theme) {
                Ok(Some(listing)) => listings.push(listing),
                Ok(None) => tracing::debug!("Candidate {} has no name, skipping", idx),
                Err(e) => tracing::warn!("Error processing candidate {}: {}", idx, e),
            }
        }
        listings
    }

    fn extract_candidate(
        &self,
        item: ElementRef<'_>,
        theme: &str,
    ) -> Result<Option<ProductListing>, ExtractionError> {
        let Some(name) = self.name.resolve(item) else {
            return Ok(None);
        };
        let id = item.value().attr(&self.id_attr).map(str::trim);

        let product_url = self.product_url(item, id)?;
        let price = self.price.resolve(item);
        let image_url = self.image.resolve(item);

        let description = format!("{} - Available at {}", name, self.retailer);
        Ok(Some(ProductListing {
            id: id.unwrap_or_default().to_string(),
            retailer: self.retailer.clone(),
            theme: theme.to_string(),
            record: ProductRecord {
                name,
                price: price.unwrap_or_else(|| PRICE_UNAVAILABLE.to_string()),
                image_url: image_url.unwrap_or_else(|| IMAGE_PLACEHOLDER.to_string()),
                product_url: product_url.unwrap_or_else(|| PRODUCT_URL_PLACEHOLDER.to_string()),
                description: Some(description),
            },
        }))
    }

    /// First link pointing at this item, made absolute and stripped of its query string
    fn product_url(
        &self,
        item: ElementRef<'_>,
        id: Option<&str>,
    ) -> Result<Option<String>, ExtractionError> {
        let href = item.select(&self.link).find_map(|a| {
            let href = a.value().attr("href")?.trim();
            let points_at_item = id.is_some_and(|id| !id.is_empty() && href.contains(id))
                || href.contains(&self.item_path_marker);
            points_at_item.then_some(href)
        });
        let Some(href) = href else {
            return Ok(None);
        };

        let mut url = self.origin.join(href).map_err(|e| ExtractionError::Link {
            href: href.to_string(),
            message: e.to_string(),
        })?;
        url.set_query(None);
        url.set_fragment(None);
        Ok(Some(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.walmart.com";

    fn layout() -> RetailerLayout {
        RetailerLayout::walmart(ORIGIN).unwrap()
    }

    fn extract(html: &str, max: usize) -> Vec<ProductListing> {
        layout().extract(&Html::parse_document(html), "red sox", max)
    }

    #[test]
    fn full_candidate() {
        let html = r#"
            <div data-item-id="123">
              <a href="/ip/Red-Sox-Cap/123?athbdg=L1600&from=/search">link</a>
              <span data-automation-id="product-title">Red Sox Cap</span>
              <div data-automation-id="product-price">current price Now $19.99 was $29.99</div>
              <img data-automation-id="product-image" src="https://i5.walmartimages.com/cap.jpg">
            </div>"#;
        let listings = extract(html, 3);
        assert_eq!(listings.len(), 1);
        let l = &listings[0];
        assert_eq!(l.id, "123");
        assert_eq!(l.retailer, "Walmart");
        assert_eq!(l.record.name, "Red Sox Cap");
        assert_eq!(l.record.price, "$19.99");
        assert_eq!(l.record.image_url, "https://i5.walmartimages.com/cap.jpg");
        assert_eq!(l.record.product_url, "https://www.walmart.com/ip/Red-Sox-Cap/123");
        assert_eq!(
            l.record.description.as_deref(),
            Some("Red Sox Cap - Available at Walmart")
        );
    }

    #[test]
    fn missing_fields_take_sentinels() {
        let html = r#"<div data-item-id="9"><span class="normal">Plain Tee</span></div>"#;
        let listings = extract(html, 3);
        assert_eq!(listings.len(), 1);
        let r = &listings[0].record;
        assert_eq!(r.price, PRICE_UNAVAILABLE);
        assert_eq!(r.image_url, IMAGE_PLACEHOLDER);
        assert_eq!(r.product_url, PRODUCT_URL_PLACEHOLDER);
    }

    #[test]
    fn nameless_candidates_are_excluded() {
        let html = r#"
            <div data-item-id="1"><span class="price-main">$5.00</span></div>
            <div data-item-id="2"><span class="w_iUH7">Beanie</span></div>"#;
        let listings = extract(html, 3);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].record.name, "Beanie");
    }

    #[test]
    fn link_matched_by_native_id() {
        let html = r#"
            <div data-item-id="555">
              <a href="/reviews/other">reviews</a>
              <a href="https://www.walmart.com/product/555/track?x=1#top">go</a>
              <span class="normal">Hoodie</span>
            </div>"#;
        let listings = extract(html, 3);
        assert_eq!(
            listings[0].record.product_url,
            "https://www.walmart.com/product/555/track"
        );
    }

    #[test]
    fn respects_max_results() {
        let html: String = (1..=5)
            .map(|i| format!(r#"<div data-item-id="{i}"><span class="normal">Tee {i}</span></div>"#))
            .collect();
        assert_eq!(extract(&html, 2).len(), 2);
        assert!(extract(&html, 0).is_empty());
    }

    #[test]
    fn zero_containers_yield_nothing() {
        assert!(extract("<html><body><p>No results</p></body></html>", 3).is_empty());
    }

    #[test]
    fn malformed_link_skips_only_that_candidate() {
        let html = r#"
            <div data-item-id="1"><a href="http://[bad/ip/1">x</a><span class="normal">Broken Cap</span></div>
            <div data-item-id="2"><a href="/ip/2">x</a><span class="normal">Good Cap</span></div>"#;
        let listings = extract(html, 3);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].record.name, "Good Cap");
    }

    #[test]
    fn search_url_encodes_query() {
        let url = layout().search_url("red sox hat").unwrap();
        assert_eq!(url.as_str(), "https://www.walmart.com/search?q=red+sox+hat");
    }
}
