//! Product search tools for the Clothing Search Specialist

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::agents::AgentError;
use crate::extractor::ProductSource;
use crate::mock::{self, title_case};

/// Upper bound on listings returned by one search call
const MAX_RESULTS: usize = 10;

const PLACEHOLDER_NOTE: &str =
    "No live listings were found. These are placeholder products; their image and product URLs are placeholders.";

#[derive(Debug, Deserialize)]
pub struct RealProductsArgs {
    pub query: String,
    pub item_type: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    3
}

#[derive(Debug, Deserialize)]
pub struct ClothingItemsArgs {
    pub theme: String,
    pub item_type: String,
    pub price_range: Option<String>,
    pub brand: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductDetailsArgs {
    pub product_id: String,
    pub theme: String,
    pub item_type: String,
}

/// Search the retailer for `"{query} {item_type}"`, falling back to mock
/// listings when the search fails or finds nothing.
pub async fn search_real_products(
    source: Arc<dyn ProductSource>,
    args: RealProductsArgs,
) -> Result<Value, AgentError> {
    let max_results = args.max_results.min(MAX_RESULTS);
    let search_query = format!("{} {}", args.query, args.item_type);
    let theme = args.query.clone();

    let outcome =
        tokio::task::spawn_blocking(move || source.search(&search_query, &theme, max_results))
            .await
            .map_err(|e| AgentError::Tool(format!("product search task failed: {}", e)))?;

    let listings = outcome.unwrap_or_else(|e| {
        tracing::warn!("Product search for '{}' failed: {}", args.query, e);
        Vec::new()
    });

    let mut result = json!({
        "query": args.query,
        "item_type": args.item_type,
        "theme": args.query,
    });
    if listings.is_empty() {
        tracing::info!(
            "No listings for '{} {}', using {} mock listings",
            args.query,
            args.item_type,
            max_results
        );
        result["results"] = json!(mock::generate(&args.query, &args.item_type, max_results));
        result["note"] = json!(PLACEHOLDER_NOTE);
    } else {
        result["results"] = json!(listings);
    }
    Ok(result)
}

/// Build the search phrase for a themed clothing query
pub fn search_clothing_items(args: &ClothingItemsArgs) -> Value {
    let mut search_query = format!("{} {}", args.theme, args.item_type);
    if let Some(price_range) = &args.price_range {
        search_query.push_str(&format!(" {}", price_range));
    }
    if let Some(brand) = &args.brand {
        search_query.push_str(&format!(" by {}", brand));
    }
    if let Some(gender) = &args.gender {
        search_query.push_str(&format!(" for {}", gender));
    }
    tracing::info!("Searching for: {}", search_query);

    json!({
        "search_query": search_query,
        "results_count": 5,
        "message": format!("Found 5 {} items matching '{}' theme", args.item_type, args.theme),
    })
}

/// 64-bit FNV-1a; stable across builds and platforms
fn stable_hash(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Price in $20.00..=$100.99, fixed per product id
fn details_price(product_id: &str) -> String {
    let hash = stable_hash(product_id);
    format!("${}.{:02}", 20 + hash % 81, (hash / 81) % 100)
}

fn details_name(theme: &str, item_type: &str) -> String {
    let theme = title_case(theme);
    let item = item_type.to_lowercase();
    if item.contains("hat") || item.contains("cap") {
        format!("{} Adjustable Cap", theme)
    } else if item.contains("shirt") || item.contains("jersey") {
        format!("{} Graphic Tee", theme)
    } else if item.contains("hoodie") || item.contains("jacket") {
        format!("{} Zip-Up Hoodie", theme)
    } else {
        format!("{} {}", theme, title_case(item_type))
    }
}

pub fn get_product_details(args: &ProductDetailsArgs) -> Value {
    let slug = |text: &str| text.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();

    json!({
        "product_id": args.product_id,
        "name": details_name(&args.theme, &args.item_type),
        "price": details_price(&args.product_id),
        "image_url": format!(
            "https://example.com/images/{}-{}.jpg",
            slug(&args.theme),
            slug(&args.item_type)
        ),
        "product_url": format!("https://example.com/products/{}", args.product_id),
        "description": format!(
            "This {} features {} styling with premium quality materials.",
            args.item_type, args.theme
        ),
        "note": "image_url and product_url are placeholders",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractionError;
    use crate::models::{ProductListing, ProductRecord};

    struct FixedSource(Vec<ProductListing>);

    impl ProductSource for FixedSource {
        fn retailer(&self) -> &str {
            "Walmart"
        }

        fn search(
            &self,
            _query: &str,
            _theme: &str,
            max_results: usize,
        ) -> Result<Vec<ProductListing>, ExtractionError> {
            Ok(self.0.iter().take(max_results).cloned().collect())
        }
    }

    struct FailingSource;

    impl ProductSource for FailingSource {
        fn retailer(&self) -> &str {
            "Walmart"
        }

        fn search(&self, _: &str, _: &str, _: usize) -> Result<Vec<ProductListing>, ExtractionError> {
            Err(ExtractionError::Status(503))
        }
    }

    fn args(max_results: usize) -> RealProductsArgs {
        RealProductsArgs {
            query: "boston red sox".into(),
            item_type: "hat".into(),
            max_results,
        }
    }

    #[tokio::test]
    async fn live_listings_pass_through() {
        let listing = ProductListing {
            id: "77".into(),
            retailer: "Walmart".into(),
            theme: "boston red sox".into(),
            record: ProductRecord {
                name: "Red Sox Cap".into(),
                price: "$19.99".into(),
                image_url: "https://i5.walmartimages.com/cap.jpg".into(),
                product_url: "https://www.walmart.com/ip/77".into(),
                description: None,
            },
        };
        let out = search_real_products(Arc::new(FixedSource(vec![listing])), args(3))
            .await
            .unwrap();
        assert_eq!(out["results"].as_array().unwrap().len(), 1);
        assert_eq!(out["results"][0]["name"], "Red Sox Cap");
        assert!(out.get("note").is_none());
    }

    #[tokio::test]
    async fn empty_search_falls_back_to_mocks() {
        let out = search_real_products(Arc::new(FixedSource(Vec::new())), args(3))
            .await
            .unwrap();
        let results = out["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["name"], "Boston Red Sox Hat - Style 1");
        assert_eq!(out["theme"], "boston red sox");
        assert!(out["note"].as_str().unwrap().contains("placeholder"));
    }

    #[tokio::test]
    async fn failed_search_falls_back_to_mocks() {
        let out = search_real_products(Arc::new(FailingSource), args(2))
            .await
            .unwrap();
        assert_eq!(out["results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn clothing_query_includes_optional_parts() {
        let out = search_clothing_items(&ClothingItemsArgs {
            theme: "minimalist".into(),
            item_type: "jeans".into(),
            price_range: Some("under $50".into()),
            brand: Some("Levi's".into()),
            gender: None,
        });
        assert_eq!(out["search_query"], "minimalist jeans under $50 by Levi's");
        assert_eq!(out["results_count"], 5);
    }

    #[test]
    fn product_details_are_deterministic() {
        let args = ProductDetailsArgs {
            product_id: "rs-1".into(),
            theme: "red sox".into(),
            item_type: "Baseball Cap".into(),
        };
        let a = get_product_details(&args);
        let b = get_product_details(&args);
        assert_eq!(a, b);
        assert_eq!(a["name"], "Red Sox Adjustable Cap");
        assert_eq!(a["image_url"], "https://example.com/images/red-sox-baseball-cap.jpg");
    }

    #[test]
    fn details_price_stays_in_range() {
        for id in ["a", "b", "rs-1", "12345", ""] {
            let price = details_price(id);
            let dollars: u64 = price[1..price.find('.').unwrap()].parse().unwrap();
            assert!((20..=100).contains(&dollars), "{price}");
            assert_eq!(price.len() - price.find('.').unwrap(), 3);
        }
    }

    #[test]
    fn details_name_by_item_type() {
        assert_eq!(details_name("boho", "jersey"), "Boho Graphic Tee");
        assert_eq!(details_name("boho", "rain jacket"), "Boho Zip-Up Hoodie");
        assert_eq!(details_name("boho", "maxi skirt"), "Boho Maxi Skirt");
    }
}
