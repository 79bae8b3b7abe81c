//! Data models shared by the extractor, classifier and reconciler

use serde::{Deserialize, Serialize};

/// Price placeholder when no currency amount could be found
pub const PRICE_UNAVAILABLE: &str = "N/A";
/// Image placeholder when no fetchable image URL could be found
pub const IMAGE_PLACEHOLDER: &str = "https://example.com/placeholder.jpg";
/// Purchase link placeholder when no product link could be found
pub const PRODUCT_URL_PLACEHOLDER: &str = "https://example.com/placeholder-product";

pub const DEFAULT_THEME: &str = "Personalized Wardrobe";
pub const DEFAULT_STYLING_TIPS: &str =
    "Mix and match these pieces for a versatile and personalized wardrobe.";

/// One purchasable item candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub product_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductRecord {
    /// True when any field holds one of the placeholder values
    pub fn has_sentinel(&self) -> bool {
        self.price == PRICE_UNAVAILABLE
            || self.image_url == IMAGE_PLACEHOLDER
            || self.product_url == PRODUCT_URL_PLACEHOLDER
    }
}

/// A search result row as returned by the product search tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    pub id: String,
    pub retailer: String,
    pub theme: String,
    #[serde(flatten)]
    pub record: ProductRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Headwear,
    Footwear,
    Accessories,
}

impl Category {
    /// Declaration order; also the precedence order for first-match classification
    pub const ALL: [Category; 6] = [
        Category::Tops,
        Category::Bottoms,
        Category::Outerwear,
        Category::Headwear,
        Category::Footwear,
        Category::Accessories,
    ];

    /// Field name used in the canonical JSON shape
    pub fn key(self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Outerwear => "outerwear",
            Category::Headwear => "headwear",
            Category::Footwear => "footwear",
            Category::Accessories => "accessories",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Tops => &["shirt", "tee", "jersey"],
            Category::Bottoms => &["pants", "jeans", "shorts"],
            Category::Outerwear => &["jacket", "hoodie", "coat"],
            Category::Headwear => &["hat", "cap", "beanie"],
            Category::Footwear => &["shoes", "sneaker", "boots"],
            Category::Accessories => &["accessory", "scarf", "bag"],
        }
    }
}

/// The canonical six-category recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardrobeRecommendation {
    pub theme: String,
    pub styling_tips: String,
    #[serde(default)]
    pub tops: Vec<ProductRecord>,
    #[serde(default)]
    pub bottoms: Vec<ProductRecord>,
    #[serde(default)]
    pub outerwear: Vec<ProductRecord>,
    #[serde(default)]
    pub headwear: Vec<ProductRecord>,
    #[serde(default)]
    pub footwear: Vec<ProductRecord>,
    #[serde(default)]
    pub accessories: Vec<ProductRecord>,
}

impl WardrobeRecommendation {
    pub fn new(theme: impl Into<String>, styling_tips: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            styling_tips: styling_tips.into(),
            tops: Vec::new(),
            bottoms: Vec::new(),
            outerwear: Vec::new(),
            headwear: Vec::new(),
            footwear: Vec::new(),
            accessories: Vec::new(),
        }
    }

    pub fn items(&self, category: Category) -> &[ProductRecord] {
        match category {
            Category::Tops => &self.tops,
            Category::Bottoms => &self.bottoms,
            Category::Outerwear => &self.outerwear,
            Category::Headwear => &self.headwear,
            Category::Footwear => &self.footwear,
            Category::Accessories => &self.accessories,
        }
    }

    pub fn items_mut(&mut self, category: Category) -> &mut Vec<ProductRecord> {
        match category {
            Category::Tops => &mut self.tops,
            Category::Bottoms => &mut self.bottoms,
            Category::Outerwear => &mut self.outerwear,
            Category::Headwear => &mut self.headwear,
            Category::Footwear => &mut self.footwear,
            Category::Accessories => &mut self.accessories,
        }
    }

    pub fn total_items(&self) -> usize {
        Category::ALL.iter().map(|c| self.items(*c).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_ignores_unknown_fields() {
        let record: ProductRecord = serde_json::from_value(json!({
            "id": "x-1",
            "retailer": "Target",
            "name": "Red Sox Cap",
            "price": "$24.99",
            "image_url": "https://x/img.jpg",
            "product_url": "https://x/p/1"
        }))
        .unwrap();
        assert_eq!(record.name, "Red Sox Cap");
        assert_eq!(record.description, None);
    }

    #[test]
    fn listing_flattens_record() {
        let listing = ProductListing {
            id: "a-1".into(),
            retailer: "Walmart".into(),
            theme: "a".into(),
            record: ProductRecord {
                name: "Tee".into(),
                price: "$10.00".into(),
                image_url: "https://i".into(),
                product_url: "https://p".into(),
                description: None,
            },
        };
        let v = serde_json::to_value(&listing).unwrap();
        assert_eq!(v["name"], "Tee");
        assert_eq!(v["retailer"], "Walmart");
    }

    #[test]
    fn canonical_serializes_every_category() {
        let rec = WardrobeRecommendation::new("t", "s");
        let v = serde_json::to_value(&rec).unwrap();
        for category in Category::ALL {
            assert_eq!(v[category.key()], json!([]));
        }
    }
}
