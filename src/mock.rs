//! Deterministic placeholder listings used when the retailer search comes back empty

use crate::models::{ProductListing, ProductRecord};

const MOCK_RETAILERS: [&str; 4] = ["Amazon", "Nordstrom", "Macy's", "Target"];

/// Capitalize the first letter of each whitespace-separated word
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn slug(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Produce exactly `count` well-formed listings for `theme` / `item_type`.
pub fn generate(theme: &str, item_type: &str, count: usize) -> Vec<ProductListing> {
    let theme_title = title_case(theme);
    let item_title = title_case(item_type);
    let theme_slug = slug(theme);

    (1..=count)
        .map(|i| {
            let id = format!("{}-{}", theme_slug, i);
            ProductListing {
                retailer: MOCK_RETAILERS[i % MOCK_RETAILERS.len()].to_string(),
                theme: theme.to_string(),
                record: ProductRecord {
                    name: format!("{} {} - Style {}", theme_title, item_title, i),
                    price: format!("${}.99", 20 * i),
                    image_url: format!("https://example.com/products/{}.jpg", id),
                    product_url: format!("https://example.com/shop/{}", id),
                    description: Some(format!("Example {} matching {} theme", item_type, theme)),
                },
                id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_count_without_sentinels() {
        for n in [0, 1, 3, 9] {
            let listings = generate("boston red sox", "hat", n);
            assert_eq!(listings.len(), n);
            for listing in &listings {
                let r = &listing.record;
                assert!(!r.name.is_empty());
                assert!(!r.has_sentinel());
                assert!(r.description.is_some());
            }
        }
    }

    #[test]
    fn deterministic_fields() {
        let a = generate("boston red sox", "hat", 2);
        assert_eq!(a, generate("boston red sox", "hat", 2));
        assert_eq!(a[0].record.name, "Boston Red Sox Hat - Style 1");
        assert_eq!(a[0].record.price, "$20.99");
        assert_eq!(a[1].record.price, "$40.99");
        assert_eq!(a[0].id, "boston-red-sox-1");
        assert_eq!(a[0].record.product_url, "https://example.com/shop/boston-red-sox-1");
    }

    #[test]
    fn retailers_cycle() {
        let names: Vec<String> = generate("x", "tee", 5).into_iter().map(|l| l.retailer).collect();
        assert_eq!(names, ["Nordstrom", "Macy's", "Target", "Amazon", "Nordstrom"]);
    }

    #[test]
    fn title_case_normalizes_words() {
        assert_eq!(title_case("  mIxEd   case "), "Mixed Case");
    }
}
