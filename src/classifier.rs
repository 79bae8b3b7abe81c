//! Keyword classification of flat product lists into wardrobe categories

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{Category, ProductRecord, WardrobeRecommendation};

/// How a record matching several keyword sets is placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    /// Only the first matching category in declaration order receives the record
    #[default]
    FirstMatch,
    /// Every matching category receives a copy of the record
    AllMatches,
}

impl FromStr for ClassificationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_match" | "first" => Ok(ClassificationPolicy::FirstMatch),
            "all_matches" | "all" => Ok(ClassificationPolicy::AllMatches),
            other => Err(format!(
                "unknown classification policy '{}' (expected first_match or all_matches)",
                other
            )),
        }
    }
}

/// Categories whose keyword set matches the lowercased name, in declaration order
pub fn matching_categories(name: &str) -> Vec<Category> {
    let lower = name.to_lowercase();
    Category::ALL
        .into_iter()
        .filter(|c| c.keywords().iter().any(|kw| lower.contains(kw)))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryClassifier {
    policy: ClassificationPolicy,
}

impl CategoryClassifier {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    /// Place records into the six category lists of `target`.
    /// Unmatched records are dropped; the number dropped is returned.
    pub fn classify_into(
        &self,
        records: Vec<ProductRecord>,
        target: &mut WardrobeRecommendation,
    ) -> usize {
        let mut dropped = 0;

        for record in records {
            let matches = matching_categories(&record.name);
            match (self.policy, matches.as_slice()) {
                (_, []) => {
                    tracing::debug!("No category keyword in '{}', dropping", record.name);
                    dropped += 1;
                }
                (ClassificationPolicy::FirstMatch, [first, ..]) => {
                    target.items_mut(*first).push(record);
                }
                (ClassificationPolicy::AllMatches, [rest @ .., last]) => {
                    for category in rest {
                        target.items_mut(*category).push(record.clone());
                    }
                    target.items_mut(*last).push(record);
                }
            }
        }

        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            price: "$10.00".to_string(),
            image_url: "https://x/i.jpg".to_string(),
            product_url: "https://x/p".to_string(),
            description: None,
        }
    }

    fn classify(policy: ClassificationPolicy, records: Vec<ProductRecord>) -> (WardrobeRecommendation, usize) {
        let mut rec = WardrobeRecommendation::new("t", "s");
        let dropped = CategoryClassifier::new(policy).classify_into(records, &mut rec);
        (rec, dropped)
    }

    #[test]
    fn keyword_routing() {
        let (rec, dropped) = classify(
            ClassificationPolicy::FirstMatch,
            vec![
                record("Red Sox Graphic Tee"),
                record("Relaxed Fit Jeans"),
                record("Zip-Up Hoodie"),
                record("Knit Beanie"),
                record("Running Sneakers"),
                record("Wool Scarf"),
            ],
        );
        for category in Category::ALL {
            assert_eq!(rec.items(category).len(), 1, "{:?}", category);
        }
        assert_eq!(dropped, 0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(matching_categories("BOSTON CAP"), vec![Category::Headwear]);
    }

    #[test]
    fn unmatched_records_are_dropped() {
        let (rec, dropped) = classify(ClassificationPolicy::FirstMatch, vec![record("Umbrella")]);
        assert_eq!(dropped, 1);
        assert_eq!(rec.total_items(), 0);
    }

    #[test]
    fn first_match_places_once() {
        let (rec, _) = classify(ClassificationPolicy::FirstMatch, vec![record("Jersey Jacket")]);
        assert_eq!(rec.tops.len(), 1);
        assert!(rec.outerwear.is_empty());
    }

    #[test]
    fn all_matches_duplicates_across_categories() {
        let (rec, _) = classify(ClassificationPolicy::AllMatches, vec![record("Jersey Jacket")]);
        assert_eq!(rec.tops, vec![record("Jersey Jacket")]);
        assert_eq!(rec.outerwear, vec![record("Jersey Jacket")]);
    }

    #[test]
    fn output_is_subset_of_input() {
        let input = vec![
            record("Tee"),
            record("Hat"),
            record("Lamp"),
            record("Cap Sleeve Shirt"),
        ];
        for policy in [ClassificationPolicy::FirstMatch, ClassificationPolicy::AllMatches] {
            let (rec, _) = classify(policy, input.clone());
            for category in Category::ALL {
                assert!(rec.items(category).iter().all(|r| input.contains(r)));
            }
        }
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("all-matches".parse::<ClassificationPolicy>(), Ok(ClassificationPolicy::AllMatches));
        assert_eq!("FIRST_MATCH".parse::<ClassificationPolicy>(), Ok(ClassificationPolicy::FirstMatch));
        assert!("best".parse::<ClassificationPolicy>().is_err());
    }
}
