//! Ordered fallback rules for pulling one field out of a candidate subtree

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use super::ExtractionError;

/// `$` + digits (optionally comma-grouped) + optional two-digit fraction
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+(?:,\d{3})*(?:\.\d{2})?").unwrap());

/// Turns the element a selector matched into a field value
pub type Extract = fn(ElementRef<'_>) -> Option<String>;

pub struct Rule {
    css: String,
    selector: Selector,
    extract: Extract,
}

impl Rule {
    pub fn new(css: &str, extract: Extract) -> Result<Self, ExtractionError> {
        let selector =
            Selector::parse(css).map_err(|e| ExtractionError::Selector(format!("{css}: {e}")))?;
        Ok(Self {
            css: css.to_string(),
            selector,
            extract,
        })
    }

    fn apply(&self, item: ElementRef<'_>) -> Option<String> {
        item.select(&self.selector).next().and_then(self.extract)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("css", &self.css).finish()
    }
}

/// Rules tried in order; the first non-empty result wins
#[derive(Debug, Default)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    /// Build a chain applying the same extractor to each selector in turn
    pub fn from_selectors(selectors: &[&str], extract: Extract) -> Result<Self, ExtractionError> {
        let rules = selectors
            .iter()
            .map(|css| Rule::new(css, extract))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn resolve(&self, item: ElementRef<'_>) -> Option<String> {
        self.rules.iter().find_map(|rule| {
            let value = rule.apply(item);
            if value.is_none() {
                tracing::trace!("rule '{}' yielded nothing", rule.css);
            }
            value
        })
    }
}

/// Whitespace-trimmed text content, if any
pub fn element_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// First currency amount inside the element's text
pub fn element_price(el: ElementRef<'_>) -> Option<String> {
    find_price(&el.text().collect::<String>())
}

pub fn find_price(text: &str) -> Option<String> {
    PRICE_RE.find(text).map(|m| m.as_str().to_string())
}

/// `src` unless it is an inlined data URI, then `data-src`
pub fn image_source(el: ElementRef<'_>) -> Option<String> {
    let node = el.value();
    [node.attr("src"), node.attr("data-src")]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| is_fetchable(url))
        .map(str::to_string)
}

fn is_fetchable(url: &str) -> bool {
    !url.is_empty() && !url.starts_with("data:")
}
