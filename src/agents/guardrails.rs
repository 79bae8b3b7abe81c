//! Checks run on the guarded agent's final answer before it is accepted

use once_cell::sync::Lazy;
use regex::Regex;

use super::AgentError;
use crate::models::{IMAGE_PLACEHOLDER, PRODUCT_URL_PLACEHOLDER};

static EXAMPLE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:https?://)?(?:www\.)?example\.com[^\s"'<>\\)]*"#).unwrap()
});

/// Paths under example.com that the mock generator and product details tool emit
const GENERATED_PATHS: &[&str] = &["/products/", "/shop/", "/images/"];

/// A tripped guardrail carries the message shown to the caller
pub type Guardrail = fn(&str) -> Result<(), String>;

pub const OUTPUT_GUARDRAILS: &[(&str, Guardrail)] = &[
    ("validate_price_range", validate_price_range),
    ("validate_image_urls", validate_image_urls),
];

/// Recommendations must span several price points
pub fn validate_price_range(output: &str) -> Result<(), String> {
    let lower = output.to_lowercase();
    if lower.contains("only expensive") || lower.contains("only luxury") {
        return Err("Please provide options at various price points".to_string());
    }
    Ok(())
}

/// Sentinels and URLs generated by the mock and details tools
fn is_generated_url(url: &str) -> bool {
    if url == IMAGE_PLACEHOLDER || url == PRODUCT_URL_PLACEHOLDER {
        return true;
    }
    let path = url
        .split_once("example.com")
        .map(|(_, path)| path)
        .unwrap_or_default();
    GENERATED_PATHS
        .iter()
        .any(|prefix| path.starts_with(prefix) && path.len() > prefix.len())
}

/// Stand-in image URLs must be declared as placeholders
pub fn validate_image_urls(output: &str) -> Result<(), String> {
    if !output.contains("image_url") || output.to_lowercase().contains("placeholder") {
        return Ok(());
    }
    let unexplained = EXAMPLE_URL_RE
        .find_iter(output)
        .any(|m| !is_generated_url(m.as_str()));
    if unexplained {
        return Err(
            "Please use realistic image URLs or indicate they are placeholders".to_string(),
        );
    }
    Ok(())
}

/// Run every output guardrail; the first to trip fails the run
pub fn check_output(output: &str) -> Result<(), AgentError> {
    for (name, guardrail) in OUTPUT_GUARDRAILS {
        if let Err(message) = guardrail(output) {
            tracing::warn!("Output guardrail {} tripped: {}", name, message);
            return Err(AgentError::GuardrailTripped {
                guardrail: name.to_string(),
                message,
            });
        }
    }
    Ok(())
}
