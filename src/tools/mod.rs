//! Function tools exposed to the agents

pub mod clothing_search;
pub mod weather;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::agents::AgentError;
use crate::extractor::ProductSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    SearchRealProducts,
    SearchClothingItems,
    GetProductDetails,
    GetWeatherInformation,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::SearchRealProducts,
        ToolKind::SearchClothingItems,
        ToolKind::GetProductDetails,
        ToolKind::GetWeatherInformation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::SearchRealProducts => "search_real_products",
            ToolKind::SearchClothingItems => "search_clothing_items",
            ToolKind::GetProductDetails => "get_product_details",
            ToolKind::GetWeatherInformation => "get_weather_information",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            ToolKind::SearchRealProducts => {
                "Search a real retailer for products. Returns listings with name, price, image_url and product_url."
            }
            ToolKind::SearchClothingItems => {
                "Search for clothing items by theme and type, with optional price range, brand and gender."
            }
            ToolKind::GetProductDetails => {
                "Get detailed information about a specific product: name, price, images and URL."
            }
            ToolKind::GetWeatherInformation => {
                "Get climate information for a location to guide wardrobe recommendations."
            }
        }
    }

    fn parameters(self) -> Value {
        match self {
            ToolKind::SearchRealProducts => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query including theme and item details"},
                    "item_type": {"type": "string", "description": "Type of clothing item"},
                    "max_results": {"type": "integer", "description": "Maximum number of results to return"}
                },
                "required": ["query", "item_type", "max_results"]
            }),
            ToolKind::SearchClothingItems => json!({
                "type": "object",
                "properties": {
                    "theme": {"type": "string", "description": "Style theme, e.g. \"Boston Red Sox fan\" or \"minimalist\""},
                    "item_type": {"type": "string", "description": "Type of clothing, e.g. \"hat\" or \"jeans\""},
                    "price_range": {"type": "string", "description": "Optional price range, e.g. \"under $50\""},
                    "brand": {"type": "string", "description": "Optional brand preference"},
                    "gender": {"type": "string", "description": "Optional gender preference for sizing and style"}
                },
                "required": ["theme", "item_type"]
            }),
            ToolKind::GetProductDetails => json!({
                "type": "object",
                "properties": {
                    "product_id": {"type": "string", "description": "Identifier for the product"},
                    "theme": {"type": "string", "description": "Theme context for the product"},
                    "item_type": {"type": "string", "description": "Type of item"}
                },
                "required": ["product_id", "theme", "item_type"]
            }),
            ToolKind::GetWeatherInformation => json!({
                "type": "object",
                "properties": {
                    "location": {"type": "string", "description": "City or region name"}
                },
                "required": ["location"]
            }),
        }
    }

    /// Chat-completions function tool definition
    pub fn schema(self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.parameters()
            }
        })
    }
}

fn parse_args<T: DeserializeOwned>(tool: ToolKind, arguments: &str) -> Result<T, AgentError> {
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(arguments)
        .map_err(|e| AgentError::Tool(format!("invalid arguments for {}: {}", tool.name(), e)))
}

/// Dispatches tool calls by name to their implementations
#[derive(Clone)]
pub struct ToolRegistry {
    source: Arc<dyn ProductSource>,
}

impl ToolRegistry {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self { source }
    }

    /// Run one tool call. `arguments` is the JSON-encoded argument object
    /// exactly as the model produced it.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> Result<Value, AgentError> {
        let tool = ToolKind::from_name(name)
            .ok_or_else(|| AgentError::Tool(format!("unknown tool: {}", name)))?;
        tracing::debug!("Dispatching tool {} with {}", name, arguments);

        match tool {
            ToolKind::SearchRealProducts => {
                let args = parse_args(tool, arguments)?;
                clothing_search::search_real_products(Arc::clone(&self.source), args).await
            }
            ToolKind::SearchClothingItems => Ok(clothing_search::search_clothing_items(
                &parse_args(tool, arguments)?,
            )),
            ToolKind::GetProductDetails => Ok(clothing_search::get_product_details(
                &parse_args(tool, arguments)?,
            )),
            ToolKind::GetWeatherInformation => {
                Ok(weather::get_weather_information(&parse_args(tool, arguments)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractionError;
    use crate::models::ProductListing;

    struct EmptySource;

    impl ProductSource for EmptySource {
        fn retailer(&self) -> &str {
            "Nowhere"
        }

        fn search(&self, _: &str, _: &str, _: usize) -> Result<Vec<ProductListing>, ExtractionError> {
            Ok(Vec::new())
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(EmptySource))
    }

    #[test]
    fn names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.schema()["function"]["name"], kind.name());
        }
        assert_eq!(ToolKind::from_name("web_search"), None);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = registry().dispatch("web_search", "{}").await.unwrap_err();
        assert!(matches!(err, AgentError::Tool(_)));
    }

    #[tokio::test]
    async fn bad_arguments_are_an_error() {
        let err = registry()
            .dispatch("get_weather_information", r#"{"city": "Boston"}"#)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("get_weather_information"));
    }

    #[tokio::test]
    async fn dispatches_weather() {
        let out = registry()
            .dispatch("get_weather_information", r#"{"location": "Miami, FL"}"#)
            .await
            .unwrap();
        assert_eq!(out["conditions"], "Sunny");
    }
}
