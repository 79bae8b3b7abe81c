//! Normalization of agent output into the canonical [`WardrobeRecommendation`]
//!
//! Agents answer in one of several shapes:
//!
//! * `{"items": [...]}`: a flat list, categorized by keyword
//! * `{"suggested_items": {"tops": [...], ...}}`: already categorized
//! * `{"results": [...]}`: raw product search output, categorized by keyword
//! * the canonical shape itself
//!
//! Decoding picks the first shape whose key is present, in that order, and
//! fails closed with `MalformedOutput` when the payload fits none of them.
//! Individual records that do not fit [`ProductRecord`] fail with
//! `Reconciliation`, carrying the offending record.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::classifier::CategoryClassifier;
use crate::error::{Result, WardrobeError};
use crate::models::{
    Category, DEFAULT_STYLING_TIPS, DEFAULT_THEME, ProductRecord, WardrobeRecommendation,
};

/// What the agent runtime hands back for one request
#[derive(Debug, Clone, PartialEq)]
pub enum RawAgentOutput {
    Text(String),
    Json(Value),
    Canonical(WardrobeRecommendation),
}

impl From<String> for RawAgentOutput {
    fn from(text: String) -> Self {
        RawAgentOutput::Text(text)
    }
}

impl From<&str> for RawAgentOutput {
    fn from(text: &str) -> Self {
        RawAgentOutput::Text(text.to_string())
    }
}

impl From<Value> for RawAgentOutput {
    fn from(value: Value) -> Self {
        RawAgentOutput::Json(value)
    }
}

/// The recognized payload shapes, decoded from an untyped JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum AgentPayload<'a> {
    Items {
        theme: Option<&'a str>,
        styling_tips: Option<&'a str>,
        items: &'a [Value],
    },
    SuggestedItems {
        theme: Option<&'a str>,
        styling_tips: Option<&'a str>,
        lists: Vec<(Category, &'a [Value])>,
    },
    Results {
        theme: Option<&'a str>,
        results: &'a [Value],
    },
    Canonical {
        theme: &'a str,
        styling_tips: &'a str,
        lists: Vec<(Category, &'a [Value])>,
    },
}

impl<'a> AgentPayload<'a> {
    pub fn shape(&self) -> &'static str {
        match self {
            AgentPayload::Items { .. } => "items",
            AgentPayload::SuggestedItems { .. } => "suggested_items",
            AgentPayload::Results { .. } => "results",
            AgentPayload::Canonical { .. } => "canonical",
        }
    }

    pub fn decode(value: &'a Value) -> Result<Self> {
        Self::decode_object(value)
            .map_err(|message| WardrobeError::malformed(message, value.to_string()))
    }

    fn decode_object(value: &'a Value) -> std::result::Result<Self, String> {
        let Value::Object(map) = value else {
            return Err(format!("expected a JSON object, got {}", kind(value)));
        };

        let theme = text_field(map, "theme")?;
        let styling_tips = text_field(map, "styling_tips")?;

        if let Some(items) = map.get("items") {
            return Ok(AgentPayload::Items {
                theme,
                styling_tips,
                items: expect_array(items, "items")?,
            });
        }

        if let Some(suggested) = map.get("suggested_items") {
            let Value::Object(suggested) = suggested else {
                return Err(format!(
                    "suggested_items must be an object of category lists, got {}",
                    kind(suggested)
                ));
            };
            return Ok(AgentPayload::SuggestedItems {
                theme,
                styling_tips,
                lists: category_lists(suggested)?,
            });
        }

        if let Some(results) = map.get("results") {
            return Ok(AgentPayload::Results {
                theme,
                results: expect_array(results, "results")?,
            });
        }

        match (theme, styling_tips) {
            (Some(theme), Some(styling_tips)) => Ok(AgentPayload::Canonical {
                theme,
                styling_tips,
                lists: category_lists(map)?,
            }),
            _ => Err(
                "payload has no items, suggested_items or results key and is not canonical"
                    .to_string(),
            ),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Optional non-blank string field; null and blank count as absent
fn text_field<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> std::result::Result<Option<&'a str>, String> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(format!("{} must be a string, got {}", key, kind(other))),
    }
}

fn expect_array<'a>(value: &'a Value, key: &str) -> std::result::Result<&'a [Value], String> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(format!("{} must be an array, got {}", key, kind(other))),
    }
}

/// One list per category; a missing or null key is an empty list
fn category_lists<'a>(
    map: &'a Map<String, Value>,
) -> std::result::Result<Vec<(Category, &'a [Value])>, String> {
    Category::ALL
        .into_iter()
        .map(|category| match map.get(category.key()) {
            None | Some(Value::Null) => Ok((category, &[][..])),
            Some(value) => expect_array(value, category.key()).map(|items| (category, items)),
        })
        .collect()
}

/// Strip a surrounding markdown code fence, if the model added one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Build a record from one agent-supplied element
pub fn instantiate_record(value: &Value) -> Result<ProductRecord> {
    let record = ProductRecord::deserialize(value).map_err(|e| WardrobeError::Reconciliation {
        message: e.to_string(),
        record: value.to_string(),
    })?;
    if record.name.trim().is_empty() {
        return Err(WardrobeError::Reconciliation {
            message: "name must not be empty".to_string(),
            record: value.to_string(),
        });
    }
    Ok(record)
}

/// Typed canonical values get the same non-blank theme and tips rule as JSON ones
fn checked_canonical(rec: WardrobeRecommendation) -> Result<WardrobeRecommendation> {
    let blank = [("theme", &rec.theme), ("styling_tips", &rec.styling_tips)]
        .into_iter()
        .find(|(_, text)| text.trim().is_empty());
    match blank {
        Some((field, _)) => Err(WardrobeError::malformed(
            format!("canonical recommendation has a blank {}", field),
            serde_json::to_string(&rec).unwrap_or_default(),
        )),
        None => Ok(rec),
    }
}

fn instantiate_all(values: &[Value]) -> Result<Vec<ProductRecord>> {
    values.iter().map(instantiate_record).collect()
}

/// Pure transformation from agent output to the canonical recommendation
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    classifier: CategoryClassifier,
}

impl Reconciler {
    pub fn new(classifier: CategoryClassifier) -> Self {
        Self { classifier }
    }

    pub fn reconcile(&self, output: RawAgentOutput) -> Result<WardrobeRecommendation> {
        let value = match output {
            RawAgentOutput::Canonical(rec) => return checked_canonical(rec),
            RawAgentOutput::Json(value) => value,
            RawAgentOutput::Text(text) => match serde_json::from_str(strip_code_fence(&text)) {
                Ok(value) => value,
                Err(e) => return Err(WardrobeError::malformed(e.to_string(), text)),
            },
        };

        let payload = AgentPayload::decode(&value)?;
        tracing::debug!("Reconciling agent output as {} shape", payload.shape());
        self.build(payload)
    }

    fn build(&self, payload: AgentPayload<'_>) -> Result<WardrobeRecommendation> {
        let theme_or_default = |theme: Option<&str>| theme.unwrap_or(DEFAULT_THEME).to_string();
        let tips_or_default =
            |tips: Option<&str>| tips.unwrap_or(DEFAULT_STYLING_TIPS).to_string();

        match payload {
            AgentPayload::Items {
                theme,
                styling_tips,
                items,
            } => self.classified(theme_or_default(theme), tips_or_default(styling_tips), items),
            AgentPayload::Results { theme, results } => self.classified(
                theme_or_default(theme),
                DEFAULT_STYLING_TIPS.to_string(),
                results,
            ),
            AgentPayload::SuggestedItems {
                theme,
                styling_tips,
                lists,
            } => categorized(theme_or_default(theme), tips_or_default(styling_tips), &lists),
            AgentPayload::Canonical {
                theme,
                styling_tips,
                lists,
            } => categorized(theme.to_string(), styling_tips.to_string(), &lists),
        }
    }

    fn classified(
        &self,
        theme: String,
        styling_tips: String,
        values: &[Value],
    ) -> Result<WardrobeRecommendation> {
        let records = instantiate_all(values)?;
        let mut rec = WardrobeRecommendation::new(theme, styling_tips);
        let dropped = self.classifier.classify_into(records, &mut rec);
        if dropped > 0 {
            tracing::debug!("{} items matched no category", dropped);
        }
        Ok(rec)
    }
}

fn categorized(
    theme: String,
    styling_tips: String,
    lists: &[(Category, &[Value])],
) -> Result<WardrobeRecommendation> {
    let mut rec = WardrobeRecommendation::new(theme, styling_tips);
    for (category, values) in lists {
        *rec.items_mut(*category) = instantiate_all(values)?;
    }
    Ok(rec)
}
