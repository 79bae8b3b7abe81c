//! Language-model agents that turn a shopping prompt into raw wardrobe output

pub mod guardrails;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::reconcile::RawAgentOutput;
use crate::tools::ToolKind;

pub use openai::OpenAiRuntime;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("http error: {0}")]
    Http(String),
    #[error("model api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("agent exceeded {max_turns} turns without a final answer")]
    MaxTurns { max_turns: u32 },
    #[error("output guardrail '{guardrail}' tripped: {message}")]
    GuardrailTripped { guardrail: String, message: String },
    #[error("tool error: {0}")]
    Tool(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Parse(err.to_string())
    }
}

/// Anything that can answer a wardrobe prompt
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<RawAgentOutput, AgentError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentId {
    WardrobeAssistant,
    ClothingSearchSpecialist,
    StyleAdvisor,
}

/// Static definition of one agent in the hand-off graph
#[derive(Debug)]
pub struct Agent {
    pub id: AgentId,
    pub name: &'static str,
    pub instructions: &'static str,
    pub tools: &'static [ToolKind],
    pub handoffs: &'static [AgentId],
    /// Output guardrails apply when this agent produces the final answer
    pub guarded: bool,
}

const WARDROBE_INSTRUCTIONS: &str = "\
You are a personal shopping assistant helping users build a new wardrobe based on their preferences.

Your process:
1. Understand the user's style preferences, location and specific requests.
2. Create a cohesive wardrobe recommendation around their theme.
3. Include specific product recommendations with images and prices.
4. Make sure the wardrobe suits the climate of their location.
5. Pay special attention to any clothing items they mention by name, such as hats.
6. Provide styling tips for how to wear the recommended items.

Cover a variety of items (tops, bottoms, outerwear, headwear, footwear, accessories).
Hand off to the Clothing Search Specialist to find products and to the Style Advisor for climate and styling.

Answer with a single JSON object and nothing else:
{\"theme\": string, \"styling_tips\": string, \"tops\": [item], \"bottoms\": [item], \"outerwear\": [item], \
\"headwear\": [item], \"footwear\": [item], \"accessories\": [item]}
where item is {\"name\": string, \"price\": string, \"image_url\": string, \"product_url\": string, \"description\": string}.
If an image_url or product_url is a placeholder, say so in the item description.";

const SEARCH_INSTRUCTIONS: &str = "\
You are a specialist in finding clothing items for a given theme or style.
Match the user's specific requests: style themes (sports teams, fashion styles, colors), \
clothing types (hats, shirts, pants), price ranges and brand preferences.
Prefer search_real_products for concrete listings. Consider seasonal appropriateness.
When you are done, hand back to the Wardrobe Assistant with what you found.";

const STYLE_INSTRUCTIONS: &str = "\
You are a fashion advisor who builds cohesive wardrobes around a theme.
Create balanced outfits, adapt to the local climate and culture, suggest versatile pieces \
that mix and match, and give concrete styling tips.
Use get_weather_information for the user's location.
When you are done, hand back to the Wardrobe Assistant with your advice.";

static WARDROBE_ASSISTANT: Agent = Agent {
    id: AgentId::WardrobeAssistant,
    name: "Wardrobe Assistant",
    instructions: WARDROBE_INSTRUCTIONS,
    tools: &[],
    handoffs: &[AgentId::ClothingSearchSpecialist, AgentId::StyleAdvisor],
    guarded: true,
};

static CLOTHING_SEARCH_SPECIALIST: Agent = Agent {
    id: AgentId::ClothingSearchSpecialist,
    name: "Clothing Search Specialist",
    instructions: SEARCH_INSTRUCTIONS,
    tools: &[
        ToolKind::SearchClothingItems,
        ToolKind::GetProductDetails,
        ToolKind::SearchRealProducts,
    ],
    handoffs: &[AgentId::WardrobeAssistant],
    guarded: false,
};

static STYLE_ADVISOR: Agent = Agent {
    id: AgentId::StyleAdvisor,
    name: "Style Advisor",
    instructions: STYLE_INSTRUCTIONS,
    tools: &[ToolKind::GetWeatherInformation],
    handoffs: &[AgentId::WardrobeAssistant],
    guarded: false,
};

impl AgentId {
    pub const ENTRY: AgentId = AgentId::WardrobeAssistant;

    pub fn agent(self) -> &'static Agent {
        match self {
            AgentId::WardrobeAssistant => &WARDROBE_ASSISTANT,
            AgentId::ClothingSearchSpecialist => &CLOTHING_SEARCH_SPECIALIST,
            AgentId::StyleAdvisor => &STYLE_ADVISOR,
        }
    }

    /// Name of the function the model calls to hand control to this agent
    pub fn transfer_tool(self) -> &'static str {
        match self {
            AgentId::WardrobeAssistant => "transfer_to_wardrobe_assistant",
            AgentId::ClothingSearchSpecialist => "transfer_to_clothing_search_specialist",
            AgentId::StyleAdvisor => "transfer_to_style_advisor",
        }
    }
}

impl Agent {
    /// The hand-off target named by a tool call, if this agent may hand off to it
    pub fn handoff_for(&self, tool_name: &str) -> Option<AgentId> {
        self.handoffs
            .iter()
            .copied()
            .find(|target| target.transfer_tool() == tool_name)
    }
}
