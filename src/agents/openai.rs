//! Chat-completions agent loop with function tools and hand-offs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{Agent, AgentError, AgentId, AgentRuntime, guardrails};
use crate::config::AgentConfig;
use crate::reconcile::RawAgentOutput;
use crate::tools::ToolRegistry;

pub struct OpenAiRuntime {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_turns: u32,
    run_timeout_ms: u64,
    tools: ToolRegistry,
}

fn completions_endpoint(base_url: &str) -> String {
    if base_url.ends_with("/chat/completions") {
        base_url.to_string()
    } else {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }
}

fn handoff_schema(target: AgentId) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": target.transfer_tool(),
            "description": format!("Hand off to the {} agent to handle the request.", target.agent().name),
            "parameters": {"type": "object", "properties": {}}
        }
    })
}

/// Function tools plus hand-off tools visible to `agent`
pub fn tool_schemas(agent: &Agent) -> Vec<Value> {
    agent
        .tools
        .iter()
        .map(|tool| tool.schema())
        .chain(agent.handoffs.iter().map(|target| handoff_schema(*target)))
        .collect()
}

impl OpenAiRuntime {
    pub fn new(
        cfg: &AgentConfig,
        api_key: impl Into<String>,
        tools: ToolRegistry,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: completions_endpoint(&cfg.base_url),
            api_key: api_key.into(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_turns: cfg.max_turns,
            run_timeout_ms: cfg.run_timeout_ms,
            tools,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One chat-completions call; returns the assistant message
    async fn complete(&self, agent: &Agent, transcript: &[Value]) -> Result<Value, AgentError> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(json!({"role": "system", "content": agent.instructions}));
        messages.extend_from_slice(transcript);

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });
        let tools = tool_schemas(agent);
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools);
        }
        if agent.guarded {
            body["response_format"] = json!({"type": "json_object"});
        }

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(AgentError::Api { status, body });
        }

        let mut response: Value = res.json().await?;
        match response.pointer_mut("/choices/0/message").map(Value::take) {
            Some(message) if message.is_object() => Ok(message),
            _ => Err(AgentError::Parse(
                "completion response has no choices[0].message".to_string(),
            )),
        }
    }

    /// Answer one tool call made by `agent`. Returns the tool output and,
    /// for hand-off calls, the agent taking over.
    async fn answer_tool_call(&self, agent: &Agent, call: &Value) -> (Value, Option<AgentId>) {
        let name = call["function"]["name"].as_str().unwrap_or_default();
        let arguments = call["function"]["arguments"].as_str().unwrap_or("{}");

        if let Some(target) = agent.handoff_for(name) {
            tracing::info!("{} handing off to {}", agent.name, target.agent().name);
            return (json!({"assistant": target.agent().name}), Some(target));
        }

        if !agent.tools.iter().any(|tool| tool.name() == name) {
            tracing::warn!("{} called unavailable tool {}", agent.name, name);
            return (
                json!({"error": format!("tool {} is not available to {}", name, agent.name)}),
                None,
            );
        }

        match self.tools.dispatch(name, arguments).await {
            Ok(output) => (output, None),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", name, e);
                (json!({"error": e.to_string()}), None)
            }
        }
    }

    async fn run_turns(&self, prompt: &str) -> Result<String, AgentError> {
        let mut transcript = vec![json!({"role": "user", "content": prompt})];
        let mut active = AgentId::ENTRY;

        for turn in 1..=self.max_turns {
            let agent = active.agent();
            tracing::debug!("Turn {} with {}", turn, agent.name);
            let message = self.complete(agent, &transcript).await?;

            let calls = match message.get("tool_calls").and_then(Value::as_array) {
                Some(calls) if !calls.is_empty() => calls.clone(),
                _ => {
                    let content = message["content"].as_str().unwrap_or_default().trim();
                    if agent.guarded {
                        guardrails::check_output(content)?;
                    }
                    tracing::info!("{} produced final output after {} turns", agent.name, turn);
                    return Ok(content.to_string());
                }
            };

            transcript.push(message);
            let mut next = None;
            for call in &calls {
                let (output, handoff) = self.answer_tool_call(agent, call).await;
                next = handoff.or(next);
                transcript.push(json!({
                    "role": "tool",
                    "tool_call_id": call["id"],
                    "content": output.to_string(),
                }));
            }
            if let Some(next) = next {
                active = next;
            }
        }

        Err(AgentError::MaxTurns {
            max_turns: self.max_turns,
        })
    }
}

#[async_trait]
impl AgentRuntime for OpenAiRuntime {
    async fn run(&self, prompt: &str) -> Result<RawAgentOutput, AgentError> {
        let timeout_ms = self.run_timeout_ms;
        let text = tokio::time::timeout(Duration::from_millis(timeout_ms), self.run_turns(prompt))
            .await
            .map_err(|_| AgentError::Timeout { timeout_ms })??;
        Ok(RawAgentOutput::Text(text))
    }
}
