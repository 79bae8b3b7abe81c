//! Single entry point: prompt in, canonical recommendation out

use std::sync::Arc;

use crate::agents::{AgentRuntime, OpenAiRuntime};
use crate::classifier::CategoryClassifier;
use crate::config::Config;
use crate::error::{Result, WardrobeError};
use crate::extractor::HtmlSearchSource;
use crate::models::WardrobeRecommendation;
use crate::reconcile::Reconciler;
use crate::runner::TaskRunner;
use crate::tools::ToolRegistry;

const RUNNER_THREADS: usize = 2;

#[derive(Clone)]
pub struct WardrobeService {
    agent: Arc<dyn AgentRuntime>,
    reconciler: Reconciler,
    runner: Arc<TaskRunner>,
}

impl WardrobeService {
    pub fn new(agent: Arc<dyn AgentRuntime>, reconciler: Reconciler, runner: Arc<TaskRunner>) -> Self {
        Self {
            agent,
            reconciler,
            runner,
        }
    }

    /// Wire the OpenAI runtime, Walmart search source and classifier from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let source = HtmlSearchSource::walmart(&config.retailer).map_err(|e| {
            WardrobeError::Config {
                message: format!("retailer: {}", e),
            }
        })?;
        let tools = ToolRegistry::new(Arc::new(source));
        let agent = OpenAiRuntime::new(&config.agent, api_key, tools)?;
        tracing::info!(
            "Agent runtime ready: model {} at {}",
            config.agent.model,
            agent.endpoint()
        );

        let reconciler = Reconciler::new(CategoryClassifier::new(config.classifier.policy));
        let runner = TaskRunner::new(RUNNER_THREADS)?;
        Ok(Self::new(Arc::new(agent), reconciler, Arc::new(runner)))
    }

    pub async fn recommend(&self, prompt: &str) -> Result<WardrobeRecommendation> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(WardrobeError::invalid_request("prompt must not be empty"));
        }

        tracing::info!("Processing wardrobe request: {}", prompt);
        let output = self.agent.run(prompt).await.map_err(|e| {
            tracing::error!("Agent run failed: {}", e);
            WardrobeError::from(e)
        })?;

        let recommendation = self.reconciler.reconcile(output)?;
        tracing::info!(
            "Recommendation '{}' ready with {} items",
            recommendation.theme,
            recommendation.total_items()
        );
        Ok(recommendation)
    }

    /// Blocking form of [`recommend`](Self::recommend), driven on the service's runner
    pub fn create_wardrobe_recommendation(&self, prompt: &str) -> Result<WardrobeRecommendation> {
        let service = self.clone();
        let prompt = prompt.to_string();
        self.runner
            .run(async move { service.recommend(&prompt).await })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentError;
    use crate::reconcile::RawAgentOutput;
    use async_trait::async_trait;
    use serde_json::json;

    struct Scripted(fn() -> std::result::Result<RawAgentOutput, AgentError>);

    #[async_trait]
    impl AgentRuntime for Scripted {
        async fn run(&self, _prompt: &str) -> std::result::Result<RawAgentOutput, AgentError> {
            (self.0)()
        }
    }

    fn service(script: fn() -> std::result::Result<RawAgentOutput, AgentError>) -> WardrobeService {
        WardrobeService::new(
            Arc::new(Scripted(script)),
            Reconciler::default(),
            Arc::new(TaskRunner::new(1).unwrap()),
        )
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let svc = service(|| Ok(RawAgentOutput::from("{}")));
        let err = svc.create_wardrobe_recommendation("   ").unwrap_err();
        assert!(matches!(err, WardrobeError::InvalidRequest { .. }));
    }

    #[test]
    fn agent_failure_becomes_execution_error() {
        let svc = service(|| Err(AgentError::Timeout { timeout_ms: 100 }));
        let err = svc.create_wardrobe_recommendation("red sox").unwrap_err();
        match err {
            WardrobeError::AgentExecution { message } => assert!(message.contains("100ms")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn async_path_reconciles() {
        let svc = service(|| {
            Ok(RawAgentOutput::Json(json!({
                "items": [{
                    "name": "Red Sox Cap",
                    "price": "$25.00",
                    "image_url": "https://img/cap.jpg",
                    "product_url": "https://shop/cap"
                }]
            })))
        });
        let rec = svc.recommend("Boston Red Sox hat").await.unwrap();
        assert_eq!(rec.headwear.len(), 1);
        assert_eq!(rec.total_items(), 1);
    }

    #[test]
    fn reconciliation_failure_propagates_unchanged() {
        let svc = service(|| Ok(RawAgentOutput::from("not json")));
        match svc.create_wardrobe_recommendation("red sox").unwrap_err() {
            WardrobeError::MalformedOutput { raw, .. } => assert_eq!(raw, "not json"),
            other => panic!("unexpected error: {other}"),
        }

        let svc = service(|| Ok(RawAgentOutput::Json(json!({ "items": [{ "name": "Cap" }] }))));
        let err = svc.create_wardrobe_recommendation("red sox").unwrap_err();
        assert!(matches!(err, WardrobeError::Reconciliation { .. }));
    }
}
