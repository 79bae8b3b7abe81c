use serde::{Deserialize, Serialize};

use crate::classifier::ClassificationPolicy;
use crate::error::WardrobeError;

const DEFAULT_LOG_LEVEL: &str = "wardrobe_advisor=info";

/// Main configuration structure loaded from wardrobe.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub retailer: RetailerConfig,
    pub classifier: ClassifierConfig,
    pub server: ServerConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Language-model agent runtime settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentConfig {
    pub model: String,
    pub base_url: String,
    pub max_turns: u32,
    pub run_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_turns: 10,
            run_timeout_ms: 180_000,
            request_timeout_ms: 60_000,
            temperature: 0.4,
        }
    }
}

/// Retailer search settings for the product extractor
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetailerConfig {
    pub origin: String,
    pub scrape_limit: usize,
    pub fetch_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for RetailerConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.walmart.com".to_string(),
            scrape_limit: 3,
            fetch_timeout_ms: 15_000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub policy: ClassificationPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: std::net::SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: std::net::SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses WARDROBE_CONFIG environment variable or defaults to "wardrobe.toml"
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("WARDROBE_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path =
            std::env::var("WARDROBE_CONFIG").unwrap_or_else(|_| "wardrobe.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.runtime = RuntimeConfig::load_from_env();
        config.validate();

        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.agent.model = model;
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            self.agent.base_url = base_url;
        }
        if let Some(turns) = std::env::var("WARDROBE_MAX_TURNS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            self.agent.max_turns = turns;
        }
        if let Some(timeout) = std::env::var("WARDROBE_AGENT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.agent.run_timeout_ms = timeout;
        }
        if let Some(limit) = std::env::var("WARDROBE_SCRAPE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.retailer.scrape_limit = limit;
        }
        if let Ok(policy) = std::env::var("WARDROBE_CLASSIFY_POLICY") {
            self.classifier.policy = policy.parse().map_err(anyhow::Error::msg)?;
        }
        if let Ok(v) = std::env::var("WARDROBE_HTTP_BIND")
            && let Ok(bind) = v.parse::<std::net::SocketAddr>()
        {
            self.server.bind = bind;
        }
        Ok(())
    }

    /// Clamp out-of-range values, warning about each adjustment
    pub fn validate(&mut self) {
        if self.agent.max_turns == 0 || self.agent.max_turns > 50 {
            let clamped = self.agent.max_turns.clamp(1, 50);
            tracing::warn!(
                "max_turns {} out of range, clamping to {}",
                self.agent.max_turns,
                clamped
            );
            self.agent.max_turns = clamped;
        }
        if self.retailer.scrape_limit == 0 || self.retailer.scrape_limit > 20 {
            let clamped = self.retailer.scrape_limit.clamp(1, 20);
            tracing::warn!(
                "scrape_limit {} out of range, clamping to {}",
                self.retailer.scrape_limit,
                clamped
            );
            self.retailer.scrape_limit = clamped;
        }
        if !(0.0..=2.0).contains(&self.agent.temperature) {
            tracing::warn!(
                "temperature {} out of range, clamping",
                self.agent.temperature
            );
            self.agent.temperature = self.agent.temperature.clamp(0.0, 2.0);
        }
    }

    /// The agent runtime cannot start without credentials
    pub fn require_api_key(&self) -> Result<&str, WardrobeError> {
        self.runtime
            .openai_api_key
            .as_deref()
            .ok_or_else(|| WardrobeError::Config {
                message: "OPENAI_API_KEY is not set".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [agent]
            model = "gpt-4o"

            [classifier]
            policy = "all_matches"
            "#,
        )
        .unwrap();
        assert_eq!(config.agent.model, "gpt-4o");
        assert_eq!(config.agent.max_turns, 10);
        assert_eq!(config.retailer.scrape_limit, 3);
        assert_eq!(config.classifier.policy, ClassificationPolicy::AllMatches);
        assert_eq!(config.server.bind.port(), 5000);
    }

    #[test]
    fn validate_clamps_ranges() {
        let mut config = Config::default();
        config.agent.max_turns = 0;
        config.retailer.scrape_limit = 500;
        config.agent.temperature = 9.0;
        config.validate();
        assert_eq!(config.agent.max_turns, 1);
        assert_eq!(config.retailer.scrape_limit, 20);
        assert_eq!(config.agent.temperature, 2.0);
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let config = Config::default();
        assert!(matches!(
            config.require_api_key(),
            Err(WardrobeError::Config { .. })
        ));

        let mut config = Config::default();
        config.runtime.openai_api_key = Some("sk-test".into());
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }
}
