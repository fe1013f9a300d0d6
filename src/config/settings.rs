use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LLMConfig,
    pub agent: AgentConfig,
    pub memory: MemoryConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub enabled: bool,
    pub file: String,
    pub max_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// Load settings: built-in defaults, then an optional config file,
    /// then `AGENT__`-prefixed environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .set_default("llm.model", "glm-4")?
            .set_default("llm.base_url", "https://open.bigmodel.cn/api/paas/v4")?
            .set_default("llm.max_tokens", 1024)?
            .set_default("llm.temperature", 0.01)?
            .set_default("agent.max_iterations", 5)?
            .set_default("memory.enabled", true)?
            .set_default("memory.file", ".agent_memory.json")?
            .set_default("memory.max_size", 10)?
            .set_default("search.provider", "duckduckgo")?
            .set_default("logging.level", "info")?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("AGENT").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn api_key() -> Result<String> {
        env::var("ZHIPUAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("ZHIPUAI_API_KEY environment variable not set"))
    }

    pub fn tavily_api_key() -> Result<String> {
        env::var("TAVILY_API_KEY")
            .map_err(|_| anyhow::anyhow!("TAVILY_API_KEY required for the tavily provider"))
    }

    #[cfg(test)]
    pub(crate) fn defaults_for_tests() -> Self {
        Self {
            llm: LLMConfig {
                model: "glm-4".to_string(),
                base_url: "https://open.bigmodel.cn/api/paas/v4".to_string(),
                max_tokens: 1024,
                temperature: 0.01,
            },
            agent: AgentConfig { max_iterations: 5 },
            memory: MemoryConfig {
                enabled: false,
                file: ".agent_memory.json".to_string(),
                max_size: 10,
            },
            search: SearchConfig {
                provider: "duckduckgo".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_config_file() {
        let settings = Settings::new().expect("defaults should satisfy the schema");

        assert_eq!(settings.llm.model, "glm-4");
        assert_eq!(settings.agent.max_iterations, 5);
        assert_eq!(settings.memory.max_size, 10);
        assert_eq!(settings.search.provider, "duckduckgo");
        assert!((settings.llm.temperature - 0.01).abs() < f32::EPSILON);
    }
}
