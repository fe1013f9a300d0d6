//! Web Search Providers
//!
//! Information Hiding:
//! - Provider HTTP details and response formats hidden behind trait
//! - Provider selection resolved once at startup from configuration

pub mod duckduckgo;
pub mod tavily;

use crate::config::Settings;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use duckduckgo::DuckDuckGoProvider;
pub use tavily::TavilyProvider;

/// Trait for swappable web-search backends
#[async_trait]
pub trait SearchProvider: Send + Sync + std::fmt::Debug {
    /// Provider name as used in configuration
    fn name(&self) -> &str;

    /// Execute a search and return formatted, human-readable results
    async fn search(&self, query: &str, num_results: usize) -> Result<String>;
}

/// Resolve the configured search provider.
///
/// Called once at startup; unknown provider names are a configuration error.
pub fn resolve_provider(settings: &Settings) -> Result<Arc<dyn SearchProvider>> {
    match settings.search.provider.to_lowercase().as_str() {
        "duckduckgo" => Ok(Arc::new(DuckDuckGoProvider::new())),
        "tavily" => {
            let api_key = Settings::tavily_api_key()?;
            Ok(Arc::new(TavilyProvider::new(api_key)))
        }
        other => Err(anyhow::anyhow!("Unknown search provider: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut settings = Settings::defaults_for_tests();
        settings.search.provider = "altavista".to_string();

        let err = resolve_provider(&settings).unwrap_err();
        assert!(err.to_string().contains("Unknown search provider"));
    }

    #[test]
    fn test_duckduckgo_needs_no_key() {
        let mut settings = Settings::defaults_for_tests();
        settings.search.provider = "duckduckgo".to_string();

        let provider = resolve_provider(&settings).unwrap();
        assert_eq!(provider.name(), "duckduckgo");
    }
}
