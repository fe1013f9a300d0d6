mod settings;

pub use settings::{
    AgentConfig, LLMConfig, LoggingConfig, MemoryConfig, SearchConfig, Settings,
};
