//! Configuration management for KAGForge
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use crate::errors::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AppConfig {
    /// Multi-hop retrieval configuration
    #[serde(default)]
    #[validate(nested)]
    pub retrieval: RetrievalConfig,

    /// Graph reasoning configuration
    #[serde(default)]
    #[validate(nested)]
    pub reasoning: ReasoningConfig,

    /// Reasoning memory configuration
    #[serde(default)]
    #[validate(nested)]
    pub memory: MemoryConfig,

    /// Solver configuration
    #[serde(default)]
    pub solver: SolverConfig,

    /// Similarity index configuration
    #[serde(default)]
    #[validate(nested)]
    pub index: IndexConfig,

    /// Answer entity matching configuration
    #[serde(default)]
    #[validate(nested)]
    pub matcher: MatcherConfig,

    /// Input data locations
    #[serde(default)]
    pub data: DataConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RetrievalConfig {
    /// Passages requested per sub-question (and upper bound on returned passages)
    #[serde(default = "default_top_k")]
    #[validate(range(min = 1, max = 100))]
    pub top_k: usize,

    /// Hop budget; values above 2 behave like 2
    #[serde(default = "default_hops")]
    #[validate(range(min = 1, max = 10))]
    pub hops: usize,

    /// Also match entity aliases during hop-2 entity discovery
    #[serde(default)]
    pub match_aliases: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ReasoningConfig {
    /// Edge bound used by explain_answer when searching for a path
    #[serde(default = "default_max_path_hops")]
    #[validate(range(min = 1, max = 16))]
    pub max_path_hops: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct MemoryConfig {
    /// Sliding window size; unset keeps every step
    #[validate(range(min = 1))]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SolverConfig {
    /// Run sub-question retrievals concurrently, committing in plan order
    #[serde(default)]
    pub parallel_retrieval: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct IndexConfig {
    /// Drop hits scoring below this cosine similarity
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_score: Option<f32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct MatcherConfig {
    /// Minimum normalized similarity for fuzzy node suggestions
    #[serde(default = "default_fuzzy_cutoff")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub fuzzy_cutoff: f64,

    /// Maximum suggestions per unmatched candidate
    #[serde(default = "default_max_suggestions")]
    #[validate(range(min = 1, max = 50))]
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory of chunk files (*.txt)
    #[serde(default = "default_chunks_dir")]
    pub chunks_dir: String,

    /// Entity graph JSON document (optional)
    pub graph_path: Option<String>,

    /// Separator between chunks inside a chunk file
    #[serde(default = "default_chunk_delimiter")]
    pub chunk_delimiter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_top_k() -> usize { 3 }
fn default_hops() -> usize { 2 }
fn default_max_path_hops() -> usize { 3 }
fn default_fuzzy_cutoff() -> f64 { 0.6 }
fn default_max_suggestions() -> usize { 3 }
fn default_chunks_dir() -> String { "data/chunks".to_string() }
fn default_chunk_delimiter() -> String { "\n---\n".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }
fn default_service_name() -> String { "kagforge".to_string() }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            hops: default_hops(),
            match_aliases: false,
        }
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            max_path_hops: default_max_path_hops(),
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: default_fuzzy_cutoff(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            chunks_dir: default_chunks_dir(),
            graph_path: None,
            chunk_delimiter: default_chunk_delimiter(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: 0,
            service_name: default_service_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__RETRIEVAL__TOP_K=5
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            reasoning: ReasoningConfig::default(),
            memory: MemoryConfig::default(),
            solver: SolverConfig::default(),
            index: IndexConfig::default(),
            matcher: MatcherConfig::default(),
            data: DataConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.hops, 2);
        assert_eq!(config.reasoning.max_path_hops, 3);
        assert!(config.memory.max_steps.is_none());
        assert!(!config.retrieval.match_aliases);
        assert_eq!(config.observability.service_name, "kagforge");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fuzzy_cutoff_bounds() {
        let mut config = AppConfig::default();
        config.matcher.fuzzy_cutoff = 1.5;
        assert!(config.validate().is_err());
    }
}
