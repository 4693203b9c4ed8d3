use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "TOPK_EVAL_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

/// Evaluator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorConfig {
    /// Cutoffs to report, in reporting order.
    #[serde(default = "default_ks")]
    pub ks: Vec<usize>,
    /// Rows per candidate batch when a corpus is split in memory.
    #[serde(default = "default_candidate_batch_size")]
    pub candidate_batch_size: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            ks: default_ks(),
            candidate_batch_size: default_candidate_batch_size(),
        }
    }
}

/// Seeded random embeddings for smoke-testing an evaluation harness
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_num_candidates")]
    pub num_candidates: usize,
    #[serde(default = "default_num_queries")]
    pub num_queries: usize,
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            num_candidates: default_num_candidates(),
            num_queries: default_num_queries(),
            embedding_dim: default_embedding_dim(),
        }
    }
}

fn default_ks() -> Vec<usize> {
    vec![1, 5, 10, 50, 100]
}

fn default_candidate_batch_size() -> usize {
    128
}

fn default_seed() -> u64 {
    42
}

fn default_num_candidates() -> usize {
    100
}

fn default_num_queries() -> usize {
    10
}

fn default_embedding_dim() -> usize {
    4
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in TOPK_EVAL_CONFIG environment variable
    /// 2. ./topk_eval.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("topk_eval.toml"));

        Self::load_from(&config_path)
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))?;

        log::info!(
            "Loaded config from {} (ks={:?}, candidate_batch_size={})",
            config_path.display(),
            config.evaluator.ks,
            config.evaluator.candidate_batch_size
        );
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let ks = &self.evaluator.ks;
        if ks.is_empty() {
            anyhow::bail!("evaluator.ks must contain at least one cutoff");
        }
        if ks.iter().any(|&k| k == 0) {
            anyhow::bail!("evaluator.ks must not contain 0");
        }
        let unique: HashSet<usize> = ks.iter().copied().collect();
        if unique.len() != ks.len() {
            anyhow::bail!("evaluator.ks must not contain duplicates: {:?}", ks);
        }

        if self.evaluator.candidate_batch_size == 0 {
            anyhow::bail!("evaluator.candidate_batch_size must be greater than 0");
        }

        let synthetic = &self.synthetic;
        if synthetic.num_queries == 0 || synthetic.embedding_dim == 0 {
            anyhow::bail!(
                "synthetic.num_queries and synthetic.embedding_dim must be greater than 0"
            );
        }

        Ok(())
    }
}
