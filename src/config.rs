//! Configuration loading and validation.
//!
//! Settings come from a TOML file with environment-variable overrides
//! on top. Every field has a default, so an empty file (or none at all)
//! yields a working configuration.

use crate::defaults;
use crate::error::{ProcapError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How QUESTION/ANSWER classification is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    /// Lexical cues only; fast and deterministic.
    #[default]
    Heuristic,
    /// Ask an external collaborator, falling back to the heuristic.
    Delegated,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionSettings,
    pub chunking: ChunkingSettings,
    pub extraction: ExtractionSettings,
}

/// Session-level behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// When false every utterance is treated as answer material and no
    /// question context is gathered.
    pub interview_mode: bool,
    pub classifier: ClassifierMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            interview_mode: true,
            classifier: ClassifierMode::default(),
        }
    }
}

/// Chunk sealing thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub token_target: usize,
    pub token_max: usize,
    pub overlap_tokens: usize,
    pub idle_flush_secs: u64,
    /// Recent interviewer questions attached to each sealed chunk.
    pub context_questions: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            token_target: defaults::CHUNK_TOKEN_TARGET,
            token_max: defaults::CHUNK_TOKEN_MAX,
            overlap_tokens: defaults::CHUNK_OVERLAP_TOKENS,
            idle_flush_secs: defaults::IDLE_FLUSH_SECS,
            context_questions: defaults::CONTEXT_QUESTIONS,
        }
    }
}

/// Extraction worker-pool sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub max_concurrent: usize,
    /// Retries after the initial attempt before a chunk is dropped.
    pub retry_limit: u32,
    pub channel_buffer: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::MAX_CONCURRENT_EXTRACTIONS,
            retry_limit: defaults::EXTRACTION_RETRY_LIMIT,
            channel_buffer: defaults::CHANNEL_BUFFER,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Loads from the default path, or defaults when the file is absent.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Default config location: `<config dir>/procap/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("procap")
            .join("config.toml")
    }

    /// Applies environment-variable overrides on top of file settings.
    ///
    /// Recognized: `PROCAP_INTERVIEW_MODE` (true/false),
    /// `PROCAP_CLASSIFIER` (heuristic/delegated),
    /// `PROCAP_IDLE_FLUSH_SECS` (seconds).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var("PROCAP_INTERVIEW_MODE") {
            match value.to_lowercase().as_str() {
                "true" | "1" => self.session.interview_mode = true,
                "false" | "0" => self.session.interview_mode = false,
                other => eprintln!("procap: ignoring PROCAP_INTERVIEW_MODE={other}"),
            }
        }
        if let Ok(value) = std::env::var("PROCAP_CLASSIFIER") {
            match value.to_lowercase().as_str() {
                "heuristic" => self.session.classifier = ClassifierMode::Heuristic,
                "delegated" => self.session.classifier = ClassifierMode::Delegated,
                other => eprintln!("procap: ignoring PROCAP_CLASSIFIER={other}"),
            }
        }
        if let Ok(value) = std::env::var("PROCAP_IDLE_FLUSH_SECS") {
            match value.parse::<u64>() {
                Ok(secs) => self.chunking.idle_flush_secs = secs,
                Err(_) => eprintln!("procap: ignoring PROCAP_IDLE_FLUSH_SECS={value}"),
            }
        }
        self
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.token_max < self.chunking.token_target {
            return Err(ProcapError::ConfigInvalidValue {
                key: "chunking.token_max".to_string(),
                message: "must be at least chunking.token_target".to_string(),
            });
        }
        if self.chunking.overlap_tokens >= self.chunking.token_target {
            return Err(ProcapError::ConfigInvalidValue {
                key: "chunking.overlap_tokens".to_string(),
                message: "must be smaller than chunking.token_target".to_string(),
            });
        }
        if self.chunking.idle_flush_secs == 0 {
            return Err(ProcapError::ConfigInvalidValue {
                key: "chunking.idle_flush_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.extraction.max_concurrent == 0 {
            return Err(ProcapError::ConfigInvalidValue {
                key: "extraction.max_concurrent".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
