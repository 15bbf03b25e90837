// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator tunables (§6 Configuration), loaded from a TOML file.

use relay_core::session::MAX_REMEDIATION_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Invariant S3. Not configurable past the compiled-in bound; present
    /// here purely so it round-trips through the same config surface as
    /// the other tunables.
    pub max_remediation_depth: u32,
    pub max_parallel_agents: usize,
    pub min_confidence: f64,
    pub analysis_timeout_ms: u64,
    /// Glob/regex-style path patterns that trigger cascade analysis when touched.
    pub core_file_patterns: Vec<String>,
    /// Pipeline names whose `check_run` results drive session transitions;
    /// everything else is logged and ignored (§4.3 CI signal classification).
    pub primary_ci_pipelines: Vec<String>,
    /// Commit author associated with automated commits; skipped to prevent
    /// self-triggering (§6 webhook event handling).
    pub bot_author: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_remediation_depth: MAX_REMEDIATION_DEPTH,
            max_parallel_agents: 5,
            min_confidence: 0.7,
            analysis_timeout_ms: 60_000,
            core_file_patterns: Vec::new(),
            primary_ci_pipelines: Vec::new(),
            bot_author: None,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// True if `path` matches one of the configured core-file glob patterns
    /// (e.g. `src/schema/*.rs`, `**/migrations/**`).
    pub fn is_core_file(&self, path: &str) -> bool {
        self.core_file_glob_set().map(|set| set.is_match(path)).unwrap_or(false)
    }

    fn core_file_glob_set(&self) -> Option<globset::GlobSet> {
        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &self.core_file_patterns {
            if let Ok(glob) = globset::Glob::new(pattern) {
                builder.add(glob);
            }
        }
        builder.build().ok()
    }

    pub fn is_primary_pipeline(&self, name: &str) -> bool {
        self.primary_ci_pipelines.iter().any(|p| p == name)
    }

    pub fn is_bot_author(&self, author: &str) -> bool {
        self.bot_author.as_deref() == Some(author)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
