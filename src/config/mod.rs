//! Configuration module
//!
//! Run settings come from a config file, then environment overrides, then
//! command-line flags, each layer replacing what the previous one set.

mod env;
mod file;

pub use env::{print_env_help, EnvBuilder, EnvConfig, EnvGuard};
pub use file::{find, load_default};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::executor::ExecutorKind;
use crate::registry::Filter;
use crate::runner::RunOptions;
use crate::utils::LogLevel;

/// Run configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Worker slots for parallel units
    pub workers: usize,

    /// Executor backend for parallel units
    pub executor: ExecutorKind,

    /// Method order seed; random when unset
    pub seed: Option<u64>,

    /// Method filter, exact name or `/regex/`
    pub filter: Option<String>,

    /// Echo every result on its own line
    pub verbose: bool,

    /// Diagnostic log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            executor: ExecutorKind::Thread,
            seed: None,
            filter: None,
            verbose: false,
            log_level: "warn".to_string(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if file::is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if file::is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(filter) = &self.filter {
            Filter::parse(filter).with_context(|| format!("Invalid filter: {filter}"))?;
        }
        if LogLevel::from_str(&self.log_level).is_none() {
            anyhow::bail!("Unknown log level: {}", self.log_level);
        }
        Ok(())
    }

    /// Apply environment overrides on top of this configuration
    pub fn merge_env(&mut self, env: &EnvConfig) {
        if let Some(workers) = env.workers {
            self.workers = workers;
        }
        if let Some(executor) = env.executor {
            self.executor = executor;
        }
        if env.seed.is_some() {
            self.seed = env.seed;
        }
        if env.filter.is_some() {
            self.filter = env.filter.clone();
        }
        if let Some(verbose) = env.verbose {
            self.verbose = verbose;
        }
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_str(&self.log_level).unwrap_or(LogLevel::Warn)
    }

    /// Orchestrator options for this configuration, picking a seed if none is set
    pub fn options(&self) -> Result<RunOptions> {
        let filter = Filter::from_option(self.filter.as_deref())
            .with_context(|| format!("Invalid filter: {}", self.filter.as_deref().unwrap_or_default()))?;

        Ok(RunOptions {
            seed: Some(self.seed.unwrap_or_else(random_seed)),
            filter,
            verbose: self.verbose,
            workers: self.workers,
            executor: self.executor,
        })
    }
}

/// A seed small enough to retype from the run header
pub fn random_seed() -> u64 {
    u64::from(rand::random::<u16>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.workers, 2);
        assert_eq!(config.executor, ExecutorKind::Thread);
        assert_eq!(config.log_level(), LogLevel::Warn);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_save_load_yaml_and_json() {
        let dir = tempdir().unwrap();
        let config = RunConfig {
            workers: 8,
            executor: ExecutorKind::Task,
            seed: Some(31337),
            filter: Some("/parse/".to_string()),
            verbose: true,
            log_level: "debug".to_string(),
        };

        for name in ["testrig.yaml", "nested/testrig.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(RunConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("testrig.yml");
        std::fs::write(&path, "executor: serial\nseed: 5\n").unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.executor, ExecutorKind::Serial);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("testrig.json");
        std::fs::write(&path, r#"{"filter": "/(unclosed/"}"#).unwrap();
        assert!(RunConfig::load(&path).is_err());
    }

    #[test]
    fn test_merge_env_overrides_file_values() {
        let mut config = RunConfig {
            workers: 4,
            seed: Some(1),
            ..Default::default()
        };
        let env = EnvConfig {
            workers: Some(6),
            filter: Some("test_add".to_string()),
            ..Default::default()
        };
        config.merge_env(&env);

        assert_eq!(config.workers, 6);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.filter.as_deref(), Some("test_add"));
    }

    #[test]
    fn test_options_always_carry_a_seed() {
        let options = RunConfig::default().options().unwrap();
        assert!(options.seed.is_some());
        assert!(matches!(options.filter, Filter::All));

        let fixed = RunConfig {
            seed: Some(99),
            ..Default::default()
        };
        assert_eq!(fixed.options().unwrap().seed, Some(99));
    }
}
