//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use crate::executor::ExecutorKind;

/// Environment variable prefix
const ENV_PREFIX: &str = "TESTRIG";

/// Worker count honoured when `TESTRIG_WORKERS` is unset
const LEGACY_WORKERS: &str = "MT_CPU";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Workers from TESTRIG_WORKERS, else MT_CPU
    pub workers: Option<usize>,
    /// Seed from TESTRIG_SEED
    pub seed: Option<u64>,
    /// Filter from TESTRIG_FILTER
    pub filter: Option<String>,
    /// Verbose from TESTRIG_VERBOSE
    pub verbose: Option<bool>,
    /// Executor from TESTRIG_EXECUTOR
    pub executor: Option<ExecutorKind>,
    /// Config file from TESTRIG_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            workers: get_env_parse("WORKERS").or_else(|| env::var(LEGACY_WORKERS).ok()?.parse().ok()),
            seed: get_env_parse("SEED"),
            filter: get_env("FILTER"),
            verbose: get_env_bool("VERBOSE"),
            executor: get_env("EXECUTOR").and_then(|v| ExecutorKind::from_str(&v)),
            config_file: get_env("CONFIG"),
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

/// Builder for setting environment variables (useful for testing)
#[derive(Default)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_WORKERS"), workers.to_string()));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_SEED"), seed.to_string()));
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_FILTER"), filter.into()));
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    pub fn executor(mut self, executor: ExecutorKind) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_EXECUTOR"), executor.to_string()));
        self
    }

    /// Set an arbitrary variable, prefix not applied
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((key.into(), value.into()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.iter().rev() {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all TESTRIG environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_WORKERS    Worker slots for parallel units ({LEGACY_WORKERS} also accepted)");
    println!("  {ENV_PREFIX}_SEED       Method order seed");
    println!("  {ENV_PREFIX}_FILTER     Method filter, exact name or /regex/");
    println!("  {ENV_PREFIX}_VERBOSE    Echo every result (true/false)");
    println!("  {ENV_PREFIX}_EXECUTOR   Executor backend (thread, task, serial)");
    println!("  {ENV_PREFIX}_CONFIG     Path to configuration file");
}
