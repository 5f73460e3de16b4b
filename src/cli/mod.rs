//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;

use crate::config::RunConfig;
use crate::executor::ExecutorKind;

/// Parallel-capable unit test runner with a built-in mock engine
#[derive(Parser, Debug, Default)]
#[command(name = "testrig")]
#[command(version)]
#[command(about = "Run the testrig self-check suite")]
#[command(long_about = None)]
pub struct Args {
    /// Seed for method order
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Echo every result on its own line
    #[arg(short, long)]
    pub verbose: bool,

    /// Only run methods matching an exact name or /regex/
    #[arg(short, long)]
    pub name: Option<String>,

    /// Worker slots for parallel units (0 runs everything serially)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Executor backend (thread, task, serial)
    #[arg(short, long, value_parser = parse_executor)]
    pub executor: Option<ExecutorKind>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Diagnostic log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write a JSON report to this file
    #[arg(long)]
    pub json: Option<String>,

    /// Print the supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,
}

fn parse_executor(s: &str) -> Result<ExecutorKind, String> {
    ExecutorKind::from_str(s).ok_or_else(|| format!("unknown executor '{s}' (thread, task, serial)"))
}

impl Args {
    /// Apply flags on top of file and environment configuration
    pub fn apply(&self, config: &mut RunConfig) {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.verbose {
            config.verbose = true;
        }
        if self.name.is_some() {
            config.filter = self.name.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(executor) = self.executor {
            config.executor = executor;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "testrig", "--seed", "17", "-v", "--name", "/mock/", "-w", "0", "-e", "task",
        ]);
        let mut config = RunConfig {
            seed: Some(1),
            workers: 4,
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.seed, Some(17));
        assert!(config.verbose);
        assert_eq!(config.filter.as_deref(), Some("/mock/"));
        assert_eq!(config.workers, 0);
        assert_eq!(config.executor, ExecutorKind::Task);
    }

    #[test]
    fn test_unset_flags_leave_config_alone() {
        let mut config = RunConfig {
            seed: Some(5),
            ..Default::default()
        };
        Args::parse_from(["testrig"]).apply(&mut config);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_unknown_executor_is_rejected() {
        assert!(Args::try_parse_from(["testrig", "--executor", "ractor"]).is_err());
    }
}
