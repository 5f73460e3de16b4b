use crate::executor::ExecutorKind;
use crate::registry::Filter;

/// Settings for one run
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Shuffle seed for method order; `None` keeps definition order
    pub seed: Option<u64>,
    pub filter: Filter,
    pub verbose: bool,
    /// Worker slots for parallel units; 0 runs them serially
    pub workers: usize,
    pub executor: ExecutorKind,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: None,
            filter: Filter::All,
            verbose: false,
            workers: 2,
            executor: ExecutorKind::Thread,
        }
    }
}

impl RunOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorKind) -> Self {
        self.executor = executor;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Command line arguments that reproduce this run
    pub fn args(&self) -> String {
        let mut args = Vec::new();
        if let Some(seed) = self.seed {
            args.push(format!("--seed {seed}"));
        }
        if !matches!(self.filter, Filter::All) {
            args.push(format!("--name {}", self.filter));
        }
        if self.verbose {
            args.push("--verbose".to_string());
        }
        args.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RunOptions::default();
        assert_eq!(options.workers, 2);
        assert_eq!(options.executor, ExecutorKind::Thread);
        assert_eq!(options.args(), "");
    }

    #[test]
    fn test_args_reproduce_run() {
        let options = RunOptions::default()
            .with_seed(1234)
            .with_filter(Filter::parse("/add/").unwrap())
            .verbose(true);
        assert_eq!(options.args(), "--seed 1234 --name /add/ --verbose");
    }
}
