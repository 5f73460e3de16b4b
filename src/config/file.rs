//! Configuration file discovery

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::RunConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./testrig.yaml",
    "./testrig.yml",
    "./.testrig.yaml",
    "~/.testrig.yaml",
];

/// Find a configuration file in the standard locations
pub fn find() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|dir| dir.join("testrig").join("config.yaml"));
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .chain(user_config)
        .find(|path| path.exists())
}

/// Load configuration from the first standard location, or defaults
pub fn load_default() -> Result<RunConfig> {
    match find() {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            RunConfig::load(&path)
        }
        None => Ok(RunConfig::default()),
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
pub(super) fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("./test.yaml"), PathBuf::from("./test.yaml"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/.testrig.yaml"), home.join(".testrig.yaml"));
        }
    }

    #[test]
    fn test_yaml_detection() {
        assert!(is_yaml_file(Path::new("a.yaml")));
        assert!(is_yaml_file(Path::new("a.yml")));
        assert!(!is_yaml_file(Path::new("a.json")));
        assert!(!is_yaml_file(Path::new("yaml")));
    }
}
