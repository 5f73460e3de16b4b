//! Method name filter
//!
//! A filter is either an exact name or a `/regex/`. Both forms are tried
//! against the bare method name and against `Unit#method`.

use regex::Regex;
use std::fmt;

/// Method selection filter
#[derive(Clone, Debug, Default)]
pub enum Filter {
    #[default]
    All,
    Exact(String),
    Pattern(Regex),
}

impl Filter {
    /// Parse a filter string. `/.../` compiles a regex, anything else is exact.
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        if pattern.len() >= 2 && pattern.starts_with('/') && pattern.ends_with('/') {
            let inner = &pattern[1..pattern.len() - 1];
            return Ok(Filter::Pattern(Regex::new(inner)?));
        }
        Ok(Filter::Exact(pattern.to_string()))
    }

    /// Parse an optional filter, `None` selecting everything
    pub fn from_option(pattern: Option<&str>) -> Result<Self, regex::Error> {
        pattern.map_or(Ok(Filter::All), Self::parse)
    }

    pub fn matches(&self, unit: &str, method: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Exact(name) => name == method || *name == format!("{unit}#{method}"),
            Filter::Pattern(re) => re.is_match(method) || re.is_match(&format!("{unit}#{method}")),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "/./"),
            Filter::Exact(name) => write!(f, "{name}"),
            Filter::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_everything() {
        assert!(Filter::All.matches("TestA", "test_x"));
    }

    #[test]
    fn test_exact_match_bare_or_qualified() {
        let filter = Filter::parse("test_x").unwrap();
        assert!(filter.matches("TestA", "test_x"));
        assert!(!filter.matches("TestA", "test_xy"));

        let filter = Filter::parse("TestA#test_x").unwrap();
        assert!(filter.matches("TestA", "test_x"));
        assert!(!filter.matches("TestB", "test_x"));
    }

    #[test]
    fn test_regex_between_slashes() {
        let filter = Filter::parse("/^TestB#/").unwrap();
        assert!(filter.matches("TestB", "test_one"));
        assert!(!filter.matches("TestA", "test_one"));

        let filter = Filter::parse("/one|two/").unwrap();
        assert!(filter.matches("TestA", "test_two"));
    }

    #[test]
    fn test_single_slash_is_exact() {
        assert!(matches!(Filter::parse("/").unwrap(), Filter::Exact(_)));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(Filter::parse("/(/").is_err());
    }

    #[test]
    fn test_display_round_trips_pattern() {
        assert_eq!(Filter::parse("/a.b/").unwrap().to_string(), "/a.b/");
        assert_eq!(Filter::All.to_string(), "/./");
    }
}
