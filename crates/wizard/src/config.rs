//! check driver configuration
//!
//! Defaults can be overridden from the environment:
//! ```bash
//! WIZARD_PARALLEL=0     # check the queries of a round sequentially
//! WIZARD_FAIL_FAST=0    # collect every failure instead of stopping at the first
//! ```

use serde::{Deserialize, Serialize};

/// how the round driver runs the checks of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// check independent queries of a round on the rayon pool
    pub parallel: bool,
    /// stop at the first failing query of a round
    pub fail_fast: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            fail_fast: true,
        }
    }
}

impl CheckConfig {
    /// defaults overridden by WIZARD_PARALLEL and WIZARD_FAIL_FAST
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            parallel: env_flag("WIZARD_PARALLEL").unwrap_or(default.parallel),
            fail_fast: env_flag("WIZARD_FAIL_FAST").unwrap_or(default.fail_fast),
        }
    }

    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn collect_all(mut self) -> Self {
        self.fail_fast = false;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    parse_flag(std::env::var(name).ok()?.as_str())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "on" | "ON" => Some(true),
        "0" | "false" | "FALSE" | "off" | "OFF" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CheckConfig = serde_json::from_str(r#"{ "fail_fast": false }"#).unwrap();
        assert!(config.parallel);
        assert!(!config.fail_fast);

        let config: CheckConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CheckConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = CheckConfig::sequential().collect_all();
        assert!(!config.parallel);
        assert!(!config.fail_fast);
    }
}
