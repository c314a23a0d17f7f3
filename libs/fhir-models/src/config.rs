//! Model-wide validation switches
//!
//! The configuration is process-global: builders consult it while validating,
//! and there is no per-builder override. It is initialised from the
//! environment on first use and can be replaced at runtime with [`ModelConfig::set`].

use once_cell::sync::Lazy;
use std::env;
use std::sync::RwLock;

/// Environment variable toggling reference target checks.
pub const CHECK_REFERENCE_TYPES_ENV: &str = "CLAIMWISE_CHECK_REFERENCE_TYPES";
/// Environment variable toggling the control character check on strings.
pub const CHECK_CONTROL_CHARS_ENV: &str = "CLAIMWISE_CHECK_CONTROL_CHARS";

static CONFIG: Lazy<RwLock<ModelConfig>> = Lazy::new(|| RwLock::new(ModelConfig::from_env()));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    /// Validate the resource type named by reference fields against their allowed targets.
    pub check_reference_types: bool,
    /// Reject strings containing control characters below U+0020 (other than tab, CR and LF).
    pub check_control_chars: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            check_reference_types: true,
            check_control_chars: true,
        }
    }
}

impl ModelConfig {
    /// Defaults overridden by `CLAIMWISE_CHECK_*` environment variables.
    ///
    /// Accepted values are `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`;
    /// anything else keeps the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            check_reference_types: env_flag(CHECK_REFERENCE_TYPES_ENV)
                .unwrap_or(defaults.check_reference_types),
            check_control_chars: env_flag(CHECK_CONTROL_CHARS_ENV)
                .unwrap_or(defaults.check_control_chars),
        }
    }

    /// Snapshot of the active configuration.
    pub fn current() -> Self {
        match CONFIG.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replace the active configuration.
    pub fn set(config: ModelConfig) {
        let mut guard = match CONFIG.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tracing::debug!(?config, "model configuration updated");
        *guard = config;
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    parse_flag(&raw)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn default_enables_all_checks() {
        let config = ModelConfig::default();
        assert!(config.check_reference_types);
        assert!(config.check_control_chars);
    }
}
