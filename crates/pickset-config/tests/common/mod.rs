// crates/pickset-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for pickset-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use pickset_config::ConfigError;
use pickset_config::PicksetConfig;

/// Parses a TOML string into a `PicksetConfig` without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<PicksetConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<PicksetConfig, toml::de::Error> {
    config_from_toml("")
}

/// Asserts that `result` is an `Invalid` error mentioning `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(ConfigError::Invalid(message)) => {
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Err(other) => Err(format!("expected invalid config, got {other}")),
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
