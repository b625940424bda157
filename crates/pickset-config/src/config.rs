// crates/pickset-config/src/config.rs
// ============================================================================
// Module: Pickset Configuration
// Description: Configuration loading and validation for the Pickset service.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: pickset-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and falls back to the documented defaults; an
//! empty file is a valid configuration. Unknown keys are rejected so typos
//! surface at startup instead of silently reverting to a default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use pickset_core::DEFAULT_PAGE_LIMIT;
use pickset_core::DEFAULT_RANGE_MAX;
use pickset_core::EngineConfig;
use pickset_core::Identifier;
use pickset_core::MAX_PAGE_LIMIT;
use pickset_core::QueueConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "pickset.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PICKSET_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Largest accepted dense range bound.
pub(crate) const MAX_UNIVERSE_MAX_ID: u64 = 1_000_000_000_000;
/// Largest accepted batch window in milliseconds.
pub(crate) const MAX_WINDOW_MS: u64 = 600_000;
/// Largest accepted page size cap.
pub(crate) const MAX_PAGE_LIMIT_CAP: usize = 1_000;
/// Smallest accepted request body limit in bytes.
pub(crate) const MIN_BODY_BYTES: usize = 1024;
/// Largest accepted request body limit in bytes.
pub(crate) const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Pickset service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PicksetConfig {
    /// Identifier universe settings.
    #[serde(default)]
    pub universe: UniverseConfig,
    /// Mutation queue batch windows.
    #[serde(default)]
    pub queue: QueueWindowConfig,
    /// Page size defaults and caps.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl PicksetConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then `PICKSET_CONFIG`, then
    /// `pickset.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Loads configuration when a file is present, otherwise returns defaults.
    ///
    /// An explicit `path` or `PICKSET_CONFIG` must exist; only the implicit
    /// `pickset.toml` may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present file is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
        let resolved = resolve_path(path)?;
        if !explicit && !resolved.exists() {
            let mut config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load(path)
    }

    /// Parses and validates configuration from raw file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bytes are oversized, not UTF-8, not
    /// valid TOML, or fail validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.universe.validate()?;
        self.queue.validate()?;
        self.pagination.validate()?;
        self.server.validate()?;
        Ok(())
    }

    /// Builds the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the universe bound is zero.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        Ok(EngineConfig {
            range_max: self.universe.range_max()?,
            queue: self.queue.queue_config(),
        })
    }
}

/// Identifier universe configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniverseConfig {
    /// Inclusive upper bound of the dense identifier range.
    #[serde(default = "default_max_id")]
    pub max_id: u64,
}

impl UniverseConfig {
    /// Validates the universe bound.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_id == 0 {
            return Err(ConfigError::Invalid("universe.max_id must be at least 1".to_string()));
        }
        if self.max_id > MAX_UNIVERSE_MAX_ID {
            return Err(ConfigError::Invalid(format!(
                "universe.max_id must be at most {MAX_UNIVERSE_MAX_ID}"
            )));
        }
        Ok(())
    }

    /// Returns the bound as an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `max_id` is zero.
    pub fn range_max(&self) -> Result<Identifier, ConfigError> {
        Identifier::new(self.max_id)
            .ok_or_else(|| ConfigError::Invalid("universe.max_id must be at least 1".to_string()))
    }
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            max_id: default_max_id(),
        }
    }
}

/// Mutation queue window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueWindowConfig {
    /// Batch window for `AddElement` in milliseconds.
    #[serde(default = "default_universe_window_ms")]
    pub universe_window_ms: u64,
    /// Batch window for selection mutations in milliseconds.
    #[serde(default = "default_selection_window_ms")]
    pub selection_window_ms: u64,
}

impl QueueWindowConfig {
    /// Validates both windows.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_window("queue.universe_window_ms", self.universe_window_ms)?;
        validate_window("queue.selection_window_ms", self.selection_window_ms)
    }

    /// Converts the windows into queue durations.
    #[must_use]
    pub const fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            universe_window: Duration::from_millis(self.universe_window_ms),
            selection_window: Duration::from_millis(self.selection_window_ms),
        }
    }
}

impl Default for QueueWindowConfig {
    fn default() -> Self {
        Self {
            universe_window_ms: default_universe_window_ms(),
            selection_window_ms: default_selection_window_ms(),
        }
    }
}

/// Page size configuration for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size used when a request omits `limit`.
    #[serde(default = "default_page_limit")]
    pub default_limit: usize,
    /// Largest page size a request may ask for.
    #[serde(default = "default_max_page_limit")]
    pub max_limit: usize,
}

impl PaginationConfig {
    /// Validates the limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_limit == 0 || self.max_limit > MAX_PAGE_LIMIT_CAP {
            return Err(ConfigError::Invalid(format!(
                "pagination.max_limit must be between 1 and {MAX_PAGE_LIMIT_CAP}"
            )));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(ConfigError::Invalid(
                "pagination.default_limit must be between 1 and pagination.max_limit".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves a requested page size against the configured bounds.
    ///
    /// A missing or zero request uses `default_limit`; anything else is
    /// clamped to `1..=max_limit`.
    #[must_use]
    pub fn resolve_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            None | Some(0) => self.default_limit,
            Some(limit) if limit < 0 => 1,
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX).min(self.max_limit),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_page_limit(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Structured audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl ServerConfig {
    /// Validates bind address, body limit, and audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if !(MIN_BODY_BYTES ..= MAX_BODY_BYTES).contains(&self.max_body_bytes) {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between {MIN_BODY_BYTES} and {MAX_BODY_BYTES}"
            )));
        }
        self.audit.validate()
    }

    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!("invalid server.bind address: {}", self.bind))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            audit: ServerAuditConfig::default(),
        }
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerAuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines). Stderr when omitted.
    #[serde(default)]
    pub path: Option<String>,
}

impl ServerAuditConfig {
    /// Validates the audit path.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("server.audit.path", path)?;
        }
        Ok(())
    }
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path using CLI args and environment variables.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if Path::new(trimmed)
        .components()
        .any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(ConfigError::Invalid(format!("{field} path component too long")));
    }
    Ok(())
}

/// Validates a batch window in milliseconds.
fn validate_window(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_WINDOW_MS {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_WINDOW_MS}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default dense range bound.
const fn default_max_id() -> u64 {
    DEFAULT_RANGE_MAX
}

/// Default `AddElement` window.
const fn default_universe_window_ms() -> u64 {
    10_000
}

/// Default selection window.
const fn default_selection_window_ms() -> u64 {
    1_000
}

/// Default page size.
const fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

/// Default page size cap.
const fn default_max_page_limit() -> usize {
    MAX_PAGE_LIMIT
}

/// Default bind address.
fn default_bind() -> String {
    "127.0.0.1:3001".to_string()
}

/// Default request body limit.
const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Audit logging is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
