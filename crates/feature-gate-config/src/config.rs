// crates/feature-gate-config/src/config.rs
// ============================================================================
// Module: Feature Gate Configuration
// Description: Configuration loading and validation for the feature gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: feature-gate-core, feature-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a gate that cannot read its
//! declarations must not start with a partial declaration table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use feature_gate_core::DEFAULT_MAX_FEATURES_PER_DECLARATION;
use feature_gate_core::DeclarationLimits;
use feature_gate_core::DeclarationRegistryBuilder;
use feature_gate_core::EndpointPath;
use feature_gate_core::FeatureGateDeclaration;
use feature_gate_core::FeatureName;
use feature_gate_core::ServiceName;
use feature_gate_providers::EnvEvaluatorConfig;
use feature_gate_providers::StaticEvaluatorConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "feature-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "FEATURE_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of service and endpoint declaration entries combined.
pub(crate) const MAX_SCOPE_ENTRIES: usize = 1024;
/// Upper bound accepted for `gate.max_features_per_declaration`.
pub(crate) const MAX_FEATURES_PER_DECLARATION_LIMIT: usize = 1024;
/// Maximum number of static flag entries.
pub(crate) const MAX_STATIC_FLAGS: usize = 4096;
/// Maximum length of the env evaluator prefix.
pub(crate) const MAX_ENV_PREFIX_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Feature gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureGateConfig {
    /// Declaration limits.
    #[serde(default)]
    pub gate: GateConfig,
    /// Decision audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Feature evaluation backend.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    /// Service-scope declarations.
    #[serde(default)]
    pub services: Vec<ServiceGateConfig>,
    /// Endpoint-scope declarations.
    #[serde(default)]
    pub endpoints: Vec<EndpointGateConfig>,
}

impl FeatureGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gate.validate()?;
        self.audit.validate()?;
        self.evaluator.validate()?;
        if self.services.len() + self.endpoints.len() > MAX_SCOPE_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "services and endpoints exceed {MAX_SCOPE_ENTRIES} entries"
            )));
        }
        let max = self.gate.max_features_per_declaration;
        for (index, service) in self.services.iter().enumerate() {
            service.to_declaration(index, max)?;
        }
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            endpoint.to_declaration(index, max)?;
        }
        Ok(())
    }

    /// Returns the declaration limits applied to the registry.
    #[must_use]
    pub const fn declaration_limits(&self) -> DeclarationLimits {
        DeclarationLimits {
            max_features_per_declaration: self.gate.max_features_per_declaration,
        }
    }

    /// Adds the configured service and endpoint declarations and limits to a
    /// registry builder that may already hold request-type declarations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a declaration is invalid.
    pub fn apply_declarations(
        &self,
        builder: DeclarationRegistryBuilder,
    ) -> Result<DeclarationRegistryBuilder, ConfigError> {
        let max = self.gate.max_features_per_declaration;
        let mut builder = builder.limits(self.declaration_limits());
        for (index, service) in self.services.iter().enumerate() {
            let (name, declaration) = service.to_declaration(index, max)?;
            builder = builder.service(name, declaration);
        }
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            let (path, declaration) = endpoint.to_declaration(index, max)?;
            builder = builder.endpoint(path, declaration);
        }
        Ok(builder)
    }
}

/// Declaration limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Maximum names a single service or endpoint declaration may list.
    #[serde(default = "default_max_features_per_declaration")]
    pub max_features_per_declaration: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_features_per_declaration: default_max_features_per_declaration(),
        }
    }
}

impl GateConfig {
    /// Validates declaration limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_features_per_declaration == 0 {
            return Err(ConfigError::Invalid(
                "gate.max_features_per_declaration must be greater than zero".to_string(),
            ));
        }
        if self.max_features_per_declaration > MAX_FEATURES_PER_DECLARATION_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "gate.max_features_per_declaration must be at most {MAX_FEATURES_PER_DECLARATION_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Default per-call feature limit for serde.
const fn default_max_features_per_declaration() -> usize {
    DEFAULT_MAX_FEATURES_PER_DECLARATION
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Decisions are not logged.
    None,
}

/// Decision audit logging settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (file sink only).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::Stderr | AuditSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid for the file sink".to_string(),
            )),
            (AuditSinkKind::Stderr | AuditSinkKind::None, None) => Ok(()),
        }
    }
}

/// Feature evaluation backend selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluatorConfig {
    /// In-memory table.
    Static(StaticEvaluatorConfig),
    /// Environment variables.
    Env(EnvEvaluatorConfig),
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self::Static(StaticEvaluatorConfig::default())
    }
}

impl EvaluatorConfig {
    /// Validates backend settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Static(config) => {
                if config.flags.len() > MAX_STATIC_FLAGS {
                    return Err(ConfigError::Invalid(format!(
                        "evaluator.flags exceeds {MAX_STATIC_FLAGS} entries"
                    )));
                }
                for name in config.flags.keys() {
                    FeatureName::new(name.as_str()).map_err(|err| {
                        ConfigError::Invalid(format!("evaluator.flags: {err}"))
                    })?;
                }
                Ok(())
            }
            Self::Env(config) => {
                if config.prefix.len() > MAX_ENV_PREFIX_LENGTH {
                    return Err(ConfigError::Invalid(
                        "evaluator.prefix exceeds max length".to_string(),
                    ));
                }
                if !config.prefix.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
                    return Err(ConfigError::Invalid(
                        "evaluator.prefix must contain only ASCII letters, digits, or '_'"
                            .to_string(),
                    ));
                }
                if config.max_key_bytes == 0 || config.max_value_bytes == 0 {
                    return Err(ConfigError::Invalid(
                        "evaluator size limits must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Declaration applying to every method of a service.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceGateConfig {
    /// Fully qualified service name.
    pub name: String,
    /// Feature names gating the service.
    pub features: Vec<String>,
}

impl ServiceGateConfig {
    /// Converts the entry into a validated declaration.
    fn to_declaration(
        &self,
        index: usize,
        max: usize,
    ) -> Result<(ServiceName, FeatureGateDeclaration), ConfigError> {
        let field = format!("services[{index}]");
        let name = ServiceName::new(self.name.as_str())
            .map_err(|err| ConfigError::Invalid(format!("{field}.name: {err}")))?;
        let declaration = build_declaration(&field, &self.features, max)?;
        Ok((name, declaration))
    }
}

/// Declaration applying to a single endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointGateConfig {
    /// Endpoint path in `/package.Service/Method` form.
    pub path: String,
    /// Feature names gating the endpoint.
    pub features: Vec<String>,
}

impl EndpointGateConfig {
    /// Converts the entry into a validated declaration.
    fn to_declaration(
        &self,
        index: usize,
        max: usize,
    ) -> Result<(EndpointPath, FeatureGateDeclaration), ConfigError> {
        let field = format!("endpoints[{index}]");
        let path = EndpointPath::parse(self.path.as_str())
            .map_err(|err| ConfigError::Invalid(format!("{field}.path: {err}")))?;
        let declaration = build_declaration(&field, &self.features, max)?;
        Ok((path, declaration))
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

/// Validates feature names for a declaration entry.
fn build_declaration(
    field: &str,
    features: &[String],
    max: usize,
) -> Result<FeatureGateDeclaration, ConfigError> {
    if features.len() > max {
        return Err(ConfigError::Invalid(format!(
            "{field}.features lists {} names, limit is {max}",
            features.len()
        )));
    }
    let mut names = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let name = FeatureName::new(feature.as_str())
            .map_err(|err| ConfigError::Invalid(format!("{field}.features[{index}]: {err}")))?;
        names.push(name);
    }
    Ok(FeatureGateDeclaration::new(names))
}

/// Picks the config file: explicit argument, then `FEATURE_GATE_CONFIG`, then
/// `feature-gate.toml` in the working directory.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    select_config_path(path, env::var(CONFIG_ENV_VAR).ok())
}

/// Applies the lookup order to an already-read environment value.
fn select_config_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    match env_path {
        Some(env_path) if env_path.len() > MAX_TOTAL_PATH_LENGTH => {
            Err(ConfigError::Invalid(format!(
                "{CONFIG_ENV_VAR} is {} bytes, limit is {MAX_TOTAL_PATH_LENGTH}",
                env_path.len()
            )))
        }
        Some(env_path) => Ok(PathBuf::from(env_path)),
        None => Ok(PathBuf::from(DEFAULT_CONFIG_NAME)),
    }
}

/// Rejects feature gate config paths beyond the length limits before any IO.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let length = path.as_os_str().len();
    if length > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "feature gate config path is {length} bytes, limit is {MAX_TOTAL_PATH_LENGTH}"
        )));
    }
    if let Some(component) =
        path.components().find(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(ConfigError::Invalid(format!(
            "feature gate config path has a {}-byte component, limit is \
             {MAX_PATH_COMPONENT_LENGTH}",
            component.as_os_str().len()
        )));
    }
    Ok(())
}

/// Validates a configured path against length constraints.
fn validate_path_string(field: &str, path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests assert on fixed inputs.")]
mod tests {
    use super::*;

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        let result = validate_path_string("audit.path", Path::new("   "));
        assert!(result.unwrap_err().to_string().contains("non-empty"));
    }

    #[test]
    fn validate_path_string_rejects_long_component() {
        let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let result = validate_path_string("audit.path", Path::new(&long));
        assert!(result.unwrap_err().to_string().contains("path component too long"));
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let selected =
            select_config_path(Some(Path::new("explicit.toml")), Some("env.toml".to_string()));
        assert_eq!(selected.unwrap(), PathBuf::from("explicit.toml"));
    }

    #[test]
    fn environment_path_used_before_default() {
        let selected = select_config_path(None, Some("env.toml".to_string())).unwrap();
        assert_eq!(selected, PathBuf::from("env.toml"));
        let fallback = select_config_path(None, None).unwrap();
        assert_eq!(fallback, PathBuf::from(DEFAULT_CONFIG_NAME));
    }

    #[test]
    fn oversized_environment_path_names_the_variable() {
        let long = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
        let error = select_config_path(None, Some(long)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid config: FEATURE_GATE_CONFIG is 4097 bytes, limit is 4096"
        );
    }

    #[test]
    fn build_declaration_reports_field_and_index() {
        let features = vec!["ok".to_string(), String::new()];
        let error = build_declaration("endpoints[3]", &features, 8).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid config: endpoints[3].features[1]: feature name must be non-empty"
        );
    }
}
