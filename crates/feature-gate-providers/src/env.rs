// crates/feature-gate-providers/src/env.rs
// ============================================================================
// Module: Environment Feature Evaluator
// Description: Feature evaluator backed by environment variables.
// Purpose: Toggle features per process without an external flag service.
// Dependencies: feature-gate-core, serde
// ============================================================================

//! ## Overview
//! Each feature maps to one environment variable: the configured prefix
//! followed by the feature name upper-cased, with every character outside
//! `[A-Za-z0-9]` replaced by `_` (`beta-api` becomes `FEATURE_BETA_API`).
//! The mapping only derives the variable key; feature identity stays exact.
//!
//! The mapping is not injective: `beta-api`, `beta_api`, and `Beta-API` all
//! read `FEATURE_BETA_API` and therefore always share one state. Deployments
//! that need such names toggled independently must use the static evaluator
//! or distinct names.
//!
//! Unset variables fall back to `default_enabled`. Set variables that cannot
//! be parsed as a boolean are backend errors, never silently disabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use feature_gate_core::FeatureEvaluationError;
use feature_gate_core::FeatureEvaluator;
use feature_gate_core::FeatureName;
use serde::Deserialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "FEATURE_";

/// Configuration for the environment evaluator.
///
/// # Invariants
/// - `max_key_bytes` and `max_value_bytes` are enforced as hard upper bounds.
/// - `overrides` take precedence over process environment reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvEvaluatorConfig {
    /// Prefix prepended to derived variable keys.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Answer for features whose variable is unset.
    #[serde(default)]
    pub default_enabled: bool,
    /// Maximum bytes allowed for a derived variable key.
    #[serde(default = "default_max_key_bytes")]
    pub max_key_bytes: usize,
    /// Maximum bytes allowed for a variable value.
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
    /// Optional override map keyed by variable name, used for deterministic lookups.
    #[serde(default)]
    pub overrides: Option<BTreeMap<String, String>>,
}

impl Default for EnvEvaluatorConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            default_enabled: false,
            max_key_bytes: default_max_key_bytes(),
            max_value_bytes: default_max_value_bytes(),
            overrides: None,
        }
    }
}

/// Default prefix for serde.
fn default_prefix() -> String {
    DEFAULT_ENV_PREFIX.to_string()
}

/// Default key size limit for serde.
const fn default_max_key_bytes() -> usize {
    255
}

/// Default value size limit for serde.
const fn default_max_value_bytes() -> usize {
    64
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Feature evaluator reading boolean environment variables.
pub struct EnvFeatureEvaluator {
    /// Evaluator configuration.
    config: EnvEvaluatorConfig,
}

impl EnvFeatureEvaluator {
    /// Creates a new environment evaluator.
    #[must_use]
    pub const fn new(config: EnvEvaluatorConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the variable key consulted for a feature.
    #[must_use]
    pub fn key_for(&self, feature: &FeatureName) -> String {
        env_key(&self.config.prefix, feature.as_str())
    }

    /// Reads the raw value for a key from overrides or the process environment.
    fn read(&self, key: &str) -> Result<Option<String>, FeatureEvaluationError> {
        if let Some(overrides) = &self.config.overrides {
            return Ok(overrides.get(key).cloned());
        }
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(FeatureEvaluationError::Backend(format!("{key} is not valid unicode")))
            }
        }
    }
}

#[async_trait]
impl FeatureEvaluator for EnvFeatureEvaluator {
    async fn is_enabled(&self, feature: &FeatureName) -> Result<bool, FeatureEvaluationError> {
        let key = self.key_for(feature);
        if key.len() > self.config.max_key_bytes {
            return Err(FeatureEvaluationError::Backend("env key exceeds limit".to_string()));
        }
        let Some(value) = self.read(&key)? else {
            return Ok(self.config.default_enabled);
        };
        if value.len() > self.config.max_value_bytes {
            return Err(FeatureEvaluationError::Backend(format!("{key} value exceeds limit")));
        }
        parse_flag_value(&value)
            .ok_or_else(|| FeatureEvaluationError::Backend(format!("{key} is not a boolean")))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Derives the environment variable key for a feature.
pub(crate) fn env_key(prefix: &str, feature: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + feature.len());
    key.push_str(prefix);
    key.extend(feature.chars().map(|ch| {
        if ch.is_ascii_alphanumeric() { ch.to_ascii_uppercase() } else { '_' }
    }));
    key
}

/// Parses a boolean flag value.
pub(crate) fn parse_flag_value(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" | "enabled" => Some(true),
        "0" | "false" | "off" | "no" | "disabled" => Some(false),
        _ => None,
    }
}
