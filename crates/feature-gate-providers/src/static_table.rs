// crates/feature-gate-providers/src/static_table.rs
// ============================================================================
// Module: Static Feature Evaluator
// Description: In-memory feature table with runtime toggles.
// Purpose: Serve flags from configuration or tests without a backend.
// Dependencies: feature-gate-core, serde
// ============================================================================

//! ## Overview
//! The static evaluator answers from an in-memory table seeded from
//! configuration. Entries can be flipped at runtime; every call reads the
//! current value, so a toggle takes effect on the next gated request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use feature_gate_core::DeclarationError;
use feature_gate_core::FeatureEvaluationError;
use feature_gate_core::FeatureEvaluator;
use feature_gate_core::FeatureName;
use serde::Deserialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the static evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticEvaluatorConfig {
    /// Feature states keyed by feature name.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// Answer for features absent from `flags`.
    #[serde(default)]
    pub default_enabled: bool,
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Feature evaluator backed by an in-memory table.
///
/// # Invariants
/// - Table keys are validated [`FeatureName`]s.
pub struct StaticFeatureEvaluator {
    /// Current feature states.
    flags: RwLock<BTreeMap<FeatureName, bool>>,
    /// Answer for unknown features.
    default_enabled: bool,
}

impl StaticFeatureEvaluator {
    /// Creates an evaluator from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] when a configured name is invalid.
    pub fn new(config: &StaticEvaluatorConfig) -> Result<Self, DeclarationError> {
        let flags = config
            .flags
            .iter()
            .map(|(name, enabled)| FeatureName::new(name.as_str()).map(|name| (name, *enabled)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Self {
            flags: RwLock::new(flags),
            default_enabled: config.default_enabled,
        })
    }

    /// Creates an evaluator from validated entries; unknown features are disabled.
    #[must_use]
    pub fn from_flags(flags: impl IntoIterator<Item = (FeatureName, bool)>) -> Self {
        Self {
            flags: RwLock::new(flags.into_iter().collect()),
            default_enabled: false,
        }
    }

    /// Sets the state of a feature.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureEvaluationError::Backend`] when the table lock is poisoned.
    pub fn set(&self, feature: FeatureName, enabled: bool) -> Result<(), FeatureEvaluationError> {
        let mut flags = self.flags.write().map_err(|_| poisoned())?;
        flags.insert(feature, enabled);
        Ok(())
    }

    /// Removes a feature so it falls back to the default answer.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureEvaluationError::Backend`] when the table lock is poisoned.
    pub fn clear(&self, feature: &FeatureName) -> Result<(), FeatureEvaluationError> {
        let mut flags = self.flags.write().map_err(|_| poisoned())?;
        flags.remove(feature);
        Ok(())
    }
}

#[async_trait]
impl FeatureEvaluator for StaticFeatureEvaluator {
    async fn is_enabled(&self, feature: &FeatureName) -> Result<bool, FeatureEvaluationError> {
        let flags = self.flags.read().map_err(|_| poisoned())?;
        Ok(flags.get(feature).copied().unwrap_or(self.default_enabled))
    }
}

/// Error for a poisoned table lock.
fn poisoned() -> FeatureEvaluationError {
    FeatureEvaluationError::Backend("static feature table lock poisoned".to_string())
}
