// crates/feature-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Feature Gate Interfaces
// Description: Backend-agnostic feature evaluation capability.
// Purpose: Define the single seam between the gate and any flag backend.
// Dependencies: async-trait, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The gate depends on exactly one external capability: asking whether a
//! named feature is currently enabled. Any flag store or targeting engine that
//! implements [`FeatureEvaluator`] is interchangeable.
//!
//! Backend failures are reported as [`FeatureEvaluationError`] and must never
//! be folded into a `false` answer; "disabled" and "could not determine" are
//! distinct outcomes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::FeatureName;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures reported by a feature evaluation backend.
///
/// # Invariants
/// - Messages come from the backend verbatim and are surfaced unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureEvaluationError {
    /// Backend could not be reached.
    #[error("feature backend unavailable: {0}")]
    Unavailable(String),
    /// Backend did not answer in time.
    #[error("feature backend timed out: {0}")]
    Timeout(String),
    /// Backend reported an internal failure.
    #[error("feature backend error: {0}")]
    Backend(String),
}

impl FeatureEvaluationError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Timeout(_) => "timeout",
            Self::Backend(_) => "backend",
        }
    }

    /// Returns the backend-provided message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unavailable(message) | Self::Timeout(message) | Self::Backend(message) => {
                message
            }
        }
    }
}

// ============================================================================
// SECTION: Feature Evaluator
// ============================================================================

/// Asynchronous feature flag evaluation capability.
#[async_trait]
pub trait FeatureEvaluator: Send + Sync {
    /// Reports whether the feature is currently enabled.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureEvaluationError`] when the backend cannot answer.
    async fn is_enabled(&self, feature: &FeatureName) -> Result<bool, FeatureEvaluationError>;
}

#[async_trait]
impl<T: FeatureEvaluator + ?Sized> FeatureEvaluator for Arc<T> {
    async fn is_enabled(&self, feature: &FeatureName) -> Result<bool, FeatureEvaluationError> {
        (**self).is_enabled(feature).await
    }
}

#[async_trait]
impl<T: FeatureEvaluator + ?Sized> FeatureEvaluator for Box<T> {
    async fn is_enabled(&self, feature: &FeatureName) -> Result<bool, FeatureEvaluationError> {
        (**self).is_enabled(feature).await
    }
}
