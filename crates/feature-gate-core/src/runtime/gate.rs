// crates/feature-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Gate Evaluator
// Description: Sequential, short-circuiting evaluation of a resolved flag set.
// Purpose: Turn a flag set plus an evaluation backend into allow or deny.
// Dependencies: crate::{core, interfaces}, crate::runtime::resolver
// ============================================================================

//! ## Overview
//! The evaluator asks the backend about each flag in set order and stops at
//! the first disabled one. It never issues concurrent evaluations for one set:
//! once a denial is known the remaining answers no longer matter. Backend
//! failures propagate unchanged and are never reported as a denial.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FeatureName;
use crate::core::GateOutcome;
use crate::interfaces::FeatureEvaluationError;
use crate::interfaces::FeatureEvaluator;
use crate::runtime::resolver::ResolvedFlagSet;

// ============================================================================
// SECTION: Gate Trace
// ============================================================================

/// Observer for individual feature evaluations.
pub trait GateTrace {
    /// Called after the backend answers for a feature.
    fn on_feature_evaluated(&mut self, feature: &FeatureName, enabled: bool);
}

impl GateTrace for () {
    fn on_feature_evaluated(&mut self, _feature: &FeatureName, _enabled: bool) {}
}

/// One backend answer captured during evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCheck {
    /// Feature that was evaluated.
    pub feature: FeatureName,
    /// Backend answer.
    pub enabled: bool,
}

impl GateTrace for Vec<FeatureCheck> {
    fn on_feature_evaluated(&mut self, feature: &FeatureName, enabled: bool) {
        self.push(FeatureCheck {
            feature: feature.clone(),
            enabled,
        });
    }
}

// ============================================================================
// SECTION: Gate Evaluator
// ============================================================================

/// Evaluates resolved flag sets against a feature backend.
pub struct GateEvaluator<E> {
    /// Backend used to answer per-feature queries.
    evaluator: E,
}

impl<E: FeatureEvaluator> GateEvaluator<E> {
    /// Creates a gate evaluator over the provided backend.
    #[must_use]
    pub const fn new(evaluator: E) -> Self {
        Self {
            evaluator,
        }
    }

    /// Returns the backend.
    #[must_use]
    pub const fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Evaluates the flag set.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`FeatureEvaluationError`] unchanged.
    pub async fn evaluate(
        &self,
        flags: &ResolvedFlagSet,
    ) -> Result<GateOutcome, FeatureEvaluationError> {
        self.evaluate_with_trace(flags, &mut ()).await
    }

    /// Evaluates the flag set, reporting each backend answer to `trace`.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`FeatureEvaluationError`] unchanged.
    pub async fn evaluate_with_trace<T: GateTrace>(
        &self,
        flags: &ResolvedFlagSet,
        trace: &mut T,
    ) -> Result<GateOutcome, FeatureEvaluationError> {
        for feature in flags {
            let enabled = self.evaluator.is_enabled(feature).await?;
            trace.on_feature_evaluated(feature, enabled);
            if !enabled {
                return Ok(GateOutcome::Deny(feature.clone()));
            }
        }
        Ok(GateOutcome::Allow)
    }
}
