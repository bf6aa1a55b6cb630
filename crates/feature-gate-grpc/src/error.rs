// crates/feature-gate-grpc/src/error.rs
// ============================================================================
// Module: Gate Errors
// Description: Call-time gate failures and their gRPC status mapping.
// Purpose: Keep a denial distinct from a backend failure.
// Dependencies: feature-gate-core, thiserror, tonic
// ============================================================================

//! ## Overview
//! A denial becomes `NOT_FOUND` with the message `Feature <name> is disabled`.
//! Backend failures keep their kind and message; they are never reported as a
//! denial.

// ============================================================================
// SECTION: Imports
// ============================================================================

use feature_gate_core::FeatureEvaluationError;
use feature_gate_core::FeatureName;
use thiserror::Error;
use tonic::Status;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a gated call does not reach its handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// A required feature is disabled.
    #[error("Feature {feature} is disabled")]
    FeatureDisabled {
        /// First disabled feature in resolution order.
        feature: FeatureName,
    },
    /// The feature backend failed.
    #[error(transparent)]
    Evaluation(#[from] FeatureEvaluationError),
}

impl GateError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FeatureDisabled {
                ..
            } => "feature_disabled",
            Self::Evaluation(error) => error.kind(),
        }
    }

    /// Returns the disabled feature for denials.
    #[must_use]
    pub const fn denied_feature(&self) -> Option<&FeatureName> {
        match self {
            Self::FeatureDisabled {
                feature,
            } => Some(feature),
            Self::Evaluation(_) => None,
        }
    }
}

impl From<GateError> for Status {
    fn from(error: GateError) -> Self {
        match error {
            GateError::FeatureDisabled {
                ..
            } => Self::not_found(error.to_string()),
            GateError::Evaluation(FeatureEvaluationError::Unavailable(message)) => {
                Self::unavailable(message)
            }
            GateError::Evaluation(FeatureEvaluationError::Timeout(message)) => {
                Self::deadline_exceeded(message)
            }
            GateError::Evaluation(FeatureEvaluationError::Backend(message)) => {
                Self::internal(message)
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
