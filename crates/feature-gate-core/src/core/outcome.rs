// crates/feature-gate-core/src/core/outcome.rs
// ============================================================================
// Module: Feature Gate Outcomes
// Description: Allow/deny result of a gating decision.
// Purpose: Provide the two-variant outcome consumed by transport adapters.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! [`GateOutcome`] is the only result of a successful gate evaluation. Backend
//! failures are not outcomes; they travel as errors beside it.

use crate::core::identifiers::FeatureName;

/// Result of evaluating a resolved flag set.
///
/// # Invariants
/// - `Deny` carries the first disabled feature in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every governing feature is enabled (or none apply).
    Allow,
    /// The named feature is disabled.
    Deny(FeatureName),
}

impl GateOutcome {
    /// Returns true for [`GateOutcome::Allow`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the denied feature, if any.
    #[must_use]
    pub const fn denied_feature(&self) -> Option<&FeatureName> {
        match self {
            Self::Allow => None,
            Self::Deny(feature) => Some(feature),
        }
    }
}
