// crates/feature-gate-core/src/core/declaration.rs
// ============================================================================
// Module: Feature Gate Declarations
// Description: Named feature lists attached to request types and endpoints.
// Purpose: Model gate declarations and their construction errors.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`FeatureGateDeclaration`] is an ordered list of feature names attached to
//! a request message type, a service, or a single endpoint. Several
//! declarations may target the same key; the resolver merges them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::FeatureName;

// ============================================================================
// SECTION: Declaration
// ============================================================================

/// Ordered list of feature names that gate a request type or endpoint.
///
/// # Invariants
/// - Every entry is a validated [`FeatureName`].
/// - Order is preserved as declared; duplicates are permitted and collapse at
///   resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureGateDeclaration {
    /// Declared feature names.
    features: Vec<FeatureName>,
}

impl FeatureGateDeclaration {
    /// Creates a declaration from already validated feature names.
    #[must_use]
    pub const fn new(features: Vec<FeatureName>) -> Self {
        Self {
            features,
        }
    }

    /// Creates a declaration by validating raw feature names.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] for the first invalid name.
    pub fn from_names<I, S>(names: I) -> Result<Self, DeclarationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features = names.into_iter().map(FeatureName::new).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(features))
    }

    /// Returns the declared feature names in declaration order.
    #[must_use]
    pub fn features(&self) -> &[FeatureName] {
        &self.features
    }

    /// Returns the number of declared names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true when the declaration lists no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Malformed or conflicting gate declarations.
///
/// # Invariants
/// - These are setup-time failures; a registry that built successfully never
///   produces them at call time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Feature name was empty.
    #[error("feature name must be non-empty")]
    EmptyFeatureName,
    /// Feature name exceeded the length limit.
    #[error("feature name exceeds {max} bytes")]
    FeatureNameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Feature name contained control characters.
    #[error("feature name `{name}` contains control characters")]
    FeatureNameControlCharacter {
        /// Escaped feature name.
        name: String,
    },
    /// Service name failed validation.
    #[error("invalid service name `{name}`: {reason}")]
    InvalidServiceName {
        /// Escaped service name.
        name: String,
        /// Validation failure reason.
        reason: &'static str,
    },
    /// Endpoint path failed validation.
    #[error("invalid endpoint path `{path}`: {reason}")]
    InvalidEndpointPath {
        /// Escaped endpoint path.
        path: String,
        /// Validation failure reason.
        reason: &'static str,
    },
    /// A single declaration listed more features than the limit allows.
    #[error("declaration for {target} lists {count} features, limit is {max}")]
    TooManyFeatures {
        /// Declaration target label.
        target: String,
        /// Number of declared features.
        count: usize,
        /// Maximum permitted features per declaration.
        max: usize,
    },
    /// Declaration limits were invalid.
    #[error("max_features_per_declaration must be greater than zero")]
    InvalidLimits,
}
