// crates/feature-gate-core/src/runtime/resolver.rs
// ============================================================================
// Module: Flag-Set Resolver
// Description: Merge type-level and endpoint-level gate declarations.
// Purpose: Produce the deduplicated, ordered flag set governing one call.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Resolution is a pure union. Request-type declarations are read first, then
//! the endpoint metadata (service scope, then method scope). Each declaration
//! is flattened in order and the first occurrence of a name wins, so the set
//! order is the stable discovery order and deny results are reproducible.
//!
//! Whether any declaration applied at all is reported separately from the
//! set contents: a call with no declarations is [`FlagResolution::Ungated`],
//! while declarations that list no names yield an empty
//! [`FlagResolution::Gated`] set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FeatureGateDeclaration;
use crate::core::FeatureName;

// ============================================================================
// SECTION: Resolved Flag Set
// ============================================================================

/// Duplicate-free, ordered set of feature names for one call.
///
/// # Invariants
/// - No two entries are equal.
/// - Iteration order is first-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFlagSet {
    /// Distinct features in discovery order.
    features: Vec<FeatureName>,
}

impl ResolvedFlagSet {
    /// Creates an empty flag set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    /// Inserts a feature if absent. Returns true when it was added.
    pub fn insert(&mut self, feature: &FeatureName) -> bool {
        if self.features.contains(feature) {
            return false;
        }
        self.features.push(feature.clone());
        true
    }

    /// Returns true when the set contains the named feature.
    #[must_use]
    pub fn contains(&self, feature: &str) -> bool {
        self.features.iter().any(|entry| entry.as_str() == feature)
    }

    /// Returns the number of distinct features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true when no features are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates features in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, FeatureName> {
        self.features.iter()
    }

    /// Returns the features as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[FeatureName] {
        &self.features
    }
}

impl<'a> IntoIterator for &'a ResolvedFlagSet {
    type Item = &'a FeatureName;
    type IntoIter = std::slice::Iter<'a, FeatureName>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl FromIterator<FeatureName> for ResolvedFlagSet {
    fn from_iter<I: IntoIterator<Item = FeatureName>>(iter: I) -> Self {
        let mut set = Self::new();
        for feature in iter {
            set.insert(&feature);
        }
        set
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Result of resolving declarations for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagResolution {
    /// No declaration applies to the call.
    Ungated,
    /// At least one declaration applies; the set may still be empty.
    Gated(ResolvedFlagSet),
}

impl FlagResolution {
    /// Returns true when at least one declaration applied.
    #[must_use]
    pub const fn is_gated(&self) -> bool {
        matches!(self, Self::Gated(_))
    }

    /// Returns the resolved set, or an empty set when ungated.
    #[must_use]
    pub fn into_flags(self) -> ResolvedFlagSet {
        match self {
            Self::Ungated => ResolvedFlagSet::new(),
            Self::Gated(flags) => flags,
        }
    }

    /// Returns the number of resolved features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        match self {
            Self::Ungated => 0,
            Self::Gated(flags) => flags.len(),
        }
    }
}

/// Declarations attached to one endpoint.
///
/// # Invariants
/// - Service-scope declarations precede method-scope declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointMetadata<'a> {
    /// Declarations inherited from the containing service.
    service: &'a [FeatureGateDeclaration],
    /// Declarations on the method itself.
    method: &'a [FeatureGateDeclaration],
}

impl<'a> EndpointMetadata<'a> {
    /// Creates endpoint metadata from service and method declarations.
    #[must_use]
    pub const fn new(
        service: &'a [FeatureGateDeclaration],
        method: &'a [FeatureGateDeclaration],
    ) -> Self {
        Self {
            service,
            method,
        }
    }

    /// Iterates declarations in metadata order.
    pub fn iter(&self) -> impl Iterator<Item = &'a FeatureGateDeclaration> + use<'a> {
        self.service.iter().chain(self.method.iter())
    }

    /// Returns true when the endpoint carries no declarations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.service.is_empty() && self.method.is_empty()
    }
}

/// Resolves the flag set governing a call.
///
/// Resolution has no failure mode: declarations are validated when the
/// registry is built, and the union of valid declarations is always valid.
#[must_use]
pub fn resolve(
    type_declarations: &[FeatureGateDeclaration],
    endpoint: &EndpointMetadata<'_>,
) -> FlagResolution {
    if type_declarations.is_empty() && endpoint.is_empty() {
        return FlagResolution::Ungated;
    }
    let mut flags = ResolvedFlagSet::new();
    for declaration in type_declarations.iter().chain(endpoint.iter()) {
        for feature in declaration.features() {
            flags.insert(feature);
        }
    }
    FlagResolution::Gated(flags)
}
