// crates/feature-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Declaration Registry
// Description: Declaration table keyed by request type, service, and endpoint.
// Purpose: Replace runtime attribute reflection with an explicit lookup table.
// Dependencies: crate::core, crate::runtime::resolver
// ============================================================================

//! ## Overview
//! The registry is populated once at server setup and is read-only afterward.
//! Request types are keyed by [`std::any::TypeId`]; endpoints by their full
//! path; services by their fully qualified name. Endpoint lookups include the
//! declarations of the containing service, mirroring how method-level and
//! service-level access attributes compose.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::TypeId;
use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::core::DeclarationError;
use crate::core::EndpointPath;
use crate::core::FeatureGateDeclaration;
use crate::core::RequestType;
use crate::core::ServiceName;
use crate::runtime::resolver::EndpointMetadata;
use crate::runtime::resolver::FlagResolution;
use crate::runtime::resolver::resolve;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum number of features a single declaration may list.
pub const DEFAULT_MAX_FEATURES_PER_DECLARATION: usize = 64;

/// Hard limits checked when the registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationLimits {
    /// Maximum features listed by one declaration.
    pub max_features_per_declaration: usize,
}

impl Default for DeclarationLimits {
    fn default() -> Self {
        Self {
            max_features_per_declaration: DEFAULT_MAX_FEATURES_PER_DECLARATION,
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Declarations registered for one request type.
#[derive(Debug, Clone)]
struct TypeDeclarations {
    /// Type name, kept for diagnostics.
    name: &'static str,
    /// Declarations in registration order.
    declarations: Vec<FeatureGateDeclaration>,
}

/// Read-only gate declaration table.
///
/// # Invariants
/// - Every declaration was validated against `limits` at build time.
/// - Declarations for a key keep their registration order.
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    /// Request-type declarations keyed by type identifier.
    types: HashMap<TypeId, TypeDeclarations>,
    /// Service-scope declarations keyed by service name.
    services: BTreeMap<ServiceName, Vec<FeatureGateDeclaration>>,
    /// Method-scope declarations keyed by endpoint path.
    endpoints: BTreeMap<EndpointPath, Vec<FeatureGateDeclaration>>,
    /// Limits the declarations were checked against.
    limits: DeclarationLimits,
}

impl DeclarationRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> DeclarationRegistryBuilder {
        DeclarationRegistryBuilder::default()
    }

    /// Returns the declaration limits.
    #[must_use]
    pub const fn limits(&self) -> DeclarationLimits {
        self.limits
    }

    /// Returns the declarations registered for a request type.
    #[must_use]
    pub fn type_declarations(&self, request_type: RequestType) -> &[FeatureGateDeclaration] {
        self.types.get(&request_type.id()).map_or(&[][..], |entry| entry.declarations.as_slice())
    }

    /// Returns the metadata attached to an endpoint, service scope included.
    #[must_use]
    pub fn endpoint_metadata(&self, endpoint: &EndpointPath) -> EndpointMetadata<'_> {
        let service = self.services.get(endpoint.service()).map_or(&[][..], Vec::as_slice);
        let method = self.endpoints.get(endpoint).map_or(&[][..], Vec::as_slice);
        EndpointMetadata::new(service, method)
    }

    /// Resolves the flag set for a call.
    #[must_use]
    pub fn resolve(&self, request_type: RequestType, endpoint: &EndpointPath) -> FlagResolution {
        resolve(self.type_declarations(request_type), &self.endpoint_metadata(endpoint))
    }

    /// Resolves the flag set for a call whose request message is `Req`.
    #[must_use]
    pub fn resolve_for<Req: ?Sized + 'static>(&self, endpoint: &EndpointPath) -> FlagResolution {
        self.resolve(RequestType::of::<Req>(), endpoint)
    }

    /// Returns the names of request types that carry declarations, sorted.
    #[must_use]
    pub fn declared_request_types(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.types.values().map(|entry| entry.name).collect();
        names.sort_unstable();
        names
    }

    /// Returns true when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.services.is_empty() && self.endpoints.is_empty()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`DeclarationRegistry`].
#[derive(Debug, Default)]
pub struct DeclarationRegistryBuilder {
    /// Registry under construction.
    registry: DeclarationRegistry,
}

impl DeclarationRegistryBuilder {
    /// Declares gates on the request message type `T`.
    #[must_use]
    pub fn request_type<T: ?Sized + 'static>(mut self, declaration: FeatureGateDeclaration) -> Self {
        let request_type = RequestType::of::<T>();
        self.registry
            .types
            .entry(request_type.id())
            .or_insert_with(|| TypeDeclarations {
                name: request_type.name(),
                declarations: Vec::new(),
            })
            .declarations
            .push(declaration);
        self
    }

    /// Declares gates on every method of a service.
    #[must_use]
    pub fn service(mut self, service: ServiceName, declaration: FeatureGateDeclaration) -> Self {
        self.registry.services.entry(service).or_default().push(declaration);
        self
    }

    /// Declares gates on a single endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointPath, declaration: FeatureGateDeclaration) -> Self {
        self.registry.endpoints.entry(endpoint).or_default().push(declaration);
        self
    }

    /// Overrides the declaration limits.
    #[must_use]
    pub fn limits(mut self, limits: DeclarationLimits) -> Self {
        self.registry.limits = limits;
        self
    }

    /// Validates and returns the registry.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] when limits are invalid or a single
    /// declaration lists more features than the limit allows.
    pub fn build(self) -> Result<DeclarationRegistry, DeclarationError> {
        let registry = self.registry;
        let max = registry.limits.max_features_per_declaration;
        if max == 0 {
            return Err(DeclarationError::InvalidLimits);
        }
        for entry in registry.types.values() {
            check_declarations(entry.name, &entry.declarations, max)?;
        }
        for (service, declarations) in &registry.services {
            check_declarations(service.as_str(), declarations, max)?;
        }
        for (endpoint, declarations) in &registry.endpoints {
            check_declarations(endpoint.as_str(), declarations, max)?;
        }
        Ok(registry)
    }
}

/// Rejects declarations listing more features than the limit allows.
fn check_declarations(
    target: &str,
    declarations: &[FeatureGateDeclaration],
    max: usize,
) -> Result<(), DeclarationError> {
    for declaration in declarations {
        if declaration.len() > max {
            return Err(DeclarationError::TooManyFeatures {
                target: target.to_string(),
                count: declaration.len(),
                max,
            });
        }
    }
    Ok(())
}
