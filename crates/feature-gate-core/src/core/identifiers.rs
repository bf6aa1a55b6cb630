// crates/feature-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Feature Gate Identifiers
// Description: Feature names, service names, endpoint paths, request types.
// Purpose: Provide strongly typed, validated identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are validated once at construction and are otherwise opaque.
//! Feature names are compared by exact string match: they are never trimmed,
//! case-folded, or otherwise normalized.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::TypeId;
use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::declaration::DeclarationError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a feature name in bytes.
pub const MAX_FEATURE_NAME_LENGTH: usize = 256;
/// Maximum length of a service or method name in bytes.
pub const MAX_SERVICE_NAME_LENGTH: usize = 256;

// ============================================================================
// SECTION: Feature Name
// ============================================================================

/// Name of a feature flag.
///
/// # Invariants
/// - Non-empty, at most [`MAX_FEATURE_NAME_LENGTH`] bytes.
/// - Contains no control characters.
/// - Stored verbatim; equality is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureName(String);

impl FeatureName {
    /// Creates a validated feature name.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] when the name is empty, too long, or
    /// contains control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DeclarationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DeclarationError::EmptyFeatureName);
        }
        if name.len() > MAX_FEATURE_NAME_LENGTH {
            return Err(DeclarationError::FeatureNameTooLong {
                max: MAX_FEATURE_NAME_LENGTH,
            });
        }
        if name.chars().any(char::is_control) {
            return Err(DeclarationError::FeatureNameControlCharacter {
                name: name.escape_default().to_string(),
            });
        }
        Ok(Self(name))
    }

    /// Returns the feature name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for FeatureName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FeatureName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FeatureName {
    type Error = DeclarationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FeatureName {
    type Error = DeclarationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureName> for String {
    fn from(value: FeatureName) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Service Name
// ============================================================================

/// Fully qualified RPC service name (for example `billing.v1.Billing`).
///
/// # Invariants
/// - Non-empty, at most [`MAX_SERVICE_NAME_LENGTH`] bytes.
/// - Contains no `/`, whitespace, or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::InvalidServiceName`] when validation fails.
    pub fn new(name: impl Into<String>) -> Result<Self, DeclarationError> {
        let name = name.into();
        if let Err(reason) = validate_segment(&name) {
            return Err(DeclarationError::InvalidServiceName {
                name: name.escape_default().to_string(),
                reason,
            });
        }
        Ok(Self(name))
    }

    /// Returns the service name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for ServiceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServiceName {
    type Error = DeclarationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(value: ServiceName) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Endpoint Path
// ============================================================================

/// RPC endpoint path in `/package.Service/Method` form.
///
/// # Invariants
/// - Starts with `/` and contains exactly one further `/`.
/// - Both the service and method segments satisfy [`ServiceName`] rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointPath {
    /// Full path text.
    path: String,
    /// Byte offset of the `/` separating service and method.
    split: usize,
}

impl EndpointPath {
    /// Parses an endpoint path of the form `/package.Service/Method`.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::InvalidEndpointPath`] when the path is malformed.
    pub fn parse(path: impl Into<String>) -> Result<Self, DeclarationError> {
        let path = path.into();
        let invalid = |reason: &'static str| DeclarationError::InvalidEndpointPath {
            path: path.escape_default().to_string(),
            reason,
        };
        let Some(rest) = path.strip_prefix('/') else {
            return Err(invalid("path must start with '/'"));
        };
        let Some((service, method)) = rest.split_once('/') else {
            return Err(invalid("path must contain a service and a method"));
        };
        validate_segment(service).map_err(invalid)?;
        validate_segment(method).map_err(invalid)?;
        let split = service.len() + 1;
        Ok(Self {
            path,
            split,
        })
    }

    /// Builds an endpoint path from a service and a method name.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::InvalidEndpointPath`] when the method is malformed.
    pub fn new(service: &ServiceName, method: &str) -> Result<Self, DeclarationError> {
        Self::parse(format!("/{service}/{method}"))
    }

    /// Returns the full endpoint path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Returns the service segment.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.path[1 .. self.split]
    }

    /// Returns the method segment.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.path[self.split + 1 ..]
    }
}

impl fmt::Display for EndpointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}

impl TryFrom<String> for EndpointPath {
    type Error = DeclarationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for EndpointPath {
    type Error = DeclarationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EndpointPath> for String {
    fn from(value: EndpointPath) -> Self {
        value.path
    }
}

// ============================================================================
// SECTION: Request Type
// ============================================================================

/// Descriptor for a request message type.
///
/// # Invariants
/// - Identity is the [`TypeId`]; the name is informational only.
#[derive(Debug, Clone, Copy)]
pub struct RequestType {
    /// Type identifier used as the registry key.
    id: TypeId,
    /// Type name used for logging.
    name: &'static str,
}

impl RequestType {
    /// Returns the descriptor for `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the type identifier.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for RequestType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RequestType {}

impl std::hash::Hash for RequestType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a service or method segment.
fn validate_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("segment must be non-empty");
    }
    if segment.len() > MAX_SERVICE_NAME_LENGTH {
        return Err("segment exceeds max length");
    }
    if segment.contains('/') {
        return Err("segment must not contain '/'");
    }
    if segment.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return Err("segment must not contain whitespace or control characters");
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Tests assert on fixed inputs."
)]
mod tests {
    use super::*;

    #[test]
    fn feature_name_is_case_sensitive_and_untrimmed() {
        let lower = FeatureName::new("beta-api").unwrap();
        let upper = FeatureName::new("Beta-API").unwrap();
        let padded = FeatureName::new(" beta-api").unwrap();
        assert_ne!(lower, upper);
        assert_ne!(lower, padded);
        assert_eq!(padded.as_str(), " beta-api");
    }

    #[test]
    fn feature_name_rejects_empty_and_control_characters() {
        assert_eq!(FeatureName::new(""), Err(DeclarationError::EmptyFeatureName));
        assert!(matches!(
            FeatureName::new("beta\napi"),
            Err(DeclarationError::FeatureNameControlCharacter { .. })
        ));
        let long = "f".repeat(MAX_FEATURE_NAME_LENGTH + 1);
        assert!(matches!(FeatureName::new(long), Err(DeclarationError::FeatureNameTooLong { .. })));
    }

    #[test]
    fn endpoint_path_splits_service_and_method() {
        let path = EndpointPath::parse("/ingest.v2.Ingest/Upload").unwrap();
        assert_eq!(path.service(), "ingest.v2.Ingest");
        assert_eq!(path.method(), "Upload");
        assert_eq!(path.as_str(), "/ingest.v2.Ingest/Upload");
    }

    #[test]
    fn endpoint_path_rejects_malformed_paths() {
        for raw in ["", "ingest.Ingest/Upload", "/ingest.Ingest", "/ingest.Ingest/", "//Upload", "/a/b/c", "/a b/c"] {
            assert!(EndpointPath::parse(raw).is_err(), "expected {raw:?} to be rejected");
        }
    }

    #[test]
    fn endpoint_path_from_service_name() {
        let service = ServiceName::new("billing.Billing").unwrap();
        let path = EndpointPath::new(&service, "Refund").unwrap();
        assert_eq!(path.as_str(), "/billing.Billing/Refund");
    }

    #[test]
    fn wire_forms_are_validated_on_deserialize() {
        let name: FeatureName = serde_json::from_str("\"beta-api\"").unwrap();
        assert_eq!(name.as_str(), "beta-api");
        assert!(serde_json::from_str::<FeatureName>("\"\"").is_err());
        let path: EndpointPath = serde_json::from_str("\"/a.A/B\"").unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"/a.A/B\"");
        assert!(serde_json::from_str::<EndpointPath>("\"a.A/B\"").is_err());
    }

    #[test]
    fn request_type_identity_is_type_id() {
        struct Alpha;
        struct Beta;
        assert_eq!(RequestType::of::<Alpha>(), RequestType::of::<Alpha>());
        assert_ne!(RequestType::of::<Alpha>(), RequestType::of::<Beta>());
        assert!(RequestType::of::<Alpha>().name().ends_with("Alpha"));
    }
}
