// crates/feature-gate-core/tests/resolver.rs
// ============================================================================
// Module: Flag-Set Resolver Tests
// Description: Union, deduplication, ordering, and emptiness behavior.
// Purpose: Ensure resolution is a pure, deterministic union of declarations.
// Dependencies: feature-gate-core
// ============================================================================

//! Flag-set resolver tests.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test setup uses unwraps for clarity."
)]

mod common;

use std::collections::BTreeSet;

use common::gate;
use feature_gate_core::EndpointMetadata;
use feature_gate_core::FlagResolution;
use feature_gate_core::ResolvedFlagSet;
use feature_gate_core::resolve;

fn names(flags: &ResolvedFlagSet) -> Vec<&str> {
    flags.iter().map(|feature| feature.as_str()).collect()
}

fn gated(resolution: FlagResolution) -> ResolvedFlagSet {
    match resolution {
        FlagResolution::Gated(flags) => flags,
        FlagResolution::Ungated => panic!("expected a gated resolution"),
    }
}

// ============================================================================
// SECTION: Union
// ============================================================================

#[test]
fn union_collapses_duplicates_across_sources() {
    let type_level = [gate(&["A", "B"])];
    let method_level = [gate(&["B", "C"])];
    let endpoint = EndpointMetadata::new(&[], &method_level);
    let flags = gated(resolve(&type_level, &endpoint));
    assert_eq!(names(&flags), vec!["A", "B", "C"]);
}

#[test]
fn union_contents_do_not_depend_on_source_order() {
    let first = [gate(&["A", "B"])];
    let second = [gate(&["B", "C"])];
    let forward = gated(resolve(&first, &EndpointMetadata::new(&[], &second)));
    let reverse = gated(resolve(&second, &EndpointMetadata::new(&[], &first)));
    let forward: BTreeSet<_> = forward.iter().cloned().collect();
    let reverse: BTreeSet<_> = reverse.iter().cloned().collect();
    assert_eq!(forward, reverse);
    assert_eq!(forward.len(), 3);
}

#[test]
fn order_is_type_then_service_then_method() {
    let type_level = [gate(&["type-a"]), gate(&["type-b"])];
    let service_level = [gate(&["svc"])];
    let method_level = [gate(&["method", "type-a"])];
    let endpoint = EndpointMetadata::new(&service_level, &method_level);
    let flags = gated(resolve(&type_level, &endpoint));
    assert_eq!(names(&flags), vec!["type-a", "type-b", "svc", "method"]);
}

#[test]
fn names_are_matched_exactly() {
    let type_level = [gate(&["beta", "Beta", "beta "])];
    let flags = gated(resolve(&type_level, &EndpointMetadata::default()));
    assert_eq!(flags.len(), 3);
    assert!(flags.contains("Beta"));
    assert!(!flags.contains("BETA"));
}

// ============================================================================
// SECTION: Emptiness
// ============================================================================

#[test]
fn no_declarations_is_ungated() {
    let resolution = resolve(&[], &EndpointMetadata::default());
    assert_eq!(resolution, FlagResolution::Ungated);
    assert!(!resolution.is_gated());
    assert!(resolution.into_flags().is_empty());
}

#[test]
fn empty_declaration_is_gated_with_empty_set() {
    let method_level = [gate(&[])];
    let endpoint = EndpointMetadata::new(&[], &method_level);
    let resolution = resolve(&[], &endpoint);
    assert!(resolution.is_gated());
    assert_eq!(resolution.feature_count(), 0);
}

// ============================================================================
// SECTION: Size
// ============================================================================

#[test]
fn merged_set_is_never_truncated() {
    let type_names: Vec<String> = (0 .. 40).map(|index| format!("type-{index}")).collect();
    let method_names: Vec<String> = (0 .. 40).map(|index| format!("method-{index}")).collect();
    let type_refs: Vec<&str> = type_names.iter().map(String::as_str).collect();
    let method_refs: Vec<&str> = method_names.iter().map(String::as_str).collect();
    let type_level = [gate(&type_refs)];
    let method_level = [gate(&method_refs)];
    let flags = gated(resolve(&type_level, &EndpointMetadata::new(&[], &method_level)));
    assert_eq!(flags.len(), 80);
    assert_eq!(flags.as_slice()[0].as_str(), "type-0");
    assert_eq!(flags.as_slice()[79].as_str(), "method-39");
}

#[test]
fn duplicates_collapse_within_and_across_declarations() {
    let type_level = [gate(&["a", "b", "a"])];
    let method_level = [gate(&["b", "a"])];
    let flags = gated(resolve(&type_level, &EndpointMetadata::new(&[], &method_level)));
    assert_eq!(names(&flags), vec!["a", "b"]);
}
