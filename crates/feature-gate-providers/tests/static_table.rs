// crates/feature-gate-providers/tests/static_table.rs
// ============================================================================
// Module: Static Evaluator Tests
// Description: Table lookups, defaults, toggles, and config validation.
// Purpose: Ensure the static evaluator reflects its current table on every call.
// Dependencies: feature-gate-providers, feature-gate-core, tokio, toml
// ============================================================================

//! Static feature evaluator tests.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test setup uses unwraps for clarity."
)]

use std::collections::BTreeMap;

use feature_gate_core::DeclarationError;
use feature_gate_core::FeatureEvaluator;
use feature_gate_core::FeatureName;
use feature_gate_providers::StaticEvaluatorConfig;
use feature_gate_providers::StaticFeatureEvaluator;

fn feature(name: &str) -> FeatureName {
    FeatureName::new(name).unwrap()
}

#[tokio::test]
async fn answers_from_configured_table() {
    let config: StaticEvaluatorConfig = toml::from_str(
        r#"
        [flags]
        beta-api = true
        ingest-v2 = false
        "#,
    )
    .unwrap();
    let evaluator = StaticFeatureEvaluator::new(&config).unwrap();
    assert!(evaluator.is_enabled(&feature("beta-api")).await.unwrap());
    assert!(!evaluator.is_enabled(&feature("ingest-v2")).await.unwrap());
    assert!(!evaluator.is_enabled(&feature("unknown")).await.unwrap());
}

#[tokio::test]
async fn default_answer_applies_to_unknown_features() {
    let config = StaticEvaluatorConfig {
        flags: BTreeMap::from([("off".to_string(), false)]),
        default_enabled: true,
    };
    let evaluator = StaticFeatureEvaluator::new(&config).unwrap();
    assert!(evaluator.is_enabled(&feature("anything")).await.unwrap());
    assert!(!evaluator.is_enabled(&feature("off")).await.unwrap());
}

#[tokio::test]
async fn toggles_take_effect_on_next_call() {
    let evaluator = StaticFeatureEvaluator::from_flags([(feature("beta-api"), false)]);
    assert!(!evaluator.is_enabled(&feature("beta-api")).await.unwrap());
    evaluator.set(feature("beta-api"), true).unwrap();
    assert!(evaluator.is_enabled(&feature("beta-api")).await.unwrap());
    evaluator.clear(&feature("beta-api")).unwrap();
    assert!(!evaluator.is_enabled(&feature("beta-api")).await.unwrap());
}

#[tokio::test]
async fn lookups_are_case_sensitive() {
    let evaluator = StaticFeatureEvaluator::from_flags([(feature("Beta"), true)]);
    assert!(evaluator.is_enabled(&feature("Beta")).await.unwrap());
    assert!(!evaluator.is_enabled(&feature("beta")).await.unwrap());
}

#[test]
fn invalid_configured_name_is_rejected() {
    let config = StaticEvaluatorConfig {
        flags: BTreeMap::from([(String::new(), true)]),
        default_enabled: false,
    };
    assert_eq!(StaticFeatureEvaluator::new(&config).err(), Some(DeclarationError::EmptyFeatureName));
}

#[test]
fn unknown_config_fields_are_rejected() {
    let result: Result<StaticEvaluatorConfig, _> = toml::from_str("flagz = {}");
    assert!(result.is_err());
}
