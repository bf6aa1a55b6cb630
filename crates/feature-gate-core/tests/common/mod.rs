// crates/feature-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Support
// Description: Scripted feature evaluator and declaration helpers.
// Purpose: Count and order backend calls made by the gate evaluator.
// Dependencies: feature-gate-core, async-trait
// ============================================================================

//! Shared fixtures for feature-gate-core integration tests.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared fixtures are not used by every test binary."
)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use feature_gate_core::FeatureEvaluationError;
use feature_gate_core::FeatureEvaluator;
use feature_gate_core::FeatureGateDeclaration;
use feature_gate_core::FeatureName;

/// Scripted backend answer.
#[derive(Debug, Clone)]
pub enum Answer {
    Enabled,
    Disabled,
    Fail(FeatureEvaluationError),
}

/// Evaluator returning scripted answers and recording every query.
///
/// Features without a scripted answer evaluate to disabled.
#[derive(Debug, Default)]
pub struct ScriptedEvaluator {
    answers: BTreeMap<String, Answer>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: &str, answer: Answer) -> Self {
        self.answers.insert(feature.to_string(), answer);
        self
    }

    pub fn enabled(self, feature: &str) -> Self {
        self.with(feature, Answer::Enabled)
    }

    pub fn disabled(self, feature: &str) -> Self {
        self.with(feature, Answer::Disabled)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FeatureEvaluator for ScriptedEvaluator {
    async fn is_enabled(&self, feature: &FeatureName) -> Result<bool, FeatureEvaluationError> {
        self.calls.lock().unwrap().push(feature.as_str().to_string());
        match self.answers.get(feature.as_str()) {
            Some(Answer::Enabled) => Ok(true),
            Some(Answer::Disabled) | None => Ok(false),
            Some(Answer::Fail(error)) => Err(error.clone()),
        }
    }
}

/// Builds a declaration from literal names.
pub fn gate(names: &[&str]) -> FeatureGateDeclaration {
    FeatureGateDeclaration::from_names(names.iter().copied()).unwrap()
}

/// Builds a feature name from a literal.
pub fn feature(name: &str) -> FeatureName {
    FeatureName::new(name).unwrap()
}
