// crates/feature-gate-grpc/src/audit.rs
// ============================================================================
// Module: Gate Audit Logging
// Description: Structured audit events for feature gate decisions.
// Purpose: Emit one JSON line per gated call without hard dependencies.
// Dependencies: feature-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every gate decision produces a [`GateDecisionEvent`]: which endpoint and
//! request type were checked, how many features resolved and were evaluated,
//! the outcome, and how long the decision took. Sinks write JSON lines so
//! deployments can route them to their own log pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecisionOutcome {
    /// The handler was invoked.
    Allowed,
    /// A required feature was disabled.
    Denied,
    /// The backend failed before a decision.
    Error,
}

/// Gate decision audit payload.
#[derive(Debug, Clone, Serialize)]
pub struct GateDecisionEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Endpoint path of the call.
    pub endpoint: String,
    /// Request message type name.
    pub request_type: &'static str,
    /// Whether any declaration applied to the call.
    pub gated: bool,
    /// Distinct features resolved for the call.
    pub feature_count: usize,
    /// Backend answers received before the decision.
    pub evaluations: usize,
    /// Decision outcome.
    pub outcome: GateDecisionOutcome,
    /// Disabled feature for denials.
    pub denied_feature: Option<String>,
    /// Error label for failed decisions.
    pub error_kind: Option<&'static str>,
    /// Decision latency in microseconds.
    pub elapsed_us: u128,
}

/// Inputs required to construct a gate decision event.
pub struct GateDecisionEventParams {
    /// Endpoint path of the call.
    pub endpoint: String,
    /// Request message type name.
    pub request_type: &'static str,
    /// Whether any declaration applied to the call.
    pub gated: bool,
    /// Distinct features resolved for the call.
    pub feature_count: usize,
    /// Backend answers received before the decision.
    pub evaluations: usize,
    /// Decision outcome.
    pub outcome: GateDecisionOutcome,
    /// Disabled feature for denials.
    pub denied_feature: Option<String>,
    /// Error label for failed decisions.
    pub error_kind: Option<&'static str>,
    /// Decision latency in microseconds.
    pub elapsed_us: u128,
}

impl GateDecisionEvent {
    /// Creates a new decision event with a consistent timestamp.
    #[must_use]
    pub fn new(params: GateDecisionEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "feature_gate_decision",
            timestamp_ms,
            endpoint: params.endpoint,
            request_type: params.request_type,
            gated: params.gated,
            feature_count: params.feature_count,
            evaluations: params.evaluations,
            outcome: params.outcome,
            denied_feature: params.denied_feature,
            error_kind: params.error_kind,
            elapsed_us: params.elapsed_us,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for gate decisions.
pub trait GateAuditSink: Send + Sync {
    /// Records a decision event.
    fn record(&self, event: &GateDecisionEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrGateAuditSink;

impl GateAuditSink for StderrGateAuditSink {
    fn record(&self, event: &GateDecisionEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileGateAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileGateAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl GateAuditSink for FileGateAuditSink {
    fn record(&self, event: &GateDecisionEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopGateAuditSink;

impl GateAuditSink for NoopGateAuditSink {
    fn record(&self, _event: &GateDecisionEvent) {}
}
