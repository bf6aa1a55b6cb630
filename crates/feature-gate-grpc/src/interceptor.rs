// crates/feature-gate-grpc/src/interceptor.rs
// ============================================================================
// Module: Feature Gate Interceptor
// Description: One gate decision shared by four call-shape adapters.
// Purpose: Run the gate exactly once per call, before the handler.
// Dependencies: feature-gate-core, tokio-stream, tonic
// ============================================================================

//! ## Overview
//! [`FeatureGateInterceptor::ensure_enabled`] is the only place a decision is
//! made. The adapters differ only in the request and response shapes they
//! accept: each calls the decision first and then hands the original request
//! to the handler, or drops the handler uninvoked on rejection. Streaming
//! adapters never poll the inbound stream, so a rejected call consumes no
//! request messages.
//!
//! Dropping an adapter future while the backend is still answering abandons
//! the evaluation; the handler future is never constructed.
//!
//! ## Usage
//! The gate only sees calls routed through an adapter. Every handler of a
//! gated service must call exactly one adapter with its own [`EndpointPath`]:
//! a handler that skips the adapter runs ungated, and a handler that passes
//! another method's path is gated by that method's declarations. Keep one
//! parsed path per method next to the handler, as below.
//!
//! ```ignore
//! async fn export(&self, request: Request<ExportRequest>) -> Result<Response<ExportReply>, Status> {
//!     self.gate.unary(&self.export_path, request, |request| self.export_inner(request)).await
//! }
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use feature_gate_core::DeclarationRegistry;
use feature_gate_core::EndpointPath;
use feature_gate_core::FeatureCheck;
use feature_gate_core::FeatureEvaluator;
use feature_gate_core::GateEvaluator;
use feature_gate_core::GateOutcome;
use feature_gate_core::RequestType;
use tokio_stream::Stream;
use tonic::Request;
use tonic::Response;
use tonic::Status;

use crate::audit::GateAuditSink;
use crate::audit::GateDecisionEvent;
use crate::audit::GateDecisionEventParams;
use crate::audit::GateDecisionOutcome;
use crate::audit::NoopGateAuditSink;
use crate::error::GateError;

// ============================================================================
// SECTION: Interceptor
// ============================================================================

/// Feature gate shared by all service implementations of a server.
///
/// # Invariants
/// - Holds only shared immutable state; concurrent calls do not coordinate.
/// - Each adapter invocation performs exactly one decision.
pub struct FeatureGateInterceptor<E> {
    /// Declarations for request types, services, and endpoints.
    registry: Arc<DeclarationRegistry>,
    /// Evaluator over the feature backend.
    gate: Arc<GateEvaluator<E>>,
    /// Decision audit sink.
    audit: Arc<dyn GateAuditSink>,
}

impl<E> Clone for FeatureGateInterceptor<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            gate: Arc::clone(&self.gate),
            audit: Arc::clone(&self.audit),
        }
    }
}

impl<E: FeatureEvaluator> FeatureGateInterceptor<E> {
    /// Creates an interceptor that does not log decisions.
    #[must_use]
    pub fn new(registry: DeclarationRegistry, evaluator: E) -> Self {
        Self {
            registry: Arc::new(registry),
            gate: Arc::new(GateEvaluator::new(evaluator)),
            audit: Arc::new(NoopGateAuditSink),
        }
    }

    /// Replaces the decision audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn GateAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the declaration registry.
    #[must_use]
    pub fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    /// Returns the feature backend.
    #[must_use]
    pub fn evaluator(&self) -> &E {
        self.gate.evaluator()
    }

    /// Decides whether a call of request type `Req` on `endpoint` may proceed.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::FeatureDisabled`] for the first disabled feature,
    /// or the backend failure that prevented a decision.
    pub async fn ensure_enabled<Req: ?Sized + 'static>(
        &self,
        endpoint: &EndpointPath,
    ) -> Result<(), GateError> {
        let started = Instant::now();
        let request_type = RequestType::of::<Req>();
        let mut record = DecisionRecord::default();
        let result = self.decide(request_type, endpoint, &mut record).await;
        let (outcome, error_kind) = match &result {
            Ok(()) => (GateDecisionOutcome::Allowed, None),
            Err(GateError::FeatureDisabled {
                ..
            }) => (GateDecisionOutcome::Denied, None),
            Err(error) => (GateDecisionOutcome::Error, Some(error.kind())),
        };
        self.audit.record(&GateDecisionEvent::new(GateDecisionEventParams {
            endpoint: endpoint.as_str().to_string(),
            request_type: request_type.name(),
            gated: record.gated,
            feature_count: record.feature_count,
            evaluations: record.checks.len(),
            outcome,
            denied_feature: result
                .as_ref()
                .err()
                .and_then(GateError::denied_feature)
                .map(|feature| feature.as_str().to_string()),
            error_kind,
            elapsed_us: started.elapsed().as_micros(),
        }));
        result
    }

    /// Resolves and evaluates the call's flag set.
    async fn decide(
        &self,
        request_type: RequestType,
        endpoint: &EndpointPath,
        record: &mut DecisionRecord,
    ) -> Result<(), GateError> {
        let resolution = self.registry.resolve(request_type, endpoint);
        record.gated = resolution.is_gated();
        record.feature_count = resolution.feature_count();
        let flags = resolution.into_flags();
        match self.gate.evaluate_with_trace(&flags, &mut record.checks).await? {
            GateOutcome::Allow => Ok(()),
            GateOutcome::Deny(feature) => Err(GateError::FeatureDisabled {
                feature,
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Call-shape adapters
    // ------------------------------------------------------------------------

    /// Gates a unary call.
    ///
    /// # Errors
    ///
    /// Returns the gate rejection as a [`Status`], or the handler's result.
    pub async fn unary<Req, Res, F, Fut>(
        &self,
        endpoint: &EndpointPath,
        request: Request<Req>,
        handler: F,
    ) -> Result<Response<Res>, Status>
    where
        Req: 'static,
        F: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Res>, Status>>,
    {
        self.ensure_enabled::<Req>(endpoint).await?;
        handler(request).await
    }

    /// Gates a client-streaming call without reading the inbound stream.
    ///
    /// # Errors
    ///
    /// Returns the gate rejection as a [`Status`], or the handler's result.
    pub async fn client_streaming<S, Req, Res, F, Fut>(
        &self,
        endpoint: &EndpointPath,
        request: Request<S>,
        handler: F,
    ) -> Result<Response<Res>, Status>
    where
        S: Stream<Item = Result<Req, Status>>,
        Req: 'static,
        F: FnOnce(Request<S>) -> Fut,
        Fut: Future<Output = Result<Response<Res>, Status>>,
    {
        self.ensure_enabled::<Req>(endpoint).await?;
        handler(request).await
    }

    /// Gates a server-streaming call before the response stream is created.
    ///
    /// # Errors
    ///
    /// Returns the gate rejection as a [`Status`], or the handler's result.
    pub async fn server_streaming<Req, Out, F, Fut>(
        &self,
        endpoint: &EndpointPath,
        request: Request<Req>,
        handler: F,
    ) -> Result<Response<Out>, Status>
    where
        Req: 'static,
        F: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Out>, Status>>,
    {
        self.ensure_enabled::<Req>(endpoint).await?;
        handler(request).await
    }

    /// Gates a bidirectional streaming call without reading the inbound stream.
    ///
    /// # Errors
    ///
    /// Returns the gate rejection as a [`Status`], or the handler's result.
    pub async fn duplex_streaming<S, Req, Out, F, Fut>(
        &self,
        endpoint: &EndpointPath,
        request: Request<S>,
        handler: F,
    ) -> Result<Response<Out>, Status>
    where
        S: Stream<Item = Result<Req, Status>>,
        Req: 'static,
        F: FnOnce(Request<S>) -> Fut,
        Fut: Future<Output = Result<Response<Out>, Status>>,
    {
        self.ensure_enabled::<Req>(endpoint).await?;
        handler(request).await
    }
}

// ============================================================================
// SECTION: Decision Record
// ============================================================================

/// Facts gathered while deciding, reported to the audit sink.
#[derive(Default)]
struct DecisionRecord {
    /// Whether any declaration applied.
    gated: bool,
    /// Distinct features resolved.
    feature_count: usize,
    /// Backend answers in evaluation order.
    checks: Vec<FeatureCheck>,
}
