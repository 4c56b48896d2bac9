//! Policy gate middleware
//!
//! Wraps one route in the ordered pipeline: identity check, policy
//! evaluation, handler, and (when metered) a post-success usage charge.
//! Denied requests short-circuit before the handler runs; a usage charge is
//! queued only after the handler has produced a successful response.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};

use tollgate_core::SharedPolicy;
use tollgate_types::Feature;

use crate::charge::{should_charge, ChargeEvent, ChargeRecorder};
use crate::context::UserContextExt;
use crate::error::{deny_response, GateError};
use crate::extractors::PolicyVerdictExt;

/// Layer gating a route on a feature
///
/// By default the gate only checks access; attach a [`ChargeRecorder`] with
/// [`metered`](Self::metered) to also charge usage after successful handler
/// responses.
#[derive(Clone)]
pub struct PolicyLayer {
    policy: SharedPolicy,
    feature: Feature,
    charge: Option<ChargeRecorder>,
}

impl PolicyLayer {
    /// Create an access-check-only gate for a feature
    pub fn new(policy: SharedPolicy, feature: Feature) -> Self {
        Self {
            policy,
            feature,
            charge: None,
        }
    }

    /// Charge the feature's action after each successful handler response
    pub fn metered(mut self, recorder: ChargeRecorder) -> Self {
        self.charge = Some(recorder);
        self
    }
}

impl<S> Layer<S> for PolicyLayer {
    type Service = PolicyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PolicyService {
            inner,
            policy: self.policy.clone(),
            feature: self.feature,
            charge: self.charge.clone(),
        }
    }
}

/// Middleware service produced by [`PolicyLayer`]
#[derive(Clone)]
pub struct PolicyService<S> {
    inner: S,
    policy: SharedPolicy,
    feature: Feature,
    charge: Option<ChargeRecorder>,
}

impl<S> Service<Request<Body>> for PolicyService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // Take the ready inner service, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let policy = self.policy.clone();
        let feature = self.feature;
        let charge = self.charge.clone();

        Box::pin(async move {
            let Some(ctx) = req.extensions().get::<UserContextExt>() else {
                return Ok(GateError::Unauthenticated.into_response());
            };
            let user_id = ctx.0.user_id;

            let result = match policy.evaluate(user_id, feature.as_str()).await {
                Ok(result) => result,
                Err(err) => return Ok(GateError::Policy(err).into_response()),
            };

            if !result.allowed() {
                return Ok(deny_response(&result));
            }

            req.extensions_mut().insert(PolicyVerdictExt(result));

            let response = inner.call(req).await?;

            if let Some(recorder) = charge {
                if should_charge(&response) {
                    recorder.record(ChargeEvent::new(user_id, feature.action(), 1));
                }
            }

            Ok(response)
        })
    }
}
