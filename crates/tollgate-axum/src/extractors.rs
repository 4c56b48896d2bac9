//! Request extractors for gated handlers

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use tollgate_types::{DenyBody, ErrorCode, PolicyResult};

use crate::context::{UserContext, UserContextExt};
use crate::error::GateError;

/// Extractor that requires an authenticated user
///
/// Reads the [`UserContext`] placed in request extensions by the
/// application's authentication middleware. Rejects with a 401 envelope
/// when no identity is present.
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserContext);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContextExt>()
            .map(|ext| Self(ext.0.clone()))
            .ok_or(GateError::Unauthenticated)
    }
}

/// Evaluation result stored in request extensions by [`PolicyService`]
///
/// [`PolicyService`]: crate::layer::PolicyService
#[derive(Debug, Clone)]
pub(crate) struct PolicyVerdictExt(pub(crate) PolicyResult);

/// Extractor for the policy evaluation of the current request
///
/// Only meaningful inside a route wrapped by [`PolicyLayer`]; handlers use
/// it to report remaining quota alongside their payload. Rejects with a 500
/// envelope when the layer is missing.
///
/// [`PolicyLayer`]: crate::layer::PolicyLayer
#[derive(Debug, Clone)]
pub struct PolicyVerdict(pub PolicyResult);

#[async_trait]
impl<S> FromRequestParts<S> for PolicyVerdict
where
    S: Send + Sync,
{
    type Rejection = MissingPolicyLayer;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<PolicyVerdictExt>()
            .map(|ext| Self(ext.0.clone()))
            .ok_or(MissingPolicyLayer)
    }
}

/// Rejection for [`PolicyVerdict`] used outside a gated route
#[derive(Debug)]
pub struct MissingPolicyLayer;

impl IntoResponse for MissingPolicyLayer {
    fn into_response(self) -> Response {
        tracing::error!("policy verdict extractor used on a route without a policy layer");
        let body = DenyBody::new(
            ErrorCode::MonetizationServiceError,
            "Monetization service unavailable",
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
