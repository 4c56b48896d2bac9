//! Wire errors and the denial envelope
//!
//! Every denial is actionable: plan denials name the required plan, quota
//! denials name the current usage and limit, and the two are never mixed in
//! one response. Service faults leak no internal detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use tollgate_core::PolicyError;
use tollgate_types::{
    DenyBody, DenyDetails, ErrorCode, PolicyResult, QuotaLimit, UpgradeHint, Verdict,
};

/// Pipeline errors surfaced to callers
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No authenticated user on the request
    #[error("authentication required")]
    Unauthenticated,

    /// The engine could not evaluate the request
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl GateError {
    /// Wire code for this error
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated => ErrorCode::AuthenticationRequired,
            Self::Policy(err) => err.error_code(),
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let message = match &self {
            Self::Unauthenticated => "Authentication required".to_string(),
            Self::Policy(PolicyError::UnknownFeature(id)) => format!("Unknown feature: {id}"),
            Self::Policy(PolicyError::UnknownAction(id)) => format!("Unknown action: {id}"),
            Self::Policy(err @ PolicyError::Service(_)) => {
                tracing::error!(error = %err, "monetization service error");
                "Monetization service unavailable".to_string()
            }
        };
        let status =
            StatusCode::from_u16(code.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(DenyBody::new(code, message))).into_response()
    }
}

/// Build the denial response for a policy verdict
///
/// Panics in debug builds if called with a granted result; callers gate on
/// `allowed()` first.
pub(crate) fn deny_response(result: &PolicyResult) -> Response {
    let feature_id = result.feature.as_str().to_string();
    let body = match &result.verdict {
        Verdict::PlanRequired { required } => DenyBody::new(
            ErrorCode::PlanUpgradeRequired,
            format!(
                "Feature '{}' requires the {} plan or higher",
                result.feature, required
            ),
        )
        .with_details(DenyDetails {
            feature_id: Some(feature_id),
            required_plan: Some(*required),
            current_plan: Some(result.current_plan),
            ..Default::default()
        })
        .with_upgrade(UpgradeHint {
            required_plan: *required,
            current_plan: result.current_plan,
        }),
        Verdict::QuotaExhausted { field, used, limit } => {
            let remaining = match limit {
                QuotaLimit::Unlimited => u64::MAX, // unreachable: unlimited never exhausts
                QuotaLimit::Max(max) => max.saturating_sub(*used),
            };
            DenyBody::new(
                ErrorCode::UsageLimitReached,
                format!("Usage limit reached for {field}"),
            )
            .with_details(DenyDetails {
                feature_id: Some(feature_id),
                current_plan: Some(result.current_plan),
                remaining_usage: Some(remaining),
                total_limit: Some(limit.to_raw()),
                ..Default::default()
            })
        }
        Verdict::Granted { .. } => {
            debug_assert!(false, "deny_response called with a granted verdict");
            DenyBody::new(ErrorCode::MonetizationServiceError, "Internal error")
        }
    };

    let status = StatusCode::from_u16(body.code.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}
