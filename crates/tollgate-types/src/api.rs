//! Wire types for the pipeline's denial contract

use serde::{Deserialize, Serialize};

use crate::plan::PlanId;

/// Error codes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Feature id is not known to the engine
    InvalidFeatureId,
    /// Action id is not known to the engine
    InvalidAction,
    /// No authenticated user on the request
    AuthenticationRequired,
    /// Plan does not grant the feature
    FeatureAccessDenied,
    /// Quota for the metered action is exhausted
    UsageLimitReached,
    /// Client-facing alias for a plan denial
    PlanUpgradeRequired,
    /// Backing store or cache fault
    MonetizationServiceError,
}

impl ErrorCode {
    /// HTTP status for this code
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFeatureId | Self::InvalidAction => 400,
            Self::AuthenticationRequired => 401,
            Self::FeatureAccessDenied | Self::UsageLimitReached | Self::PlanUpgradeRequired => 403,
            Self::MonetizationServiceError => 500,
        }
    }

    /// Stable code string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFeatureId => "INVALID_FEATURE_ID",
            Self::InvalidAction => "INVALID_ACTION",
            Self::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            Self::FeatureAccessDenied => "FEATURE_ACCESS_DENIED",
            Self::UsageLimitReached => "USAGE_LIMIT_REACHED",
            Self::PlanUpgradeRequired => "PLAN_UPGRADE_REQUIRED",
            Self::MonetizationServiceError => "MONETIZATION_SERVICE_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Denial envelope returned by the pipeline
///
/// Every denial is actionable: a plan-gated denial names the required plan,
/// a quota-gated denial names the current usage and limit, and the two are
/// never mixed in one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenyBody {
    /// Always `false`
    pub success: bool,
    /// Human-readable message
    pub error: String,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Denial detail, present for plan and quota denials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DenyDetails>,
    /// Upgrade hint, present only for plan denials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<UpgradeHint>,
}

impl DenyBody {
    /// Create a bare denial with no detail
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
            details: None,
            upgrade: None,
        }
    }

    /// Attach denial details
    pub fn with_details(mut self, details: DenyDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach an upgrade hint
    pub fn with_upgrade(mut self, upgrade: UpgradeHint) -> Self {
        self.upgrade = Some(upgrade);
        self
    }
}

/// Structured denial detail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenyDetails {
    /// Feature that was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    /// Plan required for the feature (plan denials)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_plan: Option<PlanId>,
    /// The user's current plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<PlanId>,
    /// Remaining usage for the charged field (quota denials)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_usage: Option<u64>,
    /// Period limit for the charged field (quota denials)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_limit: Option<i64>,
}

/// Upgrade hint for plan-gated denials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeHint {
    /// Plan that grants the feature
    pub required_plan: PlanId,
    /// The user's current plan
    pub current_plan: PlanId,
}
