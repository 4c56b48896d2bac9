//! Policy evaluation results

use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::plan::PlanId;
use crate::usage::{QuotaLimit, Remaining, UsageField};

/// Outcome of one policy evaluation
///
/// The two denial kinds are mutually exclusive by construction: a plan
/// denial carries no quota numbers and a quota denial carries no plan
/// mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyResult {
    /// The feature that was evaluated
    pub feature: Feature,
    /// The user's current plan
    pub current_plan: PlanId,
    /// Access and quota verdict
    pub verdict: Verdict,
}

impl PolicyResult {
    /// Whether the request may proceed
    pub const fn allowed(&self) -> bool {
        matches!(self.verdict, Verdict::Granted { .. })
    }

    /// Quota annotation for successful responses, when granted
    ///
    /// Uses the `-1` sentinel for unlimited fields, matching the store
    /// encoding clients already know.
    pub fn quota_info(&self) -> Option<QuotaInfo> {
        match self.verdict {
            Verdict::Granted { remaining, limit, .. } => Some(QuotaInfo {
                remaining_usage: match remaining {
                    Remaining::Unlimited => -1,
                    Remaining::Count(n) => n as i64,
                },
                total_limit: limit.to_raw(),
            }),
            _ => None,
        }
    }
}

/// Access and quota verdict for one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Verdict {
    /// Plan grants access and quota remains
    Granted {
        /// Counter the action will charge
        field: UsageField,
        /// Remaining uses before the limit
        remaining: Remaining,
        /// The period limit
        limit: QuotaLimit,
    },
    /// Plan does not grant access; quota was never checked
    PlanRequired {
        /// Minimum plan that grants the feature
        required: PlanId,
    },
    /// Plan grants access but the counter is exhausted
    QuotaExhausted {
        /// Counter that is exhausted
        field: UsageField,
        /// Current counter value
        used: u64,
        /// The period limit
        limit: QuotaLimit,
    },
}

/// Quota annotation attached to successful responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaInfo {
    /// Remaining uses for the charged field (`-1` when unlimited)
    pub remaining_usage: i64,
    /// The period limit for the charged field (`-1` when unlimited)
    pub total_limit: i64,
}
