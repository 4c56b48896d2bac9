//! Policy engine errors

use thiserror::Error;

use tollgate_db::DbError;
use tollgate_types::ErrorCode;

/// Policy engine errors
///
/// Denials are not errors: a plan or quota denial is a successful evaluation
/// carried in [`tollgate_types::Verdict`]. These variants cover requests the
/// engine cannot evaluate at all.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Feature id is not known to the engine
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    /// Action id is not known to the engine
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Backing store or cache fault
    #[error("monetization service error: {0}")]
    Service(String),
}

impl PolicyError {
    /// Wire code for this error
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownFeature(_) => ErrorCode::InvalidFeatureId,
            Self::UnknownAction(_) => ErrorCode::InvalidAction,
            Self::Service(_) => ErrorCode::MonetizationServiceError,
        }
    }

    /// HTTP status for this error
    pub const fn status_code(&self) -> u16 {
        self.error_code().status_code()
    }
}

impl From<DbError> for PolicyError {
    fn from(err: DbError) -> Self {
        tracing::error!(error = %err, "backing store failure");
        Self::Service(err.to_string())
    }
}

impl From<std::sync::Arc<DbError>> for PolicyError {
    fn from(err: std::sync::Arc<DbError>) -> Self {
        tracing::error!(error = %err, "backing store failure");
        Self::Service(err.to_string())
    }
}
