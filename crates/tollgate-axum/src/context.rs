//! Request context types
//!
//! The identity provider (an external collaborator) verifies the bearer
//! credential and attaches a [`UserContext`] to the request before the
//! policy stage runs. This crate only consumes the stable user identity.

use tollgate_types::UserId;

/// Authenticated user context attached by the identity layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// The authenticated user's ID
    pub user_id: UserId,
}

impl UserContext {
    /// Create a context for a user
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Extension key for storing the user context in request extensions
#[derive(Debug, Clone)]
pub struct UserContextExt(pub UserContext);
