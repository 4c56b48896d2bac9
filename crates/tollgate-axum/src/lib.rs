//! Tollgate Axum Integration
//!
//! The request pipeline around the policy engine: an ordered stage
//! composition of authentication hand-off, policy check, protected handler,
//! and post-success usage charge.
//!
//! # Overview
//!
//! - **Middleware**: [`PolicyLayer`] gates one route on a feature and,
//!   when metered, charges usage after the handler succeeds
//! - **Extractors**: [`RequireUser`], [`PolicyVerdict`]
//! - **Charging**: [`ChargeRecorder`] fire-and-forget background task
//!
//! # Quick Start
//!
//! ```ignore
//! use tollgate_axum::{ChargeRecorder, PolicyLayer};
//! use tollgate_types::Feature;
//! use axum::{Router, routing::post};
//!
//! let (recorder, _handle) = ChargeRecorder::new(policy.clone(), &config);
//!
//! let app = Router::new()
//!     .route("/api/videos", post(generate_video))
//!     .layer(PolicyLayer::new(policy, Feature::VideoGeneration).metered(recorder));
//! ```
//!
//! The identity layer is an external collaborator: it verifies the bearer
//! credential and inserts a [`UserContextExt`] request extension. A request
//! arriving here without one is denied with `AUTHENTICATION_REQUIRED` before
//! any policy work happens.

pub mod charge;
pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

pub use charge::{ChargeEvent, ChargeRecorder, ChargeRecorderHandle, OperationOutcome};
pub use context::{UserContext, UserContextExt};
pub use error::GateError;
pub use extractors::{MissingPolicyLayer, PolicyVerdict, RequireUser};
pub use layer::{PolicyLayer, PolicyService};
