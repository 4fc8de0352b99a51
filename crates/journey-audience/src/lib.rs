//! Journey Audience
//!
//! Derives the estimated reachable-audience count for a segment node's filter
//! criteria. Estimation is asynchronous, debounced (criteria edits while a
//! request is pending collapse into the newest one) and last-issued-wins: a
//! response only lands if no newer request has been started since.
//!
//! The resolved count is a one-way display cache. The canvas controller
//! writes it onto the owning node's `audience_size` field; nothing here ever
//! touches the criteria themselves.

mod backend;
mod estimator;

pub use backend::{AudienceBackend, HeuristicBackend};
pub use estimator::{AudienceEstimator, EstimateTracker, EstimateUpdate};

use thiserror::Error;

/// Error type for audience estimation.
#[derive(Debug, Error)]
pub enum AudienceError {
  /// The estimation backend could not be reached or answered with an error.
  #[error("audience backend unavailable: {0}")]
  Backend(String),
}
