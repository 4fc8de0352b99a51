use journey_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
  /// The graph has no segment node to resolve an audience from.
  #[error("campaign has no segment node")]
  MissingSegment,

  /// No action node carries a product or coupon selection.
  #[error("campaign has no action node with an offer")]
  MissingOffer,

  /// The pre-run save failed; the run is aborted before any recipient event.
  #[error("cannot start run: {0}")]
  CannotStart(#[source] StoreError),

  /// The run was cancelled before it started.
  #[error("run cancelled")]
  Cancelled,
}
