use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use journey_graph::SegmentCriteria;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::AudienceBackend;

/// A resolved (or failed) estimate, tagged with its request sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateUpdate {
  pub seq: u64,
  /// `None` when the backend failed; the UI shows a neutral placeholder.
  pub count: Option<u64>,
}

/// Debounced, last-issued-wins audience estimator.
///
/// Every call to [`request`](AudienceEstimator::request) gets the next value
/// of a monotonic sequence. The spawned task sleeps out the debounce interval
/// first and abandons silently if a newer request started meanwhile, so rapid
/// criteria edits produce a single backend call. Responses arrive on the
/// update channel in completion order; consumers gate them through an
/// [`EstimateTracker`] so an older in-flight response can never overwrite a
/// newer one.
pub struct AudienceEstimator<B> {
  backend: Arc<B>,
  seq: Arc<AtomicU64>,
  debounce: Duration,
  sink: mpsc::UnboundedSender<EstimateUpdate>,
}

impl<B: AudienceBackend + 'static> AudienceEstimator<B> {
  /// Create an estimator and the channel its updates arrive on.
  pub fn new(backend: B, debounce: Duration) -> (Self, mpsc::UnboundedReceiver<EstimateUpdate>) {
    let (sink, updates) = mpsc::unbounded_channel();
    (
      Self {
        backend: Arc::new(backend),
        seq: Arc::new(AtomicU64::new(0)),
        debounce,
        sink,
      },
      updates,
    )
  }

  /// Start an estimate for the given criteria. Returns the request's
  /// sequence number.
  pub fn request(&self, criteria: SegmentCriteria) -> u64 {
    let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
    let backend = Arc::clone(&self.backend);
    let latest = Arc::clone(&self.seq);
    let sink = self.sink.clone();
    let debounce = self.debounce;

    tokio::spawn(async move {
      tokio::time::sleep(debounce).await;
      if latest.load(Ordering::SeqCst) != seq {
        debug!(seq, "estimate superseded during debounce, skipping backend call");
        return;
      }

      let count = match backend.count(&criteria).await {
        Ok(count) => Some(count),
        Err(error) => {
          warn!(seq, %error, "audience estimate failed");
          None
        }
      };

      // Receiver may be gone if the canvas was closed.
      let _ = sink.send(EstimateUpdate { seq, count });
    });

    seq
  }
}

/// Consumer-side guard enforcing last-issued-wins.
///
/// Only a sequence number strictly greater than every previously accepted one
/// is allowed through, so out-of-order backend completions cannot leave a
/// stale count on a node.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateTracker {
  last_accepted: u64,
}

impl EstimateTracker {
  pub fn accept(&mut self, seq: u64) -> bool {
    if seq > self.last_accepted {
      self.last_accepted = seq;
      true
    } else {
      false
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::AudienceError;
  use async_trait::async_trait;

  /// Backend that answers slowly for one marker city and instantly otherwise.
  struct SlowLane;

  #[async_trait]
  impl AudienceBackend for SlowLane {
    async fn count(&self, criteria: &SegmentCriteria) -> Result<u64, AudienceError> {
      if criteria.city.as_deref() == Some("slow-lane") {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(111)
      } else {
        Ok(222)
      }
    }
  }

  struct AlwaysDown;

  #[async_trait]
  impl AudienceBackend for AlwaysDown {
    async fn count(&self, _criteria: &SegmentCriteria) -> Result<u64, AudienceError> {
      Err(AudienceError::Backend("subscriber index offline".to_string()))
    }
  }

  fn city(name: &str) -> SegmentCriteria {
    SegmentCriteria {
      city: Some(name.to_string()),
      ..SegmentCriteria::default()
    }
  }

  #[tokio::test(start_paused = true)]
  async fn later_request_wins_when_earlier_response_arrives_last() {
    let (estimator, mut updates) = AudienceEstimator::new(SlowLane, Duration::from_millis(10));
    let mut tracker = EstimateTracker::default();

    let first = estimator.request(city("slow-lane"));
    // Let the first request clear its debounce and enter the slow backend call.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = estimator.request(city("fast-lane"));
    assert!(second > first);

    let mut audience_size = None;
    for _ in 0..2 {
      let update = updates.recv().await.expect("update");
      if tracker.accept(update.seq) {
        audience_size = update.count;
      }
    }

    // The fast second response landed first; the late first response was stale.
    assert_eq!(audience_size, Some(222));
  }

  #[tokio::test(start_paused = true)]
  async fn rapid_requests_collapse_into_the_newest() {
    let (estimator, mut updates) = AudienceEstimator::new(SlowLane, Duration::from_millis(50));

    estimator.request(city("fast-lane"));
    estimator.request(city("fast-lane"));
    let last = estimator.request(city("fast-lane"));

    tokio::time::sleep(Duration::from_millis(200)).await;

    let update = updates.recv().await.expect("update");
    assert_eq!(update.seq, last);
    assert_eq!(update.count, Some(222));
    assert!(updates.try_recv().is_err(), "superseded requests must not respond");
  }

  #[tokio::test(start_paused = true)]
  async fn backend_failure_maps_to_empty_count() {
    let (estimator, mut updates) = AudienceEstimator::new(AlwaysDown, Duration::from_millis(5));
    let seq = estimator.request(SegmentCriteria::default());

    let update = updates.recv().await.expect("update");
    assert_eq!(update.seq, seq);
    assert_eq!(update.count, None);
  }

  #[test]
  fn tracker_rejects_stale_and_duplicate_sequences() {
    let mut tracker = EstimateTracker::default();
    assert!(tracker.accept(1));
    assert!(tracker.accept(3));
    assert!(!tracker.accept(2));
    assert!(!tracker.accept(3));
    assert!(tracker.accept(4));
  }
}
