use async_trait::async_trait;
use journey_graph::{SegmentCriteria, Tier};

use crate::AudienceError;

/// Source of reachable-audience counts for a set of segment criteria.
#[async_trait]
pub trait AudienceBackend: Send + Sync {
  async fn count(&self, criteria: &SegmentCriteria) -> Result<u64, AudienceError>;
}

/// In-process estimation backend.
///
/// Narrows a base subscriber population by a fixed factor per active
/// criterion. Deterministic, so the CLI and tests get stable numbers without
/// a live subscriber database.
#[derive(Debug, Clone)]
pub struct HeuristicBackend {
  pub base_population: u64,
}

impl Default for HeuristicBackend {
  fn default() -> Self {
    Self {
      base_population: 1_250_000,
    }
  }
}

#[async_trait]
impl AudienceBackend for HeuristicBackend {
  async fn count(&self, criteria: &SegmentCriteria) -> Result<u64, AudienceError> {
    let mut estimate = self.base_population as f64;

    if let Some(tier) = criteria.tier {
      estimate *= match tier {
        Tier::Standard => 0.55,
        Tier::Silver => 0.20,
        Tier::Gold => 0.12,
        Tier::Platinum => 0.08,
        Tier::Diamond => 0.05,
      };
    }
    if criteria.city.is_some() {
      estimate *= 0.18;
    }
    if criteria.gender.is_some() {
      estimate *= 0.5;
    }
    if criteria.sim_type.is_some() {
      estimate *= 0.65;
    }
    if criteria.age.is_some() {
      estimate *= 0.35;
    }
    if criteria.activity.is_some() {
      estimate *= 0.4;
    }
    if criteria.arpu.is_some() {
      estimate *= 0.25;
    }
    if criteria.balance.is_some() {
      estimate *= 0.3;
    }
    for _ in &criteria.tags {
      estimate *= 0.6;
    }

    Ok(estimate.round().max(0.0) as u64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn narrower_criteria_shrink_the_estimate() {
    let backend = HeuristicBackend::default();

    let broad = SegmentCriteria::default();
    let narrow = SegmentCriteria {
      tier: Some(Tier::Diamond),
      city: Some("Lagos".to_string()),
      ..SegmentCriteria::default()
    };

    let all = backend.count(&broad).await.unwrap();
    let some = backend.count(&narrow).await.unwrap();
    assert_eq!(all, backend.base_population);
    assert!(some < all);
    assert!(some > 0);
  }
}
