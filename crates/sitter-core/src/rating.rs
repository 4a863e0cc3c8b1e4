//! Ratings — four-component peer reviews and their aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest value a rating component can take.
pub const MAX_COMPONENT: u8 = 5;

/// A single review of an account. Components run 0–5; a component left
/// unset stays at zero and still counts in the average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
  pub rating_id:   Uuid,
  pub account_id:  Uuid,
  /// The account that wrote the review, when known.
  pub author_id:   Option<Uuid>,
  pub reliability: u8,
  pub amiability:  u8,
  pub seriousness: u8,
  pub punctuality: u8,
  pub created_at:  DateTime<Utc>,
}

impl Rating {
  /// Mean of the four components.
  pub fn average(&self) -> f64 {
    f64::from(
      u16::from(self.reliability)
        + u16::from(self.amiability)
        + u16::from(self.seriousness)
        + u16::from(self.punctuality),
    ) / 4.0
  }
}

/// Input to [`crate::store::AccountStore::add_rating`].
/// `rating_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewRating {
  pub account_id:  Uuid,
  pub author_id:   Option<Uuid>,
  pub reliability: u8,
  pub amiability:  u8,
  pub seriousness: u8,
  pub punctuality: u8,
}

/// Mean of all rating averages; `0` for an unrated account.
pub fn overall_rating(ratings: &[Rating]) -> f64 {
  if ratings.is_empty() {
    return 0.0;
  }
  ratings.iter().map(Rating::average).sum::<f64>() / ratings.len() as f64
}

/// Aggregate view returned alongside rating listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingSummary {
  pub count:   usize,
  pub overall: f64,
  /// `overall` as a 0–100 percentage.
  pub percent: u8,
}

impl RatingSummary {
  pub fn of(ratings: &[Rating]) -> Self {
    let overall = overall_rating(ratings);
    Self {
      count: ratings.len(),
      overall,
      percent: (overall / f64::from(MAX_COMPONENT) * 100.0) as u8,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rating(
    reliability: u8,
    amiability: u8,
    seriousness: u8,
    punctuality: u8,
  ) -> Rating {
    Rating {
      rating_id: Uuid::new_v4(),
      account_id: Uuid::new_v4(),
      author_id: None,
      reliability,
      amiability,
      seriousness,
      punctuality,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn unset_components_count_as_zero() {
    assert_eq!(rating(0, 0, 0, 0).average(), 0.0);
    assert_eq!(rating(4, 0, 0, 0).average(), 1.0);
  }

  #[test]
  fn average_is_component_mean() {
    assert_eq!(rating(4, 2, 1, 3).average(), 2.5);
  }

  #[test]
  fn overall_is_mean_of_averages() {
    let ratings = [rating(4, 2, 1, 3), rating(1, 3, 5, 0)];
    assert_eq!(overall_rating(&ratings), 2.375);
  }

  #[test]
  fn unrated_account_scores_zero() {
    assert_eq!(overall_rating(&[]), 0.0);

    let summary = RatingSummary::of(&[]);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.percent, 0);
  }

  #[test]
  fn percent_form() {
    let summary = RatingSummary::of(&[rating(4, 2, 1, 3), rating(1, 3, 5, 0)]);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.percent, 47); // 2.375 / 5 → 47.5, truncated
  }
}
