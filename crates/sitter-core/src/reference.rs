//! References — attestations of past childcare work held by a provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the referenced work took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareSetting {
  ParentsHome,
  ProviderHome,
  CareCenter,
  ChildMinderHouse,
  Other,
}

/// One attestation. Either free-text contact fields, or a link to a family
/// registered on the platform (`family_id`), or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
  pub reference_id: Uuid,
  pub provider_id:  Uuid,
  pub name:         Option<String>,
  pub email:        Option<String>,
  pub phone:        Option<String>,
  /// Free-text description of the missions performed.
  pub missions:     Option<String>,
  /// Set when the referencing family is itself registered.
  pub family_id:    Option<Uuid>,
  pub date_from:    Option<NaiveDate>,
  pub date_to:      Option<NaiveDate>,
  /// The engagement is still ongoing; `date_to` is ignored when set.
  pub current:      bool,
  pub setting:      Option<CareSetting>,
}

/// Input to [`crate::store::AccountStore::add_reference`].
/// `reference_id` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewReference {
  pub provider_id: Uuid,
  pub name:        Option<String>,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub missions:    Option<String>,
  pub family_id:   Option<Uuid>,
  pub date_from:   Option<NaiveDate>,
  pub date_to:     Option<NaiveDate>,
  pub current:     bool,
  pub setting:     Option<CareSetting>,
}

impl Reference {
  /// True when the reference carries a displayable date range: a start date
  /// plus either an end date or the ongoing flag.
  pub fn has_period(&self) -> bool {
    self.date_from.is_some() && (self.current || self.date_to.is_some())
  }
}
