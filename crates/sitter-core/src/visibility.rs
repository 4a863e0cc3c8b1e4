//! Visibility rules: who may see a profile, and the completeness score
//! gating global visibility.
//!
//! The score is a derived property — recomputed on every read, never stored.

use crate::account::{Account, AccountDetail, AccountKind, is_populated};

/// Minimum completeness score before an account of this kind may appear in
/// global listings. Families have fewer mandatory fields, so the bar sits
/// lower.
pub fn min_visibility_score(kind: AccountKind) -> f64 {
  match kind {
    AccountKind::Family => 0.5,
    AccountKind::Provider => 0.75,
  }
}

impl Account {
  /// Fraction of mandatory profile fields populated, in `[0, 1]`.
  ///
  /// Base fields: last name, first name, street, postal code, city and
  /// profile photo. Providers additionally need a birthday and a provider
  /// type.
  pub fn visibility_score(&self) -> f64 {
    let c = &self.contact;
    let base = [
      &c.last_name,
      &c.first_name,
      &c.street,
      &c.postal_code,
      &c.city,
      &c.profile_photo,
    ];

    let mut filled = base.iter().filter(|f| is_populated(f)).count();
    let mut total = base.len();

    if let AccountDetail::Provider(p) = &self.detail {
      total += 2;
      filled += usize::from(p.birthday.is_some());
      filled += usize::from(p.provider_type.is_some());
    }

    filled as f64 / total as f64
  }

  /// True when the score clears the kind-dependent minimum.
  pub fn visibility_score_is_enough(&self) -> bool {
    self.visibility_score() >= min_visibility_score(self.kind())
  }

  /// Effective global visibility: the stored flag gated by the score.
  pub fn is_globally_visible(&self) -> bool {
    self.visibility.global && self.visibility_score_is_enough()
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// The query predicate deciding which candidates a viewer may see.
///
/// Storage backends translate this into their listing query;
/// [`permits`](Self::permits) states the same rule for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFilter {
  /// Kind of the viewing account; `None` for anonymous or unresolvable
  /// viewers, who only see globally visible candidates.
  pub viewer: Option<AccountKind>,
}

impl VisibilityFilter {
  pub fn for_viewer(viewer: Option<AccountKind>) -> Self {
    Self { viewer }
  }

  /// Whether `candidate` is visible through this filter.
  pub fn permits(&self, candidate: &Account) -> bool {
    if !candidate.is_globally_visible() {
      return false;
    }
    match self.viewer {
      Some(AccountKind::Family) => candidate.visibility.to_family,
      Some(AccountKind::Provider) => candidate.visibility.to_provider,
      None => true,
    }
  }
}

/// Whether `viewer` may open the full profile of `candidate`.
///
/// Anonymous viewers never may; a viewer may always open their own profile,
/// regardless of flags.
pub fn profile_access_is_authorized(
  candidate: &Account,
  viewer: Option<&Account>,
) -> bool {
  let Some(viewer) = viewer else { return false };
  if viewer.account_id == candidate.account_id {
    return true;
  }
  if !candidate.visibility.global {
    return false;
  }
  match viewer.kind() {
    AccountKind::Family => candidate.visibility.to_family,
    AccountKind::Provider => candidate.visibility.to_provider,
  }
}
