//! Subscription plans and the login-time expiration sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountKind};

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
  #[default]
  Basic,
  Premium,
}

impl Plan {
  /// The discriminant string stored in the `plan` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Basic => "basic",
      Self::Premium => "premium",
    }
  }
}

/// An account's subscription tier with its optional expiry.
///
/// A premium subscription without an expiry never lapses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
  pub plan:       Plan,
  pub expires_at: Option<DateTime<Utc>>,
}

impl Subscription {
  pub fn is_premium(&self) -> bool {
    self.plan == Plan::Premium
  }

  /// True for a premium subscription whose expiry lies strictly in the
  /// past. An expiry equal to `now` still counts as valid.
  pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
    self.is_premium() && self.expires_at.is_some_and(|at| at < now)
  }
}

// ─── Signup policy ───────────────────────────────────────────────────────────

/// Free-premium window granted at signup.
///
/// While `window_ends` has not passed, new accounts start premium with the
/// kind-dependent trial expiry; a `None` trial end keeps the premium
/// open-ended. With no window configured every account starts basic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlanPolicy {
  pub window_ends:         Option<DateTime<Utc>>,
  pub family_trial_ends:   Option<DateTime<Utc>>,
  pub provider_trial_ends: Option<DateTime<Utc>>,
}

impl PlanPolicy {
  /// The subscription a fresh account of `kind` starts with at `now`.
  pub fn initial_subscription(
    &self,
    kind: AccountKind,
    now: DateTime<Utc>,
  ) -> Subscription {
    match self.window_ends {
      Some(ends) if now <= ends => Subscription {
        plan:       Plan::Premium,
        expires_at: match kind {
          AccountKind::Family => self.family_trial_ends,
          AccountKind::Provider => self.provider_trial_ends,
        },
      },
      _ => Subscription::default(),
    }
  }
}

// ─── Sweep ───────────────────────────────────────────────────────────────────

/// Downgrade a lapsed premium subscription in place.
///
/// Returns `true` when the account was downgraded; the caller persists the
/// account and sends the notification email. A premium subscription with no
/// expiry is perpetual and left untouched.
pub fn sweep_expired_plan(account: &mut Account, now: DateTime<Utc>) -> bool {
  if !account.subscription.is_lapsed(now) {
    return false;
  }
  account.subscription = Subscription { plan: Plan::Basic, expires_at: None };
  true
}
