//! Account — the marketplace profile shared by families and providers.
//!
//! An account carries the common contact block, visibility flags, shared
//! search criteria and a subscription; everything kind-specific lives in the
//! [`AccountDetail`] union. The two kinds share one storage row and one type
//! rather than an inheritance chain.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{criteria::Criteria, geo::Geolocation, plan::Subscription};

/// Country assumed when none is supplied. The original service only ever
/// operated in France; the geocoder falls back to this too.
pub const DEFAULT_COUNTRY: &str = "France";

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The two profile kinds a marketplace account can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
  Family,
  Provider,
}

impl AccountKind {
  /// The discriminant string stored in the `kind` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Family => "family",
      Self::Provider => "provider",
    }
  }
}

// ─── Contact block ───────────────────────────────────────────────────────────

/// The postal/contact block every account carries. Optional fields left
/// empty count against the visibility score (see [`crate::visibility`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
  pub last_name:     Option<String>,
  pub first_name:    Option<String>,
  pub street:        Option<String>,
  pub postal_code:   Option<String>,
  pub city:          Option<String>,
  pub country:       String,
  pub phone:         Option<String>,
  /// Whether the phone number may appear on the public profile.
  pub phone_visible: bool,
  /// Path to the stored profile photo, relative to the media directory.
  pub profile_photo: Option<String>,
}

impl Default for ContactInfo {
  fn default() -> Self {
    Self {
      last_name:     None,
      first_name:    None,
      street:        None,
      postal_code:   None,
      city:          None,
      country:       DEFAULT_COUNTRY.to_owned(),
      phone:         None,
      phone_visible: false,
      profile_photo: None,
    }
  }
}

impl ContactInfo {
  /// Assemble the free-form query string handed to the geocoder:
  /// `"{street} {postal_code} {city}, {country}"`, empty parts blanked.
  pub fn address_query(&self) -> String {
    let country = if self.country.is_empty() {
      DEFAULT_COUNTRY
    } else {
      &self.country
    };
    format!(
      "{} {} {}, {}",
      self.street.as_deref().unwrap_or(""),
      self.postal_code.as_deref().unwrap_or(""),
      self.city.as_deref().unwrap_or(""),
      country,
    )
  }

  /// True when there is enough address information to anchor a geocoding
  /// lookup: at least a city or a postal code.
  pub fn is_geocodable(&self) -> bool {
    is_populated(&self.city) || is_populated(&self.postal_code)
  }
}

/// Non-empty check used by the address rule and the visibility score.
pub(crate) fn is_populated(field: &Option<String>) -> bool {
  field.as_deref().is_some_and(|s| !s.is_empty())
}

// ─── Visibility flags ────────────────────────────────────────────────────────

/// Who may see this profile. All flags default to on; the global flag is
/// additionally gated by the visibility score (see [`crate::visibility`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
  pub to_family:   bool,
  pub to_provider: bool,
  pub global:      bool,
}

impl Default for Visibility {
  fn default() -> Self {
    Self { to_family: true, to_provider: true, global: true }
  }
}

// ─── Family detail ───────────────────────────────────────────────────────────

/// Household shape of a family account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyType {
  SingleParent,
  StayAtHomeParent,
  BothParentsWorking,
  OneParentWorking,
  Other,
}

/// The kind of care arrangement a family is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareExpectation {
  SharedCare,
  AfterSchool,
  Emergency,
  Night,
  SchoolHolidays,
  SchoolRun,
  ActivityRun,
  LunchExchange,
  Other,
}

/// A child declared on a family profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
  pub name:     String,
  pub birthday: Option<NaiveDate>,
  pub school:   Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyDetail {
  pub family_type:       Option<FamilyType>,
  pub expected_provider: Option<ProviderType>,
  pub expectation:       Option<CareExpectation>,
  #[serde(default)]
  pub children:          Vec<Child>,
}

// ─── Provider detail ─────────────────────────────────────────────────────────

/// What a provider offers themselves as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
  BabySitter,
  GrannySitter,
  Nanny,
  ChildMinder,
  ParentalAssistant,
  AuPair,
  Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDetail {
  pub birthday:      Option<NaiveDate>,
  pub nationality:   Option<String>,
  pub provider_type: Option<ProviderType>,
  /// Free text shown when `provider_type` is [`ProviderType::Other`].
  pub other_type:    Option<String>,
  /// Path to the stored resume document.
  pub resume:        Option<String>,
}

// ─── Detail union ────────────────────────────────────────────────────────────

/// Kind-specific profile data. The serde tag doubles as the account kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AccountDetail {
  Family(FamilyDetail),
  Provider(ProviderDetail),
}

impl AccountDetail {
  /// An empty detail block of the given kind, as created at registration.
  pub fn empty(kind: AccountKind) -> Self {
    match kind {
      AccountKind::Family => Self::Family(FamilyDetail::default()),
      AccountKind::Provider => Self::Provider(ProviderDetail::default()),
    }
  }

  pub fn kind(&self) -> AccountKind {
    match self {
      Self::Family(_) => AccountKind::Family,
      Self::Provider(_) => AccountKind::Provider,
    }
  }
}

// ─── Account ─────────────────────────────────────────────────────────────────

/// A registered marketplace profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub account_id:   Uuid,
  pub created_at:   DateTime<Utc>,
  pub email:        String,
  /// Set once the activation key from the verification email is claimed.
  pub is_active:    bool,
  pub newsletter:   bool,
  pub contact:      ContactInfo,
  pub visibility:   Visibility,
  pub subscription: Subscription,
  pub criteria:     Criteria,
  pub detail:       AccountDetail,
  pub geolocation:  Option<Geolocation>,
}

impl Account {
  pub fn kind(&self) -> AccountKind {
    self.detail.kind()
  }

  pub fn is_premium(&self) -> bool {
    self.subscription.is_premium()
  }

  /// True when the account has coordinates on file and the last geocoding
  /// attempt did not fail.
  pub fn is_geolocated(&self) -> bool {
    self
      .geolocation
      .as_ref()
      .is_some_and(|g| !g.failed && g.coordinates.is_some())
  }

  pub fn as_family(&self) -> Option<&FamilyDetail> {
    match &self.detail {
      AccountDetail::Family(d) => Some(d),
      AccountDetail::Provider(_) => None,
    }
  }

  pub fn as_provider(&self) -> Option<&ProviderDetail> {
    match &self.detail {
      AccountDetail::Provider(d) => Some(d),
      AccountDetail::Family(_) => None,
    }
  }

  /// Public display name, never the full civil name:
  /// first name plus last initial when both are known, the first name alone
  /// otherwise, falling back to the local part of the email address.
  pub fn pseudo(&self) -> String {
    let first = self.contact.first_name.as_deref().filter(|s| !s.is_empty());
    match first {
      None => self
        .email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_owned(),
      Some(first) => {
        match self
          .contact
          .last_name
          .as_deref()
          .and_then(|n| n.chars().next())
        {
          Some(initial) => format!("{first} {initial}."),
          None => first.to_owned(),
        }
      }
    }
  }
}
