//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601.
//! Structured blocks (criteria, kind detail, weekday/slot sets) are stored as
//! compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use sitter_core::{
  account::{Account, AccountDetail, AccountKind, ContactInfo, Visibility},
  criteria::Criteria,
  favorite::Favorite,
  geo::{Coordinates, Geolocation},
  plan::{Plan, Subscription},
  planning::Planning,
  rating::Rating,
  reference::{CareSetting, Reference},
  store::Credentials,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|_| Error::DateParse(format!("bad date: {s:?}")))
}

// ─── AccountKind ─────────────────────────────────────────────────────────────

pub fn encode_kind(k: AccountKind) -> &'static str {
  k.as_str()
}

pub fn decode_kind(s: &str) -> Result<AccountKind> {
  match s {
    "family" => Ok(AccountKind::Family),
    "provider" => Ok(AccountKind::Provider),
    other => {
      Err(Error::Core(sitter_core::Error::UnknownAccountKind(other.into())))
    }
  }
}

// ─── Plan ────────────────────────────────────────────────────────────────────

pub fn encode_plan(p: Plan) -> &'static str {
  p.as_str()
}

pub fn decode_plan(s: &str) -> Result<Plan> {
  match s {
    "basic" => Ok(Plan::Basic),
    "premium" => Ok(Plan::Premium),
    other => Err(Error::DateParse(format!("unknown plan: {other:?}"))),
  }
}

// ─── CareSetting ─────────────────────────────────────────────────────────────

pub fn encode_setting(s: CareSetting) -> &'static str {
  match s {
    CareSetting::ParentsHome => "parents_home",
    CareSetting::ProviderHome => "provider_home",
    CareSetting::CareCenter => "care_center",
    CareSetting::ChildMinderHouse => "child_minder_house",
    CareSetting::Other => "other",
  }
}

pub fn decode_setting(s: &str) -> Result<CareSetting> {
  match s {
    "parents_home" => Ok(CareSetting::ParentsHome),
    "provider_home" => Ok(CareSetting::ProviderHome),
    "care_center" => Ok(CareSetting::CareCenter),
    "child_minder_house" => Ok(CareSetting::ChildMinderHouse),
    "other" => Ok(CareSetting::Other),
    other => Err(Error::DateParse(format!("unknown care setting: {other:?}"))),
  }
}

// ─── JSON blocks ─────────────────────────────────────────────────────────────

pub fn encode_criteria(c: &Criteria) -> Result<String> {
  Ok(serde_json::to_string(c)?)
}

pub fn encode_detail(d: &AccountDetail) -> Result<String> {
  Ok(serde_json::to_string(d)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from an `accounts` row joined with `geolocations`.
pub struct RawAccount {
  pub account_id:          String,
  pub created_at:          String,
  pub email:               String,
  pub is_active:           bool,
  pub newsletter:          bool,
  pub last_name:           Option<String>,
  pub first_name:          Option<String>,
  pub street:              Option<String>,
  pub postal_code:         Option<String>,
  pub city:                Option<String>,
  pub country:             String,
  pub phone:               Option<String>,
  pub phone_visible:       bool,
  pub profile_photo:       Option<String>,
  pub visible_to_family:   bool,
  pub visible_to_provider: bool,
  pub visible_globally:    bool,
  pub plan:                String,
  pub plan_expires_at:     Option<String>,
  pub criteria_json:       String,
  pub detail_json:         String,
  // geolocations join
  pub geo_latitude:        Option<f64>,
  pub geo_longitude:       Option<f64>,
  pub geo_failed:          Option<bool>,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    let subscription = Subscription {
      plan:       decode_plan(&self.plan)?,
      expires_at: self.plan_expires_at.as_deref().map(decode_dt).transpose()?,
    };

    let criteria: Criteria = serde_json::from_str(&self.criteria_json)?;
    let detail: AccountDetail = serde_json::from_str(&self.detail_json)?;

    // A `failed` value means a geolocations row was joined in.
    let geolocation = self.geo_failed.map(|failed| Geolocation {
      coordinates: self.geo_latitude.zip(self.geo_longitude).map(
        |(latitude, longitude)| Coordinates { latitude, longitude },
      ),
      failed,
    });

    Ok(Account {
      account_id: decode_uuid(&self.account_id)?,
      created_at: decode_dt(&self.created_at)?,
      email: self.email,
      is_active: self.is_active,
      newsletter: self.newsletter,
      contact: ContactInfo {
        last_name:     self.last_name,
        first_name:    self.first_name,
        street:        self.street,
        postal_code:   self.postal_code,
        city:          self.city,
        country:       self.country,
        phone:         self.phone,
        phone_visible: self.phone_visible,
        profile_photo: self.profile_photo,
      },
      visibility: Visibility {
        to_family:   self.visible_to_family,
        to_provider: self.visible_to_provider,
        global:      self.visible_globally,
      },
      subscription,
      criteria,
      detail,
      geolocation,
    })
  }
}

/// Raw values read from a credential lookup.
pub struct RawCredentials {
  pub account_id:    String,
  pub password_hash: String,
}

impl RawCredentials {
  pub fn into_credentials(self) -> Result<Credentials> {
    Ok(Credentials {
      account_id:    decode_uuid(&self.account_id)?,
      password_hash: self.password_hash,
    })
  }
}

/// Raw values read from a `favorites` row.
pub struct RawFavorite {
  pub owner_id:    String,
  pub target_kind: String,
  pub target_id:   String,
  pub created_at:  String,
}

impl RawFavorite {
  pub fn into_favorite(self) -> Result<Favorite> {
    Ok(Favorite {
      owner_id:    decode_uuid(&self.owner_id)?,
      target_kind: decode_kind(&self.target_kind)?,
      target_id:   decode_uuid(&self.target_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from a `provider_references` row.
pub struct RawReference {
  pub reference_id: String,
  pub provider_id:  String,
  pub name:         Option<String>,
  pub email:        Option<String>,
  pub phone:        Option<String>,
  pub missions:     Option<String>,
  pub family_id:    Option<String>,
  pub date_from:    Option<String>,
  pub date_to:      Option<String>,
  pub current:      bool,
  pub setting:      Option<String>,
}

impl RawReference {
  pub fn into_reference(self) -> Result<Reference> {
    Ok(Reference {
      reference_id: decode_uuid(&self.reference_id)?,
      provider_id:  decode_uuid(&self.provider_id)?,
      name:         self.name,
      email:        self.email,
      phone:        self.phone,
      missions:     self.missions,
      family_id:    self.family_id.as_deref().map(decode_uuid).transpose()?,
      date_from:    self.date_from.as_deref().map(decode_date).transpose()?,
      date_to:      self.date_to.as_deref().map(decode_date).transpose()?,
      current:      self.current,
      setting:      self.setting.as_deref().map(decode_setting).transpose()?,
    })
  }
}

/// Raw values read from a `ratings` row.
pub struct RawRating {
  pub rating_id:   String,
  pub account_id:  String,
  pub author_id:   Option<String>,
  pub reliability: u8,
  pub amiability:  u8,
  pub seriousness: u8,
  pub punctuality: u8,
  pub created_at:  String,
}

impl RawRating {
  pub fn into_rating(self) -> Result<Rating> {
    Ok(Rating {
      rating_id:   decode_uuid(&self.rating_id)?,
      account_id:  decode_uuid(&self.account_id)?,
      author_id:   self.author_id.as_deref().map(decode_uuid).transpose()?,
      reliability: self.reliability,
      amiability:  self.amiability,
      seriousness: self.seriousness,
      punctuality: self.punctuality,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from a `plannings` row.
pub struct RawPlanning {
  pub start_date: Option<String>,
  pub weekdays:   String,
  pub slots:      String,
}

impl RawPlanning {
  pub fn into_planning(self) -> Result<Planning> {
    Ok(Planning {
      start_date: self.start_date.as_deref().map(decode_date).transpose()?,
      weekdays:   serde_json::from_str(&self.weekdays)?,
      slots:      serde_json::from_str(&self.slots)?,
    })
  }
}
