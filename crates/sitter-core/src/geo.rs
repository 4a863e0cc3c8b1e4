//! Geolocation — coordinates resolved from a postal address.
//!
//! The external lookup sits behind the [`Geocoder`] trait; the server binary
//! supplies an HTTP implementation. A failed lookup is recorded state, not an
//! error: the row either has coordinates or the failure flag, never both.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::ContactInfo;

/// Failure of the external geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
  #[error("no result for address {0:?}")]
  NoResult(String),

  #[error("malformed geocoder response: {0}")]
  Malformed(String),

  #[error("geocoding transport error: {0}")]
  Transport(String),
}

/// A latitude/longitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

/// External geocoding capability: free-form address in, coordinates out.
#[async_trait]
pub trait Geocoder: Send + Sync {
  async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// The per-account geolocation record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
  pub coordinates: Option<Coordinates>,
  /// Set when the last lookup failed; mutually exclusive with coordinates.
  pub failed:      bool,
}

impl Geolocation {
  /// Resolve `address` through `geocoder`, absorbing failure into the
  /// record. Callers never see the underlying error; they may inspect
  /// [`failed`](Self::failed) and log.
  pub async fn resolve(geocoder: &dyn Geocoder, address: &str) -> Self {
    match geocoder.geocode(address).await {
      Ok(coordinates) => Self { coordinates: Some(coordinates), failed: false },
      Err(_) => Self { coordinates: None, failed: true },
    }
  }
}

/// Whether an account edit warrants a new geocoding pass.
///
/// True when an address-bearing field (street, postal code, city, country)
/// changed and the new address still has a city or postal code to anchor
/// the lookup.
pub fn should_regeolocate(old: &ContactInfo, new: &ContactInfo) -> bool {
  let changed = old.street != new.street
    || old.postal_code != new.postal_code
    || old.city != new.city
    || old.country != new.country;
  changed && new.is_geocodable()
}
