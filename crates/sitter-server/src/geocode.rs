//! HTTP geocoder backed by a Nominatim-style search endpoint.
//!
//! The lookup blocks the request task that triggered it; latency is accepted
//! and bounded by the client timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sitter_core::geo::{Coordinates, GeocodeError, Geocoder};

pub const DEFAULT_ENDPOINT: &str =
  "https://nominatim.openstreetmap.org/search";

pub struct HttpGeocoder {
  client:   reqwest::Client,
  endpoint: String,
}

/// One hit in a Nominatim search response; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
  lat: String,
  lon: String,
}

impl HttpGeocoder {
  pub fn new(endpoint: String) -> Result<Self, GeocodeError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .user_agent(concat!("sitter-server/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| GeocodeError::Transport(e.to_string()))?;
    Ok(Self { client, endpoint })
  }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
  async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
    let transport = |e: reqwest::Error| GeocodeError::Transport(e.to_string());

    let hits: Vec<SearchHit> = self
      .client
      .get(&self.endpoint)
      .query(&[("q", address), ("format", "json"), ("limit", "1")])
      .send()
      .await
      .map_err(transport)?
      .error_for_status()
      .map_err(transport)?
      .json()
      .await
      .map_err(transport)?;

    let hit = hits
      .into_iter()
      .next()
      .ok_or_else(|| GeocodeError::NoResult(address.to_owned()))?;

    let latitude = hit
      .lat
      .parse()
      .map_err(|_| GeocodeError::Malformed(format!("latitude {:?}", hit.lat)))?;
    let longitude = hit
      .lon
      .parse()
      .map_err(|_| GeocodeError::Malformed(format!("longitude {:?}", hit.lon)))?;

    Ok(Coordinates { latitude, longitude })
  }
}
