//! Favorites — bookmark relations from one account to another.
//!
//! The ledger itself lives in storage; this module defines the record and
//! the resource-reference format the HTTP surface hands in. Storage keeps at
//! most one row per (owner, target kind, target id) triple, and removal is
//! idempotent.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, account::AccountKind};

/// A stored bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
  pub owner_id:    Uuid,
  pub target_kind: AccountKind,
  pub target_id:   Uuid,
  pub created_at:  DateTime<Utc>,
}

/// A parsed `/api/v1/{families|providers}/{uuid}` reference.
///
/// Parsing happens before the ledger is touched; a malformed reference never
/// reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
  pub kind: AccountKind,
  pub id:   Uuid,
}

impl ResourceRef {
  /// The API path form, e.g. `/api/v1/providers/<uuid>`.
  pub fn to_uri(&self) -> String {
    format!("/api/v1/{}/{}", kind_segment(self.kind), self.id)
  }
}

fn kind_segment(kind: AccountKind) -> &'static str {
  match kind {
    AccountKind::Family => "families",
    AccountKind::Provider => "providers",
  }
}

impl FromStr for ResourceRef {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let malformed = || Error::MalformedResourceRef(s.to_owned());

    let rest = s.strip_prefix("/api/v1/").ok_or_else(malformed)?;
    let (segment, id) = rest
      .trim_end_matches('/')
      .split_once('/')
      .ok_or_else(malformed)?;

    let kind = match segment {
      "families" => AccountKind::Family,
      "providers" => AccountKind::Provider,
      _ => return Err(malformed()),
    };
    let id = Uuid::parse_str(id).map_err(|_| malformed())?;

    Ok(Self { kind, id })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_both_kinds() {
    let id = Uuid::new_v4();

    let fam: ResourceRef = format!("/api/v1/families/{id}").parse().unwrap();
    assert_eq!(fam, ResourceRef { kind: AccountKind::Family, id });

    let pro: ResourceRef = format!("/api/v1/providers/{id}").parse().unwrap();
    assert_eq!(pro.kind, AccountKind::Provider);
  }

  #[test]
  fn round_trips_through_uri_form() {
    let reference = ResourceRef {
      kind: AccountKind::Provider,
      id:   Uuid::new_v4(),
    };
    let parsed: ResourceRef = reference.to_uri().parse().unwrap();
    assert_eq!(parsed, reference);
  }

  #[test]
  fn tolerates_a_trailing_slash() {
    let id = Uuid::new_v4();
    let parsed: ResourceRef =
      format!("/api/v1/families/{id}/").parse().unwrap();
    assert_eq!(parsed.id, id);
  }

  #[test]
  fn rejects_malformed_references() {
    for bad in [
      "",
      "/api/v1/",
      "/api/v1/families/",
      "/api/v1/families/not-a-uuid",
      "/api/v1/gadgets/3e0170e0-9b1e-4aa2-8f2c-000000000000",
      "/api/v2/families/3e0170e0-9b1e-4aa2-8f2c-000000000000",
      "families/3e0170e0-9b1e-4aa2-8f2c-000000000000",
    ] {
      let err = bad.parse::<ResourceRef>().unwrap_err();
      assert!(matches!(err, Error::MalformedResourceRef(_)), "{bad:?}");
    }
  }
}
