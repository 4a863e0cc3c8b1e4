//! Handlers for `/account/references` — provider work attestations.
//!
//! Family accounts hold no references; the collection simply does not exist
//! for them.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sitter_core::{
  account::AccountKind,
  reference::{CareSetting, NewReference, Reference},
  store::AccountStore,
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentAccount, error::ApiError};

fn references_not_found() -> ApiError {
  ApiError::NotFound("family accounts hold no references".to_owned())
}

#[derive(Debug, Deserialize)]
pub struct ReferenceBody {
  pub name:      Option<String>,
  pub email:     Option<String>,
  pub phone:     Option<String>,
  pub missions:  Option<String>,
  /// Id of a registered family vouching for the provider.
  pub family_id: Option<Uuid>,
  pub date_from: Option<NaiveDate>,
  pub date_to:   Option<NaiveDate>,
  #[serde(default)]
  pub current:   bool,
  pub setting:   Option<CareSetting>,
}

/// `POST /account/references` — returns 201 + the stored reference.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
  Json(body): Json<ReferenceBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if account.kind() != AccountKind::Provider {
    return Err(references_not_found());
  }

  // A linked family must exist and actually be a family.
  if let Some(family_id) = body.family_id {
    let linked = state
      .store
      .get_account(family_id)
      .await
      .map_err(ApiError::store)?;
    if !linked.is_some_and(|a| a.kind() == AccountKind::Family) {
      return Err(ApiError::BadRequest(format!(
        "linked family {family_id} not found"
      )));
    }
  }

  let reference = state
    .store
    .add_reference(NewReference {
      provider_id: account.account_id,
      name:        body.name,
      email:       body.email,
      phone:       body.phone,
      missions:    body.missions,
      family_id:   body.family_id,
      date_from:   body.date_from,
      date_to:     body.date_to,
      current:     body.current,
      setting:     body.setting,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(reference)))
}

/// `GET /account/references`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Reference>>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if account.kind() != AccountKind::Provider {
    return Err(references_not_found());
  }

  let references = state
    .store
    .list_references(account.account_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(references))
}
