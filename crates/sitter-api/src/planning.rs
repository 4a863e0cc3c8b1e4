//! Handlers for `/account/planning` — the weekly availability block.

use axum::{Json, extract::State};
use sitter_core::{planning::Planning, store::AccountStore};

use crate::{AppState, auth::CurrentAccount, error::ApiError};

/// `GET /account/planning` — an account that never declared availability
/// gets the empty block.
pub async fn get_own<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
) -> Result<Json<Planning>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let planning = state
    .store
    .get_planning(account.account_id)
    .await
    .map_err(ApiError::store)?
    .unwrap_or_default();
  Ok(Json(planning))
}

/// `PUT /account/planning` — replace the block wholesale.
pub async fn set_own<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
  Json(planning): Json<Planning>,
) -> Result<Json<Planning>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .set_planning(account.account_id, &planning)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(planning))
}
