//! Handlers for the favorites ledger.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/account/favorites` | Grouped by target kind, resolved |
//! | `POST` | `/account/favorites/add` | Body: `{"resource_uri":"..."}` |
//! | `POST` | `/account/favorites/remove` | Idempotent |
//!
//! Resource references are parsed (and rejected) here, before the ledger is
//! touched.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use sitter_core::{
  account::AccountKind, favorite::ResourceRef, store::AccountStore,
};

use crate::{
  AppState, accounts::AccountSummary, auth::CurrentAccount, error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct FavoriteBody {
  pub resource_uri: String,
}

fn parse_ref(uri: &str) -> Result<ResourceRef, ApiError> {
  uri
    .parse()
    .map_err(|e: sitter_core::Error| ApiError::BadRequest(e.to_string()))
}

/// `POST /account/favorites/add` — insert-if-absent.
pub async fn add<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
  Json(body): Json<FavoriteBody>,
) -> Result<StatusCode, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let target = parse_ref(&body.resource_uri)?;
  state
    .store
    .add_favorite(account.account_id, target)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /account/favorites/remove` — removing an absent favorite succeeds.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
  Json(body): Json<FavoriteBody>,
) -> Result<StatusCode, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let target = parse_ref(&body.resource_uri)?;
  state
    .store
    .remove_favorite(account.account_id, target)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// Favorites grouped by target kind, each resolved to its account.
#[derive(Debug, Serialize)]
pub struct FavoritesData {
  pub families:  Vec<AccountSummary>,
  pub providers: Vec<AccountSummary>,
}

/// `GET /account/favorites`
///
/// Bookmarks whose target has meanwhile disappeared are skipped silently.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
) -> Result<Json<FavoritesData>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let favorites = state
    .store
    .list_favorites(account.account_id)
    .await
    .map_err(ApiError::store)?;

  let mut data =
    FavoritesData { families: Vec::new(), providers: Vec::new() };

  for favorite in favorites {
    let Some(target) = state
      .store
      .get_account(favorite.target_id)
      .await
      .map_err(ApiError::store)?
    else {
      continue;
    };
    let summary = AccountSummary::of(&target);
    match favorite.target_kind {
      AccountKind::Family => data.families.push(summary),
      AccountKind::Provider => data.providers.push(summary),
    }
  }

  Ok(Json(data))
}
