//! Handlers for `/accounts/:id/ratings`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sitter_core::{
  rating::{MAX_COMPONENT, NewRating, Rating, RatingSummary},
  store::AccountStore,
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentAccount, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RatingBody {
  pub reliability: u8,
  pub amiability:  u8,
  pub seriousness: u8,
  pub punctuality: u8,
}

impl RatingBody {
  fn validate(&self) -> Result<(), ApiError> {
    let components = [
      self.reliability,
      self.amiability,
      self.seriousness,
      self.punctuality,
    ];
    if components.iter().any(|&c| c > MAX_COMPONENT) {
      return Err(ApiError::BadRequest(format!(
        "rating components run 0–{MAX_COMPONENT}"
      )));
    }
    Ok(())
  }
}

/// `POST /accounts/:id/ratings` — rate another account. Returns 201.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  CurrentAccount(author): CurrentAccount,
  Json(body): Json<RatingBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  body.validate()?;

  if author.account_id == id {
    return Err(ApiError::BadRequest(
      "cannot rate your own account".to_owned(),
    ));
  }

  state
    .store
    .get_account(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;

  let rating = state
    .store
    .add_rating(NewRating {
      account_id:  id,
      author_id:   Some(author.account_id),
      reliability: body.reliability,
      amiability:  body.amiability,
      seriousness: body.seriousness,
      punctuality: body.punctuality,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(rating)))
}

/// Ratings of an account, with their aggregate.
#[derive(Debug, Serialize)]
pub struct RatingsData {
  pub summary: RatingSummary,
  pub ratings: Vec<Rating>,
}

/// `GET /accounts/:id/ratings`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RatingsData>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_account(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;

  let ratings = state
    .store
    .list_ratings(id)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(RatingsData { summary: RatingSummary::of(&ratings), ratings }))
}
