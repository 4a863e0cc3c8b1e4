//! Handler for `POST /account/plan/premium`.
//!
//! The payment provider is an external collaborator; this endpoint is the
//! explicit entry point its confirmation layer calls once a subscription
//! purchase clears. The login-time expiration sweep lives in
//! [`crate::accounts::login`].

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sitter_core::{
  account::Account,
  plan::{Plan, Subscription},
  store::AccountStore,
};

use crate::{AppState, auth::CurrentAccount, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct UpgradeBody {
  /// When the purchased premium period ends; `None` grants open-ended
  /// premium.
  pub expires_at: Option<DateTime<Utc>>,
}

/// `POST /account/plan/premium`
pub async fn upgrade<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(mut account): CurrentAccount,
  Json(body): Json<UpgradeBody>,
) -> Result<Json<Account>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  account.subscription =
    Subscription { plan: Plan::Premium, expires_at: body.expires_at };

  state
    .store
    .update_account(&account)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    account_id = %account.account_id,
    expires_at = ?account.subscription.expires_at,
    "premium upgrade recorded"
  );

  Ok(Json(account))
}
