//! HTTP Basic-auth extractors and password helpers.
//!
//! Credentials are the account's email plus its password; the argon2 PHC
//! hash lives on the account row. [`CurrentAccount`] rejects anonymous
//! requests, [`MaybeAccount`] admits them (viewer kind unresolved).

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::{OsRng, RngCore};
use sitter_core::{account::Account, store::AccountStore};

use crate::{AppState, error::ApiError};

/// The authenticated account; absence of valid credentials is a 401.
pub struct CurrentAccount(pub Account);

/// The authenticated account if credentials were supplied, `None` for
/// anonymous requests. Invalid credentials are still a 401 — anonymity must
/// be deliberate.
pub struct MaybeAccount(pub Option<Account>);

/// Hash a password into an argon2 PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// Verify a clear-text password against a stored PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<(), ApiError> {
  let parsed = PasswordHash::new(hash).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)
}

/// Generate the random token mailed to the user at registration.
pub fn generate_activation_key() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// Decode `Authorization: Basic …` into (email, password).
fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds =
    std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (email, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((email.to_owned(), password.to_owned()))
}

/// Resolve and verify Basic credentials against the store.
pub async fn authenticate<S>(
  headers: &HeaderMap,
  store: &S,
) -> Result<Account, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (email, password) = basic_credentials(headers)?;

  let creds = store
    .credentials_for_email(&email)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  verify_password(&password, &creds.password_hash)?;

  store
    .get_account(creds.account_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("account not found".to_owned()))
}

impl<S> FromRequestParts<AppState<S>> for CurrentAccount
where
  S: AccountStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, state.store.as_ref())
      .await
      .map(Self)
  }
}

impl<S> FromRequestParts<AppState<S>> for MaybeAccount
where
  S: AccountStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    if !parts.headers.contains_key(header::AUTHORIZATION) {
      return Ok(Self(None));
    }
    authenticate(&parts.headers, state.store.as_ref())
      .await
      .map(|account| Self(Some(account)))
  }
}
