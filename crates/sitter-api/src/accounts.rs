//! Handlers for registration, login and account/profile endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | Body: [`RegisterBody`]; sends the activation mail |
//! | `GET`  | `/verify/:key` | Claims an activation key |
//! | `POST` | `/auth/login` | Verifies credentials and runs the plan sweep |
//! | `GET`  | `/account` | The authenticated account |
//! | `PUT`  | `/account` | Edit; re-geolocates when the address changed |
//! | `GET`  | `/families/:id`, `/providers/:id` | Public profile, 404 when invisible |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitter_core::{
  account::{Account, AccountDetail, AccountKind, ContactInfo, Visibility},
  criteria::Criteria,
  geo::{Geolocation, should_regeolocate},
  plan::sweep_expired_plan,
  rating::RatingSummary,
  reference::Reference,
  store::{AccountStore, NewAccount},
  visibility::VisibilityFilter,
};
use uuid::Uuid;

use crate::{
  AppState,
  auth::{
    CurrentAccount, MaybeAccount, generate_activation_key, hash_password,
    verify_password,
  },
  error::ApiError,
};

// ─── Read models ──────────────────────────────────────────────────────────────

/// Compact account representation used in listings.
#[derive(Debug, Serialize)]
pub struct AccountSummary {
  pub account_id:  Uuid,
  pub kind:        AccountKind,
  pub pseudo:      String,
  pub city:        Option<String>,
  pub postal_code: Option<String>,
  pub description: Option<String>,
}

impl AccountSummary {
  pub fn of(account: &Account) -> Self {
    Self {
      account_id:  account.account_id,
      kind:        account.kind(),
      pseudo:      account.pseudo(),
      city:        account.contact.city.clone(),
      postal_code: account.contact.postal_code.clone(),
      description: account.criteria.description.clone(),
    }
  }
}

/// The public profile view. Exposes the pseudonym rather than the civil
/// name, and the phone number only when the account opted in.
#[derive(Debug, Serialize)]
pub struct ProfileView {
  pub account_id: Uuid,
  pub kind:       AccountKind,
  pub pseudo:     String,
  pub city:       Option<String>,
  pub postal_code: Option<String>,
  pub phone:      Option<String>,
  pub criteria:   Criteria,
  pub detail:     AccountDetail,
  pub geolocated: bool,
  pub rating:     RatingSummary,
  /// Provider profiles only; empty for families.
  pub references: Vec<Reference>,
}

impl ProfileView {
  pub fn of(
    account: &Account,
    rating: RatingSummary,
    references: Vec<Reference>,
  ) -> Self {
    Self {
      account_id: account.account_id,
      kind: account.kind(),
      pseudo: account.pseudo(),
      city: account.contact.city.clone(),
      postal_code: account.contact.postal_code.clone(),
      phone: account
        .contact
        .phone_visible
        .then(|| account.contact.phone.clone())
        .flatten(),
      criteria: account.criteria.clone(),
      detail: account.detail.clone(),
      geolocated: account.is_geolocated(),
      rating,
      references,
    }
  }
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    String,
  pub password: String,
  pub kind:     AccountKind,
}

/// `POST /register` — returns 201 + the fresh account.
///
/// The free-premium signup policy decides the starting subscription; the
/// activation mail is best-effort.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.email.is_empty() || !body.email.contains('@') {
    return Err(ApiError::BadRequest("invalid email address".to_owned()));
  }
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("empty password".to_owned()));
  }

  // Friendly pre-check; the UNIQUE constraint remains the backstop for
  // concurrent registrations.
  if state
    .store
    .find_account_by_email(&body.email)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict("email already registered".to_owned()));
  }

  let activation_key = generate_activation_key();
  let account = state
    .store
    .create_account(NewAccount {
      kind:           body.kind,
      email:          body.email,
      password_hash:  hash_password(&body.password)?,
      subscription:   state
        .config
        .plan_policy
        .initial_subscription(body.kind, Utc::now()),
      activation_key: activation_key.clone(),
    })
    .await
    .map_err(ApiError::store)?;

  let link = format!(
    "{}/api/v1/verify/{activation_key}",
    state.config.base_url.trim_end_matches('/'),
  );
  if let Err(e) = state
    .mailer
    .send(
      &account.email,
      "Confirmez votre adresse email",
      &format!("Bienvenue ! Activez votre compte : {link}"),
    )
    .await
  {
    tracing::warn!(email = %account.email, error = %e, "verification mail failed");
  }

  Ok((StatusCode::CREATED, Json(account)))
}

// ─── Verify ──────────────────────────────────────────────────────────────────

/// `GET /verify/:key` — claim an activation key. Idempotent.
pub async fn verify<S>(
  State(state): State<AppState<S>>,
  Path(key): Path<String>,
) -> Result<Json<Account>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account = state
    .store
    .claim_activation_key(&key)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("unknown activation key".to_owned()))?;
  Ok(Json(account))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login` — verify credentials and return the account.
///
/// Runs the plan-expiration sweep as an explicit step: a lapsed premium
/// subscription is downgraded, persisted and notified by mail before the
/// response is built. A failed mail send never blocks the login.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Account>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let creds = state
    .store
    .credentials_for_email(&body.email)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  verify_password(&body.password, &creds.password_hash)?;

  let mut account = state
    .store
    .get_account(creds.account_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("account not found".to_owned()))?;

  if sweep_expired_plan(&mut account, Utc::now()) {
    state
      .store
      .update_account(&account)
      .await
      .map_err(ApiError::store)?;
    if let Err(e) = state
      .mailer
      .send(
        &account.email,
        "Votre plan premium vient d'expirer",
        "Votre abonnement premium a expiré ; votre compte est repassé en plan basique.",
      )
      .await
    {
      tracing::warn!(
        account_id = %account.account_id,
        error = %e,
        "plan-expiry notification failed"
      );
    }
  }

  Ok(Json(account))
}

// ─── Own account ─────────────────────────────────────────────────────────────

/// `GET /account` — the authenticated account, in full.
pub async fn current<S>(
  CurrentAccount(account): CurrentAccount,
) -> Json<Account>
where
  S: AccountStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Json(account)
}

/// Editable slice of an account; everything else is server-managed.
#[derive(Debug, Deserialize)]
pub struct AccountUpdate {
  pub contact:    ContactInfo,
  pub criteria:   Criteria,
  pub detail:     AccountDetail,
  pub visibility: Visibility,
  pub newsletter: bool,
}

/// `PUT /account` — replace the editable blocks.
///
/// When the edit touches an address-bearing field and the new address still
/// names a city or postal code, the geocoder is re-run and the outcome
/// (coordinates or failure flag) stored.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(mut account): CurrentAccount,
  Json(body): Json<AccountUpdate>,
) -> Result<Json<Account>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.detail.kind() != account.kind() {
    return Err(ApiError::BadRequest(
      "account kind cannot change".to_owned(),
    ));
  }

  let old_contact = std::mem::replace(&mut account.contact, body.contact);
  account.criteria = body.criteria;
  account.detail = body.detail;
  account.visibility = body.visibility;
  account.newsletter = body.newsletter;

  state
    .store
    .update_account(&account)
    .await
    .map_err(ApiError::store)?;

  if should_regeolocate(&old_contact, &account.contact) {
    let address = account.contact.address_query();
    let geolocation =
      Geolocation::resolve(state.geocoder.as_ref(), &address).await;
    if geolocation.failed {
      tracing::warn!(account_id = %account.account_id, address, "geocoding failed");
    }
    state
      .store
      .set_geolocation(account.account_id, &geolocation)
      .await
      .map_err(ApiError::store)?;
    account.geolocation = Some(geolocation);
  }

  Ok(Json(account))
}

// ─── Public profiles ─────────────────────────────────────────────────────────

async fn profile<S>(
  state: &AppState<S>,
  kind: AccountKind,
  id: Uuid,
  viewer: Option<&Account>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let not_found =
    || ApiError::NotFound(format!("{} {id} not found", kind.as_str()));

  let account = state
    .store
    .get_account(id)
    .await
    .map_err(ApiError::store)?
    .filter(|a| a.kind() == kind)
    .ok_or_else(not_found)?;

  // An invisible candidate is indistinguishable from a missing one, except
  // to itself.
  let is_self = viewer.is_some_and(|v| v.account_id == account.account_id);
  let filter = VisibilityFilter::for_viewer(viewer.map(Account::kind));
  if !is_self && !filter.permits(&account) {
    return Err(not_found());
  }

  let ratings = state
    .store
    .list_ratings(account.account_id)
    .await
    .map_err(ApiError::store)?;

  let references = match kind {
    AccountKind::Provider => state
      .store
      .list_references(account.account_id)
      .await
      .map_err(ApiError::store)?,
    AccountKind::Family => Vec::new(),
  };

  Ok(Json(ProfileView::of(
    &account,
    RatingSummary::of(&ratings),
    references,
  )))
}

/// `GET /families/:id`
pub async fn family_profile<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  MaybeAccount(viewer): MaybeAccount,
) -> Result<Json<ProfileView>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  profile(&state, AccountKind::Family, id, viewer.as_ref()).await
}

/// `GET /providers/:id`
pub async fn provider_profile<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  MaybeAccount(viewer): MaybeAccount,
) -> Result<Json<ProfileView>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  profile(&state, AccountKind::Provider, id, viewer.as_ref()).await
}
