//! The `AccountStore` trait and supporting input/query types.
//!
//! The trait is implemented by storage backends (e.g. `sitter-store-sqlite`).
//! Higher layers (`sitter-api`, the server binary) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::{Account, AccountKind},
  favorite::{Favorite, ResourceRef},
  geo::Geolocation,
  plan::Subscription,
  planning::Planning,
  rating::{NewRating, Rating},
  reference::{NewReference, Reference},
  visibility::VisibilityFilter,
};

// ─── Input types ─────────────────────────────────────────────────────────────

/// Input to [`AccountStore::create_account`].
/// `account_id` and `created_at` are assigned by the store; everything not
/// listed here starts at its default.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub kind:           AccountKind,
  pub email:          String,
  /// Argon2 PHC string; the clear-text password never reaches storage.
  pub password_hash:  String,
  /// Starting subscription, per the signup plan policy.
  pub subscription:   Subscription,
  /// Token mailed to the user; claimed to activate the account.
  pub activation_key: String,
}

/// Credential row used by the auth layer. Never serialised outward.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub account_id:    Uuid,
  pub password_hash: String,
}

/// Parameters for [`AccountStore::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
  /// Restrict to accounts of this kind.
  pub kind:   Option<AccountKind>,
  /// Free-text filter over name, city and serialised criteria.
  pub text:   Option<String>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a marketplace storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create and persist a blank account of the given kind.
  /// Fails when the email is already registered.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Retrieve an account by its unique email. Returns `None` if not found.
  fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  /// Persist the mutable fields of `account` wholesale.
  /// Credentials and the activation key are not touched.
  fn update_account<'a>(
    &'a self,
    account: &'a Account,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The credential row for an email, for password verification.
  fn credentials_for_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  /// Claim an activation key: mark its account active and return it.
  /// Unknown key → `None`. Claiming an already-claimed key is a no-op
  /// success.
  fn claim_activation_key<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  // ── Geolocation ───────────────────────────────────────────────────────

  /// Replace the account's geolocation record.
  fn set_geolocation<'a>(
    &'a self,
    account_id: Uuid,
    geolocation: &'a Geolocation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Search ────────────────────────────────────────────────────────────

  /// List accounts passing `filter` and matching `query`.
  ///
  /// The visibility filter is applied as a storage predicate — callers must
  /// not re-filter rows — except for the completeness-score gate, which is
  /// derived and therefore applied on read before returning.
  fn search<'a>(
    &'a self,
    filter: VisibilityFilter,
    query: &'a SearchQuery,
  ) -> impl Future<Output = Result<Vec<Account>, Self::Error>> + Send + 'a;

  // ── Favorites ─────────────────────────────────────────────────────────

  /// Insert-if-absent; returns `true` when a new row was created. Atomic:
  /// concurrent duplicate adds still leave exactly one row.
  fn add_favorite(
    &self,
    owner_id: Uuid,
    target: ResourceRef,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Idempotent delete: removing an absent favorite succeeds and changes
  /// nothing.
  fn remove_favorite(
    &self,
    owner_id: Uuid,
    target: ResourceRef,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All favorites of an owner, oldest first.
  fn list_favorites(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Favorite>, Self::Error>> + Send + '_;

  // ── References ────────────────────────────────────────────────────────

  fn add_reference(
    &self,
    input: NewReference,
  ) -> impl Future<Output = Result<Reference, Self::Error>> + Send + '_;

  fn list_references(
    &self,
    provider_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Reference>, Self::Error>> + Send + '_;

  // ── Ratings ───────────────────────────────────────────────────────────

  fn add_rating(
    &self,
    input: NewRating,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  /// All ratings received by an account, oldest first.
  fn list_ratings(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Rating>, Self::Error>> + Send + '_;

  // ── Planning ──────────────────────────────────────────────────────────

  /// Replace the account's availability block.
  fn set_planning<'a>(
    &'a self,
    account_id: Uuid,
    planning: &'a Planning,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_planning(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Option<Planning>, Self::Error>> + Send + '_;
}
