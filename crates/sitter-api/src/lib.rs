//! JSON REST API for the Sitter marketplace.
//!
//! Exposes an axum [`Router`] backed by any
//! [`sitter_core::store::AccountStore`]. TLS and transport concerns are the
//! caller's responsibility; authentication is HTTP Basic against the
//! account's stored argon2 hash.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", sitter_api::api_router(state))
//! ```

pub mod accounts;
pub mod auth;
pub mod error;
pub mod favorites;
pub mod plan;
pub mod planning;
pub mod ratings;
pub mod references;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use sitter_core::{
  geo::Geocoder, mail::Mailer, plan::PlanPolicy, store::AccountStore,
};

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// The handler-facing slice of the server configuration.
#[derive(Clone)]
pub struct ApiConfig {
  /// Public base URL, used to build activation links.
  pub base_url:     String,
  /// Hard cap on search results per page.
  pub search_limit: usize,
  /// Free-premium signup policy.
  pub plan_policy:  PlanPolicy,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url:     "http://localhost:8080".to_owned(),
      search_limit: 20,
      plan_policy:  PlanPolicy::default(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub geocoder: Arc<dyn Geocoder>,
  pub mailer:   Arc<dyn Mailer>,
  pub config:   Arc<ApiConfig>,
}

// Manual impl: `S` itself need not be `Clone`, only the `Arc`s are cloned.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      geocoder: Arc::clone(&self.geocoder),
      mailer:   Arc::clone(&self.mailer),
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: AccountStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Registration and login
    .route("/register", post(accounts::register::<S>))
    .route("/verify/{key}", get(accounts::verify::<S>))
    .route("/auth/login", post(accounts::login::<S>))
    // Own account
    .route(
      "/account",
      get(accounts::current::<S>).put(accounts::update::<S>),
    )
    .route("/account/plan/premium", post(plan::upgrade::<S>))
    .route(
      "/account/planning",
      get(planning::get_own::<S>).put(planning::set_own::<S>),
    )
    .route("/account/favorites", get(favorites::list::<S>))
    .route("/account/favorites/add", post(favorites::add::<S>))
    .route("/account/favorites/remove", post(favorites::remove::<S>))
    .route(
      "/account/references",
      get(references::list::<S>).post(references::create::<S>),
    )
    // Public surface
    .route("/search", get(search::handler::<S>))
    .route("/families/{id}", get(accounts::family_profile::<S>))
    .route("/providers/{id}", get(accounts::provider_profile::<S>))
    .route(
      "/accounts/{id}/ratings",
      get(ratings::list::<S>).post(ratings::create::<S>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
