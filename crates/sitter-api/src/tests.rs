//! Router-level tests against an in-memory SQLite store.
//!
//! Mail and geocoding are replaced by recording doubles so the sweep and
//! resolver side effects can be observed.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use sitter_core::{
  account::{
    Account, AccountDetail, AccountKind, ContactInfo, ProviderDetail,
    ProviderType,
  },
  geo::{Coordinates, GeocodeError, Geocoder},
  mail::{MailError, Mailer},
  plan::{Plan, PlanPolicy, Subscription},
  store::AccountStore,
};
use sitter_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{ApiConfig, AppState, api_router};

// ─── Doubles ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingMailer {
  sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
  fn drain(&self) -> Vec<(String, String, String)> {
    std::mem::take(&mut *self.sent.lock().unwrap())
  }
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(
    &self,
    to: &str,
    subject: &str,
    body: &str,
  ) -> Result<(), MailError> {
    self.sent.lock().unwrap().push((
      to.to_owned(),
      subject.to_owned(),
      body.to_owned(),
    ));
    Ok(())
  }
}

struct TestGeocoder {
  calls:  AtomicUsize,
  result: Option<Coordinates>,
}

#[async_trait]
impl Geocoder for TestGeocoder {
  async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self
      .result
      .ok_or_else(|| GeocodeError::NoResult(address.to_owned()))
  }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

struct TestApp {
  router:   Router,
  store:    Arc<SqliteStore>,
  mailer:   Arc<RecordingMailer>,
  geocoder: Arc<TestGeocoder>,
}

async fn app() -> TestApp {
  app_with(ApiConfig::default(), Some(Coordinates {
    latitude:  48.895603,
    longitude: 2.322858,
  }))
  .await
}

async fn app_with(
  config: ApiConfig,
  geocoder_result: Option<Coordinates>,
) -> TestApp {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let mailer = Arc::new(RecordingMailer::default());
  let geocoder = Arc::new(TestGeocoder {
    calls:  AtomicUsize::new(0),
    result: geocoder_result,
  });

  let state = AppState {
    store:    store.clone(),
    geocoder: geocoder.clone(),
    mailer:   mailer.clone(),
    config:   Arc::new(config),
  };

  TestApp { router: api_router(state), store, mailer, geocoder }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
  let res = app.router.clone().oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn get(path: &str) -> Request<Body> {
  Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn post_json(path: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(path)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn put_json(path: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("PUT")
    .uri(path)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn with_auth(mut req: Request<Body>, email: &str) -> Request<Body> {
  let value = format!("Basic {}", B64.encode(format!("{email}:secret")));
  req
    .headers_mut()
    .insert(header::AUTHORIZATION, value.parse().unwrap());
  req
}

/// Register an account through the API; password is always "secret".
async fn register(app: &TestApp, kind: AccountKind, email: &str) -> Value {
  let (status, body) = send(
    app,
    post_json(
      "/register",
      json!({ "email": email, "password": "secret", "kind": kind }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body
}

/// Fill in enough profile fields to clear the visibility-score gate.
async fn complete_profile(app: &TestApp, email: &str) -> Account {
  let mut account = app
    .store
    .find_account_by_email(email)
    .await
    .unwrap()
    .unwrap();
  account.contact = ContactInfo {
    last_name: Some("Fontaine".into()),
    first_name: Some("Claire".into()),
    street: Some("32 rue des Epinettes".into()),
    postal_code: Some("75017".into()),
    city: Some("Paris".into()),
    profile_photo: Some("photos/claire.jpg".into()),
    ..ContactInfo::default()
  };
  if account.kind() == AccountKind::Provider {
    account.detail = AccountDetail::Provider(ProviderDetail {
      birthday:      chrono::NaiveDate::from_ymd_opt(1995, 4, 2),
      provider_type: Some(ProviderType::BabySitter),
      ..ProviderDetail::default()
    });
  }
  app.store.update_account(&account).await.unwrap();
  account
}

fn update_body(account: &Account) -> Value {
  json!({
    "contact":    account.contact,
    "criteria":   account.criteria,
    "detail":     account.detail,
    "visibility": account.visibility,
    "newsletter": account.newsletter,
  })
}

// ─── Registration & activation ───────────────────────────────────────────────

#[tokio::test]
async fn register_sends_activation_mail_and_key_activates() {
  let app = app().await;

  let body = register(&app, AccountKind::Family, "a@example.com").await;
  assert_eq!(body["email"], "a@example.com");
  assert_eq!(body["is_active"], false);
  assert_eq!(body["subscription"]["plan"], "basic");

  let sent = app.mailer.drain();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].0, "a@example.com");

  // The mail carries the activation link; claim it.
  let key = sent[0]
    .2
    .split("/api/v1/verify/")
    .nth(1)
    .unwrap()
    .trim()
    .to_owned();
  let (status, body) = send(&app, get(&format!("/verify/{key}"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["is_active"], true);

  // Claiming again stays a success.
  let (status, _) = send(&app, get(&format!("/verify/{key}"))).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_duplicates_and_junk() {
  let app = app().await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let (status, _) = send(
    &app,
    post_json(
      "/register",
      json!({ "email": "a@example.com", "password": "x", "kind": "provider" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, _) = send(
    &app,
    post_json(
      "/register",
      json!({ "email": "not-an-email", "password": "x", "kind": "family" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_activation_key_is_not_found() {
  let app = app().await;
  let (status, _) = send(&app, get("/verify/deadbeef")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signup_window_grants_premium_trial() {
  let trial_ends = Utc::now() + Duration::days(60);
  let config = ApiConfig {
    plan_policy: PlanPolicy {
      window_ends:         Some(Utc::now() + Duration::days(7)),
      family_trial_ends:   None,
      provider_trial_ends: Some(trial_ends),
    },
    ..ApiConfig::default()
  };
  let app = app_with(config, None).await;

  let body = register(&app, AccountKind::Provider, "p@example.com").await;
  assert_eq!(body["subscription"]["plan"], "premium");
  assert!(!body["subscription"]["expires_at"].is_null());

  // Family trial has no end date: open-ended premium.
  let body = register(&app, AccountKind::Family, "f@example.com").await;
  assert_eq!(body["subscription"]["plan"], "premium");
  assert!(body["subscription"]["expires_at"].is_null());
}

// ─── Login & plan sweep ──────────────────────────────────────────────────────

#[tokio::test]
async fn login_verifies_credentials() {
  let app = app().await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let (status, body) = send(
    &app,
    post_json(
      "/auth/login",
      json!({ "email": "a@example.com", "password": "secret" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], "a@example.com");

  let (status, _) = send(
    &app,
    post_json(
      "/auth/login",
      json!({ "email": "a@example.com", "password": "wrong" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = send(
    &app,
    post_json(
      "/auth/login",
      json!({ "email": "nobody@example.com", "password": "secret" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_downgrades_lapsed_premium_and_notifies_once() {
  let app = app().await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let mut account = app
    .store
    .find_account_by_email("a@example.com")
    .await
    .unwrap()
    .unwrap();
  account.subscription = Subscription {
    plan:       Plan::Premium,
    expires_at: Some(Utc::now() - Duration::days(1)),
  };
  app.store.update_account(&account).await.unwrap();
  app.mailer.drain();

  let (status, body) = send(
    &app,
    post_json(
      "/auth/login",
      json!({ "email": "a@example.com", "password": "secret" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["subscription"]["plan"], "basic");
  assert!(body["subscription"]["expires_at"].is_null());

  // Persisted, and exactly one notification went out.
  let stored = app.store.get_account(account.account_id).await.unwrap().unwrap();
  assert_eq!(stored.subscription.plan, Plan::Basic);
  let sent = app.mailer.drain();
  assert_eq!(sent.len(), 1);
  assert!(sent[0].1.contains("premium"));
}

#[tokio::test]
async fn login_leaves_perpetual_premium_untouched() {
  let app = app().await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let mut account = app
    .store
    .find_account_by_email("a@example.com")
    .await
    .unwrap()
    .unwrap();
  account.subscription =
    Subscription { plan: Plan::Premium, expires_at: None };
  app.store.update_account(&account).await.unwrap();
  app.mailer.drain();

  let (status, body) = send(
    &app,
    post_json(
      "/auth/login",
      json!({ "email": "a@example.com", "password": "secret" }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["subscription"]["plan"], "premium");
  assert!(app.mailer.drain().is_empty());
}

// ─── Account edit & geolocation ──────────────────────────────────────────────

#[tokio::test]
async fn address_edit_triggers_the_geocoder_once() {
  let app = app().await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let mut account = app
    .store
    .find_account_by_email("a@example.com")
    .await
    .unwrap()
    .unwrap();
  account.contact.city = Some("Paris".into());

  let (status, body) = send(
    &app,
    with_auth(put_json("/account", update_body(&account)), "a@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 1);
  assert_eq!(body["geolocation"]["failed"], false);
  assert!(!body["geolocation"]["coordinates"].is_null());

  // Same payload again: no address change, no second lookup.
  let (status, _) = send(
    &app,
    with_auth(put_json("/account", update_body(&account)), "a@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn country_only_address_never_geocodes() {
  let app = app().await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let mut account = app
    .store
    .find_account_by_email("a@example.com")
    .await
    .unwrap()
    .unwrap();
  account.contact.country = "Belgique".into();

  let (status, _) = send(
    &app,
    with_auth(put_json("/account", update_body(&account)), "a@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn geocoding_failure_is_recorded_not_raised() {
  let app = app_with(ApiConfig::default(), None).await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let mut account = app
    .store
    .find_account_by_email("a@example.com")
    .await
    .unwrap()
    .unwrap();
  account.contact.city = Some("Nulle-Part".into());

  let (status, body) = send(
    &app,
    with_auth(put_json("/account", update_body(&account)), "a@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["geolocation"]["failed"], true);
  assert!(body["geolocation"]["coordinates"].is_null());
}

#[tokio::test]
async fn account_kind_cannot_change() {
  let app = app().await;
  register(&app, AccountKind::Family, "a@example.com").await;

  let account = app
    .store
    .find_account_by_email("a@example.com")
    .await
    .unwrap()
    .unwrap();
  let mut body = update_body(&account);
  body["detail"] = json!({ "kind": "provider" });

  let (status, _) = send(
    &app,
    with_auth(put_json("/account", body), "a@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn account_endpoints_require_auth() {
  let app = app().await;
  let (status, _) = send(&app, get("/account")).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_shows_pseudo_and_respects_phone_opt_in() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  let mut provider = complete_profile(&app, "p@example.com").await;
  provider.contact.phone = Some("+33612345678".into());
  app.store.update_account(&provider).await.unwrap();

  let path = format!("/providers/{}", provider.account_id);
  let (status, body) = send(&app, get(&path)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["pseudo"], "Claire F.");
  assert!(body["phone"].is_null());
  assert!(body.get("email").is_none());

  provider.contact.phone_visible = true;
  app.store.update_account(&provider).await.unwrap();
  let (_, body) = send(&app, get(&path)).await;
  assert_eq!(body["phone"], "+33612345678");
}

#[tokio::test]
async fn invisible_profile_is_indistinguishable_from_missing() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  register(&app, AccountKind::Family, "f@example.com").await;
  let mut provider = complete_profile(&app, "p@example.com").await;
  provider.visibility.global = false;
  app.store.update_account(&provider).await.unwrap();

  let path = format!("/providers/{}", provider.account_id);

  let (status, _) = send(&app, get(&path)).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) =
    send(&app, with_auth(get(&path), "f@example.com")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  // Self-view stays possible.
  let (status, _) =
    send(&app, with_auth(get(&path), "p@example.com")).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_404s_on_kind_mismatch() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  let provider = complete_profile(&app, "p@example.com").await;

  let (status, _) = send(
    &app,
    get(&format!("/families/{}", provider.account_id)),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn favorites_add_twice_remove_twice() {
  let app = app().await;
  register(&app, AccountKind::Family, "f@example.com").await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  let provider = complete_profile(&app, "p@example.com").await;

  let uri = format!("/api/v1/providers/{}", provider.account_id);
  let body = json!({ "resource_uri": uri });

  for _ in 0..2 {
    let (status, _) = send(
      &app,
      with_auth(
        post_json("/account/favorites/add", body.clone()),
        "f@example.com",
      ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  let (status, data) = send(
    &app,
    with_auth(get("/account/favorites"), "f@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(data["providers"].as_array().unwrap().len(), 1);
  assert_eq!(data["providers"][0]["pseudo"], "Claire F.");
  assert!(data["families"].as_array().unwrap().is_empty());

  for _ in 0..2 {
    let (status, _) = send(
      &app,
      with_auth(
        post_json("/account/favorites/remove", body.clone()),
        "f@example.com",
      ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  let (_, data) = send(
    &app,
    with_auth(get("/account/favorites"), "f@example.com"),
  )
  .await;
  assert!(data["providers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_favorite_reference_is_rejected_before_the_ledger() {
  let app = app().await;
  register(&app, AccountKind::Family, "f@example.com").await;

  for uri in ["/api/v1/gadgets/42", "/api/v1/providers/not-a-uuid", ""] {
    let (status, _) = send(
      &app,
      with_auth(
        post_json("/account/favorites/add", json!({ "resource_uri": uri })),
        "f@example.com",
      ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri:?}");
  }

  let (_, data) = send(
    &app,
    with_auth(get("/account/favorites"), "f@example.com"),
  )
  .await;
  assert!(data["providers"].as_array().unwrap().is_empty());
  assert!(data["families"].as_array().unwrap().is_empty());
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_marks_the_viewers_favorites() {
  let app = app().await;
  register(&app, AccountKind::Family, "f@example.com").await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  let provider = complete_profile(&app, "p@example.com").await;

  let (status, hits) = send(&app, get("/search?kind=provider")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(hits.as_array().unwrap().len(), 1);
  assert_eq!(hits[0]["favorited"], false);

  let uri = format!("/api/v1/providers/{}", provider.account_id);
  send(
    &app,
    with_auth(
      post_json("/account/favorites/add", json!({ "resource_uri": uri })),
      "f@example.com",
    ),
  )
  .await;

  let (_, hits) = send(
    &app,
    with_auth(get("/search?kind=provider"), "f@example.com"),
  )
  .await;
  assert_eq!(hits[0]["favorited"], true);
}

#[tokio::test]
async fn search_excludes_hidden_accounts() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  let mut provider = complete_profile(&app, "p@example.com").await;
  provider.visibility.global = false;
  app.store.update_account(&provider).await.unwrap();

  let (_, hits) = send(&app, get("/search?kind=provider")).await;
  assert!(hits.as_array().unwrap().is_empty());
}

// ─── References ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn references_are_a_provider_collection() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  register(&app, AccountKind::Family, "f@example.com").await;
  let family = app
    .store
    .find_account_by_email("f@example.com")
    .await
    .unwrap()
    .unwrap();

  let (status, reference) = send(
    &app,
    with_auth(
      post_json(
        "/account/references",
        json!({
          "missions": "garde après l'école",
          "family_id": family.account_id,
          "date_from": "2025-09-01",
          "current": true,
          "setting": "parents_home",
        }),
      ),
      "p@example.com",
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(reference["current"], true);

  let (status, listed) = send(
    &app,
    with_auth(get("/account/references"), "p@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed.as_array().unwrap().len(), 1);

  // Families have no reference collection at all.
  let (status, _) = send(
    &app,
    with_auth(get("/account/references"), "f@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reference_with_unknown_family_link_is_rejected() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;

  let (status, _) = send(
    &app,
    with_auth(
      post_json(
        "/account/references",
        json!({ "family_id": uuid::Uuid::new_v4() }),
      ),
      "p@example.com",
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ratings_aggregate_per_account() {
  let app = app().await;
  register(&app, AccountKind::Family, "f@example.com").await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  let provider = app
    .store
    .find_account_by_email("p@example.com")
    .await
    .unwrap()
    .unwrap();

  let path = format!("/accounts/{}/ratings", provider.account_id);
  let (status, _) = send(
    &app,
    with_auth(
      post_json(
        &path,
        json!({
          "reliability": 4, "amiability": 2, "seriousness": 1, "punctuality": 3
        }),
      ),
      "f@example.com",
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, data) = send(&app, get(&path)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(data["summary"]["count"], 1);
  assert_eq!(data["summary"]["overall"], 2.5);
  assert_eq!(data["summary"]["percent"], 50);
}

#[tokio::test]
async fn rating_yourself_or_out_of_range_is_rejected() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;
  let provider = app
    .store
    .find_account_by_email("p@example.com")
    .await
    .unwrap()
    .unwrap();

  let path = format!("/accounts/{}/ratings", provider.account_id);
  let (status, _) = send(
    &app,
    with_auth(
      post_json(
        &path,
        json!({
          "reliability": 4, "amiability": 2, "seriousness": 1, "punctuality": 3
        }),
      ),
      "p@example.com",
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  register(&app, AccountKind::Family, "f@example.com").await;
  let (status, _) = send(
    &app,
    with_auth(
      post_json(
        &path,
        json!({
          "reliability": 9, "amiability": 0, "seriousness": 0, "punctuality": 0
        }),
      ),
      "f@example.com",
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Planning ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn planning_defaults_empty_and_round_trips() {
  let app = app().await;
  register(&app, AccountKind::Provider, "p@example.com").await;

  let (status, body) = send(
    &app,
    with_auth(get("/account/planning"), "p@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["weekdays"].as_array().unwrap().is_empty());

  let planning = json!({
    "start_date": "2026-09-01",
    "weekdays": ["Mon", "Wed"],
    "slots": ["morning", "evening"],
  });
  let (status, _) = send(
    &app,
    with_auth(put_json("/account/planning", planning.clone()), "p@example.com"),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, body) = send(
    &app,
    with_auth(get("/account/planning"), "p@example.com"),
  )
  .await;
  assert_eq!(body["slots"].as_array().unwrap().len(), 2);
  assert_eq!(body["start_date"], "2026-09-01");
}

// ─── Plan upgrade ────────────────────────────────────────────────────────────

#[tokio::test]
async fn premium_upgrade_sets_plan_and_expiry() {
  let app = app().await;
  register(&app, AccountKind::Family, "f@example.com").await;

  let expires = Utc::now() + Duration::days(365);
  let (status, body) = send(
    &app,
    with_auth(
      post_json("/account/plan/premium", json!({ "expires_at": expires })),
      "f@example.com",
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["subscription"]["plan"], "premium");

  let stored = app
    .store
    .find_account_by_email("f@example.com")
    .await
    .unwrap()
    .unwrap();
  assert!(stored.subscription.is_premium());
}
