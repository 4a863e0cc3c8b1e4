//! Handler for `GET /search`.
//!
//! The visibility predicate derives from the (optional) authenticated
//! viewer and is applied inside the store query, never per row here.

use std::collections::HashSet;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use sitter_core::{
  account::{Account, AccountKind},
  store::{AccountStore, SearchQuery},
  visibility::VisibilityFilter,
};

use crate::{
  AppState,
  accounts::AccountSummary,
  auth::MaybeAccount,
  error::ApiError,
};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Kind of profile searched for; defaults to provider, like the original
  /// search form.
  pub kind:   Option<AccountKind>,
  /// Free-text filter over name, city and criteria.
  pub text:   Option<String>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// One search result, with the viewer's bookmark state attached.
#[derive(Debug, Serialize)]
pub struct SearchHit {
  #[serde(flatten)]
  pub account:   AccountSummary,
  pub favorited: bool,
}

/// `GET /search[?kind=provider][&text=...][&limit=...][&offset=...]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  MaybeAccount(viewer): MaybeAccount,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError>
where
  S: AccountStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let kind = params.kind.unwrap_or(AccountKind::Provider);
  let limit = params
    .limit
    .unwrap_or(state.config.search_limit)
    .min(state.config.search_limit);

  let filter = VisibilityFilter::for_viewer(viewer.as_ref().map(Account::kind));
  let query = SearchQuery {
    kind:   Some(kind),
    text:   params.text,
    limit:  Some(limit),
    offset: params.offset,
  };

  let accounts = state
    .store
    .search(filter, &query)
    .await
    .map_err(ApiError::store)?;

  // The viewer's existing bookmarks, to mark hits already favorited.
  let favorited: HashSet<_> = match &viewer {
    Some(v) => state
      .store
      .list_favorites(v.account_id)
      .await
      .map_err(ApiError::store)?
      .into_iter()
      .map(|f| f.target_id)
      .collect(),
    None => HashSet::new(),
  };

  let hits = accounts
    .iter()
    .map(|a| SearchHit {
      account:   AccountSummary::of(a),
      favorited: favorited.contains(&a.account_id),
    })
    .collect();

  Ok(Json(hits))
}
