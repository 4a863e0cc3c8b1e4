//! [`SqliteStore`] — the SQLite implementation of [`AccountStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use sitter_core::{
  account::{Account, AccountDetail, AccountKind, ContactInfo, Visibility},
  criteria::Criteria,
  favorite::{Favorite, ResourceRef},
  geo::Geolocation,
  planning::Planning,
  rating::{NewRating, Rating},
  reference::{NewReference, Reference},
  store::{AccountStore, Credentials, NewAccount, SearchQuery},
  visibility::VisibilityFilter,
};

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawCredentials, RawFavorite, RawPlanning, RawRating,
    RawReference, encode_criteria, encode_date, encode_detail, encode_dt,
    encode_kind, encode_plan, encode_setting, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Sitter account store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Column list shared by every account SELECT; `a` is the accounts table,
/// `g` the joined geolocations table.
const ACCOUNT_COLUMNS: &str = "\
  a.account_id, a.created_at, a.email, a.is_active, a.newsletter, \
  a.last_name, a.first_name, a.street, a.postal_code, a.city, a.country, \
  a.phone, a.phone_visible, a.profile_photo, \
  a.visible_to_family, a.visible_to_provider, a.visible_globally, \
  a.plan, a.plan_expires_at, a.criteria_json, a.detail_json, \
  g.latitude, g.longitude, g.failed";

/// Read one joined account row in [`ACCOUNT_COLUMNS`] order.
fn read_account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAccount> {
  Ok(RawAccount {
    account_id:          row.get(0)?,
    created_at:          row.get(1)?,
    email:               row.get(2)?,
    is_active:           row.get(3)?,
    newsletter:          row.get(4)?,
    last_name:           row.get(5)?,
    first_name:          row.get(6)?,
    street:              row.get(7)?,
    postal_code:         row.get(8)?,
    city:                row.get(9)?,
    country:             row.get(10)?,
    phone:               row.get(11)?,
    phone_visible:       row.get(12)?,
    profile_photo:       row.get(13)?,
    visible_to_family:   row.get(14)?,
    visible_to_provider: row.get(15)?,
    visible_globally:    row.get(16)?,
    plan:                row.get(17)?,
    plan_expires_at:     row.get(18)?,
    criteria_json:       row.get(19)?,
    detail_json:         row.get(20)?,
    geo_latitude:        row.get(21)?,
    geo_longitude:       row.get(22)?,
    geo_failed:          row.get(23)?,
  })
}

fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one account by an equality predicate on a fixed column.
  async fn get_account_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<Account>> {
    let sql = format!(
      "SELECT {ACCOUNT_COLUMNS}
       FROM accounts a
       LEFT JOIN geolocations g ON g.account_id = a.account_id
       WHERE a.{column} = ?1"
    );

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], read_account_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_account(&self, input: NewAccount) -> Result<Account> {
    let account = Account {
      account_id:   Uuid::new_v4(),
      created_at:   Utc::now(),
      email:        input.email,
      is_active:    false,
      newsletter:   true,
      contact:      ContactInfo::default(),
      visibility:   Visibility::default(),
      subscription: input.subscription,
      criteria:     Criteria::default(),
      detail:       AccountDetail::empty(input.kind),
      geolocation:  None,
    };

    let id_str       = encode_uuid(account.account_id);
    let at_str       = encode_dt(account.created_at);
    let kind_str     = encode_kind(input.kind).to_owned();
    let email        = account.email.clone();
    let plan_str     = encode_plan(account.subscription.plan).to_owned();
    let expires_str  = account.subscription.expires_at.map(encode_dt);
    let criteria_str = encode_criteria(&account.criteria)?;
    let detail_str   = encode_detail(&account.detail)?;
    let password     = input.password_hash;
    let key          = input.activation_key;

    let res = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (
             account_id, created_at, kind, email, password_hash,
             activation_key, plan, plan_expires_at, criteria_json, detail_json
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            at_str,
            kind_str,
            email,
            password,
            key,
            plan_str,
            expires_str,
            criteria_str,
            detail_str,
          ],
        )?;
        Ok(())
      })
      .await;

    match res {
      Ok(()) => Ok(account),
      Err(e) if is_unique_violation(&e) => {
        Err(Error::EmailTaken(account.email))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    self.get_account_where("account_id", encode_uuid(id)).await
  }

  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
    self.get_account_where("email", email.to_owned()).await
  }

  async fn update_account(&self, account: &Account) -> Result<()> {
    let id_str       = encode_uuid(account.account_id);
    let email        = account.email.clone();
    let c            = account.contact.clone();
    let v            = account.visibility;
    let plan_str     = encode_plan(account.subscription.plan).to_owned();
    let expires_str  = account.subscription.expires_at.map(encode_dt);
    let criteria_str = encode_criteria(&account.criteria)?;
    let detail_str   = encode_detail(&account.detail)?;
    let is_active    = account.is_active;
    let newsletter   = account.newsletter;

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET
             email = ?2, is_active = ?3, newsletter = ?4,
             last_name = ?5, first_name = ?6, street = ?7, postal_code = ?8,
             city = ?9, country = ?10, phone = ?11, phone_visible = ?12,
             profile_photo = ?13,
             visible_to_family = ?14, visible_to_provider = ?15,
             visible_globally = ?16,
             plan = ?17, plan_expires_at = ?18,
             criteria_json = ?19, detail_json = ?20
           WHERE account_id = ?1",
          rusqlite::params![
            id_str,
            email,
            is_active,
            newsletter,
            c.last_name,
            c.first_name,
            c.street,
            c.postal_code,
            c.city,
            c.country,
            c.phone,
            c.phone_visible,
            c.profile_photo,
            v.to_family,
            v.to_provider,
            v.global,
            plan_str,
            expires_str,
            criteria_str,
            detail_str,
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::AccountNotFound(account.account_id));
    }
    Ok(())
  }

  async fn credentials_for_email(
    &self,
    email: &str,
  ) -> Result<Option<Credentials>> {
    let email = email.to_owned();

    let raw: Option<RawCredentials> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT account_id, password_hash FROM accounts WHERE email = ?1",
              rusqlite::params![email],
              |row| {
                Ok(RawCredentials {
                  account_id:    row.get(0)?,
                  password_hash: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCredentials::into_credentials).transpose()
  }

  async fn claim_activation_key(&self, key: &str) -> Result<Option<Account>> {
    let key = key.to_owned();

    let id_str: Option<String> = self
      .conn
      .call(move |conn| {
        let id: Option<String> = conn
          .query_row(
            "SELECT account_id FROM accounts WHERE activation_key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(id) = &id {
          conn.execute(
            "UPDATE accounts SET is_active = 1 WHERE account_id = ?1",
            rusqlite::params![id],
          )?;
        }
        Ok(id)
      })
      .await?;

    match id_str {
      Some(id) => self.get_account_where("account_id", id).await,
      None => Ok(None),
    }
  }

  // ── Geolocation ───────────────────────────────────────────────────────────

  async fn set_geolocation(
    &self,
    account_id: Uuid,
    geolocation: &Geolocation,
  ) -> Result<()> {
    let id_str    = encode_uuid(account_id);
    let latitude  = geolocation.coordinates.map(|c| c.latitude);
    let longitude = geolocation.coordinates.map(|c| c.longitude);
    let failed    = geolocation.failed;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO geolocations
             (account_id, latitude, longitude, failed)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, latitude, longitude, failed],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Search ────────────────────────────────────────────────────────────────

  async fn search(
    &self,
    filter: VisibilityFilter,
    query: &SearchQuery,
  ) -> Result<Vec<Account>> {
    let text_pattern = query.text.as_deref().map(|t| format!("%{t}%"));
    let kind_str     = query.kind.map(encode_kind).map(str::to_owned);
    let limit_val    = query.limit.unwrap_or(100) as i64;
    let offset_val   = query.offset.unwrap_or(0) as i64;

    // The per-kind flag half of the visibility predicate; the global flag
    // is always required. The derived score gate is applied after decoding.
    let viewer_cond = match filter.viewer {
      Some(AccountKind::Family) => Some("a.visible_to_family = 1"),
      Some(AccountKind::Provider) => Some("a.visible_to_provider = 1"),
      None => None,
    };

    let raws: Vec<RawAccount> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec!["a.visible_globally = 1"];
        if let Some(cond) = viewer_cond {
          conds.push(cond);
        }
        if text_pattern.is_some() {
          conds.push(
            "(a.last_name LIKE ?1 OR a.first_name LIKE ?1
              OR a.city LIKE ?1 OR a.criteria_json LIKE ?1)",
          );
        }
        if kind_str.is_some() {
          conds.push("a.kind = ?2");
        }

        let sql = format!(
          "SELECT {ACCOUNT_COLUMNS}
           FROM accounts a
           LEFT JOIN geolocations g ON g.account_id = a.account_id
           WHERE {}
           ORDER BY a.created_at DESC
           LIMIT ?3 OFFSET ?4",
          conds.join(" AND "),
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              text_pattern.as_deref(),
              kind_str.as_deref(),
              limit_val,
              offset_val,
            ],
            read_account_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    let mut accounts: Vec<Account> = raws
      .into_iter()
      .map(RawAccount::into_account)
      .collect::<Result<_>>()?;

    // Completeness gate on the derived score (never stored).
    accounts.retain(Account::visibility_score_is_enough);

    Ok(accounts)
  }

  // ── Favorites ─────────────────────────────────────────────────────────────

  async fn add_favorite(
    &self,
    owner_id: Uuid,
    target: ResourceRef,
  ) -> Result<bool> {
    let owner_str  = encode_uuid(owner_id);
    let kind_str   = encode_kind(target.kind).to_owned();
    let target_str = encode_uuid(target.id);
    let at_str     = encode_dt(Utc::now());

    let inserted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO favorites
             (owner_id, target_kind, target_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![owner_str, kind_str, target_str, at_str],
        )?)
      })
      .await?;

    Ok(inserted > 0)
  }

  async fn remove_favorite(
    &self,
    owner_id: Uuid,
    target: ResourceRef,
  ) -> Result<()> {
    let owner_str  = encode_uuid(owner_id);
    let kind_str   = encode_kind(target.kind).to_owned();
    let target_str = encode_uuid(target.id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM favorites
           WHERE owner_id = ?1 AND target_kind = ?2 AND target_id = ?3",
          rusqlite::params![owner_str, kind_str, target_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_favorites(&self, owner_id: Uuid) -> Result<Vec<Favorite>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawFavorite> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT owner_id, target_kind, target_id, created_at
           FROM favorites
           WHERE owner_id = ?1
           ORDER BY created_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| {
            Ok(RawFavorite {
              owner_id:    row.get(0)?,
              target_kind: row.get(1)?,
              target_id:   row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFavorite::into_favorite).collect()
  }

  // ── References ────────────────────────────────────────────────────────────

  async fn add_reference(&self, input: NewReference) -> Result<Reference> {
    let reference = Reference {
      reference_id: Uuid::new_v4(),
      provider_id:  input.provider_id,
      name:         input.name,
      email:        input.email,
      phone:        input.phone,
      missions:     input.missions,
      family_id:    input.family_id,
      date_from:    input.date_from,
      date_to:      input.date_to,
      current:      input.current,
      setting:      input.setting,
    };

    let id_str       = encode_uuid(reference.reference_id);
    let provider_str = encode_uuid(reference.provider_id);
    let family_str   = reference.family_id.map(encode_uuid);
    let from_str     = reference.date_from.map(encode_date);
    let to_str       = reference.date_to.map(encode_date);
    let setting_str  = reference.setting.map(encode_setting);
    let name         = reference.name.clone();
    let email        = reference.email.clone();
    let phone        = reference.phone.clone();
    let missions     = reference.missions.clone();
    let current      = reference.current;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO provider_references (
             reference_id, provider_id, name, email, phone, missions,
             family_id, date_from, date_to, current, setting
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            provider_str,
            name,
            email,
            phone,
            missions,
            family_str,
            from_str,
            to_str,
            current,
            setting_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(reference)
  }

  async fn list_references(&self, provider_id: Uuid) -> Result<Vec<Reference>> {
    let provider_str = encode_uuid(provider_id);

    let raws: Vec<RawReference> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT reference_id, provider_id, name, email, phone, missions,
                  family_id, date_from, date_to, current, setting
           FROM provider_references
           WHERE provider_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![provider_str], |row| {
            Ok(RawReference {
              reference_id: row.get(0)?,
              provider_id:  row.get(1)?,
              name:         row.get(2)?,
              email:        row.get(3)?,
              phone:        row.get(4)?,
              missions:     row.get(5)?,
              family_id:    row.get(6)?,
              date_from:    row.get(7)?,
              date_to:      row.get(8)?,
              current:      row.get(9)?,
              setting:      row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReference::into_reference).collect()
  }

  // ── Ratings ───────────────────────────────────────────────────────────────

  async fn add_rating(&self, input: NewRating) -> Result<Rating> {
    let rating = Rating {
      rating_id:   Uuid::new_v4(),
      account_id:  input.account_id,
      author_id:   input.author_id,
      reliability: input.reliability,
      amiability:  input.amiability,
      seriousness: input.seriousness,
      punctuality: input.punctuality,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(rating.rating_id);
    let account_str = encode_uuid(rating.account_id);
    let author_str  = rating.author_id.map(encode_uuid);
    let at_str      = encode_dt(rating.created_at);
    let (reliability, amiability, seriousness, punctuality) = (
      rating.reliability,
      rating.amiability,
      rating.seriousness,
      rating.punctuality,
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ratings (
             rating_id, account_id, author_id,
             reliability, amiability, seriousness, punctuality, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            account_str,
            author_str,
            reliability,
            amiability,
            seriousness,
            punctuality,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(rating)
  }

  async fn list_ratings(&self, account_id: Uuid) -> Result<Vec<Rating>> {
    let account_str = encode_uuid(account_id);

    let raws: Vec<RawRating> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT rating_id, account_id, author_id,
                  reliability, amiability, seriousness, punctuality, created_at
           FROM ratings
           WHERE account_id = ?1
           ORDER BY created_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![account_str], |row| {
            Ok(RawRating {
              rating_id:   row.get(0)?,
              account_id:  row.get(1)?,
              author_id:   row.get(2)?,
              reliability: row.get(3)?,
              amiability:  row.get(4)?,
              seriousness: row.get(5)?,
              punctuality: row.get(6)?,
              created_at:  row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRating::into_rating).collect()
  }

  // ── Planning ──────────────────────────────────────────────────────────────

  async fn set_planning(
    &self,
    account_id: Uuid,
    planning: &Planning,
  ) -> Result<()> {
    let id_str       = encode_uuid(account_id);
    let start_str    = planning.start_date.map(encode_date);
    let weekdays_str = serde_json::to_string(&planning.weekdays)?;
    let slots_str    = serde_json::to_string(&planning.slots)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO plannings
             (account_id, start_date, weekdays, slots)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, start_str, weekdays_str, slots_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_planning(&self, account_id: Uuid) -> Result<Option<Planning>> {
    let id_str = encode_uuid(account_id);

    let raw: Option<RawPlanning> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT start_date, weekdays, slots
               FROM plannings WHERE account_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawPlanning {
                  start_date: row.get(0)?,
                  weekdays:   row.get(1)?,
                  slots:      row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlanning::into_planning).transpose()
  }
}
