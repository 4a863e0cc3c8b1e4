//! SQL schema for the Sitter SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id      TEXT PRIMARY KEY,
    created_at      TEXT NOT NULL,       -- ISO 8601 UTC; store-assigned
    kind            TEXT NOT NULL,       -- 'family' | 'provider'
    email           TEXT NOT NULL UNIQUE,
    password_hash   TEXT NOT NULL,       -- argon2 PHC string
    activation_key  TEXT,
    is_active       INTEGER NOT NULL DEFAULT 0,
    newsletter      INTEGER NOT NULL DEFAULT 1,
    -- contact block
    last_name       TEXT,
    first_name      TEXT,
    street          TEXT,
    postal_code     TEXT,
    city            TEXT,
    country         TEXT NOT NULL DEFAULT 'France',
    phone           TEXT,
    phone_visible   INTEGER NOT NULL DEFAULT 0,
    profile_photo   TEXT,
    -- visibility flags; real columns so search can filter on them
    visible_to_family   INTEGER NOT NULL DEFAULT 1,
    visible_to_provider INTEGER NOT NULL DEFAULT 1,
    visible_globally    INTEGER NOT NULL DEFAULT 1,
    -- subscription
    plan            TEXT NOT NULL DEFAULT 'basic',   -- 'basic' | 'premium'
    plan_expires_at TEXT,
    -- structured blocks; JSON payloads
    criteria_json   TEXT NOT NULL DEFAULT '{}',
    detail_json     TEXT NOT NULL
);

-- One-to-one with its account.
CREATE TABLE IF NOT EXISTS geolocations (
    account_id TEXT PRIMARY KEY REFERENCES accounts(account_id),
    latitude   REAL,
    longitude  REAL,
    failed     INTEGER NOT NULL DEFAULT 0
);

-- At most one row per (owner, target) pair; duplicate adds are no-ops.
CREATE TABLE IF NOT EXISTS favorites (
    owner_id    TEXT NOT NULL REFERENCES accounts(account_id),
    target_kind TEXT NOT NULL,
    target_id   TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE (owner_id, target_kind, target_id)
);

CREATE TABLE IF NOT EXISTS provider_references (
    reference_id TEXT PRIMARY KEY,
    provider_id  TEXT NOT NULL REFERENCES accounts(account_id),
    name         TEXT,
    email        TEXT,
    phone        TEXT,
    missions     TEXT,
    family_id    TEXT REFERENCES accounts(account_id),
    date_from    TEXT,
    date_to      TEXT,
    current      INTEGER NOT NULL DEFAULT 0,
    setting      TEXT
);

CREATE TABLE IF NOT EXISTS ratings (
    rating_id   TEXT PRIMARY KEY,
    account_id  TEXT NOT NULL REFERENCES accounts(account_id),
    author_id   TEXT,
    reliability INTEGER NOT NULL DEFAULT 0,
    amiability  INTEGER NOT NULL DEFAULT 0,
    seriousness INTEGER NOT NULL DEFAULT 0,
    punctuality INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

-- Availability; weekday and slot sets are JSON arrays.
CREATE TABLE IF NOT EXISTS plannings (
    account_id TEXT PRIMARY KEY REFERENCES accounts(account_id),
    start_date TEXT,
    weekdays   TEXT NOT NULL DEFAULT '[]',
    slots      TEXT NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS accounts_kind_idx       ON accounts(kind);
CREATE INDEX IF NOT EXISTS favorites_owner_idx     ON favorites(owner_id);
CREATE INDEX IF NOT EXISTS references_provider_idx ON provider_references(provider_id);
CREATE INDEX IF NOT EXISTS ratings_account_idx     ON ratings(account_id);

PRAGMA user_version = 1;
";
