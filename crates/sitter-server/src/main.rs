//! sitter-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the marketplace JSON API under
//! `/api/v1`.
//!
//! # Password hash generation
//!
//! To generate an argon2 PHC string for seeding accounts by hand:
//!
//! ```
//! cargo run -p sitter-server --bin server -- --hash-password
//! ```

mod geocode;
mod mail;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use serde::Deserialize;
use sitter_api::{ApiConfig, AppState, api_router};
use sitter_core::plan::PlanPolicy;
use sitter_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use geocode::HttpGeocoder;
use mail::{SmtpConfig, SmtpMailer};

#[derive(Parser)]
#[command(author, version, about = "Sitter marketplace API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

fn default_host() -> String {
  "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
  8080
}

fn default_base_url() -> String {
  "http://localhost:8080".to_owned()
}

fn default_store_path() -> PathBuf {
  PathBuf::from("sitter.db")
}

fn default_search_limit() -> usize {
  20
}

fn default_geocoder_endpoint() -> String {
  geocode::DEFAULT_ENDPOINT.to_owned()
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host: String,
  #[serde(default = "default_port")]
  port: u16,
  /// Public base URL used in activation links.
  #[serde(default = "default_base_url")]
  base_url: String,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  #[serde(default = "default_search_limit")]
  search_limit: usize,
  #[serde(default = "default_geocoder_endpoint")]
  geocoder_endpoint: String,
  #[serde(default)]
  smtp: SmtpConfig,
  /// Free-premium signup window; closed when absent.
  #[serde(default)]
  plan_policy: PlanPolicy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password_from_stdin()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SITTER").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // External collaborators.
  let geocoder = HttpGeocoder::new(server_cfg.geocoder_endpoint.clone())
    .map_err(|e| anyhow::anyhow!("geocoder setup failed: {e}"))?;
  let mailer = SmtpMailer::from_config(&server_cfg.smtp)?;

  // Build application state.
  let state = AppState {
    store:    Arc::new(store),
    geocoder: Arc::new(geocoder),
    mailer:   Arc::new(mailer),
    config:   Arc::new(ApiConfig {
      base_url:     server_cfg.base_url.clone(),
      search_limit: server_cfg.search_limit,
      plan_policy:  server_cfg.plan_policy,
    }),
  };

  let app = axum::Router::new()
    .nest("/api/v1", api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
