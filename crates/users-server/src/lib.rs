//! HTTP server assembly for the user resource service.
//!
//! Loads [`ServerConfig`], wraps the [`users_api`] router in a request
//! tracing layer and leaves binding to the binary.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use users_store_sqlite::SqliteStore;

/// Prefix for environment overrides, e.g. `USERS_PORT=9000`.
pub const ENV_PREFIX: &str = "USERS";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Read `path` (if it exists) and then the `USERS_*` environment on top of
/// the built-in defaults.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
  build_config(
    File::from(path).required(false),
    Environment::with_prefix(ENV_PREFIX),
  )
}

fn build_config<T>(file: T, env: Environment) -> Result<ServerConfig, ConfigError>
where
  T: Source + Send + Sync + 'static,
{
  Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8000_i64)?
    .set_default("store_path", "users.sqlite3")?
    .add_source(file)
    .add_source(env)
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: REST routes plus per-request tracing spans.
pub fn app(store: SqliteStore) -> Router {
  users_api::api_router(Arc::new(store)).layer(TraceLayer::new_for_http())
}
