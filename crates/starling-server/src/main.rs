//! Starling server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the review API over HTTP.
//!
//! Every key can also be set through `STARLING_`-prefixed environment
//! variables, e.g. `STARLING_PORT=9000` or
//! `STARLING_CLASSIFIER__API_KEY=sk-...`. Without a `[classifier]` section
//! the server runs with enrichment disabled: feeds still work, derived
//! fields simply stay null.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use starling_api::{AccessLog, AppState, router};
use starling_classify::{ClassifierConfig, HttpClassifier};
use starling_core::enrich::{Classifier, Enricher, NullClassifier};
use starling_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Starling review server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  classifier: Option<ClassifierSettings>,
}

#[derive(Deserialize, Clone)]
struct ClassifierSettings {
  /// OpenAI-compatible service root, e.g. `https://api.openai.com`.
  base_url:     String,
  api_key:      Option<String>,
  #[serde(default = "default_model")]
  model:        String,
  #[serde(default = "default_timeout_secs")]
  timeout_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("starling.db") }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_timeout_secs() -> u64 { 30 }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("STARLING").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match &server_cfg.classifier {
    Some(settings) => {
      let timeout = Duration::from_secs(settings.timeout_secs);
      let classifier = HttpClassifier::new(ClassifierConfig {
        base_url: settings.base_url.clone(),
        api_key:  settings.api_key.clone(),
        model:    settings.model.clone(),
        timeout,
      })
      .map_err(|e| anyhow::anyhow!("classifier setup failed: {e}"))?;

      tracing::info!(model = %settings.model, "classifier enabled");
      serve(store, Enricher::with_timeout(classifier, timeout), &server_cfg)
        .await
    }
    None => {
      tracing::info!("no classifier configured; derived fields stay null");
      serve(store, Enricher::new(NullClassifier), &server_cfg).await
    }
  }
}

async fn serve<C>(
  store: SqliteStore,
  enricher: Enricher<C>,
  cfg: &ServerConfig,
) -> anyhow::Result<()>
where
  C: Classifier + 'static,
{
  let store = Arc::new(store);
  let state = AppState {
    access:   AccessLog::spawn(store.clone()),
    enricher: Arc::new(enricher),
    store,
  };

  let app = router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
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
