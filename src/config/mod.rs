use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// Notice pages live at `<notice_base_url>/<id>?`.
    #[serde(default = "default_notice_base_url")]
    pub notice_base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// One `<id>.json` per unit.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Downloaded unit images.
    #[serde(default = "default_res_dir")]
    pub res_dir: PathBuf,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Rewrite `<id>.json` when it already exists.
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_notice_base_url() -> String {
    "https://api-danmemo-us.wrightflyer.net/asset/notice/view".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_request_delay_ms() -> u64 {
    250
}
fn default_max_retries() -> u32 {
    3
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.140 Safari/537.36 Edge/17.17134".to_string()
}
fn default_accept_language() -> String {
    "en".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_res_dir() -> PathBuf {
    PathBuf::from(".res")
}
fn default_true() -> bool {
    true
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            notice_base_url: default_notice_base_url(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            res_dir: default_res_dir(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = ::config::Config::builder()
            .add_source(
                ::config::File::with_name("config/default")
                    .required(false)
                    .format(::config::FileFormat::Toml),
            )
            .add_source(
                ::config::File::with_name("config/local")
                    .required(false)
                    .format(::config::FileFormat::Toml),
            )
            .add_source(::config::Environment::with_prefix("DANMEMO").separator("__"))
            .build()?;

        let app_cfg = cfg.try_deserialize().unwrap_or_else(|e| {
            warn!("Ignoring unreadable configuration: {}", e);
            AppConfig::default()
        });
        Ok(app_cfg)
    }
}

impl ScraperConfig {
    /// `--id 310` → `<notice_base_url>/310?`
    pub fn notice_url(&self, id: u64) -> Result<url::Url> {
        let base = self.notice_base_url.trim_end_matches('/');
        Ok(url::Url::parse(&format!("{}/{}?", base, id))?)
    }
}
