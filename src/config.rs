use std::path::PathBuf;
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; AstroBot/1.0)";

/// Layered settings: built-in defaults, then an optional `folio.toml` in the
/// working directory, then `FOLIO_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Relative paths resolve under `data_dir`.
    pub blog_file: PathBuf,
    /// Relative paths resolve under `data_dir`.
    pub presentations_dir: PathBuf,
    pub slides_prefix: String,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub fetch_concurrency: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::with_env(Environment::with_prefix("FOLIO").try_parsing(true))
    }

    fn with_env(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("data_dir", "src/data")?
            .set_default("blog_file", "blog.json")?
            .set_default("presentations_dir", "presentations")?
            .set_default("slides_prefix", "/slides/")?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("fetch_timeout_secs", 10)?
            .set_default("fetch_concurrency", 8)?
            .add_source(File::with_name("folio").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn blog_path(&self) -> PathBuf {
        self.data_dir.join(&self.blog_file)
    }

    pub fn presentations_path(&self) -> PathBuf {
        self.data_dir.join(&self.presentations_dir)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
