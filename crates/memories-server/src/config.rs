use std::path::PathBuf;

use anyhow::{Context, Result};

/// Process configuration, read from `MEMORIES_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub base_url: String,
    pub max_upload_bytes: usize,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let port = var("MEMORIES_PORT", "8000")
            .parse()
            .context("MEMORIES_PORT must be a port number")?;
        let max_upload_bytes = var("MEMORIES_MAX_UPLOAD_BYTES", "26214400")
            .parse()
            .context("MEMORIES_MAX_UPLOAD_BYTES must be a byte count")?;

        Ok(Self {
            host: var("MEMORIES_HOST", "0.0.0.0"),
            port,
            db_path: var("MEMORIES_DB_PATH", "memories.db").into(),
            upload_dir: var("MEMORIES_UPLOAD_DIR", "uploads").into(),
            base_url: var("MEMORIES_BASE_URL", "http://localhost:8000"),
            max_upload_bytes,
            seed_demo: parse_flag(&var("MEMORIES_SEED_DEMO", "true")),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
