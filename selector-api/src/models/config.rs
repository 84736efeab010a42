use anyhow::Context;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub search_path: String,
    pub user_agent: String,

    pub gallery_selector: String,
    pub post_selector: String,
    pub tags_attribute: String,

    pub max_concurrency: usize,
    pub rps_delay_ms: u64,
    pub max_retries: usize,
    pub request_timeout_secs: u64,
    pub backoff_base_ms: u64,

    pub max_attempts: usize,
    pub max_tags: usize,
    pub min_frequency: f64,
    pub gender_threshold: f64,

    pub character_file: PathBuf,
    /// Extra tags excluded on top of the built-in blacklist.
    pub tag_blacklist: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://danbooru.donmai.us".to_string(),
            search_path: "/posts".to_string(),
            user_agent: "character selector (hobby image pipeline)".to_string(),
            gallery_selector: "div.posts-container".to_string(),
            post_selector: "article.post-preview".to_string(),
            tags_attribute: "data-tags".to_string(),
            max_concurrency: 10,
            rps_delay_ms: 100,
            max_retries: 3,
            request_timeout_secs: 15,
            backoff_base_ms: 1000,
            max_attempts: 10,
            max_tags: 10,
            min_frequency: 0.5,
            gender_threshold: 0.8,
            character_file: PathBuf::from("characters.txt"),
            tag_blacklist: Vec::new(),
        }
    }
}

impl Config {
    pub fn rps_delay(&self) -> Duration {
        Duration::from_millis(self.rps_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Backoff after a failed attempt (0-based): `base * 2^attempt`.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u64.checked_shl(attempt as u32).unwrap_or(u64::MAX);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }
}

pub fn load_config(p: &Path) -> anyhow::Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parsing {}", p.display()))
}

pub fn default_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// Missing file means defaults; a file that exists but does not parse is an error.
pub fn load_or_default(p: &Path) -> anyhow::Result<Config> {
    if !p.exists() {
        warn!("[config] {} not found, using defaults", p.display());
        return Ok(Config::default());
    }
    let cfg = load_config(p)?;
    info!("[config] loaded {}", p.display());
    Ok(cfg)
}
