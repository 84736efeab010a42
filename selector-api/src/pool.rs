use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Character list read from disk on first use and kept for the life of the pool.
#[derive(Debug)]
pub struct CharacterPool {
    path: PathBuf,
    entries: OnceLock<Vec<String>>,
}

impl CharacterPool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceLock::new(),
        }
    }

    /// Reads the file up front without blocking the runtime. Later calls to
    /// [`CharacterPool::entries`] never touch the filesystem.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = parse_entries(&path, tokio::fs::read_to_string(&path).await);
        let cell = OnceLock::new();
        let _ = cell.set(entries);
        Self { path, entries: cell }
    }

    /// A pool that never touches the filesystem.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cell = OnceLock::new();
        let _ = cell.set(clean_lines(entries));
        Self {
            path: PathBuf::new(),
            entries: cell,
        }
    }

    pub fn entries(&self) -> &[String] {
        self.entries.get_or_init(|| load_entries(&self.path))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn clean_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| l.as_ref().trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Trimmed non-blank lines of `path`. A missing or unreadable file is an empty pool.
pub fn load_entries(path: &Path) -> Vec<String> {
    parse_entries(path, fs::read_to_string(path))
}

fn parse_entries(path: &Path, read: io::Result<String>) -> Vec<String> {
    match read {
        Ok(s) => {
            let entries = clean_lines(s.lines());
            if entries.is_empty() {
                warn!("character file {} is empty", path.display());
            } else {
                info!("loaded {} characters from {}", entries.len(), path.display());
            }
            entries
        }
        Err(e) => {
            warn!("character file {} not readable: {e}", path.display());
            Vec::new()
        }
    }
}

/// The search key of a pool line: its first comma-separated field.
pub fn character_tag(line: &str) -> &str {
    line.split(',').next().unwrap_or(line).trim()
}
