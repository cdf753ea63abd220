use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use log::warn;

/// Where the bearer token lives between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self);
}

/// Token kept in a plain file, one line, no trailing newline required.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, token)
            .with_context(|| format!("failed to write token to {}", self.path.display()))
    }

    fn clear(&self) {
        if !self.path.exists() {
            return;
        }
        if let Err(err) = fs::remove_file(&self.path) {
            warn!("failed to remove token file {}: {err}", self.path.display());
        }
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("token store poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = std::env::temp_dir().join(format!("reviewboard-token-{}", std::process::id()));
        let store = FileTokenStore::new(dir.join("token"));
        assert_eq!(store.load(), None);

        store.save("abc123\n").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc123"));

        store.clear();
        assert_eq!(store.load(), None);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn memory_store_clears() {
        let store = MemoryTokenStore::with_token("t");
        assert_eq!(store.load().as_deref(), Some("t"));
        store.clear();
        assert_eq!(store.load(), None);
    }
}
