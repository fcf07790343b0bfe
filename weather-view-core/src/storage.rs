//! File-backed string key/value store that survives restarts.
//!
//! Every mutation is written through to disk immediately, so a value set right
//! before a reload is visible to the next session.

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::config::project_dirs;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Open the store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = project_dirs()?;
        Self::open(dirs.data_dir().join("local-storage.toml"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read local storage: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse local storage: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.persist()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(&self.items).context("Failed to serialize local storage")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write local storage: {}", self.path.display()))?;

        tracing::debug!(
            path = %self.path.display(),
            entries = self.items.len(),
            "local storage saved"
        );
        Ok(())
    }
}
