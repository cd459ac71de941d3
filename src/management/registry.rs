use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use super::StoreError;

pub const REGISTRY_FILE: &str = "playlist_id.json";

/// Durable `date -> playlist id` mapping.
///
/// An entry means the date was handled: the playlist exists remotely and
/// later runs skip the date entirely.
#[derive(Debug, Clone)]
pub struct PlaylistRegistry {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl PlaylistRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(REGISTRY_FILE))
    }

    /// Reads the mapping from disk; a missing or empty file is an empty map.
    pub async fn load_from_cache(&self) -> Result<Self, StoreError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::IoError(e)),
        };

        let entries = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)?
        };

        Ok(Self {
            path: self.path.clone(),
            entries,
        })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn get(&self, date: &str) -> Option<&str> {
        self.entries.get(date).map(String::as_str)
    }

    /// Records the playlist id for a date and writes the file.
    pub async fn set(&mut self, date: &str, playlist_id: &str) -> Result<(), StoreError> {
        self.entries
            .insert(date.to_string(), playlist_id.to_string());
        self.persist().await
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
