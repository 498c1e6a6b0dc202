//! Profile persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::record::ProfileRow;

/// Storage for profile rows.
///
/// `save` replaces the whole row so a record is never left half-written.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, subject_id: &str) -> Result<Option<ProfileRow>, StoreError>;

    async fn save(&self, row: &ProfileRow) -> Result<(), StoreError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    rows: RwLock<HashMap<String, ProfileRow>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, row: ProfileRow) {
        self.rows.write().insert(row.subject_id.clone(), row);
    }

    pub fn get(&self, subject_id: &str) -> Option<ProfileRow> {
        self.rows.read().get(subject_id).cloned()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, subject_id: &str) -> Result<Option<ProfileRow>, StoreError> {
        Ok(self.get(subject_id))
    }

    async fn save(&self, row: &ProfileRow) -> Result<(), StoreError> {
        self.insert(row.clone());
        Ok(())
    }
}

/// One pretty-printed JSON file per subject in a directory.
///
/// Writes go to a temporary file that is then renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileProfileStore {
    dir: PathBuf,
}

impl JsonFileProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, subject_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !subject_id.is_empty()
            && subject_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidSubject(subject_id.to_string()));
        }
        Ok(self.dir.join(format!("{subject_id}.json")))
    }
}

#[async_trait]
impl ProfileStore for JsonFileProfileStore {
    async fn load(&self, subject_id: &str) -> Result<Option<ProfileRow>, StoreError> {
        let path = self.path_for(subject_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, row: &ProfileRow) -> Result<(), StoreError> {
        let path = self.path_for(&row.subject_id)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec_pretty(row)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
