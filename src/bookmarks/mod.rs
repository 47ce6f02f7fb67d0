//! Persistence for politeness overrides, keyed by page identity.
//!
//! Each page gets one JSON file under the overrides directory, named by a
//! short SHA-256 digest of the page URI. A missing file is an empty map,
//! never an error; saves go through a temp file and rename.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;

use crate::accessible::ElementKey;
use crate::core::resolver::{OverrideKey, PolitenessOverrides};
use crate::domain::PolitenessLevel;

/// Errors reading or writing the override store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// On-disk shape of one page's overrides.
#[derive(Debug, Serialize, Deserialize)]
struct OverrideFile {
    page_uri: String,
    saved_at: DateTime<Utc>,
    overrides: Vec<OverrideRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OverrideRecord {
    uri: String,
    element: ElementKey,
    level: PolitenessLevel,
}

/// File-backed store of politeness overrides.
pub struct OverrideStore {
    dir: PathBuf,
}

impl OverrideStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the store in the default location (`<home>/overrides`).
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(crate::config::overrides_dir()?))
    }

    /// Short digest identifying a page, used as the store filename.
    pub fn uri_key(uri: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(uri.as_bytes());
        let digest = hasher.finalize();
        format!("{digest:x}")[..12].to_string()
    }

    fn path_for(&self, uri: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::uri_key(uri)))
    }

    /// The file a page's overrides live in.
    pub fn store_path(&self, uri: &str) -> PathBuf {
        self.path_for(uri)
    }

    /// Load the overrides saved for a page. A missing file yields an empty
    /// map.
    pub async fn load(&self, uri: &str) -> Result<PolitenessOverrides, StoreError> {
        let path = self.path_for(uri);
        if !path.exists() {
            return Ok(PolitenessOverrides::new());
        }

        let json = fs::read_to_string(&path).await?;
        let file: OverrideFile = serde_json::from_str(&json)?;

        Ok(file
            .overrides
            .into_iter()
            .map(|record| {
                (
                    OverrideKey {
                        uri: record.uri,
                        element: record.element,
                    },
                    record.level,
                )
            })
            .collect())
    }

    /// Save a page's overrides, atomically replacing any previous file.
    pub async fn save(&self, uri: &str, overrides: &PolitenessOverrides) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;

        let file = OverrideFile {
            page_uri: uri.to_string(),
            saved_at: Utc::now(),
            overrides: overrides
                .iter()
                .map(|(key, level)| OverrideRecord {
                    uri: key.uri.clone(),
                    element: key.element.clone(),
                    level: *level,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&file)?;
        let path = self.path_for(uri);
        let tmp = tmp_path(&path);
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;

        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
