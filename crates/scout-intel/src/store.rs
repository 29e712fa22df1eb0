//! Process-local schema card store with an optional disk cache.
//!
//! The store holds the latest installed card behind an RwLock'd Arc:
//! writers install a new Arc, readers clone the pointer and never observe
//! in-place mutation. The serialized form is a versioned, self-describing
//! envelope keyed on disk by connection fingerprint.

use crate::error::{BuildError, BuildResult};
use log::{debug, warn};
use scout_core::card::SchemaCard;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct CardEnvelope {
    format_version: u32,
    card: SchemaCard,
}

/// Store for the latest schema card.
pub struct CardStore {
    current: RwLock<Option<Arc<SchemaCard>>>,
    cache_dir: Option<PathBuf>,
}

impl CardStore {
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self {
            current: RwLock::new(None),
            cache_dir,
        }
    }

    /// The latest installed card, if any.
    pub fn get(&self) -> Option<Arc<SchemaCard>> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    /// Install a new card and return the shared handle. Disk persistence
    /// is best-effort; a cache write failure never fails the install.
    pub fn put(&self, card: SchemaCard) -> Arc<SchemaCard> {
        let shared = Arc::new(card);
        if let Ok(mut guard) = self.current.write() {
            *guard = Some(Arc::clone(&shared));
        }
        if let Some(dir) = &self.cache_dir {
            if let Err(e) = save_card(dir, &shared) {
                warn!("schema card cache write failed: {e}");
            }
        }
        shared
    }

    /// Reflection hash of the installed card.
    pub fn fingerprint(&self) -> Option<String> {
        self.get().map(|card| card.reflection_hash.clone())
    }

    /// Load a previously cached card for a connection fingerprint.
    pub fn load_cached(&self, connection_fingerprint: &str) -> Option<SchemaCard> {
        let dir = self.cache_dir.as_ref()?;
        let path = cache_path(dir, connection_fingerprint);
        match load_card(&path) {
            Ok(card) => {
                debug!("loaded cached schema card from {}", path.display());
                Some(card)
            }
            Err(e) => {
                debug!("no usable cached card at {}: {e}", path.display());
                None
            }
        }
    }
}

fn cache_path(dir: &Path, connection_fingerprint: &str) -> PathBuf {
    dir.join(format!("schema-card-{connection_fingerprint}.json"))
}

fn save_card(dir: &Path, card: &SchemaCard) -> BuildResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| BuildError::CacheIo {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    let path = cache_path(dir, &card.connection_fingerprint);
    let envelope = CardEnvelope {
        format_version: FORMAT_VERSION,
        card: card.clone(),
    };
    let json = serde_json::to_vec_pretty(&envelope).map_err(|e| BuildError::CacheIo {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    std::fs::write(&path, json).map_err(|e| BuildError::CacheIo {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn load_card(path: &Path) -> BuildResult<SchemaCard> {
    let bytes = std::fs::read(path).map_err(|e| BuildError::CacheIo {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let envelope: CardEnvelope =
        serde_json::from_slice(&bytes).map_err(|e| BuildError::CacheIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    if envelope.format_version != FORMAT_VERSION {
        return Err(BuildError::CacheVersion {
            found: envelope.format_version,
        });
    }
    Ok(envelope.card)
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
