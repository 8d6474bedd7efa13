//! Content Document Store
//!
//! Disk-backed store for the page documents the website renders from.
//! One JSON file per page under the content directory, fronted by a TTL
//! cache so hot pages skip the filesystem.
//!
//! Edits go through the typed update path: load fresh from disk, apply the
//! typed operation, persist atomically (temp file + rename), refresh the
//! cache. A write lock serializes read-modify-write cycles.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::models::content::ContentShape;
use crate::models::errors::{AppError, AppResult};
use crate::utils::cache::{CacheStats, TtlCache};

pub struct ContentStore {
    content_dir: PathBuf,
    cache: TtlCache<Value>,
    /// Serializes update cycles; plain reads don't take it
    write_lock: Mutex<()>,
}

impl ContentStore {
    /// Open a store over a content directory, creating it if missing
    pub fn new(content_dir: impl Into<PathBuf>, cache_ttl_secs: u64) -> AppResult<Self> {
        let content_dir = content_dir.into();
        fs::create_dir_all(&content_dir)
            .map_err(|e| AppError::content_write_failed(format!(
                "Cannot create content directory {}: {}",
                content_dir.display(),
                e
            )))?;

        Ok(Self {
            content_dir,
            cache: TtlCache::with_ttl(cache_ttl_secs),
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.content_dir.join(format!("{}.json", slug))
    }

    /// Serve a document verbatim, cache-first
    pub fn load_raw(&self, slug: &str) -> AppResult<Value> {
        if let Some(value) = self.cache.get(slug) {
            return Ok(value);
        }

        let value = self.read_from_disk(slug)?;
        self.cache.set(slug, value.clone());
        Ok(value)
    }

    /// Load a page document as its typed shape
    pub fn load<T: ContentShape>(&self) -> AppResult<T> {
        let raw = self.load_raw(T::SLUG)?;
        serde_json::from_value(raw).map_err(|e| {
            AppError::content_malformed(format!(
                "Document '{}' does not match its page shape: {}",
                T::SLUG,
                e
            ))
        })
    }

    /// Apply a typed update and persist the result.
    ///
    /// Reads from disk (not cache) so concurrent edits can't resurrect a
    /// stale document, applies, then writes atomically.
    pub fn update<T: ContentShape>(&self, update: T::Update) -> AppResult<T> {
        let _guard = self.write_lock.lock().map_err(|_| {
            AppError::internal("Content store write lock poisoned")
        })?;

        let raw = self.read_from_disk(T::SLUG)?;
        let mut doc: T = serde_json::from_value(raw).map_err(|e| {
            AppError::content_malformed(format!(
                "Document '{}' does not match its page shape: {}",
                T::SLUG,
                e
            ))
        })?;

        doc.apply(update)?;
        self.persist(&doc)?;

        info!("Content updated: {}", T::SLUG);
        Ok(doc)
    }

    /// Write a full document, used for seeding and by the update path
    pub fn persist<T: ContentShape>(&self, doc: &T) -> AppResult<()> {
        let value = serde_json::to_value(doc)
            .map_err(|e| AppError::content_write_failed(e.to_string()))?;
        self.write_to_disk(T::SLUG, &value)?;
        self.cache.set(T::SLUG, value);
        Ok(())
    }

    /// True if a document exists on disk for the slug
    pub fn exists(&self, slug: &str) -> bool {
        self.path_for(slug).is_file()
    }

    /// Cache statistics for the stats endpoint
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop expired cache entries, returns how many were removed
    pub fn sweep_cache(&self) -> usize {
        self.cache.cleanup_expired()
    }

    fn read_from_disk(&self, slug: &str) -> AppResult<Value> {
        let path = self.path_for(slug);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::content_not_found(slug));
            }
            Err(e) => {
                warn!("Failed reading {}: {}", path.display(), e);
                return Err(AppError::with_source(
                    crate::models::errors::ErrorCode::Unknown,
                    format!("Cannot read {}", path.display()),
                    e,
                ));
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::content_malformed(format!("Document '{}' is not valid JSON: {}", slug, e))
        })
    }

    /// Atomic write: temp file in the same directory, then rename over the
    /// target so readers never observe a half-written document
    fn write_to_disk(&self, slug: &str, value: &Value) -> AppResult<()> {
        let path = self.path_for(slug);
        let tmp = self.content_dir.join(format!(".{}.json.tmp", slug));

        let pretty = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::content_write_failed(e.to_string()))?;

        fs::write(&tmp, pretty).map_err(|e| {
            AppError::content_write_failed(format!("Cannot write {}: {}", tmp.display(), e))
        })?;

        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AppError::content_write_failed(format!("Cannot replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

/// List the documents present under a content directory
pub fn list_documents(content_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(content_dir) else {
        return Vec::new();
    };

    let mut slugs: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".json")
                .filter(|stem| !stem.starts_with('.'))
                .map(|stem| stem.to_string())
        })
        .collect();
    slugs.sort();
    slugs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{Card, Hero, HomeContent, HomeUpdate, Section};
    use crate::models::errors::ErrorCode;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("amani-store-{}-{}", tag, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn home_fixture() -> HomeContent {
        HomeContent {
            hero: Hero {
                title: "Welcome".to_string(),
                subtitle: "Hope in action".to_string(),
                image: None,
                cta_label: None,
                cta_link: None,
            },
            sections: vec![Section {
                heading: "Programs".to_string(),
                body: "What your donation funds.".to_string(),
                cards: vec![Card {
                    title: "Education".to_string(),
                    body: "School fees.".to_string(),
                    icon: None,
                }],
            }],
            impact_banner: None,
        }
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let store = ContentStore::new(temp_dir("missing"), 60).unwrap();
        let err = store.load_raw("home").unwrap_err();
        assert_eq!(err.code, ErrorCode::ContentNotFound);
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let store = ContentStore::new(temp_dir("roundtrip"), 60).unwrap();
        store.persist(&home_fixture()).unwrap();

        let loaded: HomeContent = store.load().unwrap();
        assert_eq!(loaded.hero.title, "Welcome");
        assert_eq!(loaded.sections[0].cards.len(), 1);
    }

    #[test]
    fn test_update_persists_to_disk() {
        let dir = temp_dir("update");
        let store = ContentStore::new(&dir, 60).unwrap();
        store.persist(&home_fixture()).unwrap();

        store
            .update::<HomeContent>(HomeUpdate::SetSectionHeading {
                section: 0,
                heading: "Our programs".to_string(),
            })
            .unwrap();

        // A second store over the same directory sees the edit
        let reopened = ContentStore::new(&dir, 60).unwrap();
        let loaded: HomeContent = reopened.load().unwrap();
        assert_eq!(loaded.sections[0].heading, "Our programs");
    }

    #[test]
    fn test_rejected_update_leaves_disk_untouched() {
        let store = ContentStore::new(temp_dir("rejected"), 60).unwrap();
        store.persist(&home_fixture()).unwrap();

        let err = store
            .update::<HomeContent>(HomeUpdate::SetSectionHeading {
                section: 9,
                heading: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ContentUpdateRejected);

        let loaded: HomeContent = store.load().unwrap();
        assert_eq!(loaded.sections[0].heading, "Programs");
    }

    #[test]
    fn test_malformed_json_is_distinct_error() {
        let dir = temp_dir("malformed");
        fs::write(dir.join("home.json"), b"{not json").unwrap();
        let store = ContentStore::new(&dir, 60).unwrap();

        let err = store.load_raw("home").unwrap_err();
        assert_eq!(err.code, ErrorCode::ContentMalformed);
    }

    #[test]
    fn test_list_documents() {
        let dir = temp_dir("list");
        let store = ContentStore::new(&dir, 60).unwrap();
        store.persist(&home_fixture()).unwrap();
        fs::write(dir.join(".hidden.json.tmp"), b"{}").unwrap();

        assert_eq!(list_documents(&dir), vec!["home".to_string()]);
    }
}
