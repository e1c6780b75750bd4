//! On-disk cache of section indexes
//!
//! The index of `dir/name.cfg` is stored as JSON in
//! `dir/.cache/name.cfg.cache`. A cache is used only while its modification
//! time is not older than the file's and every imported file's.

use crate::index::SectionIndex;
use crate::scan::file_not_found;
use crate::{Error, Result};
use cfgtree_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

/// Bumped whenever the serialized index layout changes.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct CacheEntry {
    version: u32,
    index: SectionIndex,
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    version: u32,
    index: &'a SectionIndex,
}

/// Index of `path`, from its cache when enabled and fresh.
pub fn read_or_load(path: &NormalizedPath, enable_cache: bool) -> Result<SectionIndex> {
    if enable_cache {
        if let Some(index) = load_cached(path) {
            return Ok(index);
        }
    }

    let index = SectionIndex::build(path)?;

    if enable_cache {
        if let Err(e) = store(path, &index) {
            tracing::warn!(path = %path, error = %e, "failed to write cfg cache");
        }
    }
    Ok(index)
}

/// Load the cached index of `path` if it exists and is up to date.
pub fn load_cached(path: &NormalizedPath) -> Option<SectionIndex> {
    let cache_path = path.cache_path()?;
    if !cache_path.is_file() {
        tracing::debug!(path = %cache_path, "no cfg cache");
        return None;
    }

    let cache_mtime = io::modified(&cache_path).ok()?;
    let source_mtime = io::modified(path).ok()?;
    if source_mtime > cache_mtime {
        tracing::debug!(path = %cache_path, "cfg cache older than its source");
        return None;
    }

    let entry: CacheEntry = match io::read_bytes(&cache_path)
        .map_err(|e| e.to_string())
        .and_then(|bytes| serde_json::from_slice(&bytes).map_err(|e| e.to_string()))
    {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(path = %cache_path, error = %e, "failed to load cfg data from cache");
            discard(&cache_path);
            return None;
        }
    };

    if entry.version != CACHE_FORMAT_VERSION || entry.index.path != *path {
        tracing::warn!(path = %cache_path, "discarding cfg cache written for another layout");
        discard(&cache_path);
        return None;
    }

    for import in &entry.index.imports {
        match io::modified(import) {
            Ok(import_mtime) if import_mtime <= cache_mtime => {}
            _ => {
                tracing::debug!(path = %cache_path, import = %import, "cfg cache older than an import");
                return None;
            }
        }
    }

    tracing::info!("Loading cfg data from {cache_path}");
    Some(entry.index)
}

/// Remove an unusable cache file; it is rewritten on the next store.
fn discard(cache_path: &NormalizedPath) {
    if let Err(e) = io::remove_if_exists(cache_path) {
        tracing::warn!(path = %cache_path, error = %e, "failed to remove cfg cache");
    }
}

/// Write the index of `path` to its cache file.
pub fn store(path: &NormalizedPath, index: &SectionIndex) -> Result<()> {
    let cache_path = path.cache_path().ok_or_else(|| file_not_found(path))?;
    let entry = CacheEntryRef {
        version: CACHE_FORMAT_VERSION,
        index,
    };
    let bytes = serde_json::to_vec(&entry).map_err(Error::CacheEncode)?;
    io::write_atomic(&cache_path, &bytes)?;
    tracing::debug!(path = %cache_path, bytes = bytes.len(), "wrote cfg cache");
    Ok(())
}
