//! On-disk transfer cache for DAP responses.
//!
//! Responses are stored as one file per request URL. The cache is scratch
//! space for a single run: nothing is ever read back across runs, and
//! [`ResponseCache::purge`] empties it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

const CACHE_EXTENSION: &str = "dap";

/// Compute the cache key for a request URL.
pub fn hash_url(url: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    hasher.finish()
}

/// A directory of cached response bodies.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Use `dir` as the cache, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.dir
            .join(format!("{:016x}.{}", hash_url(url), CACHE_EXTENSION))
    }

    /// Cached body for `url`, if present.
    pub async fn get(&self, url: &str) -> Option<String> {
        let path = self.path_for(url);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => {
                debug!(url = %url, path = %path.display(), "Transfer cache hit");
                Some(body)
            }
            Err(_) => None,
        }
    }

    /// Store a body for `url`. Failures only cost a cache miss later.
    pub async fn put(&self, url: &str, body: &str) {
        let path = self.path_for(url);
        if let Err(e) = tokio::fs::write(&path, body).await {
            warn!(path = %path.display(), error = %e, "Failed to write transfer cache entry");
        }
    }

    /// Delete every cache entry. Returns the number of files removed.
    ///
    /// Synchronous so it can run from a `Drop` implementation.
    pub fn purge(&self) -> usize {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.dir.display(), error = %e, "Cannot list transfer cache");
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            debug!(path = %path.display(), "Deleting cache entry");
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete cache entry"),
            }
        }
        removed
    }
}
