use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use serde::Serialize;

use crate::error::AtlasError;

pub const CORPUS_FILE: &str = "hca.json";

/// Where corpus snapshots live when no explicit path is configured.
#[derive(Debug, Clone)]
pub struct Store {
    cache_root: Utf8PathBuf,
}

impl Store {
    pub fn new() -> Result<Self, AtlasError> {
        let cache_root = BaseDirs::new()
            .and_then(|dirs| {
                Utf8PathBuf::from_path_buf(dirs.home_dir().join(".cache").join("cellatlas-search"))
                    .ok()
            })
            .ok_or_else(|| {
                AtlasError::Filesystem("unable to resolve cache directory".to_string())
            })?;
        Ok(Self { cache_root })
    }

    pub fn new_with_root(cache_root: Utf8PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn default_corpus_path(&self) -> Utf8PathBuf {
        self.cache_root.join(CORPUS_FILE)
    }

    /// Picks the first of: explicit path, configured path, cached snapshot.
    pub fn resolve_corpus_path(
        &self,
        explicit: Option<&str>,
        configured: Option<&Utf8Path>,
    ) -> Utf8PathBuf {
        explicit
            .map(Utf8PathBuf::from)
            .or_else(|| configured.map(Utf8Path::to_path_buf))
            .unwrap_or_else(|| self.default_corpus_path())
    }

    pub fn write_json_atomic<T: Serialize>(path: &Utf8Path, value: &T) -> Result<(), AtlasError> {
        let content = serde_json::to_vec_pretty(value)
            .map_err(|err| AtlasError::Filesystem(err.to_string()))?;
        Self::write_bytes_atomic(path, &content)
    }

    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), AtlasError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| AtlasError::Filesystem(err.to_string()))?;
        let mut temp = tempfile::Builder::new()
            .prefix("cellatlas-file")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| AtlasError::Filesystem(err.to_string()))?;
        temp.write_all(content)
            .map_err(|err| AtlasError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| AtlasError::Filesystem(err.to_string()))?;
        Ok(())
    }
}
