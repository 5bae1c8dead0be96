use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Longest file stem written, leaving room for the extension under the
/// common 255-byte file name limit.
const MAX_STEM_LEN: usize = 200;

/// Text-keyed persistent storage for serialized blobs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store. Entries live as long as the store does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a cache directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", file_stem(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.cache_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.cache_path(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
        debug!(key = key, path = %path.display(), "Wrote cache file");
        Ok(())
    }
}

/// Escape a key into a portable file name. Bytes outside
/// `[A-Za-z0-9_.,-]` become `%XX`, `%` included, so distinct keys never
/// share a file. Stems longer than `MAX_STEM_LEN` are cut and suffixed with
/// `~` and the SHA-256 of the full key; `~` never survives escaping.
fn file_stem(key: &str) -> String {
    let stem = escape_key(key);
    if stem.len() <= MAX_STEM_LEN {
        return stem;
    }

    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    let keep = MAX_STEM_LEN - digest.len() - 1;
    // Escaped stems are pure ASCII, so any byte index is a char boundary.
    format!("{}~{}", &stem[..keep], digest)
}

fn escape_key(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b',' | b'-') {
            stem.push(b as char);
        } else {
            stem.push_str(&format!("%{:02X}", b));
        }
    }
    stem
}
