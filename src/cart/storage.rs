use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// A local-storage-shaped durable key-value cache.
pub trait DurableCache {
    /// Reads the value stored under a key, if any.
    fn read(&self, key: &str) -> Option<String>;
    /// Writes the value stored under a key.
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed cache, one file per key inside a root directory.
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl DurableCache for FileCache {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.entry_path(key), value)
    }
}

/// In-memory cache, used by tests.
#[derive(Default)]
pub struct MemoryCache {
    entries: HashMap<String, String>,
}

impl DurableCache for MemoryCache {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
