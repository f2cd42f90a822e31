use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::grid::LayoutState;
use crate::logging::{kv, LogEvent, LogLevel, Logger};

/// Well-known key the layout blob lives under.
pub const LAYOUT_KEY: &str = "dashboard-layout";

/// Schema version written into every blob. Unknown versions parse as
/// corrupt and fall back to the default layout.
const LAYOUT_VERSION: u32 = 1;

const LOG_TARGET: &str = "dash::persist";

/// Durable key-value boundary. A browser would back this with local
/// storage; here the crate ships an in-memory map and a file-per-key
/// directory store.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// Volatile store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key under a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Versioned envelope around the persisted widget list.
#[derive(Debug, Serialize, Deserialize)]
struct LayoutBlob {
    version: u32,
    widgets: LayoutState,
}

/// Sole owner of the durable store for layout data.
///
/// `save` writes the full layout as one versioned JSON blob, skipping the
/// write when the content hash matches the last blob written. `load` is
/// total: a missing key, unreadable store, corrupt blob, or unknown schema
/// version all come back as `None` so the caller falls back to the default
/// layout. Nothing here ever propagates a parse failure.
pub struct LayoutGateway<S: KvStore> {
    store: S,
    logger: Option<Logger>,
    last_hash: Option<blake3::Hash>,
}

impl<S: KvStore> LayoutGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            logger: None,
            last_hash: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Serialize and persist `layout`, overwriting any prior blob.
    pub fn save(&mut self, layout: &LayoutState) -> Result<()> {
        let blob = serde_json::to_string(&LayoutBlob {
            version: LAYOUT_VERSION,
            widgets: layout.clone(),
        })?;
        let hash = blake3::hash(blob.as_bytes());
        if self.last_hash == Some(hash) {
            self.log(LogLevel::Debug, "layout_save_skipped", []);
            return Ok(());
        }
        self.store.set(LAYOUT_KEY, &blob)?;
        self.last_hash = Some(hash);
        self.log(
            LogLevel::Info,
            "layout_saved",
            [kv("bytes", json!(blob.len()))],
        );
        Ok(())
    }

    /// Read the persisted layout, or `None` when the caller should use the
    /// default.
    pub fn load(&mut self) -> Option<LayoutState> {
        let raw = match self.store.get(LAYOUT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "layout_load_failed",
                    [kv("error", json!(err.to_string()))],
                );
                return None;
            }
        };

        match serde_json::from_str::<LayoutBlob>(&raw) {
            Ok(blob) if blob.version == LAYOUT_VERSION => {
                self.last_hash = Some(blake3::hash(raw.as_bytes()));
                let mut layout = blob.widgets;
                layout.clamp_overflow();
                Some(layout)
            }
            Ok(blob) => {
                self.log(
                    LogLevel::Warn,
                    "layout_version_unknown",
                    [kv("version", json!(blob.version))],
                );
                None
            }
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "layout_parse_failed",
                    [kv("error", json!(err.to_string()))],
                );
                None
            }
        }
    }

    /// Delete the stored blob; the caller reverts to the default layout.
    pub fn reset(&mut self) -> Result<()> {
        self.store.delete(LAYOUT_KEY)?;
        self.last_hash = None;
        self.log(LogLevel::Info, "layout_reset", []);
        Ok(())
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(LogEvent::with_fields(level, LOG_TARGET, message, fields));
        }
    }
}
