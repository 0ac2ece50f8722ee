//! Durable storage for the committed section order and focus
//!
//! One small JSON document holds the ordered id list, the last focused index
//! and the first-launch flag. Loading is deliberately forgiving: a missing or
//! malformed file degrades to `None` and the caller falls back to defaults.
//! Saving overwrites unconditionally; there is no merge on write.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::storage;

/// Layout state that survives across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLayout {
    /// Ordered section ids, e.g. `["Pinned", "Work in Progress", ...]`
    pub section_order: Vec<String>,
    /// Browse-mode focus at the time of the last committed change
    pub focused_index: usize,
    /// False only until the first successful save; a fresh launch resets
    /// focus to the first card instead of restoring it
    #[serde(default)]
    pub has_launched: bool,
}

/// Storage seam injected into the controller.
pub trait OrderPersistence {
    /// `None` when nothing was saved yet or the stored value is malformed.
    fn load(&self) -> Option<PersistedLayout>;

    /// Overwrite the stored layout. Callers treat failure as non-fatal.
    fn save(&mut self, layout: &PersistedLayout) -> Result<()>;
}

/// JSON-file-backed store under the user's config directory.
#[derive(Debug, Clone)]
pub struct JsonLayoutStore {
    path: PathBuf,
}

impl JsonLayoutStore {
    pub fn new() -> Self {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(storage::APP_DIR);
        path.push(storage::FILENAME);
        Self { path }
    }

    /// Store backed by an explicit file path (tests, embedded hosts).
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonLayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderPersistence for JsonLayoutStore {
    fn load(&self) -> Option<PersistedLayout> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(layout) => Some(layout),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed layout file, falling back to defaults");
                None
            }
        }
    }

    fn save(&mut self, layout: &PersistedLayout) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(layout)
            .context("Failed to serialize carousel layout to JSON")?;
        fs::write(&self.path, contents)
            .context(format!("Failed to write layout file to {}", self.path.display()))?;
        Ok(())
    }
}

/// In-process store for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayoutStore {
    layout: Option<PersistedLayout>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a layout, as if saved by an earlier session.
    pub fn with_layout(layout: PersistedLayout) -> Self {
        Self {
            layout: Some(layout),
        }
    }
}

impl OrderPersistence for MemoryLayoutStore {
    fn load(&self) -> Option<PersistedLayout> {
        self.layout.clone()
    }

    fn save(&mut self, layout: &PersistedLayout) -> Result<()> {
        self.layout = Some(layout.clone());
        Ok(())
    }
}
