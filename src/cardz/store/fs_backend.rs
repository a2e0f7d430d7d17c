use super::backend::StorageBackend;
use crate::error::{CardzError, Result};
use crate::model::Deck;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DECKS_FILENAME: &str = "decks.json";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn decks_path(&self) -> PathBuf {
        self.root.join(DECKS_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(CardzError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_decks(&self) -> Result<Option<Vec<Deck>>> {
        let data_file = self.decks_path();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(data_file).map_err(CardzError::Io)?;
        let decks: Vec<Deck> =
            serde_json::from_str(&content).map_err(CardzError::Serialization)?;
        Ok(Some(decks))
    }

    fn save_decks(&self, decks: &[Deck]) -> Result<()> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(decks).map_err(CardzError::Serialization)?;

        // The temp file lives in the same directory so the rename never
        // crosses filesystems.
        let tmp_file = self.root.join(format!(".decks-{}.tmp", Uuid::new_v4()));
        replace_atomically(&tmp_file, &self.decks_path(), &content)
    }

    fn location(&self) -> PathBuf {
        self.decks_path()
    }
}

/// Write `content` to `tmp`, then rename it over `target`. On failure the
/// temp file is removed and `target` keeps its previous content.
fn replace_atomically(tmp: &Path, target: &Path, content: &str) -> Result<()> {
    if let Err(e) = fs::write(tmp, content) {
        let _ = fs::remove_file(tmp);
        return Err(CardzError::Io(e));
    }
    fs::rename(tmp, target).map_err(|e| {
        let _ = fs::remove_file(tmp);
        CardzError::Io(e)
    })
}
