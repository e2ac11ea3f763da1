use anyhow::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::config::write_json_atomic;
use crate::model::SavedPet;
use crate::ports::PetStore;

/// Pet snapshot as pretty JSON, replaced atomically on every save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PetStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<SavedPet>> {
        let s = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", self.path.display())),
        };
        let save = serde_json::from_str::<SavedPet>(&s)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(save))
    }

    fn save(&mut self, snapshot: &SavedPet) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).ok();
        }
        write_json_atomic(&self.path, snapshot)
    }
}
