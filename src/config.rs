use anyhow::{Context, Result};
use chrono::Timelike;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; a fresh one per run when absent.
    pub seed: Option<u64>,
    pub pet_type: String,
    pub eye_tracking: bool,
    pub pet_width: f32,
    pub pet_height: f32,
    pub tick_interval_secs: u64,
    /// Pins the hour used for day/night decay.
    pub fixed_hour: Option<u32>,
    pub fps_cap: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            pet_type: "default".to_string(),
            eye_tracking: true,
            pet_width: 96.0,
            pet_height: 96.0,
            tick_interval_secs: 60,
            fixed_hour: None,
            fps_cap: 30,
        }
    }
}

impl Settings {
    pub fn hour(&self) -> u32 {
        local_hour(self.fixed_hour)
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_secs.max(1) * 1000
    }
}

/// Hour of day for day/night decay, pinned when `fixed` is set.
pub fn local_hour(fixed: Option<u32>) -> u32 {
    fixed
        .map(|h| h % 24)
        .unwrap_or_else(|| chrono::Local::now().hour())
}

pub struct Paths {
    pub save_path: PathBuf,
    pub settings_path: PathBuf,
    pub catalog_path: PathBuf,
    pub log_path: PathBuf,
    pub photo_dir: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "deskpet", "Deskpet")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        save_path: dir.join("pet.json"),
        settings_path: dir.join("settings.json"),
        catalog_path: dir.join("catalog.json"),
        log_path: dir.join("deskpet.log"),
        photo_dir: dir.join("photos"),
    })
}

pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
        tracing::warn!(path = %path.display(), "settings unreadable, using defaults");
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    write_json_atomic(path, s)
}

pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("replacing {}", to.display()))?;
    Ok(())
}
