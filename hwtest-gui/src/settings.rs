//! Settings shared by every run of the application, persisted in the data directory.

use crate::dir::HwTestDirectory;
use fs2::FileExt;
use hwtest::keystore::KeystoreKind;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "global_settings.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

/// The keystore the operator tested last.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct KeystoreSettings {
    pub kind: Option<KeystoreKind>,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct GlobalSettings {
    pub window_config: Option<WindowConfig>,
    pub keystore: Option<KeystoreSettings>,
}

impl GlobalSettings {
    pub fn path(global_datadir: &HwTestDirectory) -> PathBuf {
        global_datadir.path().join(DEFAULT_FILE_NAME)
    }

    pub fn load_window_config(path: &Path) -> Option<WindowConfig> {
        Self::load(path)
            .map_err(|e| tracing::error!("Failed to load window config: {e}"))
            .ok()
            .and_then(|s| s.window_config)
    }

    pub fn update_window_config(path: &Path, window_config: &WindowConfig) -> Result<(), String> {
        Self::modify(path, |s| s.window_config = Some(window_config.clone()))
    }

    pub fn load_keystore(path: &Path) -> Option<KeystoreSettings> {
        Self::load(path)
            .map_err(|e| tracing::error!("Failed to load keystore settings: {e}"))
            .ok()
            .and_then(|s| s.keystore)
    }

    pub fn update_keystore(path: &Path, keystore: &KeystoreSettings) -> Result<(), String> {
        Self::modify(path, |s| s.keystore = Some(keystore.clone()))
    }

    /// Reads the settings under a shared lock. A missing file holds the default settings.
    pub fn load(path: &Path) -> Result<GlobalSettings, String> {
        if !path.is_file() {
            return Ok(GlobalSettings::default());
        }
        let mut file = File::open(path).map_err(|e| format!("Opening file: {e}"))?;
        FileExt::lock_shared(&file).map_err(|e| format!("Locking file: {e}"))?;
        let settings = read(&mut file);
        unlock(&file).and(settings)
    }

    /// Applies `f` to the stored settings, holding an exclusive lock from the read to the
    /// write. No file is created for default settings.
    pub fn modify<F>(path: &Path, f: F) -> Result<(), String>
    where
        F: FnOnce(&mut GlobalSettings),
    {
        if !path.is_file() {
            let mut settings = GlobalSettings::default();
            f(&mut settings);
            if settings == GlobalSettings::default() {
                return Ok(());
            }
            let mut file = open_locked(path)?;
            let res = write(&mut file, &settings);
            return unlock(&file).and(res);
        }

        let mut file = open_locked(path)?;
        let res = read(&mut file).and_then(|mut settings| {
            f(&mut settings);
            write(&mut file, &settings)
        });
        unlock(&file).and(res)
    }
}

fn open_locked(path: &Path) -> Result<File, String> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| format!("Opening file: {e}"))?;
    FileExt::lock_exclusive(&file).map_err(|e| format!("Locking file: {e}"))?;
    Ok(file)
}

fn unlock(file: &File) -> Result<(), String> {
    FileExt::unlock(file).map_err(|e| format!("Unlocking file: {e}"))
}

fn read(file: &mut File) -> Result<GlobalSettings, String> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| format!("Reading file: {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("Parsing settings: {e}"))
}

fn write(file: &mut File, settings: &GlobalSettings) -> Result<(), String> {
    let content = serde_json::to_vec_pretty(settings)
        .map_err(|e| format!("Failed to serialize GlobalSettings: {e}"))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| format!("Failed to seek file: {e}"))?;
    file.write_all(&content)
        .map_err(|e| format!("Failed to write file: {e}"))?;
    file.set_len(content.len() as u64)
        .map_err(|e| format!("Failed to truncate file: {e}"))
}
