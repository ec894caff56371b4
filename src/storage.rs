use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::Local;
use directories::ProjectDirs;

use crate::{
    constants::{BACKUP_LIMIT, STORE_KEYS},
    error::StoreError,
};

pub const DATA_DIR_ENV: &str = "TRAINPLAN_DATA_DIR";

/// String-keyed persistence, one opaque value per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Keeps each key in `<dir>/<key>.json`.
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn open_default() -> Self {
        Self::new(get_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonDirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .and_then(|_| atomic_write(&self.path_for(key), value))
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })
    }
}

/// In-memory backend for tests. Keys listed in `failing` reject writes.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub values: std::collections::HashMap<String, String>,
    pub failing: Vec<String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.failing.iter().any(|k| k == key) {
            return Err(StoreError::Write {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "quota exceeded"),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        let dir = PathBuf::from(dir);
        fs::create_dir_all(&dir).ok();
        return dir;
    }

    let local_exercises = Path::new(".").join(format!("{}.json", STORE_KEYS.exercises));
    if local_exercises.exists() {
        return PathBuf::from(".");
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "trainplan", "trainplan") {
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).ok();
        data_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_state_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trainplan", "trainplan") {
        if let Some(state_dir) = proj_dirs.state_dir() {
            let dir = state_dir.to_path_buf();
            fs::create_dir_all(&dir).ok();
            return dir;
        }
    }
    PathBuf::from(".")
}

pub fn get_log_path() -> PathBuf {
    get_state_dir().join("trainplan.log")
}

pub fn create_backup(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let backup_dir = path.parent().unwrap_or(Path::new(".")).join("backups");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S%.3f");
    let filename = format!(
        "{}.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        timestamp
    );
    fs::copy(path, backup_dir.join(&filename))?;

    let prefix = format!("{}.", path.file_name().unwrap_or_default().to_string_lossy());
    if let Ok(entries) = fs::read_dir(&backup_dir) {
        let mut backups: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
            .collect();
        backups.sort_by_key(|e| e.file_name());

        let excess = backups.len().saturating_sub(BACKUP_LIMIT);
        for oldest in backups.iter().take(excess) {
            let _ = fs::remove_file(oldest.path());
        }
    }

    Ok(())
}

pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    if path.exists() {
        create_backup(path)?;
    }

    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(content.as_bytes())?;
    tmp_file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_dir_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(store.get("overrides").unwrap().is_none());
    }

    #[test]
    fn test_json_dir_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path().join("nested"));
        store.set("overrides", "{\"2024-01-05\":[\"swim\"]}").unwrap();

        assert!(store.path_for("overrides").exists());
        assert_eq!(
            store.get("overrides").unwrap().as_deref(),
            Some("{\"2024-01-05\":[\"swim\"]}")
        );
    }

    #[test]
    fn test_overwrite_keeps_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path());
        for i in 0..(BACKUP_LIMIT + 4) {
            store.set("exercises", &format!("[{}]", i)).unwrap();
        }

        let backups = fs::read_dir(dir.path().join("backups")).unwrap().count();
        assert!(backups <= BACKUP_LIMIT);
        assert_eq!(
            store.get("exercises").unwrap().as_deref(),
            Some(format!("[{}]", BACKUP_LIMIT + 3).as_str())
        );
    }

    #[test]
    fn test_memory_store_injected_failure() {
        let mut store = MemoryStore {
            failing: vec!["tintColors".to_string()],
            ..MemoryStore::default()
        };
        assert!(store.set("tintColors", "{}").is_err());
        assert!(store.set("overrides", "{}").is_ok());
        assert_eq!(store.get("overrides").unwrap().as_deref(), Some("{}"));
    }
}
