use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::config::{ConfigContentProvider, FileContentConfigProvider};

/// String-valued persistence keyed by name. Callers own the value format.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

/// One `<key>.yaml` file per key inside `directory`.
pub struct FileKeyValueStore {
    directory: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn provider(&self, key: &str) -> Result<FileContentConfigProvider, String> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!("Invalid storage key: {:?}", key));
        }
        Ok(FileContentConfigProvider::new(
            self.directory.join(format!("{}.yaml", key)),
        ))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.provider(key)?.get_config_content()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.provider(key)?.set_config_content(value)
    }
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let values = self
            .values
            .lock()
            .map_err(|_| "Memory store lock poisoned".to_string())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| "Memory store lock poisoned".to_string())?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
