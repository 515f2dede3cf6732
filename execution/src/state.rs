use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable key/value persistence for serialized records.
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).store(key, value)
    }
}

#[derive(Default, Clone, Debug)]
pub struct Memory {
    state: HashMap<String, String>,
}

impl Memory {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.state.get(key).map(String::as_str)
    }
}

impl Storage for Memory {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.state.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.state.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Write then rename so a crash never leaves a half-written record
        let path = self.path(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}
