use super::ObjectStore;
use bytes::Bytes;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tessera_result::{Error, Result};

/// Object store backed by a directory tree: one file per object, `/` in
/// keys maps to subdirectories. A dataset scope is therefore a directory,
/// which keeps the layout inspectable with ordinary shell tools.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create the root directory (and parents) if needed and open the store.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    /// Open an existing root directory. `Error::NotFound` if it is absent.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::NotFound);
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in key.split('/') {
            path.push(part);
        }
        path
    }
}

impl ObjectStore for FileStore {
    type Blob = Bytes;

    fn put_object(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&path)?;
        file.write_all(bytes)?;
        Ok(())
    }

    fn get_object(&self, key: &str) -> Result<Self::Blob> {
        match fs::read(self.object_path(key)) {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn has_object(&self, key: &str) -> bool {
        self.object_path(key).is_file()
    }
}
