//! Filesystem image store scoped to a single capability directory.
//!
//! Uploads are written under a staging name and renamed into place so a
//! reader never observes a partially written image.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{ImageKey, ImageStore, ImageStoreError};

const STAGING_PREFIX: &str = ".staging-";

/// Image store writing into one directory and serving from a public base URL.
#[derive(Clone)]
pub struct DirectoryImageStore {
    dir: Arc<Dir>,
    root: PathBuf,
    public_base_url: String,
}

impl DirectoryImageStore {
    /// Open `root`, creating it when missing.
    ///
    /// Returned URLs are `<public_base_url>/<key>`; a trailing slash on the
    /// base is ignored.
    pub fn new(root: &Path, public_base_url: impl Into<String>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        let public_base_url = public_base_url.into().trim_end_matches('/').to_owned();
        Ok(Self {
            dir: Arc::new(dir),
            root: root.to_path_buf(),
            public_base_url,
        })
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn write_atomically(dir: &Dir, name: &str, bytes: &[u8]) -> io::Result<()> {
    let staging = format!("{STAGING_PREFIX}{name}");
    dir.write(&staging, bytes)?;
    if let Err(error) = dir.rename(&staging, dir, name) {
        match dir.remove_file(&staging) {
            Ok(()) => {}
            Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => {}
            Err(cleanup) => debug!(%cleanup, "staged image left behind"),
        }
        return Err(error);
    }
    Ok(())
}

fn read_if_exists(dir: &Dir, name: &str) -> io::Result<Option<Vec<u8>>> {
    match dir.read(name) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error),
    }
}

#[async_trait]
impl ImageStore for DirectoryImageStore {
    async fn upload(&self, key: &ImageKey, bytes: &[u8]) -> Result<String, ImageStoreError> {
        let dir = Arc::clone(&self.dir);
        let name = key.as_str().to_owned();
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &name, &bytes))
            .await
            .map_err(|error| ImageStoreError::unavailable(error.to_string()))?
            .map_err(|error| ImageStoreError::write(error.to_string()))?;
        Ok(format!("{}/{key}", self.public_base_url))
    }

    async fn fetch(&self, key: &ImageKey) -> Result<Option<Vec<u8>>, ImageStoreError> {
        let dir = Arc::clone(&self.dir);
        let name = key.as_str().to_owned();
        tokio::task::spawn_blocking(move || read_if_exists(&dir, &name))
            .await
            .map_err(|error| ImageStoreError::unavailable(error.to_string()))?
            .map_err(|error| ImageStoreError::unavailable(error.to_string()))
    }
}
