use crate::core_error::FtpError;
use log::warn;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

/// The served directory tree.
///
/// Every operation takes a normalized absolute virtual path (see
/// `core_path::resolve`) and maps it under `root`. Nothing here reads or
/// changes the process working directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a virtual path onto the real filesystem.
    pub fn real_path(&self, vpath: &str) -> PathBuf {
        let relative = vpath.trim_start_matches('/');
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    pub async fn metadata(&self, vpath: &str) -> Result<Metadata, FtpError> {
        fs::metadata(self.real_path(vpath))
            .await
            .map_err(|e| FtpError::storage(vpath, e))
    }

    /// Succeeds only if `vpath` exists and is a directory.
    pub async fn require_dir(&self, vpath: &str) -> Result<(), FtpError> {
        if self.metadata(vpath).await?.is_dir() {
            Ok(())
        } else {
            Err(FtpError::NotADirectory(vpath.to_string()))
        }
    }

    /// Entries of a directory as `(name, metadata)`, sorted by name.
    pub async fn list_dir(&self, vpath: &str) -> Result<Vec<(String, Metadata)>, FtpError> {
        let mut dir = fs::read_dir(self.real_path(vpath))
            .await
            .map_err(|e| FtpError::storage(vpath, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| FtpError::storage(vpath, e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            match entry.metadata().await {
                Ok(meta) => entries.push((name, meta)),
                // Entry vanished or is unreadable; leave it out of the listing.
                Err(e) => warn!("Skipping {}/{}: {}", vpath, name, e),
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    pub async fn create_dir(&self, vpath: &str) -> Result<(), FtpError> {
        fs::create_dir(self.real_path(vpath))
            .await
            .map_err(|e| FtpError::storage(vpath, e))
    }

    /// The root itself can never be removed or renamed.
    fn guard_root(vpath: &str) -> Result<(), FtpError> {
        if vpath.trim_start_matches('/').is_empty() {
            return Err(FtpError::storage(
                vpath,
                io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
            ));
        }
        Ok(())
    }

    pub async fn remove_dir(&self, vpath: &str) -> Result<(), FtpError> {
        Self::guard_root(vpath)?;
        fs::remove_dir(self.real_path(vpath))
            .await
            .map_err(|e| FtpError::storage(vpath, e))
    }

    pub async fn remove_file(&self, vpath: &str) -> Result<(), FtpError> {
        Self::guard_root(vpath)?;
        fs::remove_file(self.real_path(vpath))
            .await
            .map_err(|e| FtpError::storage(vpath, e))
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<(), FtpError> {
        Self::guard_root(from)?;
        Self::guard_root(to)?;
        fs::rename(self.real_path(from), self.real_path(to))
            .await
            .map_err(|e| FtpError::storage(from, e))
    }

    pub async fn open_read(&self, vpath: &str) -> Result<File, FtpError> {
        File::open(self.real_path(vpath))
            .await
            .map_err(|e| FtpError::storage(vpath, e))
    }

    /// Opens `vpath` for writing from offset 0, truncating any previous content.
    pub async fn open_write(&self, vpath: &str) -> Result<File, FtpError> {
        File::create(self.real_path(vpath))
            .await
            .map_err(|e| FtpError::storage(vpath, e))
    }
}
