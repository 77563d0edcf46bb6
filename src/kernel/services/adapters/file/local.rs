//! Device filesystem mounted on a local directory.
//!
//! Device paths are resolved below the mount root; `..` components are
//! rejected so no operation can escape it.

use crate::kernel::path;
use crate::kernel::services::ports::file::{
    DirEntryInfo, FileSystemGateway, FsError, FsFuture, Result,
};
use std::path::{Component, Path, PathBuf};

pub struct LocalGateway {
    root: PathBuf,
}

impl LocalGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, device_path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for part in device_path.split(['/', '\\']) {
            match part {
                "" | "." => continue,
                ".." => return Err(FsError::InvalidPath(device_path.to_string())),
                part => resolved.push(part),
            }
        }
        Ok(resolved)
    }

    /// Maps a local path under the mount root back to a device path.
    pub fn to_device_path(&self, local: &Path) -> Option<String> {
        let relative = local.strip_prefix(&self.root).ok()?;
        let mut out = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    out.push('/');
                    out.push_str(&name.to_string_lossy());
                }
                _ => return None,
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Some(out)
    }
}

async fn ensure_absent(path: &Path, device_path: &str) -> Result<()> {
    if tokio::fs::try_exists(path).await? {
        return Err(FsError::AlreadyExists(device_path.to_string()));
    }
    Ok(())
}

async fn ensure_present(path: &Path, device_path: &str) -> Result<std::fs::Metadata> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FsError::NotFound(device_path.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn copy_recursive(from: &Path, to: &Path) -> std::io::Result<()> {
    if from.is_dir() {
        std::fs::create_dir(to)?;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &to.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        std::fs::copy(from, to).map(|_| ())
    }
}

impl FileSystemGateway for LocalGateway {
    fn entry_exists(&self, path: &str) -> FsFuture<bool> {
        let target = self.resolve(path);
        Box::pin(async move { Ok(tokio::fs::try_exists(target?).await?) })
    }

    fn entry_rename(&self, from: &str, to: &str) -> FsFuture<()> {
        let source = self.resolve(from);
        let target = self.resolve(to);
        let (from, to) = (from.to_string(), to.to_string());
        Box::pin(async move {
            let (source, target) = (source?, target?);
            ensure_present(&source, &from).await?;
            ensure_absent(&target, &to).await?;
            Ok(tokio::fs::rename(source, target).await?)
        })
    }

    fn entry_copy(&self, from: &str, to: &str) -> FsFuture<()> {
        let source = self.resolve(from);
        let target = self.resolve(to);
        let (from, to) = (from.to_string(), to.to_string());
        Box::pin(async move {
            let (source, target) = (source?, target?);
            ensure_present(&source, &from).await?;
            ensure_absent(&target, &to).await?;
            tokio::task::spawn_blocking(move || copy_recursive(&source, &target))
                .await
                .map_err(|e| FsError::Io(std::io::Error::other(e)))??;
            Ok(())
        })
    }

    fn entry_remove(&self, path: &str) -> FsFuture<()> {
        let target = self.resolve(path);
        let path = path.to_string();
        Box::pin(async move {
            let target = target?;
            if path::normalize(&path) == path::ROOT {
                return Err(FsError::InvalidPath(path));
            }
            let meta = ensure_present(&target, &path).await?;
            if meta.is_dir() {
                tokio::fs::remove_dir_all(target).await?;
            } else {
                tokio::fs::remove_file(target).await?;
            }
            Ok(())
        })
    }

    fn entry_move(&self, from: &str, to_dir: &str) -> FsFuture<String> {
        let device_to = path::join(to_dir, path::file_name(from));
        let source = self.resolve(from);
        let dir = self.resolve(to_dir);
        let target = self.resolve(&device_to);
        let (from, to_dir) = (from.to_string(), to_dir.to_string());
        Box::pin(async move {
            let (source, dir, target) = (source?, dir?, target?);
            ensure_present(&source, &from).await?;
            if !ensure_present(&dir, &to_dir).await?.is_dir() {
                return Err(FsError::NotADirectory(to_dir));
            }
            if path::is_within(&device_to, &from) {
                return Err(FsError::InvalidPath(device_to));
            }
            ensure_absent(&target, &device_to).await?;
            tokio::fs::rename(source, target).await?;
            Ok(device_to)
        })
    }

    fn file_create(&self, path: &str) -> FsFuture<()> {
        let target = self.resolve(path);
        let path = path.to_string();
        Box::pin(async move {
            let target = target?;
            ensure_absent(&target, &path).await?;
            tokio::fs::write(target, b"").await?;
            Ok(())
        })
    }

    fn folder_create(&self, path: &str) -> FsFuture<()> {
        let target = self.resolve(path);
        let path = path.to_string();
        Box::pin(async move {
            let target = target?;
            ensure_absent(&target, &path).await?;
            Ok(tokio::fs::create_dir(target).await?)
        })
    }

    fn file_read_text(&self, path: &str) -> FsFuture<String> {
        let target = self.resolve(path);
        let path = path.to_string();
        Box::pin(async move {
            let target = target?;
            if !ensure_present(&target, &path).await?.is_file() {
                return Err(FsError::NotAFile(path));
            }
            Ok(tokio::fs::read_to_string(target).await?)
        })
    }

    fn file_write_text(&self, path: &str, text: String) -> FsFuture<()> {
        let target = self.resolve(path);
        Box::pin(async move {
            let target = target?;
            Ok(tokio::fs::write(target, text).await?)
        })
    }

    fn folder_get_content(&self, path: &str) -> FsFuture<Vec<DirEntryInfo>> {
        let target = self.resolve(path);
        let path = path.to_string();
        Box::pin(async move {
            let target = target?;
            if !ensure_present(&target, &path).await?.is_dir() {
                return Err(FsError::NotADirectory(path));
            }
            let mut entries = tokio::fs::read_dir(target).await?;
            let mut result = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().to_string();
                if let Ok(file_type) = entry.file_type().await {
                    result.push(DirEntryInfo {
                        name,
                        is_dir: file_type.is_dir(),
                    });
                }
            }
            Ok(result)
        })
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
