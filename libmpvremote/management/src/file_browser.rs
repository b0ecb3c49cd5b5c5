use std::io;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use libmpvremote_player::remote_player::{FileType, detect_file_type};
use serde::{Deserialize, Serialize};
use sysinfo::Disks;
use tap::TapFallible;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::database::Database;
use crate::db_error::DbError;
use crate::media_status::MediaStatus;

const IGNORED_MOUNTS: &[&str] = &["snap", "flatpak"];

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("path or collection id missing from request data")]
    MissingTarget,
    #[error("Path is not under any file browser path: {0}")]
    OutsideRoots(String),
    #[error("Path does not exist: {0}")]
    NotFound(String),
    #[error("mpvremote-unsafefilebrowsing disabled")]
    UnsafeBrowsingDisabled,
    #[error("mpvremote-uselocaldb disabled")]
    DatabaseDisabled,
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Error reading {0}: {1}")]
    Io(String, io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Directory,
    Video,
    Audio,
    Subtitle,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    /// Directories sort before files.
    pub priority: u8,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub name: String,
    pub full_path: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_modified: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_status: Option<MediaStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectoryListing {
    pub content: Vec<DirectoryEntry>,
    pub dirname: String,
    #[serde(rename = "prevDir")]
    pub prev_dir: String,
    pub cwd: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionListing {
    pub content: Vec<DirectoryEntry>,
    pub errors: Vec<String>,
    pub collection_id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BrowseResult {
    Directory(DirectoryListing),
    Collection(CollectionListing),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BrowseRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub collection_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BrowseRoot {
    pub index: usize,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Drive {
    pub path: String,
}

#[derive(Clone, Debug)]
pub struct FileBrowser {
    roots: Vec<PathBuf>,
    unsafe_browsing: bool,
    db: Option<Database>,
}

impl FileBrowser {
    pub fn new(roots: Vec<PathBuf>, unsafe_browsing: bool, db: Option<Database>) -> Self {
        Self {
            roots,
            unsafe_browsing,
            db,
        }
    }

    pub fn paths(&self) -> Vec<BrowseRoot> {
        self.roots
            .iter()
            .enumerate()
            .map(|(index, path)| BrowseRoot {
                index,
                path: path.to_string_lossy().into_owned(),
            })
            .collect()
    }

    pub fn drives(&self) -> Result<Vec<Drive>, BrowseError> {
        if !self.unsafe_browsing {
            return Err(BrowseError::UnsafeBrowsingDisabled);
        }
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .iter()
            .map(|disk| disk.mount_point().to_string_lossy().into_owned())
            .filter(|mount| !IGNORED_MOUNTS.iter().any(|ignored| mount.contains(ignored)))
            .unique()
            .map(|path| Drive { path })
            .collect())
    }

    pub async fn browse(&self, request: BrowseRequest) -> Result<BrowseResult, BrowseError> {
        match request {
            BrowseRequest {
                path: Some(path), ..
            } if !path.is_empty() => self.browse_path(path).await.map(BrowseResult::Directory),
            BrowseRequest {
                collection_id: Some(id),
                ..
            } => self
                .browse_collection(id)
                .await
                .map(BrowseResult::Collection),
            _ => Err(BrowseError::MissingTarget),
        }
    }

    pub async fn browse_path(&self, path: String) -> Result<DirectoryListing, BrowseError> {
        let dir = self.resolve(&path).await?;

        let content = sort_entries(self.directory_contents(&dir).await?);
        let cwd = dir.to_string_lossy().into_owned();
        let dirname = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| cwd.clone());
        let prev_dir = dir
            .parent()
            .map(|parent| parent.to_string_lossy().into_owned())
            .unwrap_or_else(|| cwd.clone());

        Ok(DirectoryListing {
            content,
            dirname,
            prev_dir,
            cwd,
        })
    }

    pub async fn browse_collection(
        &self,
        collection_id: i64,
    ) -> Result<CollectionListing, BrowseError> {
        let db = self.db.as_ref().ok_or(BrowseError::DatabaseDisabled)?;
        let collection = db.get_collection(collection_id).await?;

        let mut content = Vec::new();
        let mut errors = Vec::new();
        for entry in collection.paths.unwrap_or_default() {
            match self.resolve(&entry.path).await {
                Ok(dir) => content.extend(self.directory_contents(&dir).await?),
                Err(BrowseError::OutsideRoots(_)) => {
                    warn!("Collection path outside file browser paths: {}", entry.path);
                    errors.push(format!("Not in file browser paths: {}", entry.path));
                }
                Err(e) => {
                    warn!("Collection path unavailable: {e}");
                    errors.push(format!("Path does not exist: {}", entry.path));
                }
            }
        }

        Ok(CollectionListing {
            content: sort_entries(content),
            errors,
            collection_id,
        })
    }

    /// Subdirectories and media files of `dir`. Other files are left out.
    pub async fn directory_contents(
        &self,
        dir: &Path,
    ) -> Result<Vec<DirectoryEntry>, BrowseError> {
        let io_error = |e: io::Error| BrowseError::Io(dir.to_string_lossy().into_owned(), e);
        let media_status = self.media_status(dir).await;
        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error)?;
        let mut content = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let full_path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(metadata) = tokio::fs::metadata(&full_path)
                .await
                .tap_err(|e| warn!("Error reading {full_path:?}: {e}"))
            else {
                continue;
            };
            let last_modified = metadata.modified().ok().map(OffsetDateTime::from);

            let (priority, entry_type) = if metadata.is_dir() {
                (1, EntryType::Directory)
            } else {
                match detect_file_type(&full_path) {
                    FileType::Video => (2, EntryType::Video),
                    FileType::Audio => (2, EntryType::Audio),
                    FileType::Subtitle => (2, EntryType::Subtitle),
                    FileType::File => continue,
                }
            };
            let media_status = match entry_type {
                EntryType::Directory => None,
                _ => media_status.iter().find(|s| s.file_name == name).cloned(),
            };

            content.push(DirectoryEntry {
                priority,
                entry_type,
                name,
                full_path: full_path.to_string_lossy().into_owned(),
                last_modified,
                media_status,
            });
        }

        Ok(content)
    }

    async fn media_status(&self, dir: &Path) -> Vec<MediaStatus> {
        match &self.db {
            Some(db) => db
                .get_media_status_for_directory(dir)
                .await
                .tap_err(|e| warn!("Error loading media status for {dir:?}: {e}"))
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Resolves `path` to its canonical form and checks it against the roots.
    async fn resolve(&self, path: &str) -> Result<PathBuf, BrowseError> {
        let canonical = match tokio::fs::canonicalize(path).await {
            Ok(canonical) => canonical,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BrowseError::NotFound(path.to_owned()));
            }
            Err(e) => return Err(BrowseError::Io(path.to_owned(), e)),
        };
        if self.is_allowed(&canonical).await {
            Ok(canonical)
        } else {
            Err(BrowseError::OutsideRoots(path.to_owned()))
        }
    }

    /// `path` must already be canonical.
    async fn is_allowed(&self, path: &Path) -> bool {
        if self.unsafe_browsing {
            return true;
        }
        for root in &self.roots {
            // Roots that can't be resolved are compared as configured
            let root = tokio::fs::canonicalize(root)
                .await
                .unwrap_or_else(|_| root.clone());
            if path.starts_with(&root) {
                return true;
            }
        }
        info!("Rejecting path outside file browser paths: {path:?}");
        false
    }
}

fn sort_entries(entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    entries
        .into_iter()
        .sorted_by_cached_key(|entry| (entry.priority, entry.name.to_lowercase()))
        .collect()
}

#[cfg(test)]
#[path = "./file_browser_test.rs"]
mod file_browser_test;
