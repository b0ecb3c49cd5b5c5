use std::path::{MAIN_SEPARATOR, Path};

use serde::Serialize;
use sqlx::FromRow;
use tracing::debug;

use crate::database::Database;
use crate::db_error::{DbError, db_error};

/// Files watched past this percentage count as finished.
pub const FINISHED_PERCENT: f64 = 90.0;
/// Files watched up to this percentage aren't worth remembering.
pub const MIN_SAVED_PERCENT: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct MediaStatus {
    pub id: i64,
    pub directory: Option<String>,
    pub file_name: String,
    pub current_time: Option<f64>,
    pub finished: bool,
}

/// Key a directory is stored under: its path without a trailing separator.
pub(crate) fn directory_key(directory: &Path) -> String {
    let directory = directory.to_string_lossy();
    let trimmed = directory.trim_end_matches(['/', MAIN_SEPARATOR]);
    if trimmed.is_empty() {
        directory.into_owned()
    } else {
        trimmed.to_owned()
    }
}

fn split_path(path: &Path) -> Option<(String, String)> {
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    let directory = path.parent().map(directory_key).unwrap_or_default();
    Some((directory, file_name))
}

impl Database {
    /// Records how far `path` was watched. Returns `None` when it was barely started.
    pub async fn add_media_status_entry(
        &self,
        path: impl AsRef<Path>,
        current_time: f64,
        percent_pos: f64,
    ) -> Result<Option<MediaStatus>, DbError> {
        let path = path.as_ref();
        let finished = percent_pos >= FINISHED_PERCENT;
        if !finished && percent_pos <= MIN_SAVED_PERCENT {
            debug!("Not saving status for {path:?}, only {percent_pos}% watched");
            return Ok(None);
        }
        let (directory, file_name) = split_path(path)
            .ok_or_else(|| DbError::DbError(format!("{path:?} has no file name")))?;

        let existing = self.get_media_status(path).await?;
        match existing {
            Some(status) => {
                sqlx::query(r#"UPDATE mediastatus SET "current_time" = ?, finished = ? WHERE id = ?"#)
                    .bind(current_time)
                    .bind(finished)
                    .bind(status.id)
                    .execute(&self.pool)
                    .await
                    .map_err(db_error)?;
            }
            None => {
                sqlx::query(
                    r#"INSERT INTO mediastatus ("current_time", finished, directory, file_name)
                    VALUES (?, ?, ?, ?)"#,
                )
                .bind(current_time)
                .bind(finished)
                .bind(&directory)
                .bind(&file_name)
                .execute(&self.pool)
                .await
                .map_err(db_error)?;
            }
        }

        self.get_media_status(path).await
    }

    pub async fn get_media_status(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Option<MediaStatus>, DbError> {
        let Some((directory, file_name)) = split_path(path.as_ref()) else {
            return Ok(None);
        };
        sqlx::query_as::<_, MediaStatus>(
            r#"SELECT id, directory, file_name, "current_time", COALESCE(finished, 0) AS finished
            FROM mediastatus WHERE directory = ? AND file_name = ?"#,
        )
        .bind(directory)
        .bind(file_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn get_media_status_for_directory(
        &self,
        directory: impl AsRef<Path>,
    ) -> Result<Vec<MediaStatus>, DbError> {
        sqlx::query_as::<_, MediaStatus>(
            r#"SELECT id, directory, file_name, "current_time", COALESCE(finished, 0) AS finished
            FROM mediastatus WHERE directory = ? ORDER BY file_name"#,
        )
        .bind(directory_key(directory.as_ref()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }
}

#[cfg(test)]
#[path = "./media_status_test.rs"]
mod media_status_test;
