use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{debug, warn};

use crate::database::Database;
use crate::db_error::{DbError, db_error};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CollectionType {
    #[default]
    Movies = 1,
    TvShows = 2,
    Music = 3,
}

impl TryFrom<i64> for CollectionType {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CollectionType::Movies),
            2 => Ok(CollectionType::TvShows),
            3 => Ok(CollectionType::Music),
            other => Err(format!("invalid collection type {other}")),
        }
    }
}

impl From<CollectionType> for i64 {
    fn from(value: CollectionType) -> Self {
        value as i64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub collection_type: CollectionType,
    /// Only filled in when a single collection is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<CollectionEntry>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct CollectionEntry {
    pub id: i64,
    pub collection_id: i64,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewCollection {
    pub name: String,
    #[serde(rename = "type", default)]
    pub collection_type: Option<CollectionType>,
    #[serde(default)]
    pub paths: Vec<NewCollectionEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewCollectionEntry {
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CollectionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub collection_type: Option<CollectionType>,
    #[serde(default)]
    pub paths: Option<Vec<CollectionEntryUpdate>>,
}

/// Entries with an id are updated, entries without one are added.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CollectionEntryUpdate {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(FromRow)]
struct CollectionRow {
    id: i64,
    name: String,
    #[sqlx(rename = "type")]
    collection_type: i64,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        let collection_type = CollectionType::try_from(row.collection_type).unwrap_or_else(|e| {
            warn!("Collection {} has {e}, treating it as movies", row.id);
            CollectionType::default()
        });
        Self {
            id: row.id,
            name: row.name,
            collection_type,
            paths: None,
        }
    }
}

impl Database {
    pub async fn get_collections(&self) -> Result<Vec<Collection>, DbError> {
        let rows = sqlx::query_as::<_, CollectionRow>("SELECT id, name, type FROM collection")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Collection::from).collect())
    }

    pub async fn get_collection(&self, id: i64) -> Result<Collection, DbError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            "SELECT id, name, type FROM collection WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(DbError::CollectionNotFound(id))?;

        let mut collection = Collection::from(row);
        collection.paths = Some(self.get_collection_entries(id).await?);
        Ok(collection)
    }

    pub async fn create_collection(&self, new: NewCollection) -> Result<Collection, DbError> {
        let mut tran = self.pool.begin().await.map_err(db_error)?;

        let id = sqlx::query("INSERT INTO collection (name, type) VALUES (?, ?)")
            .bind(&new.name)
            .bind(i64::from(new.collection_type.unwrap_or_default()))
            .execute(&mut *tran)
            .await
            .map_err(db_error)?
            .last_insert_rowid();

        for entry in &new.paths {
            sqlx::query("INSERT INTO collection_entry (collection_id, path) VALUES (?, ?)")
                .bind(id)
                .bind(&entry.path)
                .execute(&mut *tran)
                .await
                .map_err(db_error)?;
        }

        tran.commit().await.map_err(db_error)?;
        debug!("Created collection {id} ({})", new.name);
        self.get_collection(id).await
    }

    pub async fn update_collection(
        &self,
        id: i64,
        update: CollectionUpdate,
    ) -> Result<Collection, DbError> {
        self.ensure_collection_exists(id).await?;

        sqlx::query(
            "UPDATE collection SET name = COALESCE(?, name), type = COALESCE(?, type) WHERE id = ?",
        )
        .bind(update.name)
        .bind(update.collection_type.map(i64::from))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        for entry in update.paths.unwrap_or_default() {
            match (entry.id, entry.path) {
                (Some(entry_id), path) => {
                    self.update_collection_entry(entry_id, path).await?;
                }
                (None, Some(path)) => {
                    self.create_collection_entry(id, NewCollectionEntry { path })
                        .await?;
                }
                (None, None) => warn!("Ignoring collection entry update without id or path"),
            }
        }

        self.get_collection(id).await
    }

    pub async fn delete_collection(&self, id: i64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM collection WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    pub async fn get_collection_entries(
        &self,
        collection_id: i64,
    ) -> Result<Vec<CollectionEntry>, DbError> {
        sqlx::query_as::<_, CollectionEntry>(
            "SELECT id, collection_id, path FROM collection_entry WHERE collection_id = ? ORDER BY id",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn create_collection_entry(
        &self,
        collection_id: i64,
        entry: NewCollectionEntry,
    ) -> Result<CollectionEntry, DbError> {
        self.ensure_collection_exists(collection_id).await?;

        let id = sqlx::query("INSERT INTO collection_entry (collection_id, path) VALUES (?, ?)")
            .bind(collection_id)
            .bind(&entry.path)
            .execute(&self.pool)
            .await
            .map_err(db_error)?
            .last_insert_rowid();

        self.get_collection_entry(id).await
    }

    pub async fn update_collection_entry(
        &self,
        id: i64,
        path: Option<String>,
    ) -> Result<CollectionEntry, DbError> {
        let result = sqlx::query("UPDATE collection_entry SET path = COALESCE(?, path) WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(DbError::EntryNotFound(id));
        }
        self.get_collection_entry(id).await
    }

    pub async fn delete_collection_entry(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM collection_entry WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(DbError::EntryNotFound(id));
        }
        Ok(())
    }

    async fn get_collection_entry(&self, id: i64) -> Result<CollectionEntry, DbError> {
        sqlx::query_as::<_, CollectionEntry>(
            "SELECT id, collection_id, path FROM collection_entry WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(DbError::EntryNotFound(id))
    }

    async fn ensure_collection_exists(&self, id: i64) -> Result<(), DbError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM collection WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(|_| ())
            .ok_or(DbError::CollectionNotFound(id))
    }
}

#[cfg(test)]
#[path = "./collection_test.rs"]
mod collection_test;
