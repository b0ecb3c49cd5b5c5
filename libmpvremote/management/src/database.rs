use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use tracing::info;

use crate::db_error::{DbError, db_error};

#[derive(Clone, Debug)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    pub async fn connect(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Self, DbError> {
        let path = path.as_ref();
        if create_if_missing {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DbError::DbError(format!("Error creating {parent:?}: {e}")))?;
            }
        }
        info!("Opening database at {path:?}");

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(create_if_missing)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await.map_err(db_error)?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::MigrateError(format!("{e:?}")))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
