use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    #[error("Database error: {0}")]
    DbError(String),
    #[error("Migration error: {0}")]
    MigrateError(String),
    #[error("Collection {0} does not exist")]
    CollectionNotFound(i64),
    #[error("Collection entry {0} does not exist")]
    EntryNotFound(i64),
}

pub(crate) fn db_error(e: sqlx::Error) -> DbError {
    DbError::DbError(format!("{e:?}"))
}
