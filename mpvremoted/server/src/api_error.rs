use axum::Json;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use libmpvremote_management::db_error::DbError;
use libmpvremote_management::file_browser::BrowseError;
use libmpvremote_player::remote_player::DispatchError;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::PathNotFound(_) => ApiError::NotFound(err.to_string()),
            DispatchError::InvalidSeekFlag(_) => ApiError::BadRequest(err.to_string()),
            DispatchError::Player(_) | DispatchError::Io(..) | DispatchError::Options(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::CollectionNotFound(_) | DbError::EntryNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            DbError::DbError(_) | DbError::MigrateError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<BrowseError> for ApiError {
    fn from(err: BrowseError) -> Self {
        match err {
            BrowseError::MissingTarget
            | BrowseError::OutsideRoots(_)
            | BrowseError::DatabaseDisabled => ApiError::BadRequest(err.to_string()),
            BrowseError::UnsafeBrowsingDisabled => ApiError::Forbidden(err.to_string()),
            BrowseError::NotFound(_) => ApiError::NotFound(err.to_string()),
            BrowseError::Db(e) => e.into(),
            BrowseError::Io(..) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `Json` that rejects malformed bodies with a JSON 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

pub fn success() -> Json<Value> {
    Json(json!({ "message": "success" }))
}

#[cfg(test)]
#[path = "./api_error_test.rs"]
mod api_error_test;
