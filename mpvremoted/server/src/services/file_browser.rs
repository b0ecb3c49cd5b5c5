use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use libmpvremote_management::file_browser::{BrowseRequest, BrowseResult, BrowseRoot, Drive};

use crate::api_error::{ApiJson, ApiResult};
use crate::context::AppContext;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new()
        .route("/drives", get(get_drives))
        .route("/filebrowser/paths", get(get_paths))
        .route("/filebrowser/browse", post(browse))
}

async fn get_drives(State(context): State<AppContext>) -> ApiResult<Vec<Drive>> {
    Ok(Json(context.file_browser.drives()?))
}

async fn get_paths(State(context): State<AppContext>) -> Json<Vec<BrowseRoot>> {
    Json(context.file_browser.paths())
}

async fn browse(
    State(context): State<AppContext>,
    ApiJson(request): ApiJson<BrowseRequest>,
) -> ApiResult<BrowseResult> {
    Ok(Json(context.file_browser.browse(request).await?))
}
