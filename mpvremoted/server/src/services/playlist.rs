use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use libmpvremote_player::remote_player::{LoadRequest, PlaylistItem};
use serde::Deserialize;
use serde_json::Value;

use crate::api_error::{ApiError, ApiJson, ApiPath, ApiQuery, ApiResult, success};
use crate::context::AppContext;
use crate::services::controls;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new()
        .route("/playlist", get(get_playlist).post(load))
        .route("/playlist/remove/{index}", post(remove).delete(remove))
        .route("/playlist/move", post(move_item))
        .route("/playlist/play/{index}", post(play_index))
        .route("/playlist/clear", post(clear))
        .route("/playlist/shuffle", post(shuffle))
        .route("/playlist/prev", post(controls::prev))
        .route("/playlist/next", post(controls::next))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveQuery {
    from_index: Option<i64>,
    to_index: Option<i64>,
}

async fn get_playlist(State(context): State<AppContext>) -> Json<Vec<PlaylistItem>> {
    Json(context.player.get_playlist().await)
}

async fn load(
    State(context): State<AppContext>,
    ApiJson(request): ApiJson<LoadRequest>,
) -> ApiResult<Value> {
    context.player.commands().load(request).await?;
    Ok(success())
}

async fn remove(
    State(context): State<AppContext>,
    ApiPath(index): ApiPath<i64>,
) -> ApiResult<Value> {
    context.player.commands().playlist_remove(index).await?;
    Ok(success())
}

async fn move_item(
    State(context): State<AppContext>,
    ApiQuery(query): ApiQuery<MoveQuery>,
) -> ApiResult<Value> {
    let (Some(from_index), Some(to_index)) = (query.from_index, query.to_index) else {
        return Err(ApiError::BadRequest(
            "fromIndex and toIndex are required".to_owned(),
        ));
    };
    context
        .player
        .commands()
        .playlist_move(from_index, to_index)
        .await?;
    Ok(success())
}

async fn play_index(
    State(context): State<AppContext>,
    ApiPath(index): ApiPath<i64>,
) -> ApiResult<Vec<PlaylistItem>> {
    context.player.commands().playlist_play_index(index).await?;
    Ok(Json(context.player.get_playlist().await))
}

async fn clear(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().playlist_clear().await?;
    Ok(success())
}

async fn shuffle(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().playlist_shuffle().await?;
    Ok(success())
}
