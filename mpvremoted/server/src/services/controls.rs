use axum::Router;
use axum::extract::State;
use axum::routing::post;
use libmpvremote_player::remote_player::SeekRequest;
use serde_json::Value;

use crate::api_error::{ApiJson, ApiPath, ApiResult, success};
use crate::context::AppContext;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new()
        .route("/controls/play-pause", post(play_pause))
        .route("/controls/play", post(play))
        .route("/controls/pause", post(pause))
        .route("/controls/stop", post(stop))
        .route("/controls/prev", post(prev))
        .route("/controls/next", post(next))
        .route("/controls/fullscreen", post(fullscreen))
        .route("/controls/mute", post(mute))
        .route("/controls/volume/{value}", post(volume))
        .route("/controls/seek", post(seek))
}

async fn play_pause(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().toggle_pause().await?;
    Ok(success())
}

async fn play(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().play().await?;
    Ok(success())
}

async fn pause(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().pause().await?;
    Ok(success())
}

async fn stop(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().stop().await?;
    Ok(success())
}

pub(crate) async fn prev(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().prev().await?;
    Ok(success())
}

pub(crate) async fn next(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().next().await?;
    Ok(success())
}

async fn fullscreen(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().toggle_fullscreen().await?;
    Ok(success())
}

async fn mute(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().toggle_mute().await?;
    Ok(success())
}

async fn volume(
    State(context): State<AppContext>,
    ApiPath(value): ApiPath<f64>,
) -> ApiResult<Value> {
    context.player.commands().set_volume(value).await?;
    Ok(success())
}

async fn seek(
    State(context): State<AppContext>,
    ApiJson(request): ApiJson<SeekRequest>,
) -> ApiResult<Value> {
    context.player.commands().seek(request).await?;
    Ok(success())
}
