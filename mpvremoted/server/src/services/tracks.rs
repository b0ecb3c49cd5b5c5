use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use libmpvremote_player::remote_player::{Track, TrackAddRequest};
use serde_json::Value;

use crate::api_error::{ApiJson, ApiPath, ApiResult, success};
use crate::context::AppContext;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new()
        .route("/tracks", get(get_tracks))
        .route("/tracks/audio/reload/{id}", post(audio_reload))
        .route("/tracks/audio/cycle", post(audio_cycle))
        .route("/tracks/audio/add", post(audio_add))
        .route("/tracks/audio/timing/{seconds}", post(audio_timing))
        .route("/tracks/sub/reload/{id}", post(sub_reload))
        .route("/tracks/sub/add", post(sub_add))
        .route("/tracks/sub/timing/{seconds}", post(sub_timing))
        .route("/tracks/sub/ass-override/{value}", post(sub_ass_override))
        .route("/tracks/sub/font-size/{size}", post(sub_font_size))
        .route("/tracks/sub/toggle-visibility", post(sub_toggle_visibility))
        .route("/tracks/sub/visibility/{value}", post(sub_visibility))
}

async fn get_tracks(State(context): State<AppContext>) -> Json<Vec<Track>> {
    Json(context.player.get_tracks().await)
}

async fn audio_reload(
    State(context): State<AppContext>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Value> {
    context.player.commands().set_audio_track(&id).await?;
    Ok(success())
}

async fn audio_cycle(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().cycle_audio().await?;
    Ok(success())
}

async fn audio_add(
    State(context): State<AppContext>,
    ApiJson(request): ApiJson<TrackAddRequest>,
) -> ApiResult<Value> {
    context.player.commands().add_audio(request).await?;
    Ok(success())
}

async fn audio_timing(
    State(context): State<AppContext>,
    ApiPath(seconds): ApiPath<f64>,
) -> ApiResult<Value> {
    context.player.commands().set_audio_delay(seconds).await?;
    Ok(success())
}

async fn sub_reload(
    State(context): State<AppContext>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Value> {
    context.player.commands().set_sub_track(&id).await?;
    Ok(success())
}

async fn sub_add(
    State(context): State<AppContext>,
    ApiJson(request): ApiJson<TrackAddRequest>,
) -> ApiResult<Value> {
    context.player.commands().add_sub(request).await?;
    Ok(success())
}

async fn sub_timing(
    State(context): State<AppContext>,
    ApiPath(seconds): ApiPath<f64>,
) -> ApiResult<Value> {
    context.player.commands().set_sub_delay(seconds).await?;
    Ok(success())
}

async fn sub_ass_override(
    State(context): State<AppContext>,
    ApiPath(value): ApiPath<String>,
) -> ApiResult<Value> {
    context.player.commands().set_sub_ass_override(&value).await?;
    Ok(success())
}

async fn sub_font_size(
    State(context): State<AppContext>,
    ApiPath(size): ApiPath<i64>,
) -> ApiResult<Value> {
    context.player.commands().set_sub_font_size(size).await?;
    Ok(success())
}

async fn sub_toggle_visibility(State(context): State<AppContext>) -> ApiResult<Value> {
    context.player.commands().toggle_sub_visibility().await?;
    Ok(success())
}

async fn sub_visibility(
    State(context): State<AppContext>,
    ApiPath(value): ApiPath<String>,
) -> ApiResult<Value> {
    context.player.commands().set_sub_visibility(&value).await?;
    Ok(success())
}
