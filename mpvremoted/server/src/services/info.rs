use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use libmpvremote_player::remote_player::PlayerVersions;
use serde::Serialize;

use crate::context::AppContext;
use crate::settings::ServerSettings;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new().route("/mpvinfo", get(get_info))
}

#[derive(Serialize)]
struct MpvInfo {
    #[serde(flatten)]
    versions: PlayerVersions,
    #[serde(rename = "mpvremoteConfig")]
    config: ServerSettings,
    #[serde(rename = "mpvremoteVersion")]
    version: &'static str,
}

async fn get_info(State(context): State<AppContext>) -> Json<MpvInfo> {
    Json(MpvInfo {
        versions: context.player.get_versions().await,
        config: ServerSettings::clone(&context.settings),
        version: env!("CARGO_PKG_VERSION"),
    })
}
