use axum::Json;
use axum::Router;
use axum::extract::{RawQuery, State};
use axum::routing::get;
use libmpvremote_player::remote_player::{PlayerSnapshot, exclusion_set};

use crate::context::AppContext;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new().route("/status", get(get_status))
}

/// `exclude` may be repeated, so the query is parsed by hand instead of through `Query`.
fn excluded_keys(query: Option<&str>) -> Vec<String> {
    query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(key, _)| key == "exclude")
                .map(|(_, value)| value.into_owned())
                .collect()
        })
        .unwrap_or_default()
}

async fn get_status(
    State(context): State<AppContext>,
    RawQuery(query): RawQuery,
) -> Json<PlayerSnapshot> {
    let exclude = exclusion_set(excluded_keys(query.as_deref()));
    Json(context.player.get_status(exclude).await)
}
