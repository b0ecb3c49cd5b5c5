use std::convert::Infallible;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::context::AppContext;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(10);

pub(crate) fn routes() -> Router<AppContext> {
    Router::new().route("/events", get(sse_events))
}

async fn sse_events(
    State(context): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = context.player.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|item| match item {
        Ok(announcement) => Event::default()
            .json_data(announcement)
            .map_err(|e| warn!("Error serializing announcement: {e}"))
            .ok()
            .map(Ok),
        Err(e) => {
            warn!("Event stream fell behind: {e}");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}
