use std::str::FromStr;

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde_json::Value;
use tap::TapFallible;
use tracing::{info, warn};

use crate::api_error::{ApiError, ApiPath, ApiResult, success};
use crate::context::AppContext;
use crate::host::HostAction;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new().route("/computer/{action}", post(run_action))
}

async fn run_action(
    State(context): State<AppContext>,
    ApiPath(action): ApiPath<String>,
) -> ApiResult<Value> {
    let action = HostAction::from_str(&action)
        .map_err(|_| ApiError::BadRequest(format!("Invalid action: {action}")))?;
    info!("Host action requested: {action}");

    // A player that fails to stop does not block the host action.
    let _ = context
        .player
        .commands()
        .stop()
        .await
        .tap_err(|e| warn!("Error stopping player before {action}: {e}"));

    context
        .host
        .run(action)
        .await
        .map_err(|e| ApiError::Internal(format!("Error running {action}: {e}")))?;
    Ok(success())
}
