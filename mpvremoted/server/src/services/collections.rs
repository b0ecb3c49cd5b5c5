use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use libmpvremote_management::collection::{
    Collection, CollectionEntry, CollectionUpdate, NewCollection, NewCollectionEntry,
};
use serde_json::Value;

use crate::api_error::{ApiJson, ApiPath, ApiResult, success};
use crate::context::AppContext;

pub(crate) fn routes() -> Router<AppContext> {
    Router::new()
        .route("/collections", get(list).post(create))
        .route(
            "/collections/{id}",
            get(get_one).patch(update).delete(remove),
        )
        .route("/collections/{id}/entries", post(add_entry))
        .route("/collections/entries/{id}", delete(remove_entry))
}

async fn list(State(context): State<AppContext>) -> ApiResult<Vec<Collection>> {
    Ok(Json(context.database()?.get_collections().await?))
}

async fn get_one(
    State(context): State<AppContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Collection> {
    Ok(Json(context.database()?.get_collection(id).await?))
}

async fn create(
    State(context): State<AppContext>,
    ApiJson(collection): ApiJson<NewCollection>,
) -> ApiResult<Collection> {
    Ok(Json(
        context.database()?.create_collection(collection).await?,
    ))
}

async fn update(
    State(context): State<AppContext>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<CollectionUpdate>,
) -> ApiResult<Collection> {
    Ok(Json(
        context.database()?.update_collection(id, update).await?,
    ))
}

async fn remove(
    State(context): State<AppContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    context.database()?.delete_collection(id).await?;
    Ok(success())
}

async fn add_entry(
    State(context): State<AppContext>,
    ApiPath(collection_id): ApiPath<i64>,
    ApiJson(entry): ApiJson<NewCollectionEntry>,
) -> ApiResult<CollectionEntry> {
    Ok(Json(
        context
            .database()?
            .create_collection_entry(collection_id, entry)
            .await?,
    ))
}

async fn remove_entry(
    State(context): State<AppContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    context.database()?.delete_collection_entry(id).await?;
    Ok(success())
}
