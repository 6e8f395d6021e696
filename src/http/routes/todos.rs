use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::application::todo_service::TodoService;
use crate::domain::todo::{PartialTodo, Todo, TodoId};
use crate::http::types::ApiError;

pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

const COLLECTION_METHODS: &str = "OPTIONS,GET,POST";
const ITEM_METHODS: &str = "OPTIONS,GET,PUT,PATCH,DELETE";

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    let collection = Router::new()
        .route(
            "/todos",
            post(create_todo::<S>)
                .get(list_todos::<S>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route_layer(allow_methods(COLLECTION_METHODS));
    let item = Router::new()
        .route(
            "/todos/:id",
            get(get_todo::<S>)
                .put(update_todo::<S>)
                .patch(patch_todo::<S>)
                .delete(delete_todo::<S>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route_layer(allow_methods(ITEM_METHODS));
    collection.merge(item).with_state(state)
}

fn allow_methods(methods: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(methods))
}

async fn preflight() -> StatusCode { StatusCode::NO_CONTENT }

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

async fn create_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input: Todo = decode(body)?;
    let todo = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id: TodoId = id.parse()?;
    Ok(Json(state.service.get(id).await?))
}

async fn update_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let id: TodoId = id.parse()?;
    let input: Todo = decode(body)?;
    state.service.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

enum PatchFormat { Merge, Document }

async fn patch_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let id: TodoId = id.parse()?;
    match patch_format(&headers)? {
        PatchFormat::Merge => {
            let patch: PartialTodo = decode(body)?;
            state.service.patch(id, patch).await?;
        }
        PatchFormat::Document => {
            let doc: Value = decode(body)?;
            state.service.apply_document_patch(id, doc).await?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id: TodoId = id.parse()?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST and PUT bodies are read as JSON whatever their content type says.
fn decode<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(&body?)?)
}

// A missing content type is read as a plain JSON merge.
fn patch_format(headers: &HeaderMap) -> Result<PatchFormat, ApiError> {
    let Some(value) = headers.get(CONTENT_TYPE) else { return Ok(PatchFormat::Merge) };
    let mime = value.to_str().unwrap_or_default().split(';').next().unwrap_or_default().trim();
    if mime.eq_ignore_ascii_case("application/json") {
        Ok(PatchFormat::Merge)
    } else if mime.eq_ignore_ascii_case(JSON_PATCH_CONTENT_TYPE) {
        Ok(PatchFormat::Document)
    } else {
        Err(ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("expected application/json or {JSON_PATCH_CONTENT_TYPE}"),
        ))
    }
}
