//! The five `/api/todo` operations. Each one is a single call to the store
//! table; no state is kept between requests.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::de::IgnoredAny;
use store_client::Filter;
use tracing::instrument;

use crate::error::TodoError;
use crate::extract::{ApiJson, ApiPath};
use crate::model::{self, NewTodoRow, TodoChanges, TodoInput, TodoItem, TodoRow, ID_COLUMN};
use crate::{AppState, TODO_BASE_PATH};

#[instrument(skip_all)]
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoItem>>, TodoError> {
    let rows: Vec<TodoRow> = state
        .todos
        .get_all()
        .await
        .map_err(TodoError::store("Error fetching todos"))?;
    Ok(Json(rows.into_iter().map(TodoItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TodoItem>, TodoError> {
    let rows: Vec<TodoRow> = state
        .todos
        .get_filtered(&Filter::eq(ID_COLUMN, id))
        .await
        .map_err(TodoError::store("Error fetching todo"))?;
    rows.into_iter()
        .next()
        .map(|row| Json(row.into()))
        .ok_or(TodoError::NotFound { id })
}

#[instrument(skip_all)]
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TodoInput>,
) -> Result<impl IntoResponse, TodoError> {
    let row = NewTodoRow::stamped(input, model::now());
    let created: Vec<TodoRow> = state
        .todos
        .insert(&row)
        .await
        .map_err(TodoError::store("Error creating todo"))?;

    let item: TodoItem = created
        .into_iter()
        .next()
        .ok_or(TodoError::BadCreate)?
        .into();
    tracing::info!(id = item.id, "todo created");

    let location = format!("{TODO_BASE_PATH}/{}", item.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

/// Full overwrite: fields missing from the body are written as their
/// defaults. The id always comes from the path.
#[instrument(skip(state, input))]
pub async fn update_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<TodoInput>,
) -> Result<Json<TodoItem>, TodoError> {
    let changes = TodoChanges::stamped(input, model::now());
    let updated: Vec<TodoRow> = state
        .todos
        .update(&Filter::eq(ID_COLUMN, id), &changes)
        .await
        .map_err(TodoError::store("Error updating todo"))?;

    let row = updated.into_iter().next().ok_or(TodoError::NotFound { id })?;
    tracing::info!("todo updated");
    Ok(Json(row.into()))
}

/// Deleting an id that matches nothing still answers 204.
#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, TodoError> {
    let removed: Vec<IgnoredAny> = state
        .todos
        .delete(&Filter::eq(ID_COLUMN, id))
        .await
        .map_err(TodoError::store("Error deleting todo"))?;
    tracing::debug!(removed = removed.len(), "todo delete finished");
    Ok(StatusCode::NO_CONTENT)
}
