//! Ownership-scoped todo operations.
//!
//! Each function takes the owner's id from the resolved identity. A todo that exists but
//! belongs to someone else is reported exactly like one that does not exist.

use crate::error::AppError;
use crate::models::{Todo, TodoInput};
use crate::store::TodoStore;
use validator::Validate;

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

pub async fn create<S: TodoStore>(
    store: &S,
    input: &TodoInput,
    owner_id: i32,
) -> Result<Todo, AppError> {
    input.validate()?;
    store
        .insert_todo(input, owner_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Todo not created".into()))
}

/// Lists the owner's todos. An empty list is reported as `NotFound`.
pub async fn list_by_owner<S: TodoStore>(store: &S, owner_id: i32) -> Result<Vec<Todo>, AppError> {
    let todos = store.list_todos(owner_id).await?;
    if todos.is_empty() {
        return Err(AppError::NotFound("No todos found".into()));
    }
    Ok(todos)
}

pub async fn get_one<S: TodoStore>(store: &S, id: i32, owner_id: i32) -> Result<Todo, AppError> {
    store.find_todo(id, owner_id).await?.ok_or_else(not_found)
}

pub async fn update<S: TodoStore>(
    store: &S,
    id: i32,
    owner_id: i32,
    input: &TodoInput,
) -> Result<Todo, AppError> {
    input.validate()?;
    store
        .update_todo(id, owner_id, input)
        .await?
        .ok_or_else(not_found)
}

/// Deletes the todo and returns it as it was before removal.
pub async fn delete<S: TodoStore>(store: &S, id: i32, owner_id: i32) -> Result<Todo, AppError> {
    store.delete_todo(id, owner_id).await?.ok_or_else(not_found)
}
