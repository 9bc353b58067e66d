//! Todo endpoints. Every handler runs behind `AuthMiddleware` and scopes its work to the
//! caller through [`AuthenticatedUser`].

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::TodoInput,
    store::TodoStore,
    todos,
};
use actix_web::{web, HttpResponse, Responder};

/// Ids are `SERIAL`, so a number outside `i32` can never name a stored todo.
fn stored_id(path: web::Path<i64>) -> Result<i32, AppError> {
    i32::try_from(path.into_inner()).map_err(|_| AppError::NotFound("Todo not found".into()))
}

/// Creates a todo owned by the authenticated user.
///
/// ## Request Body:
/// - `content`: The text of the todo (required).
/// - `completed` (optional): Defaults to `false`.
///
/// ## Responses:
/// - `200 OK`: The created `Todo`, including its generated `id`.
/// - `400 Bad Request`: The store did not return the created row.
/// - `401 Unauthorized`: Missing or invalid access token.
/// - `422 Unprocessable Entity`: The body fails validation.
pub async fn create_todo<S: TodoStore + 'static>(
    store: web::Data<S>,
    user: AuthenticatedUser,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = todos::create(store.get_ref(), &todo_data, user.id()).await?;
    log::debug!("User {} created todo {}", user.id(), todo.id);
    Ok(HttpResponse::Ok().json(todo))
}

/// Lists the authenticated user's todos, ordered by id.
///
/// ## Responses:
/// - `200 OK`: A JSON array of `Todo` objects.
/// - `401 Unauthorized`: Missing or invalid access token.
/// - `404 Not Found`: The user has no todos.
pub async fn list_todos<S: TodoStore + 'static>(
    store: web::Data<S>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = todos::list_by_owner(store.get_ref(), user.id()).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Retrieves one todo by id.
///
/// ## Responses:
/// - `200 OK`: The `Todo`.
/// - `401 Unauthorized`: Missing or invalid access token.
/// - `404 Not Found`: No such todo, or it belongs to another user.
pub async fn get_todo<S: TodoStore + 'static>(
    store: web::Data<S>,
    todo_id: web::Path<i64>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = todos::get_one(store.get_ref(), stored_id(todo_id)?, user.id()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Overwrites the content and completion flag of a todo.
///
/// ## Responses:
/// - `200 OK`: The updated `Todo`.
/// - `401 Unauthorized`: Missing or invalid access token.
/// - `404 Not Found`: No such todo, or it belongs to another user.
/// - `422 Unprocessable Entity`: The body fails validation.
pub async fn update_todo<S: TodoStore + 'static>(
    store: web::Data<S>,
    todo_id: web::Path<i64>,
    todo_data: web::Json<TodoInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = todos::update(store.get_ref(), stored_id(todo_id)?, user.id(), &todo_data).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes a todo and returns it as it was before deletion.
///
/// ## Responses:
/// - `200 OK`: The deleted `Todo`.
/// - `401 Unauthorized`: Missing or invalid access token.
/// - `404 Not Found`: No such todo, or it belongs to another user.
pub async fn delete_todo<S: TodoStore + 'static>(
    store: web::Data<S>,
    todo_id: web::Path<i64>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = todos::delete(store.get_ref(), stored_id(todo_id)?, user.id()).await?;
    log::debug!("User {} deleted todo {}", user.id(), todo.id);
    Ok(HttpResponse::Ok().json(todo))
}
