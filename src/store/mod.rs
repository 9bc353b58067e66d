//! Persistence for users and todos.
//!
//! Handlers and services are generic over the [`UserStore`] and [`TodoStore`] traits.
//! [`PgStore`] is the PostgreSQL backend used in deployment; [`MemoryStore`] keeps the
//! same tables in process memory and backs the test suite.
//!
//! Every todo query takes the owner's id. Implementations must match on both the todo id
//! and the owner, so a caller can never observe a row that belongs to someone else.

pub mod memory;
pub mod postgres;

use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoInput, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[allow(async_fn_in_trait)]
pub trait UserStore {
    /// Persists a new user. A duplicate username yields `AppError::Conflict`.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
}

#[allow(async_fn_in_trait)]
pub trait TodoStore {
    /// Persists a todo for `owner_id`. `None` means no row came back from the insert.
    async fn insert_todo(&self, input: &TodoInput, owner_id: i32)
        -> Result<Option<Todo>, AppError>;

    /// All todos owned by `owner_id`, ordered by id.
    async fn list_todos(&self, owner_id: i32) -> Result<Vec<Todo>, AppError>;

    async fn find_todo(&self, id: i32, owner_id: i32) -> Result<Option<Todo>, AppError>;

    /// Overwrites `content` and `completed`, returning the updated row if it exists and is owned.
    async fn update_todo(
        &self,
        id: i32,
        owner_id: i32,
        input: &TodoInput,
    ) -> Result<Option<Todo>, AppError>;

    /// Removes the row if it exists and is owned, returning its prior state.
    async fn delete_todo(&self, id: i32, owner_id: i32) -> Result<Option<Todo>, AppError>;
}

/// Everything the application needs from a storage backend.
pub trait Store: UserStore + TodoStore + Clone + 'static {}

impl<T> Store for T where T: UserStore + TodoStore + Clone + 'static {}
