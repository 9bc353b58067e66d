use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoInput, User};
use crate::store::{TodoStore, UserStore};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-process store with the same constraints as the PostgreSQL schema:
/// unique usernames, serial ids starting at 1, and todos that must reference an
/// existing user and are removed along with it.
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    todos: BTreeMap<i32, Todo>,
    last_user_id: i32,
    last_todo_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes a user and, like `ON DELETE CASCADE`, every todo they own.
    pub fn remove_user(&self, id: i32) -> Result<Option<User>, AppError> {
        let mut tables = self.write()?;
        let removed = tables.users.remove(&id);
        if removed.is_some() {
            tables.todos.retain(|_, todo| todo.user_id != id);
        }
        Ok(removed)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::InternalServerError("Store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::InternalServerError("Store lock poisoned".into()))
    }
}

impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username already registered".into()));
        }
        tables.last_user_id += 1;
        let created = User {
            id: tables.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.read()?.users.get(&id).cloned())
    }
}

impl TodoStore for MemoryStore {
    async fn insert_todo(
        &self,
        input: &TodoInput,
        owner_id: i32,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&owner_id) {
            return Err(AppError::DatabaseError(format!(
                "todos.user_id {} does not reference an existing user",
                owner_id
            )));
        }
        tables.last_todo_id += 1;
        let todo = Todo {
            id: tables.last_todo_id,
            content: input.content.clone(),
            completed: input.completed,
            user_id: owner_id,
        };
        tables.todos.insert(todo.id, todo.clone());
        Ok(Some(todo))
    }

    async fn list_todos(&self, owner_id: i32) -> Result<Vec<Todo>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .todos
            .values()
            .filter(|todo| todo.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_todo(&self, id: i32, owner_id: i32) -> Result<Option<Todo>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .todos
            .get(&id)
            .filter(|todo| todo.user_id == owner_id)
            .cloned())
    }

    async fn update_todo(
        &self,
        id: i32,
        owner_id: i32,
        input: &TodoInput,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.write()?;
        match tables.todos.get_mut(&id) {
            Some(todo) if todo.user_id == owner_id => {
                todo.content = input.content.clone();
                todo.completed = input.completed;
                Ok(Some(todo.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_todo(&self, id: i32, owner_id: i32) -> Result<Option<Todo>, AppError> {
        let mut tables = self.write()?;
        let owned = tables
            .todos
            .get(&id)
            .map_or(false, |todo| todo.user_id == owner_id);
        if !owned {
            return Ok(None);
        }
        Ok(tables.todos.remove(&id))
    }
}
