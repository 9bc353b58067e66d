use crate::config::Config;
use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoInput, User};
use crate::store::{TodoStore, UserStore};
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

/// PostgreSQL-backed store.
///
/// Each operation checks one connection out of the pool for its duration. The
/// `PoolConnection` guard hands it back when dropped, including on early `?` returns.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies the migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn session(&self) -> Result<PoolConnection<Postgres>, AppError> {
        Ok(self.pool.acquire().await?)
    }
}

impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut conn = self.session().await?;
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3)
             RETURNING id, username, email, password_hash",
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&mut *conn)
        .await?;
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let mut conn = self.session().await?;
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let mut conn = self.session().await?;
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(user)
    }
}

impl TodoStore for PgStore {
    async fn insert_todo(
        &self,
        input: &TodoInput,
        owner_id: i32,
    ) -> Result<Option<Todo>, AppError> {
        let mut conn = self.session().await?;
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (content, completed, user_id) VALUES ($1, $2, $3)
             RETURNING id, content, completed, user_id",
        )
        .bind(&input.content)
        .bind(input.completed)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(todo)
    }

    async fn list_todos(&self, owner_id: i32) -> Result<Vec<Todo>, AppError> {
        let mut conn = self.session().await?;
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, content, completed, user_id FROM todos WHERE user_id = $1 ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(todos)
    }

    async fn find_todo(&self, id: i32, owner_id: i32) -> Result<Option<Todo>, AppError> {
        let mut conn = self.session().await?;
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, content, completed, user_id FROM todos WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(todo)
    }

    async fn update_todo(
        &self,
        id: i32,
        owner_id: i32,
        input: &TodoInput,
    ) -> Result<Option<Todo>, AppError> {
        let mut conn = self.session().await?;
        let todo = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET content = $1, completed = $2
             WHERE id = $3 AND user_id = $4
             RETURNING id, content, completed, user_id",
        )
        .bind(&input.content)
        .bind(input.completed)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(todo)
    }

    async fn delete_todo(&self, id: i32, owner_id: i32) -> Result<Option<Todo>, AppError> {
        let mut conn = self.session().await?;
        let todo = sqlx::query_as::<_, Todo>(
            "DELETE FROM todos WHERE id = $1 AND user_id = $2
             RETURNING id, content, completed, user_id",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(todo)
    }
}
