use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Body accepted when creating or updating a todo.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// The text of the todo. Must be between 1 and 1000 characters.
    #[validate(length(min = 1, max = 1000))]
    pub content: String,

    /// Whether the todo is done. Defaults to `false` when omitted or `null`.
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A todo item as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Unique identifier generated by the store.
    pub id: i32,
    pub content: String,
    pub completed: bool,
    /// Identifier of the user who owns the todo.
    pub user_id: i32,
}
