#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "A multi-user todo list service: signup and login with bcrypt-hashed passwords,"]
#![doc = "short-lived signed access tokens with a bounded refresh window, and todo CRUD"]
#![doc = "scoped to the token's owner. The binary (`main.rs`) wires these pieces into an"]
#![doc = "Actix Web server backed by PostgreSQL."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod todos;

pub use crate::config::Config;
pub use crate::error::AppError;
