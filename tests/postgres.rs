//! Runs the HTTP flow against a real PostgreSQL database.
//!
//! Skipped unless `DATABASE_URL` is set (a `.env` file is honoured).

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{login, register_and_login, send, signup, test_config};
use dotenv::dotenv;
use serde_json::json;
use todo_api::store::PgStore;

async fn connect() -> Option<PgStore> {
    dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL integration test");
        return None;
    }
    let store = PgStore::connect(&test_config())
        .await
        .expect("Failed to connect to test DB");
    store.migrate().await.expect("Failed to run migrations");
    Some(store)
}

async fn cleanup_user(store: &PgStore, username: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(store.pool())
        .await;
}

#[actix_rt::test]
async fn test_postgres_signup_conflict_and_scoping() {
    let Some(store) = connect().await else {
        return;
    };
    cleanup_user(&store, "pg_owner").await;
    cleanup_user(&store, "pg_other").await;

    let app = test_app!(store.clone(), PgStore);

    let owner = register_and_login(&app, "pg_owner").await;
    let other = register_and_login(&app, "pg_other").await;

    // The UNIQUE constraint on users.username surfaces as 409.
    assert_eq!(
        signup(&app, "pg_owner", "pw", "dup@example.com").await,
        StatusCode::CONFLICT
    );
    assert!(login(&app, "pg_owner", "pw").await.is_ok());

    let req = test::TestRequest::post()
        .uri("/todos/")
        .set_json(json!({ "content": "buy milk", "completed": false }));
    let (status, body) = send(&app, req, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK, "Body: {:?}", body);
    let todo_id = body["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri(&format!("/todos/{}", todo_id));
    let (status, _) = send(&app, req, Some(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/todos/{}", todo_id))
        .set_json(json!({ "content": "buy milk and eggs", "completed": true }));
    let (status, body) = send(&app, req, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], true);

    let req = test::TestRequest::delete().uri(&format!("/todos/{}", todo_id));
    let (status, body) = send(&app, req, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "buy milk and eggs");

    let req = test::TestRequest::get().uri("/todos/");
    let (status, _) = send(&app, req, Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_user(&store, "pg_owner").await;
    cleanup_user(&store, "pg_other").await;
}
