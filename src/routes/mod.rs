pub mod auth;
pub mod root;
pub mod todos;

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::store::Store;
use actix_web::web;

/// Registers every route of the service against the store type `S`.
///
/// The caller provides `web::Data<S>`, `web::Data<TokenIssuer>` and `web::Data<Config>`
/// as app data. Body and path extraction failures are answered with `AppError::ValidationError`.
pub fn config<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .service(root::index)
    .service(root::health)
    .service(
        web::scope("/auth")
            .route("/signup", web::post().to(auth::signup::<S>))
            .route("/token", web::post().to(auth::login::<S>))
            .route("/refresh_token", web::post().to(auth::refresh_token::<S>)),
    )
    .service(
        web::scope("/todos")
            .wrap(AuthMiddleware)
            .service(
                web::resource("/")
                    .route(web::get().to(todos::list_todos::<S>))
                    .route(web::post().to(todos::create_todo::<S>)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(todos::get_todo::<S>))
                    .route(web::put().to(todos::update_todo::<S>))
                    .route(web::delete().to(todos::delete_todo::<S>)),
            ),
    );
}
