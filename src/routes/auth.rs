use crate::{
    auth::{self, bearer_token, LoginForm, SignupRequest, TokenIssuer, TokenResponse},
    config::Config,
    error::AppError,
    store::UserStore,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;

/// Register a new user
///
/// ## Request Body:
/// JSON `{username, password, email}`.
///
/// ## Responses:
/// - `201 Created`: The account was created. The body is empty.
/// - `409 Conflict`: The username is already taken.
/// - `422 Unprocessable Entity`: The body is malformed or fails validation.
pub async fn signup<S: UserStore + 'static>(
    store: web::Data<S>,
    config: web::Data<Config>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    auth::register(store.get_ref(), signup_data.into_inner(), config.bcrypt_cost).await?;
    Ok(HttpResponse::Created().finish())
}

/// Exchange credentials for an access token
///
/// ## Request Body:
/// Form-encoded `username` and `password`.
///
/// ## Responses:
/// - `200 OK`: `{access_token, token_type: "bearer"}`.
/// - `401 Unauthorized`: Unknown username or wrong password.
pub async fn login<S: UserStore + 'static>(
    store: web::Data<S>,
    issuer: web::Data<TokenIssuer>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let user = auth::authenticate(store.get_ref(), &form.username, &form.password)
        .await?
        .ok_or_else(|| {
            log::warn!("Failed login attempt for {}", form.username);
            AppError::Unauthorized("Incorrect username or password".into())
        })?;

    let token = issuer.issue(&user.username, user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

/// Exchange a recently expired access token for a fresh one
///
/// The expired token is sent as `Authorization: Bearer <token>`.
///
/// ## Responses:
/// - `200 OK`: `{access_token, token_type: "bearer"}`.
/// - `400 Bad Request`: The token has not expired yet.
/// - `401 Unauthorized`: Bad signature, unknown user, or expired longer ago than the grace window.
pub async fn refresh_token<S: UserStore + 'static>(
    req: HttpRequest,
    store: web::Data<S>,
    issuer: web::Data<TokenIssuer>,
) -> Result<impl Responder, AppError> {
    let expired = bearer_token(req.headers())?;
    let token = auth::refresh(store.get_ref(), &issuer, expired, Utc::now().timestamp()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}
