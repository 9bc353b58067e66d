//! Signup, login and refresh flows on top of a [`UserStore`].

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenIssuer;
use crate::auth::SignupRequest;
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::UserStore;
use validator::Validate;

/// Hashes the password and persists a new user.
///
/// A taken username surfaces as `AppError::Conflict` from the store's uniqueness constraint.
pub async fn register<S: UserStore>(
    store: &S,
    request: SignupRequest,
    bcrypt_cost: u32,
) -> Result<User, AppError> {
    request.validate()?;

    let password_hash = hash_password(&request.password, bcrypt_cost)?;
    let user = store
        .insert_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await?;

    log::info!("Registered user {} (id {})", user.username, user.id);
    Ok(user)
}

/// Returns the user if `password` matches the stored hash, `None` otherwise.
pub async fn authenticate<S: UserStore>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = match store.find_user_by_username(username).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    if verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Exchanges an expired token for a new one.
///
/// The signature must verify and the user must still exist. The token must have expired,
/// and no longer ago than the issuer's grace window.
pub async fn refresh<S: UserStore>(
    store: &S,
    issuer: &TokenIssuer,
    token: &str,
    now: i64,
) -> Result<String, AppError> {
    let claims = issuer.decode_signed(token)?;

    let user = store
        .find_user_by_id(claims.id)
        .await?
        .filter(|user| user.username == claims.sub)
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;

    issuer.check_refresh_window(&claims, now)?;

    log::debug!("Refreshing access token for user {}", user.id);
    issuer.issue_at(&user.username, user.id, now)
}
