use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenIssuer;
use crate::auth::Identity;
use crate::error::AppError;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(AppError::Unauthorized("Not authenticated".into())),
    }
}

/// Resolves a bearer token to the caller's identity. Any verification failure is `Unauthorized`.
pub fn resolve_identity(issuer: &TokenIssuer, token: &str) -> Result<Identity, AppError> {
    issuer.verify(token).map(Identity::from).map_err(|err| {
        log::debug!("Rejected access token: {}", err);
        match err {
            AppError::Unauthorized(_) => {
                AppError::Unauthorized("Could not validate credentials".into())
            }
            other => other,
        }
    })
}

/// Rejects any request in the wrapped scope that does not carry a valid access token,
/// and stores the resolved [`Identity`] in the request extensions for handlers.
///
/// Rejections are rendered here as `AppError` responses rather than returned as errors,
/// so they flow through the outer middleware like any other response.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = match req.app_data::<web::Data<TokenIssuer>>() {
            Some(issuer) => {
                bearer_token(req.headers()).and_then(|token| resolve_identity(issuer, token))
            }
            None => Err(AppError::InternalServerError(
                "Token issuer is not configured".into(),
            )),
        };

        match identity {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                log::debug!("Unauthenticated request to {}", req.path());
                let response = req.error_response(app_err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
