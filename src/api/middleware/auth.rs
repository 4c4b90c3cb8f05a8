//! Identity resolution
//!
//! Reads the session token from `Authorization: Bearer` or the session
//! cookie and attaches an [`Identity`] to the request. Requests without a
//! valid token pass through anonymously; handlers that need a user take
//! `Identity` as an extractor and get a 401 when it is missing.

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::errors::VistagramError;

/// Authenticated caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

impl FromRequest for Identity {
    type Error = VistagramError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or_else(|| VistagramError::unauthenticated("Sign in required")),
        )
    }
}

/// Identity resolver middleware factory
#[derive(Clone, Default)]
pub struct IdentityResolver;

impl<S, B> Transform<S, ServiceRequest> for IdentityResolver
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityResolverMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityResolverMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct IdentityResolverMiddleware<S> {
    service: Rc<S>,
}

impl<S> IdentityResolverMiddleware<S> {
    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_cookie_token(req: &ServiceRequest) -> Option<String> {
        req.cookie(constants::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|s| !s.is_empty())
    }

    fn resolve(req: &ServiceRequest) -> Option<Identity> {
        let token = Self::extract_bearer_token(req).or_else(|| Self::extract_cookie_token(req))?;

        match get_jwt_service().validate_access_token(&token) {
            Ok(claims) => {
                trace!("Session token accepted for {}", claims.sub);
                Some(Identity {
                    user_id: claims.sub,
                    email: claims.email,
                })
            }
            Err(e) => {
                debug!("Session token rejected: {}", e);
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for IdentityResolverMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        if let Some(identity) = Self::resolve(&req) {
            req.extensions_mut().insert(identity);
        }

        Box::pin(async move { srv.call(req).await })
    }
}
