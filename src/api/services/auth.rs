//! Session endpoints
//!
//! The identity provider itself lives outside this service. It calls
//! `/api/auth/callback` with a shared secret once a user has signed in,
//! and gets back a session token for that user.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::api::middleware::Identity;
use crate::config::get_config;
use crate::errors::VistagramError;
use crate::services::ProfileService;

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, api_result, error_from_vistagram, error_response, json_response};
use super::types::{ProviderCallbackRequest, SessionResponse};

/// 常量时间比较 provider secret
fn provider_secret_matches(expected: &str, provided: &str) -> bool {
    !expected.is_empty() && expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// `POST /api/auth/callback`
pub async fn provider_callback(
    req: HttpRequest,
    body: web::Json<ProviderCallbackRequest>,
    profiles: web::Data<Arc<ProfileService>>,
) -> HttpResponse {
    let expected = &get_config().auth.provider_secret;
    if expected.is_empty() {
        debug!("Identity callback called while disabled");
        return error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, "Not Found");
    }

    let provided = req
        .headers()
        .get(constants::PROVIDER_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !provider_secret_matches(expected, provided) {
        warn!("Identity callback rejected: bad provider secret");
        return error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Invalid provider secret",
        );
    }

    let body = body.into_inner();
    let user = match profiles.sign_in(&body.email, body.name, body.image).await {
        Ok(user) => user,
        Err(e) => return error_from_vistagram(&e),
    };

    let token = match get_jwt_service().generate_access_token(&user.id, &user.email) {
        Ok(token) => token,
        Err(e) => return error_from_vistagram(&VistagramError::from(e)),
    };

    info!("Session issued for user {}", user.id);
    let cookie = CookieBuilder::from_config().build_session_cookie(token.clone());
    let mut resp = json_response(
        StatusCode::OK,
        ErrorCode::Success,
        "OK",
        Some(SessionResponse { token, user }),
    );
    if let Err(e) = resp.add_cookie(&cookie) {
        warn!("Failed to attach session cookie: {}", e);
    }
    resp
}

/// `GET /api/auth/session`
pub async fn current_session(
    identity: Identity,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    api_result(
        profiles
            .get_user(&identity.user_id)
            .await
            // 令牌有效但用户已删除
            .map_err(|e| match e {
                VistagramError::NotFound(_) => {
                    VistagramError::unauthenticated("Session user no longer exists")
                }
                other => other,
            }),
    )
}

/// `POST /api/auth/logout`
pub async fn logout() -> HttpResponse {
    let cookie = CookieBuilder::from_config().build_expired_session_cookie();
    let mut resp = json_response(StatusCode::OK, ErrorCode::Success, "Logged out", None::<()>);
    if let Err(e) = resp.add_cookie(&cookie) {
        warn!("Failed to clear session cookie: {}", e);
    }
    resp
}
