//! API 帮助函数

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::api::constants;
use crate::config::SameSitePolicy;
use crate::errors::VistagramError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 VistagramError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 存储类错误只记录日志，客户端拿到的是统一的提示。
pub fn error_from_vistagram(err: &VistagramError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    error_response(status, ErrorCode::from(err), err.public_message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 VistagramError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<VistagramError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: VistagramError = e.into();
            error_from_vistagram(&err)
        }
    }
}

// 让 `Identity` 等提取器的失败也走统一信封
impl ResponseError for VistagramError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        error_from_vistagram(self)
    }
}

/// Session cookie 构建器
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    access_token_minutes: u64,
}

impl CookieBuilder {
    pub fn from_config() -> Self {
        let auth = &crate::config::get_config().auth;

        let same_site = match auth.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: auth.cookie_secure,
            access_token_minutes: auth.access_token_minutes,
        }
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::SESSION_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            token,
            actix_web::cookie::time::Duration::minutes(self.access_token_minutes as i64),
        )
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), actix_web::cookie::time::Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_envelope_hides_storage_details() {
        let err = VistagramError::database_operation("UNIQUE constraint failed: shares.short_code");
        let resp = error_from_vistagram(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], ErrorCode::InternalServerError as i32);
        assert_eq!(json["message"], "Internal server error");
        assert!(json["data"].is_null());
    }

    #[actix_web::test]
    async fn test_api_result_maps_conflict() {
        let resp = api_result::<(), _>(Err(VistagramError::already_liked("Post p1 is already liked")));
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], ErrorCode::AlreadyLiked as i32);
        assert_eq!(json["message"], "Post p1 is already liked");
    }

    #[actix_web::test]
    async fn test_success_envelope() {
        let resp = success_response(serde_json::json!({ "like_count": 3 }));
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"]["like_count"], 3);
    }
}
