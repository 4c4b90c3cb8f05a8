//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use super::types::TS_EXPORT_PATH;
use crate::errors::VistagramError;

/// API 错误码枚举
///
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 帖子与点赞
/// - 4000-4099: 分享短链
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,

    // 帖子与点赞 3000-3099
    PostNotFound = 3000,
    AlreadyLiked = 3001,
    NotLiked = 3002,
    InvalidPostFilter = 3003,

    // 分享短链 4000-4099
    ShareCodeExhausted = 4000,
    ShortCodeNotFound = 4001,
}

impl From<VistagramError> for ErrorCode {
    fn from(err: VistagramError) -> Self {
        ErrorCode::from(&err)
    }
}

impl From<&VistagramError> for ErrorCode {
    fn from(err: &VistagramError) -> Self {
        match err {
            VistagramError::Unauthenticated(_) => ErrorCode::Unauthorized,
            VistagramError::Validation(_) => ErrorCode::BadRequest,
            VistagramError::NotFound(_) => ErrorCode::NotFound,
            VistagramError::AlreadyLiked(_) => ErrorCode::AlreadyLiked,
            VistagramError::NotLiked(_) => ErrorCode::NotLiked,
            VistagramError::CodeGenerationExhausted(_) => ErrorCode::ShareCodeExhausted,
            VistagramError::TokenError(_) => ErrorCode::TokenInvalid,
            VistagramError::DatabaseConfig(_)
            | VistagramError::DatabaseConnection(_)
            | VistagramError::DatabaseOperation(_)
            | VistagramError::FileOperation(_)
            | VistagramError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::AlreadyLiked).unwrap(), "3001");
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        let parsed: ErrorCode = serde_json::from_str("4000").unwrap();
        assert_eq!(parsed, ErrorCode::ShareCodeExhausted);
    }

    #[test]
    fn test_domain_errors_map_to_codes() {
        assert_eq!(
            ErrorCode::from(VistagramError::not_liked("x")),
            ErrorCode::NotLiked
        );
        assert_eq!(
            ErrorCode::from(VistagramError::code_generation_exhausted("x")),
            ErrorCode::ShareCodeExhausted
        );
        assert_eq!(
            ErrorCode::from(VistagramError::database_operation("x")),
            ErrorCode::InternalServerError
        );
    }
}
