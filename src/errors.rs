use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum VistagramError {
    Unauthenticated(String),
    Validation(String),
    NotFound(String),
    AlreadyLiked(String),
    NotLiked(String),
    CodeGenerationExhausted(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    TokenError(String),
}

impl VistagramError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            VistagramError::Unauthenticated(_) => "E001",
            VistagramError::Validation(_) => "E002",
            VistagramError::NotFound(_) => "E003",
            VistagramError::AlreadyLiked(_) => "E004",
            VistagramError::NotLiked(_) => "E005",
            VistagramError::CodeGenerationExhausted(_) => "E006",
            VistagramError::DatabaseConfig(_) => "E007",
            VistagramError::DatabaseConnection(_) => "E008",
            VistagramError::DatabaseOperation(_) => "E009",
            VistagramError::FileOperation(_) => "E010",
            VistagramError::Serialization(_) => "E011",
            VistagramError::TokenError(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            VistagramError::Unauthenticated(_) => "Unauthenticated",
            VistagramError::Validation(_) => "Validation Error",
            VistagramError::NotFound(_) => "Resource Not Found",
            VistagramError::AlreadyLiked(_) => "Already Liked",
            VistagramError::NotLiked(_) => "Not Liked",
            VistagramError::CodeGenerationExhausted(_) => "Code Generation Exhausted",
            VistagramError::DatabaseConfig(_) => "Database Configuration Error",
            VistagramError::DatabaseConnection(_) => "Database Connection Error",
            VistagramError::DatabaseOperation(_) => "Database Operation Error",
            VistagramError::FileOperation(_) => "File Operation Error",
            VistagramError::Serialization(_) => "Serialization Error",
            VistagramError::TokenError(_) => "Token Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            VistagramError::Unauthenticated(msg)
            | VistagramError::Validation(msg)
            | VistagramError::NotFound(msg)
            | VistagramError::AlreadyLiked(msg)
            | VistagramError::NotLiked(msg)
            | VistagramError::CodeGenerationExhausted(msg)
            | VistagramError::DatabaseConfig(msg)
            | VistagramError::DatabaseConnection(msg)
            | VistagramError::DatabaseOperation(msg)
            | VistagramError::FileOperation(msg)
            | VistagramError::Serialization(msg)
            | VistagramError::TokenError(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            VistagramError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            VistagramError::Validation(_) => StatusCode::BAD_REQUEST,
            VistagramError::NotFound(_) => StatusCode::NOT_FOUND,
            VistagramError::AlreadyLiked(_) | VistagramError::NotLiked(_) => StatusCode::CONFLICT,
            VistagramError::CodeGenerationExhausted(_)
            | VistagramError::DatabaseConfig(_)
            | VistagramError::DatabaseConnection(_)
            | VistagramError::DatabaseOperation(_)
            | VistagramError::FileOperation(_)
            | VistagramError::Serialization(_)
            | VistagramError::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to API clients.
    ///
    /// Storage and I/O details stay in the logs.
    pub fn public_message(&self) -> &str {
        match self {
            VistagramError::DatabaseConfig(_)
            | VistagramError::DatabaseConnection(_)
            | VistagramError::DatabaseOperation(_)
            | VistagramError::FileOperation(_)
            | VistagramError::Serialization(_)
            | VistagramError::TokenError(_) => "Internal server error",
            other => other.message(),
        }
    }

    /// 格式化为彩色输出（用于启动失败时输出到终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for VistagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for VistagramError {}

// 便捷的构造函数
impl VistagramError {
    pub fn unauthenticated<T: Into<String>>(msg: T) -> Self {
        VistagramError::Unauthenticated(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        VistagramError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        VistagramError::NotFound(msg.into())
    }

    pub fn already_liked<T: Into<String>>(msg: T) -> Self {
        VistagramError::AlreadyLiked(msg.into())
    }

    pub fn not_liked<T: Into<String>>(msg: T) -> Self {
        VistagramError::NotLiked(msg.into())
    }

    pub fn code_generation_exhausted<T: Into<String>>(msg: T) -> Self {
        VistagramError::CodeGenerationExhausted(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        VistagramError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        VistagramError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        VistagramError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        VistagramError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        VistagramError::Serialization(msg.into())
    }

    pub fn token_error<T: Into<String>>(msg: T) -> Self {
        VistagramError::TokenError(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for VistagramError {
    fn from(err: sea_orm::DbErr) -> Self {
        VistagramError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for VistagramError {
    fn from(err: std::io::Error) -> Self {
        VistagramError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for VistagramError {
    fn from(err: serde_json::Error) -> Self {
        VistagramError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for VistagramError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        VistagramError::TokenError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VistagramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_map_to_409() {
        assert_eq!(
            VistagramError::already_liked("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            VistagramError::not_liked("x").http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_exhaustion_is_server_error() {
        let err = VistagramError::code_generation_exhausted("10 attempts collided");
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        // 业务错误的消息可以直接返回给客户端
        assert_eq!(err.public_message(), "10 attempts collided");
    }

    #[test]
    fn test_storage_errors_are_opaque() {
        let err = VistagramError::database_operation("UNIQUE constraint failed: shares.short_code");
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.message().contains("shares.short_code"));
    }

    #[test]
    fn test_unauthenticated_and_not_found() {
        assert_eq!(
            VistagramError::unauthenticated("login").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            VistagramError::not_found("post").http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = VistagramError::validation("caption too long");
        assert_eq!(err.to_string(), "Validation Error: caption too long");
        assert_eq!(err.code(), "E002");
    }

    #[test]
    fn test_from_db_err() {
        let err: VistagramError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, VistagramError::DatabaseOperation(_)));
    }
}
