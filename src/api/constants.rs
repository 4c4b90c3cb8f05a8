//! API 模块常量定义

/// Session cookie carrying the access token
pub const SESSION_COOKIE_NAME: &str = "vistagram_session";

/// Header the identity provider signs its callback with
pub const PROVIDER_SECRET_HEADER: &str = "X-Provider-Secret";

/// Scope that the identity resolver wraps
pub const API_PREFIX: &str = "/api";

/// Short-link redirect prefix
pub const SHORT_LINK_PREFIX: &str = "/s";
