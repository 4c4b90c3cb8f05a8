//! `/api` 路由配置
//!
//! 按功能模块拆分成若干 scope，由 server 挂到 `/api` 下。

use actix_web::web;

use super::auth::{current_session, logout, provider_callback};
use super::engagement::{like_post, post_status, share_post, unlike_post};
use super::posts::{create_post, filter_posts, get_post, timeline};
use super::profile::{get_profile, update_profile};

/// 帖子路由 `/posts`
///
/// 包含：
/// - GET /posts - 时间线
/// - POST /posts - 发帖
/// - GET /posts/filter?type=popular|mine - 过滤
/// - GET /posts/{id} - 单个帖子
/// - POST/DELETE /posts/{id}/like - 点赞/取消点赞
/// - POST /posts/{id}/share - 获取分享短码
/// - GET /posts/{id}/status - 计数状态
pub fn posts_routes() -> actix_web::Scope {
    web::scope("/posts")
        .route("", web::get().to(timeline))
        .route("", web::post().to(create_post))
        // must be before /{id}
        .route("/filter", web::get().to(filter_posts))
        .route("/{id}/like", web::post().to(like_post))
        .route("/{id}/like", web::delete().to(unlike_post))
        .route("/{id}/share", web::post().to(share_post))
        .route("/{id}/status", web::get().to(post_status))
        .route("/{id}", web::get().to(get_post))
}

/// 个人资料路由 `/profile`
pub fn profile_routes() -> actix_web::Scope {
    web::scope("/profile")
        .route("", web::post().to(update_profile))
        .route("/{id}", web::get().to(get_profile))
}

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/callback - 身份提供方回调，签发 session
/// - GET /auth/session - 当前用户
/// - POST /auth/logout - 清除 session cookie
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/callback", web::post().to(provider_callback))
        .route("/session", web::get().to(current_session))
        .route("/logout", web::post().to(logout))
}

/// 组装 `/api` 下的全部路由
pub fn api_routes() -> actix_web::Scope {
    web::scope(crate::api::constants::API_PREFIX)
        .service(posts_routes())
        .service(profile_routes())
        .service(auth_routes())
}
