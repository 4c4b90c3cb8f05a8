//! Like, share and status endpoints under `/api/posts/{id}`

use actix_web::{Responder, web};
use std::sync::Arc;

use crate::api::middleware::Identity;
use crate::services::EngagementService;

use super::helpers::api_result;

pub async fn like_post(
    identity: Identity,
    path: web::Path<String>,
    engagement: web::Data<Arc<EngagementService>>,
) -> impl Responder {
    api_result(engagement.like(&identity.user_id, &path).await)
}

pub async fn unlike_post(
    identity: Identity,
    path: web::Path<String>,
    engagement: web::Data<Arc<EngagementService>>,
) -> impl Responder {
    api_result(engagement.unlike(&identity.user_id, &path).await)
}

pub async fn share_post(
    identity: Identity,
    path: web::Path<String>,
    engagement: web::Data<Arc<EngagementService>>,
) -> impl Responder {
    api_result(
        engagement
            .create_or_get_share(&identity.user_id, &path)
            .await,
    )
}

/// Anonymous callers get `is_liked: false`
pub async fn post_status(
    identity: Option<Identity>,
    path: web::Path<String>,
    engagement: web::Data<Arc<EngagementService>>,
) -> impl Responder {
    let viewer = identity.as_ref().map(|i| i.user_id.as_str());
    api_result(engagement.get_status(&path, viewer).await)
}
