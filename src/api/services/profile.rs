use actix_web::{Responder, web};
use std::sync::Arc;

use crate::api::middleware::Identity;
use crate::services::ProfileService;

use super::helpers::api_result;
use super::types::UpdateProfileRequest;

/// `POST /api/profile`
pub async fn update_profile(
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    let body = body.into_inner();
    api_result(
        profiles
            .update_profile(&identity.user_id, &body.name, body.image, body.bio)
            .await,
    )
}

/// `GET /api/profile/{id}`
pub async fn get_profile(
    path: web::Path<String>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    api_result(profiles.get_user(&path).await)
}
