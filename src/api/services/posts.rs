//! Post endpoints

use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::trace;

use crate::api::middleware::Identity;
use crate::errors::VistagramError;
use crate::services::PostService;
use crate::storage::PostFilter;

use super::helpers::{api_result, created_response, error_from_vistagram};
use super::types::{CreatePostRequest, FilterQuery, TimelineQuery};

pub async fn create_post(
    identity: Identity,
    body: web::Json<CreatePostRequest>,
    posts: web::Data<Arc<PostService>>,
) -> impl Responder {
    let body = body.into_inner();
    match posts
        .create_post(&identity.user_id, &body.image_url, body.caption)
        .await
    {
        Ok(post) => created_response(post),
        Err(e) => error_from_vistagram(&e),
    }
}

pub async fn timeline(
    identity: Option<Identity>,
    query: web::Query<TimelineQuery>,
    posts: web::Data<Arc<PostService>>,
) -> impl Responder {
    trace!("Timeline request: {:?}", query);
    let viewer = identity.as_ref().map(|i| i.user_id.as_str());
    api_result(
        posts
            .timeline(PostFilter::Latest, viewer, query.page, query.limit)
            .await,
    )
}

/// `type=popular` 或 `type=mine`
fn parse_filter(filter_type: &str, identity: Option<&Identity>) -> Result<PostFilter, VistagramError> {
    match filter_type.trim().to_ascii_lowercase().as_str() {
        "popular" => Ok(PostFilter::Popular),
        "mine" => identity
            .map(|i| PostFilter::Author(i.user_id.clone()))
            .ok_or_else(|| VistagramError::unauthenticated("Sign in to see your posts")),
        other => Err(VistagramError::validation(format!(
            "Unknown filter type: {}",
            other
        ))),
    }
}

pub async fn filter_posts(
    identity: Option<Identity>,
    query: web::Query<FilterQuery>,
    posts: web::Data<Arc<PostService>>,
) -> HttpResponse {
    let filter = match parse_filter(&query.filter_type, identity.as_ref()) {
        Ok(filter) => filter,
        Err(e) => return error_from_vistagram(&e),
    };
    let viewer = identity.as_ref().map(|i| i.user_id.as_str());
    api_result(posts.timeline(filter, viewer, query.page, query.limit).await)
}

pub async fn get_post(
    identity: Option<Identity>,
    path: web::Path<String>,
    posts: web::Data<Arc<PostService>>,
) -> impl Responder {
    let post_id = path.into_inner();
    let viewer = identity.as_ref().map(|i| i.user_id.as_str());
    api_result(posts.get_post(&post_id, viewer).await)
}
