//! Short-link redirects

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::config::get_config;
use crate::errors::VistagramError;
use crate::services::EngagementService;

pub struct RedirectService {}

impl RedirectService {
    /// `GET /s/{code}`
    ///
    /// Known codes redirect to the post page, anything else to the
    /// configured fallback. Never answers with an error page.
    pub async fn handle_redirect(
        path: web::Path<String>,
        engagement: web::Data<Arc<EngagementService>>,
    ) -> impl Responder {
        let code = path.into_inner();
        let share = &get_config().share;

        match engagement.resolve_short_code(&code).await {
            Ok(post_id) => {
                trace!("Redirecting {} to post {}", code, post_id);
                Self::finish_redirect(format!("{}{}", share.post_path_prefix, post_id))
            }
            Err(VistagramError::NotFound(_)) => {
                debug!("Short code not found, using fallback: {}", code);
                Self::finish_redirect(share.fallback_url.clone())
            }
            Err(e) => {
                error!("Short code lookup failed for {}: {}", code, e);
                Self::finish_redirect(share.fallback_url.clone())
            }
        }
    }

    #[inline]
    fn finish_redirect(location: String) -> HttpResponse {
        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header(("Location", location))
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .finish()
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope(crate::api::constants::SHORT_LINK_PREFIX)
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
