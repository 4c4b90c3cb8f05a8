//! Server mode
//!
//! Builds the actix application and runs it until the server stops or a
//! shutdown signal arrives.

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::{IdentityResolver, RequestIdMiddleware};
use crate::api::services::{AppStartTime, api_routes, health_routes, redirect_routes};
use crate::config::{CorsConfig, get_config};
use crate::runtime::lifetime;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed."
        );
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors_config.allow_credentials {
        tracing::error!(
            "allow_any_origin + allow_credentials lets any website make authenticated \
            cross-origin requests. Credentials are disabled for wildcard origins."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_header("Content-Type")
        .allowed_header("Authorization")
        .allowed_header("Accept")
        .max_age(cors_config.max_age as usize);

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    // 通配来源不允许携带凭据
    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let storage = startup.storage.clone();
    let engagement = startup.engagement.clone();
    let posts = startup.posts.clone();
    let profiles = startup.profiles.clone();

    let config = get_config();
    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(engagement.clone()))
            .app_data(web::Data::new(posts.clone()))
            .app_data(web::Data::new(profiles.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .service(api_routes().wrap(IdentityResolver))
            .service(health_routes())
            .service(redirect_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(startup.storage.clone()) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
