use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::storage::SeaOrmStorage;

use super::error_code::ErrorCode;
use super::types::{ApiResponse, HealthResponse};

const PING_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }

    /// 运行秒数；时钟回拨时为 0
    pub fn uptime_seconds(&self, now: chrono::DateTime<chrono::Utc>) -> u64 {
        u64::try_from((now - self.start_datetime).num_seconds()).unwrap_or(0)
    }
}

/// Health Service
///
/// 直接 ping 数据库，不经过业务 service。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage_error = match storage.ping(PING_TIMEOUT).await {
            Ok(()) => None,
            Err(e) => {
                error!("Storage health check failed: {}", e);
                Some("database unavailable".to_string())
            }
        };
        let is_healthy = storage_error.is_none();

        let now = chrono::Utc::now();
        let uptime_seconds = app_start_time.uptime_seconds(now);

        let health_data = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            storage: storage.backend_name().to_string(),
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            response_time_ms: start_time.elapsed().as_millis() as u32,
            error: storage_error,
        };

        let (status, code, message) = if is_healthy {
            (actix_web::http::StatusCode::OK, ErrorCode::Success, "OK")
        } else {
            (
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
            )
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}s",
            start_time.elapsed(),
            health_data.status,
            uptime_seconds
        );

        HttpResponse::build(status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                code: code as i32,
                message: message.to_string(),
                data: Some(health_data),
            })
    }

    // 活跃性检查，不碰数据库
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
