//! HTTP 请求/响应类型

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::services::UserView;

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../web/src/types.generated.ts";

/// Response envelope shared by every JSON endpoint
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CreatePostRequest {
    pub image_url: String,
    pub caption: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TimelineQuery {
    #[ts(type = "number | null")]
    pub page: Option<u64>,
    #[ts(type = "number | null")]
    pub limit: Option<u64>,
}

/// `GET /api/posts/filter?type=popular|mine`
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub filter_type: String,
    #[ts(type = "number | null")]
    pub page: Option<u64>,
    #[ts(type = "number | null")]
    pub limit: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// Body the identity provider posts after a successful sign-in
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ProviderCallbackRequest {
    #[serde(default)]
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub timestamp: String,
    #[ts(type = "number")]
    pub uptime: u64,
    pub response_time_ms: u32,
    pub error: Option<String>,
}
