use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{get_config, validate_static_config};
use crate::services::{EngagementService, PostService, ProfileService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub engagement: Arc<EngagementService>,
    pub posts: Arc<PostService>,
    pub profiles: Arc<ProfileService>,
}

/// 校验配置并连接存储，CLI 与 server 共用
pub async fn prepare_storage() -> Result<Arc<SeaOrmStorage>> {
    let config = get_config();
    if let Err(errors) = validate_static_config(&config) {
        for err in &errors {
            warn!("Invalid configuration: {}", err);
        }
        anyhow::bail!("Configuration has {} error(s): {}", errors.len(), errors.join("; "));
    }

    let storage = StorageFactory::create()
        .await
        .map_err(|e| anyhow::anyhow!(e.format_simple()))
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());
    Ok(storage)
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = prepare_storage().await?;

    let engagement = Arc::new(EngagementService::from_config(storage.clone()));
    let posts = Arc::new(PostService::new(storage.clone()));
    let profiles = Arc::new(ProfileService::new(storage.clone()));

    // 首次使用前初始化，密钥缺失时的告警在启动阶段就打出来
    let jwt = crate::api::jwt::get_jwt_service();
    debug!("Session tokens valid for {} minutes", jwt.access_token_minutes());

    if get_config().auth.provider_secret.is_empty() {
        warn!("auth.provider_secret is empty, /api/auth/callback is disabled");
    }

    info!("Pre-startup completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        storage,
        engagement,
        posts,
        profiles,
    })
}
