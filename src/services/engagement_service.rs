//! Likes, shares and short-link resolution
//!
//! Counter maintenance lives in the storage ledger transactions; this
//! service validates input, checks the post exists, and runs the bounded
//! short-code retry loop.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use super::short_code::{RandomCodeGenerator, ShortCodeGenerator, is_valid_short_code};
use crate::config::get_config;
use crate::errors::{Result, VistagramError};
use crate::storage::{Post, SeaOrmStorage, ShareInsert};

const TS_EXPORT_PATH: &str = "../web/src/types.generated.ts";

/// Result of a like or unlike
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LikeOutcome {
    #[ts(type = "number")]
    pub like_count: u64,
    pub is_liked: bool,
}

/// Result of a share request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ShareOutcome {
    #[ts(type = "number")]
    pub share_count: u64,
    pub is_shared: bool,
    pub short_code: String,
    /// false when an earlier share by the same user was returned
    pub created: bool,
}

/// Counters of a post as seen by one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PostStatus {
    #[ts(type = "number")]
    pub like_count: u64,
    #[ts(type = "number")]
    pub share_count: u64,
    pub is_liked: bool,
}

fn require_id<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VistagramError::validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}

pub struct EngagementService {
    storage: Arc<SeaOrmStorage>,
    generator: Arc<dyn ShortCodeGenerator>,
    max_attempts: u32,
}

impl EngagementService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        generator: Arc<dyn ShortCodeGenerator>,
        max_attempts: u32,
    ) -> Self {
        Self {
            storage,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Random generator and attempt budget from the `[share]` config section
    pub fn from_config(storage: Arc<SeaOrmStorage>) -> Self {
        let share = &get_config().share;
        Self::new(
            storage,
            Arc::new(RandomCodeGenerator::new(share.code_length)),
            share.max_attempts,
        )
    }

    async fn require_post(&self, post_id: &str) -> Result<Post> {
        self.storage
            .get_post(post_id)
            .await?
            .ok_or_else(|| VistagramError::not_found(format!("Post not found: {}", post_id)))
    }

    pub async fn like(&self, user_id: &str, post_id: &str) -> Result<LikeOutcome> {
        let user_id = require_id(user_id, "user_id")?;
        let post_id = require_id(post_id, "post_id")?;
        self.require_post(post_id).await?;

        let like_count = self.storage.insert_like(user_id, post_id).await?;
        Ok(LikeOutcome {
            like_count,
            is_liked: true,
        })
    }

    pub async fn unlike(&self, user_id: &str, post_id: &str) -> Result<LikeOutcome> {
        let user_id = require_id(user_id, "user_id")?;
        let post_id = require_id(post_id, "post_id")?;
        self.require_post(post_id).await?;

        let like_count = self.storage.delete_like(user_id, post_id).await?;
        Ok(LikeOutcome {
            like_count,
            is_liked: false,
        })
    }

    /// Return the user's share code for a post, creating it on first call.
    ///
    /// A repeated call returns the stored code and leaves `share_count`
    /// untouched. New codes are tried at most `max_attempts` times.
    pub async fn create_or_get_share(&self, user_id: &str, post_id: &str) -> Result<ShareOutcome> {
        let user_id = require_id(user_id, "user_id")?;
        let post_id = require_id(post_id, "post_id")?;
        let post = self.require_post(post_id).await?;

        if let Some(existing) = self.storage.find_share(user_id, post_id).await? {
            debug!("Share already exists: user={} post={}", user_id, post_id);
            return Ok(ShareOutcome {
                share_count: post.share_count,
                is_shared: true,
                short_code: existing.short_code,
                created: false,
            });
        }

        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();

            if !is_valid_short_code(&code) {
                warn!("Generator produced an unusable code on attempt {}: {:?}", attempt, code);
                continue;
            }

            if self.storage.short_code_exists(&code).await? {
                debug!("Short code collision on attempt {}: {}", attempt, code);
                continue;
            }

            match self.storage.insert_share(user_id, post_id, &code).await? {
                ShareInsert::Inserted { share_count } => {
                    return Ok(ShareOutcome {
                        share_count,
                        is_shared: true,
                        short_code: code,
                        created: true,
                    });
                }
                ShareInsert::Conflict => {
                    // 同一用户的并发请求先提交了
                    if let Some(winner) = self.storage.find_share(user_id, post_id).await? {
                        let current = self.require_post(post_id).await?;
                        return Ok(ShareOutcome {
                            share_count: current.share_count,
                            is_shared: true,
                            short_code: winner.short_code,
                            created: false,
                        });
                    }
                    debug!("Short code taken concurrently on attempt {}: {}", attempt, code);
                }
            }
        }

        warn!(
            "Short code generation exhausted: user={} post={} attempts={}",
            user_id, post_id, self.max_attempts
        );
        Err(VistagramError::code_generation_exhausted(format!(
            "Could not allocate a unique short code after {} attempts",
            self.max_attempts
        )))
    }

    /// Map a short code back to its post id. Exact, case-sensitive match.
    pub async fn resolve_short_code(&self, code: &str) -> Result<String> {
        if !is_valid_short_code(code) {
            return Err(VistagramError::not_found(format!(
                "Unknown short code: {}",
                code
            )));
        }

        match self.storage.find_share_by_code(code).await? {
            Some(share) => {
                info!("Short code resolved: {} -> {}", code, share.post_id);
                Ok(share.post_id)
            }
            None => Err(VistagramError::not_found(format!(
                "Unknown short code: {}",
                code
            ))),
        }
    }

    /// Read-only snapshot of a post's counters
    pub async fn get_status(&self, post_id: &str, user_id: Option<&str>) -> Result<PostStatus> {
        let post_id = require_id(post_id, "post_id")?;
        let post = self.require_post(post_id).await?;

        let is_liked = match user_id.map(str::trim).filter(|u| !u.is_empty()) {
            Some(user_id) => self.storage.has_liked(user_id, post_id).await?,
            None => false,
        };

        Ok(PostStatus {
            like_count: post.like_count,
            share_count: post.share_count,
            is_liked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id_trims_and_rejects_blank() {
        assert_eq!(require_id("  p1 ", "post_id").unwrap(), "p1");
        let err = require_id("   ", "post_id").unwrap_err();
        assert!(matches!(err, VistagramError::Validation(_)));
        assert!(err.message().contains("post_id"));
    }

    #[test]
    fn test_outcomes_serialize_snake_case() {
        let json = serde_json::to_value(ShareOutcome {
            share_count: 1,
            is_shared: true,
            short_code: "ab12CD34".to_string(),
            created: true,
        })
        .unwrap();
        assert_eq!(json["short_code"], "ab12CD34");
        assert_eq!(json["share_count"], 1);
        assert_eq!(json["is_shared"], true);
    }
}
