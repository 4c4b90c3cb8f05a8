//! Post creation and timeline reads

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::config::get_config;
use crate::errors::{Result, VistagramError};
use crate::storage::{NewPost, Post, PostFilter, SeaOrmStorage, User};
use crate::utils::char_len;
use crate::utils::url_validator::validate_image_url;

const TS_EXPORT_PATH: &str = "../web/src/types.generated.ts";

/// Longest caption accepted, in characters
pub const MAX_CAPTION_LENGTH: usize = 2200;

/// Author fields shown next to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AuthorSummary {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// A post as returned to one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PostView {
    pub id: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    #[ts(type = "number")]
    pub like_count: u64,
    #[ts(type = "number")]
    pub share_count: u64,
    pub is_liked: bool,
    pub author: Option<AuthorSummary>,
}

impl PostView {
    fn build(post: Post, author: Option<&User>, is_liked: bool) -> Self {
        Self {
            id: post.id,
            image_url: post.image_url,
            caption: post.caption,
            created_at: post.created_at,
            like_count: post.like_count,
            share_count: post.share_count,
            is_liked,
            author: author.map(AuthorSummary::from),
        }
    }
}

/// One page of the timeline
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PostPage {
    pub items: Vec<PostView>,
    #[ts(type = "number")]
    pub page: u64,
    #[ts(type = "number")]
    pub limit: u64,
    #[ts(type = "number")]
    pub total: u64,
    pub has_more: bool,
}

fn normalize_caption(caption: Option<String>) -> Result<Option<String>> {
    let Some(caption) = caption else {
        return Ok(None);
    };
    let trimmed = caption.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let len = char_len(trimmed);
    if len > MAX_CAPTION_LENGTH {
        return Err(VistagramError::validation(format!(
            "Caption is {} characters, the limit is {}",
            len, MAX_CAPTION_LENGTH
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// The row offset of `page` must fit a SQL BIGINT
fn check_page_bounds(page: u64, limit: u64) -> Result<()> {
    match page.checked_mul(limit) {
        Some(end) if end <= i64::MAX as u64 => Ok(()),
        _ => Err(VistagramError::validation(format!(
            "page {} is out of range",
            page
        ))),
    }
}

pub struct PostService {
    storage: Arc<SeaOrmStorage>,
}

impl PostService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn create_post(
        &self,
        user_id: &str,
        image_url: &str,
        caption: Option<String>,
    ) -> Result<PostView> {
        let image_url =
            validate_image_url(image_url).map_err(|e| VistagramError::validation(e.to_string()))?;
        let caption = normalize_caption(caption)?;

        let author = self.storage.get_user(user_id).await?.ok_or_else(|| {
            VistagramError::unauthenticated(format!("Unknown user: {}", user_id))
        })?;

        let post = self
            .storage
            .insert_post(NewPost {
                user_id: author.id.clone(),
                image_url,
                caption,
            })
            .await?;

        info!("PostService: created post {}", post.id);
        Ok(PostView::build(post, Some(&author), false))
    }

    pub async fn get_post(&self, post_id: &str, viewer: Option<&str>) -> Result<PostView> {
        let post = self
            .storage
            .get_post(post_id)
            .await?
            .ok_or_else(|| VistagramError::not_found(format!("Post not found: {}", post_id)))?;

        let author = match post.user_id.as_deref() {
            Some(user_id) => self.storage.get_user(user_id).await?,
            None => None,
        };
        let is_liked = match viewer {
            Some(viewer) => self.storage.has_liked(viewer, &post.id).await?,
            None => false,
        };

        Ok(PostView::build(post, author.as_ref(), is_liked))
    }

    /// Paged timeline; `page` is 1-based and `limit` is clamped to the
    /// configured maximum.
    pub async fn timeline(
        &self,
        filter: PostFilter,
        viewer: Option<&str>,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<PostPage> {
        let timeline = &get_config().timeline;
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(timeline.default_page_size)
            .clamp(1, timeline.max_page_size.max(1));
        check_page_bounds(page, limit)?;

        let (posts, total) = self.storage.load_posts(page, limit, &filter).await?;

        let author_ids: Vec<String> = posts
            .iter()
            .filter_map(|p| p.user_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors: HashMap<String, User> = self.storage.batch_get_users(&author_ids).await?;

        let liked: HashSet<String> = match viewer {
            Some(viewer) => {
                let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
                self.storage.liked_post_ids(viewer, &post_ids).await?
            }
            None => HashSet::new(),
        };

        let items = posts
            .into_iter()
            .map(|post| {
                let author = post.user_id.as_ref().and_then(|id| authors.get(id));
                let is_liked = liked.contains(&post.id);
                PostView::build(post, author, is_liked)
            })
            .collect();

        Ok(PostPage {
            items,
            page,
            limit,
            total,
            has_more: page.saturating_mul(limit) < total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_caption() {
        assert_eq!(normalize_caption(None).unwrap(), None);
        assert_eq!(normalize_caption(Some("   ".to_string())).unwrap(), None);
        assert_eq!(
            normalize_caption(Some("  golden hour ".to_string())).unwrap(),
            Some("golden hour".to_string())
        );
    }

    #[test]
    fn test_check_page_bounds() {
        assert!(check_page_bounds(1, 20).is_ok());
        assert!(check_page_bounds(i64::MAX as u64, 1).is_ok());
        assert!(matches!(
            check_page_bounds(u64::MAX, 10),
            Err(VistagramError::Validation(_))
        ));
        assert!(check_page_bounds(i64::MAX as u64, 2).is_err());
    }

    #[test]
    fn test_caption_limit_counts_characters() {
        let at_limit = "é".repeat(MAX_CAPTION_LENGTH);
        assert!(normalize_caption(Some(at_limit)).is_ok());

        let over = "a".repeat(MAX_CAPTION_LENGTH + 1);
        assert!(matches!(
            normalize_caption(Some(over)),
            Err(VistagramError::Validation(_))
        ));
    }
}
