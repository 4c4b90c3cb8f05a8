//! Query operations for SeaOrmStorage
//!
//! Read-only database operations. Every read goes through the retry
//! helper; a failure after retries is returned, never turned into an
//! empty result.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::error;

use super::converters::{model_to_post, model_to_share, model_to_user};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, VistagramError};
use crate::storage::{Post, PostFilter, Share, User};

use migration::entities::{like, post, share, user};

fn read_failed(operation: &str, e: sea_orm::DbErr) -> VistagramError {
    error!("{} failed after retries: {}", operation, e);
    VistagramError::database_operation(format!("{} failed: {}", operation, e))
}

impl SeaOrmStorage {
    pub async fn get_post(&self, post_id: &str) -> Result<Option<Post>> {
        let db = &self.db;
        let id = post_id.to_string();

        retry::with_retry("get_post", self.retry_config, || async {
            post::Entity::find_by_id(id.as_str()).one(db).await
        })
        .await
        .map(|m| m.map(model_to_post))
        .map_err(|e| read_failed("get_post", e))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let db = &self.db;
        let id = user_id.to_string();

        retry::with_retry("get_user", self.retry_config, || async {
            user::Entity::find_by_id(id.as_str()).one(db).await
        })
        .await
        .map(|m| m.map(model_to_user))
        .map_err(|e| read_failed("get_user", e))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = &self.db;

        retry::with_retry("find_user_by_email", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await
        .map(|m| m.map(model_to_user))
        .map_err(|e| read_failed("find_user_by_email", e))
    }

    /// 查找 (user, post) 的分享记录
    pub async fn find_share(&self, user_id: &str, post_id: &str) -> Result<Option<Share>> {
        let db = &self.db;

        retry::with_retry("find_share", self.retry_config, || async {
            share::Entity::find()
                .filter(share::Column::UserId.eq(user_id))
                .filter(share::Column::PostId.eq(post_id))
                .one(db)
                .await
        })
        .await
        .map(|m| m.map(model_to_share))
        .map_err(|e| read_failed("find_share", e))
    }

    /// 按短码查找分享记录
    ///
    /// MySQL 默认排序规则大小写不敏感，所以结果需要再做一次精确比较。
    pub async fn find_share_by_code(&self, code: &str) -> Result<Option<Share>> {
        let db = &self.db;

        let found = retry::with_retry("find_share_by_code", self.retry_config, || async {
            share::Entity::find()
                .filter(share::Column::ShortCode.eq(code))
                .all(db)
                .await
        })
        .await
        .map_err(|e| read_failed("find_share_by_code", e))?;

        Ok(found
            .into_iter()
            .find(|m| m.short_code == code)
            .map(model_to_share))
    }

    pub async fn short_code_exists(&self, code: &str) -> Result<bool> {
        Ok(self.find_share_by_code(code).await?.is_some())
    }

    pub async fn has_liked(&self, user_id: &str, post_id: &str) -> Result<bool> {
        let db = &self.db;

        let count = retry::with_retry("has_liked", self.retry_config, || async {
            like::Entity::find()
                .filter(like::Column::UserId.eq(user_id))
                .filter(like::Column::PostId.eq(post_id))
                .count(db)
                .await
        })
        .await
        .map_err(|e| read_failed("has_liked", e))?;

        Ok(count > 0)
    }

    /// 分页加载帖子，page 从 1 开始
    ///
    /// 返回 (当前页帖子, 总数)
    pub async fn load_posts(
        &self,
        page: u64,
        page_size: u64,
        filter: &PostFilter,
    ) -> Result<(Vec<Post>, u64)> {
        let mut condition = Condition::all();
        if let PostFilter::Author(author) = filter {
            condition = condition.add(post::Column::UserId.eq(author.as_str()));
        }

        let db = &self.db;
        let cond = condition.clone();
        let total = retry::with_retry("load_posts(count)", self.retry_config, || async {
            post::Entity::find().filter(cond.clone()).count(db).await
        })
        .await
        .map_err(|e| read_failed("load_posts(count)", e))?;

        let page_offset = page.saturating_sub(1);
        let models = retry::with_retry("load_posts(data)", self.retry_config, || async {
            let mut query = post::Entity::find().filter(condition.clone());
            if *filter == PostFilter::Popular {
                query = query.order_by_desc(post::Column::LikeCount);
            }
            query
                .order_by_desc(post::Column::CreatedAt)
                .order_by_desc(post::Column::Id)
                .paginate(db, page_size.max(1))
                .fetch_page(page_offset)
                .await
        })
        .await
        .map_err(|e| read_failed("load_posts(data)", e))?;

        Ok((models.into_iter().map(model_to_post).collect(), total))
    }

    /// 批量获取用户，按 id 索引
    pub async fn batch_get_users(&self, user_ids: &[String]) -> Result<HashMap<String, User>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let db = &self.db;
        let models = retry::with_retry("batch_get_users", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Id.is_in(user_ids.iter().cloned()))
                .all(db)
                .await
        })
        .await
        .map_err(|e| read_failed("batch_get_users", e))?;

        Ok(models
            .into_iter()
            .map(|m| (m.id.clone(), model_to_user(m)))
            .collect())
    }

    /// 返回 post_ids 中被该用户点赞过的帖子
    pub async fn liked_post_ids(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let db = &self.db;
        let liked = retry::with_retry("liked_post_ids", self.retry_config, || async {
            like::Entity::find()
                .select_only()
                .column(like::Column::PostId)
                .filter(like::Column::UserId.eq(user_id))
                .filter(like::Column::PostId.is_in(post_ids.iter().cloned()))
                .into_tuple::<String>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| read_failed("liked_post_ids", e))?;

        Ok(liked.into_iter().collect())
    }
}
