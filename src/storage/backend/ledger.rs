//! Like and share ledgers
//!
//! Every mutation here is one transaction covering the ledger row and the
//! post counter it feeds. Each transaction opens with its ledger write so
//! the write lock is taken up front; none of them is retried.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    ExprTrait, QueryFilter, QuerySelect, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use crate::errors::{Result, VistagramError};

use migration::entities::{like, post, share};

/// 分享插入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareInsert {
    Inserted { share_count: u64 },
    /// A unique constraint rejected the row, nothing was written.
    /// Either the code is taken or the (user, post) pair already shared.
    Conflict,
}

/// 判断是否为唯一约束冲突
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let msg = err.to_string();
    msg.contains("UNIQUE constraint failed")
        || msg.contains("duplicate key value")
        || msg.contains("Duplicate entry")
}

fn txn_error(stage: &str, e: DbErr) -> VistagramError {
    VistagramError::database_operation(format!("{}: {}", stage, e))
}

enum Counter {
    Likes,
    Shares,
}

impl Counter {
    fn column(&self) -> post::Column {
        match self {
            Counter::Likes => post::Column::LikeCount,
            Counter::Shares => post::Column::ShareCount,
        }
    }
}

/// `UPDATE posts SET col = col + 1 WHERE id = ?`，返回受影响行数
async fn increment<C: ConnectionTrait>(conn: &C, post_id: &str, counter: Counter) -> Result<u64> {
    let col = counter.column();
    let result = post::Entity::update_many()
        .col_expr(col, Expr::col(col).add(1))
        .filter(post::Column::Id.eq(post_id))
        .exec(conn)
        .await
        .map_err(|e| txn_error("Failed to increment counter", e))?;
    Ok(result.rows_affected)
}

/// 计数减一，已为 0 时保持不变
async fn decrement_floored<C: ConnectionTrait>(
    conn: &C,
    post_id: &str,
    counter: Counter,
) -> Result<()> {
    let col = counter.column();
    post::Entity::update_many()
        .col_expr(col, Expr::col(col).sub(1))
        .filter(post::Column::Id.eq(post_id))
        .filter(col.gt(0))
        .exec(conn)
        .await
        .map_err(|e| txn_error("Failed to decrement counter", e))?;
    Ok(())
}

async fn read_counter(txn: &DatabaseTransaction, post_id: &str, counter: Counter) -> Result<u64> {
    let value = post::Entity::find_by_id(post_id)
        .select_only()
        .column(counter.column())
        .into_tuple::<i64>()
        .one(txn)
        .await
        .map_err(|e| txn_error("Failed to read counter", e))?
        .ok_or_else(|| VistagramError::not_found(format!("Post not found: {}", post_id)))?;
    Ok(std::cmp::Ord::max(value, 0) as u64)
}

impl SeaOrmStorage {
    /// 插入点赞并将 like_count 加一，返回新的 like_count
    pub async fn insert_like(&self, user_id: &str, post_id: &str) -> Result<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| txn_error("Failed to begin transaction", e))?;

        let row = like::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            post_id: Set(post_id.to_string()),
            created_at: Set(Utc::now()),
        };

        if let Err(e) = like::Entity::insert(row).exec_without_returning(&txn).await {
            return Err(if is_unique_violation(&e) {
                debug!("Duplicate like rejected: user={} post={}", user_id, post_id);
                VistagramError::already_liked(format!("Post {} is already liked", post_id))
            } else {
                txn_error("Failed to insert like", e)
            });
        }

        if increment(&txn, post_id, Counter::Likes).await? == 0 {
            return Err(VistagramError::not_found(format!(
                "Post not found: {}",
                post_id
            )));
        }

        let like_count = read_counter(&txn, post_id, Counter::Likes).await?;
        txn.commit()
            .await
            .map_err(|e| txn_error("Failed to commit like", e))?;

        info!("like: user={} post={} like_count={}", user_id, post_id, like_count);
        Ok(like_count)
    }

    /// 删除点赞并将 like_count 减一（不低于 0），返回新的 like_count
    pub async fn delete_like(&self, user_id: &str, post_id: &str) -> Result<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| txn_error("Failed to begin transaction", e))?;

        let deleted = like::Entity::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(|e| txn_error("Failed to delete like", e))?;

        if deleted.rows_affected == 0 {
            debug!("Unlike without like: user={} post={}", user_id, post_id);
            return Err(VistagramError::not_liked(format!(
                "Post {} is not liked",
                post_id
            )));
        }

        decrement_floored(&txn, post_id, Counter::Likes).await?;
        let like_count = read_counter(&txn, post_id, Counter::Likes).await?;
        txn.commit()
            .await
            .map_err(|e| txn_error("Failed to commit unlike", e))?;

        info!("unlike: user={} post={} like_count={}", user_id, post_id, like_count);
        Ok(like_count)
    }

    /// 插入分享记录并将 share_count 加一
    ///
    /// 唯一约束冲突时回滚并返回 `ShareInsert::Conflict`，由调用方决定
    /// 是换一个短码还是返回已有的分享。
    pub async fn insert_share(
        &self,
        user_id: &str,
        post_id: &str,
        short_code: &str,
    ) -> Result<ShareInsert> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| txn_error("Failed to begin transaction", e))?;

        let row = share::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            post_id: Set(post_id.to_string()),
            short_code: Set(short_code.to_string()),
            created_at: Set(Utc::now()),
        };

        match share::Entity::insert(row).exec_without_returning(&txn).await {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                debug!(
                    "Share insert conflict: user={} post={} code={}",
                    user_id, post_id, short_code
                );
                return Ok(ShareInsert::Conflict);
            }
            Err(e) => return Err(txn_error("Failed to insert share", e)),
        }

        if increment(&txn, post_id, Counter::Shares).await? == 0 {
            return Err(VistagramError::not_found(format!(
                "Post not found: {}",
                post_id
            )));
        }

        let share_count = read_counter(&txn, post_id, Counter::Shares).await?;
        txn.commit()
            .await
            .map_err(|e| txn_error("Failed to commit share", e))?;

        info!(
            "share created: user={} post={} code={} share_count={}",
            user_id, post_id, short_code, share_count
        );
        Ok(ShareInsert::Inserted { share_count })
    }
}
