use sea_orm_migration::prelude::*;

use crate::m20251101_000001_initial_tables::{Like, Post, Share};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 每个用户对每个帖子最多一条 like / share
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_likes_user_post")
                    .table(Like::Table)
                    .col(Like::UserId)
                    .col(Like::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_shares_user_post")
                    .table(Share::Table)
                    .col(Share::UserId)
                    .col(Share::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Timeline ordering
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_created_at")
                    .table(Post::Table)
                    .col(Post::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_like_count")
                    .table(Post::Table)
                    .col(Post::LikeCount)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_user_id")
                    .table(Post::Table)
                    .col(Post::UserId)
                    .to_owned(),
            )
            .await?;

        // status 查询按 post_id 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_likes_post_id")
                    .table(Like::Table)
                    .col(Like::PostId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_likes_post_id")
                    .table(Like::Table)
                    .to_owned(),
            )
            .await?;

        for name in [
            "idx_posts_user_id",
            "idx_posts_like_count",
            "idx_posts_created_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Post::Table).to_owned())
                .await?;
        }

        manager
            .drop_index(
                Index::drop()
                    .name("uq_shares_user_post")
                    .table(Share::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_likes_user_post")
                    .table(Like::Table)
                    .to_owned(),
            )
            .await
    }
}
