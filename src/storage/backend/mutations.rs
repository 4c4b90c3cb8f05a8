//! Mutation operations for SeaOrmStorage
//!
//! Writes outside the engagement ledgers: posts and user profiles.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_post, model_to_user, new_post_active_model};
use super::ledger::is_unique_violation;
use crate::errors::{Result, VistagramError};
use crate::storage::{IdentityProfile, NewPost, Post, ProfileUpdate, User};

use migration::entities::user;

impl SeaOrmStorage {
    pub async fn insert_post(&self, input: NewPost) -> Result<Post> {
        let id = uuid::Uuid::new_v4().to_string();

        let model = new_post_active_model(&id, &input)
            .insert(&self.db)
            .await
            .map_err(|e| VistagramError::database_operation(format!("Failed to create post: {}", e)))?;

        info!("Post created: {} by {}", id, input.user_id);
        Ok(model_to_post(model))
    }

    /// 按邮箱创建或获取用户
    ///
    /// 已存在的用户只补全缺失的 name/image，不覆盖用户自己改过的资料。
    pub async fn upsert_user_by_email(&self, profile: IdentityProfile) -> Result<User> {
        if let Some(existing) = user::Entity::find()
            .filter(user::Column::Email.eq(profile.email.as_str()))
            .one(&self.db)
            .await?
        {
            return self.fill_missing_profile(existing, &profile).await;
        }

        let now = Utc::now();
        let active = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(profile.email.clone()),
            name: Set(profile.name.clone()),
            image: Set(profile.image.clone()),
            bio: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match active.insert(&self.db).await {
            Ok(model) => {
                info!("User created: {} <{}>", model.id, model.email);
                Ok(model_to_user(model))
            }
            // 并发首次登录，另一个请求已经插入
            Err(e) if is_unique_violation(&e) => self
                .find_user_by_email(&profile.email)
                .await?
                .ok_or_else(|| {
                    VistagramError::database_operation(format!(
                        "User vanished after email conflict: {}",
                        profile.email
                    ))
                }),
            Err(e) => Err(VistagramError::database_operation(format!(
                "Failed to create user: {}",
                e
            ))),
        }
    }

    async fn fill_missing_profile(
        &self,
        existing: user::Model,
        profile: &IdentityProfile,
    ) -> Result<User> {
        let fill_name = existing.name.is_none() && profile.name.is_some();
        let fill_image = existing.image.is_none() && profile.image.is_some();
        if !fill_name && !fill_image {
            return Ok(model_to_user(existing));
        }

        let mut active = existing.into_active_model();
        if fill_name {
            active.name = Set(profile.name.clone());
        }
        if fill_image {
            active.image = Set(profile.image.clone());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(model_to_user(model))
    }

    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        let existing = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VistagramError::not_found(format!("User not found: {}", user_id)))?;

        let mut active = existing.into_active_model();
        active.name = Set(Some(update.name));
        if update.image.is_some() {
            active.image = Set(update.image);
        }
        active.bio = Set(update.bio);
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| VistagramError::database_operation(format!("Failed to update profile: {}", e)))?;

        info!("Profile updated: {}", user_id);
        Ok(model_to_user(model))
    }
}
