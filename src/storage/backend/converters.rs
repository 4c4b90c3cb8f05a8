use crate::storage::{NewPost, Post, Share, User};
use migration::entities::{post, share, user};

/// 将 post Model 转换为 Post
///
/// 计数列在数据库中是有符号整数，负值按 0 处理。
pub fn model_to_post(model: post::Model) -> Post {
    Post {
        id: model.id,
        user_id: model.user_id,
        image_url: model.image_url,
        caption: model.caption,
        created_at: model.created_at,
        like_count: model.like_count.max(0) as u64,
        share_count: model.share_count.max(0) as u64,
    }
}

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        image: model.image,
        bio: model.bio,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_share(model: share::Model) -> Share {
    Share {
        id: model.id,
        user_id: model.user_id,
        post_id: model.post_id,
        short_code: model.short_code,
        created_at: model.created_at,
    }
}

/// 新帖子的 ActiveModel，计数从 0 开始
pub fn new_post_active_model(id: &str, input: &NewPost) -> post::ActiveModel {
    use sea_orm::ActiveValue::Set;

    post::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(Some(input.user_id.clone())),
        image_url: Set(input.image_url.clone()),
        caption: Set(input.caption.clone()),
        created_at: Set(chrono::Utc::now()),
        like_count: Set(0),
        share_count: Set(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn post_model(like_count: i64, share_count: i64) -> post::Model {
        post::Model {
            id: "p1".to_string(),
            user_id: Some("u1".to_string()),
            image_url: "https://img.example.com/a.jpg".to_string(),
            caption: Some("sunset".to_string()),
            created_at: Utc::now(),
            like_count,
            share_count,
        }
    }

    #[test]
    fn test_model_to_post_copies_fields() {
        let post = model_to_post(post_model(3, 1));
        assert_eq!(post.id, "p1");
        assert_eq!(post.user_id.as_deref(), Some("u1"));
        assert_eq!(post.caption.as_deref(), Some("sunset"));
        assert_eq!(post.like_count, 3);
        assert_eq!(post.share_count, 1);
    }

    #[test]
    fn test_model_to_post_clamps_negative_counts() {
        let post = model_to_post(post_model(-2, -5));
        assert_eq!(post.like_count, 0);
        assert_eq!(post.share_count, 0);
    }

    #[test]
    fn test_model_to_share() {
        let share = model_to_share(share::Model {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            post_id: "p1".to_string(),
            short_code: "ab12CD34".to_string(),
            created_at: Utc::now(),
        });
        assert_eq!(share.short_code, "ab12CD34");
        assert_eq!(share.post_id, "p1");
    }

    #[test]
    fn test_new_post_active_model_starts_at_zero() {
        let input = NewPost {
            user_id: "u1".to_string(),
            image_url: "https://img.example.com/b.png".to_string(),
            caption: None,
        };
        let model = new_post_active_model("p9", &input);

        assert!(matches!(model.like_count, ActiveValue::Set(0)));
        assert!(matches!(model.share_count, ActiveValue::Set(0)));
        if let ActiveValue::Set(user_id) = model.user_id {
            assert_eq!(user_id.as_deref(), Some("u1"));
        }
        if let ActiveValue::Set(caption) = model.caption {
            assert!(caption.is_none());
        }
    }
}
