use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub user_id: Option<String>,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub share_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Share {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

/// 新建帖子的输入
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: String,
    pub image_url: String,
    pub caption: Option<String>,
}

/// 身份提供方回传的用户资料
#[derive(Debug, Clone, Default)]
pub struct IdentityProfile {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// 个人资料更新
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// Timeline 过滤方式
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PostFilter {
    /// 最新优先
    #[default]
    Latest,
    /// like_count 降序，相同时最新优先
    Popular,
    /// 指定用户的帖子
    Author(String),
}
