//! Users: sign-in upsert and profile edits

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::errors::{Result, VistagramError};
use crate::storage::{IdentityProfile, ProfileUpdate, SeaOrmStorage, User};
use crate::utils::char_len;
use crate::utils::url_validator::validate_image_url;

const TS_EXPORT_PATH: &str = "../web/src/types.generated.ts";

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_BIO_LENGTH: usize = 150;

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            image: user.image,
            bio: user.bio,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(VistagramError::validation("email is required"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(VistagramError::validation(format!(
            "Invalid email address: {}",
            email
        ))),
    }
}

pub struct ProfileService {
    storage: Arc<SeaOrmStorage>,
}

impl ProfileService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Create or fetch the user the identity provider vouched for
    pub async fn sign_in(
        &self,
        email: &str,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<UserView> {
        let email = normalize_email(email)?;
        let image = match non_blank(image) {
            Some(url) => Some(
                validate_image_url(&url).map_err(|e| VistagramError::validation(e.to_string()))?,
            ),
            None => None,
        };

        let user = self
            .storage
            .upsert_user_by_email(IdentityProfile {
                email,
                name: non_blank(name),
                image,
            })
            .await?;

        info!("ProfileService: signed in {}", user.id);
        Ok(user.into())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserView> {
        self.storage
            .get_user(user_id)
            .await?
            .map(UserView::from)
            .ok_or_else(|| VistagramError::not_found(format!("User not found: {}", user_id)))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        name: &str,
        image: Option<String>,
        bio: Option<String>,
    ) -> Result<UserView> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VistagramError::validation("name is required"));
        }
        if char_len(name) > MAX_NAME_LENGTH {
            return Err(VistagramError::validation(format!(
                "name must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }

        let bio = non_blank(bio);
        if let Some(ref bio) = bio
            && char_len(bio) > MAX_BIO_LENGTH
        {
            return Err(VistagramError::validation(format!(
                "bio must be at most {} characters",
                MAX_BIO_LENGTH
            )));
        }

        let image = match non_blank(image) {
            Some(url) => Some(
                validate_image_url(&url).map_err(|e| VistagramError::validation(e.to_string()))?,
            ),
            None => None,
        };

        let user = self
            .storage
            .update_profile(
                user_id,
                ProfileUpdate {
                    name: name.to_string(),
                    image,
                    bio,
                },
            )
            .await?;

        Ok(user.into())
    }
}
