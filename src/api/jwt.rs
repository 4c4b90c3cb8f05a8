use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Initialized from the `[auth]` config section on first use.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for issuing and validating session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        // 未配置时生成随机密钥，重启后旧 token 全部失效
        let jwt_secret = Some(config.auth.jwt_secret.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!(
                    "auth.jwt_secret not configured, generating a random one; sessions will not survive a restart"
                );
                crate::utils::generate_secure_token()
            });

        Self::new(&jwt_secret, config.auth.access_token_minutes)
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.access_token_minutes
    }

    /// Issue a session token for a user
    pub fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate a session token
    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE || token_data.claims.sub.is_empty() {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn create_test_service() -> JwtService {
        JwtService::new(SECRET, 60)
    }

    fn encode_claims(claims: &SessionClaims) -> String {
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        encode(&Header::default(), claims, &key).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let service = create_test_service();
        let token = service
            .generate_access_token("user-1", "ana@example.com")
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_garbage_and_foreign_tokens_rejected() {
        let service = create_test_service();
        assert!(service.validate_access_token("invalid.token.here").is_err());

        let other = JwtService::new("different_secret_key_32_bytes!!", 60);
        let token = other.generate_access_token("user-1", "a@b.c").unwrap();
        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        let now = Utc::now();
        let token = encode_claims(&SessionClaims {
            sub: "user-1".to_string(),
            email: "a@b.c".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            jti: "j".to_string(),
            token_type: "refresh".to_string(),
        });
        assert!(create_test_service().validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let token = encode_claims(&SessionClaims {
            sub: "user-1".to_string(),
            email: "a@b.c".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: "j".to_string(),
            token_type: "access".to_string(),
        });
        assert!(create_test_service().validate_access_token(&token).is_err());
    }
}
