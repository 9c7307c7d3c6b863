use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

use crate::api::constants::ACCESS_TOKEN_TYPE;
use crate::utils::TimeParser;

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Uses OnceLock for thread-safe lazy initialization.
/// The service is initialized once on first use and reused for all subsequent requests.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// Access Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Admin id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for generating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl JwtService {
    pub fn new(secret: &str, expires_in: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        // 未配置时生成随机 secret，重启后旧 token 全部失效
        let jwt_secret = if config.api.jwt_secret.is_empty() {
            warn!("JWT secret not configured or empty, generating secure random token");
            crate::utils::generate_random_code(32)
        } else {
            config.api.jwt_secret.clone()
        };

        let expires_in = TimeParser::parse_duration(&config.api.jwt_expires_in).unwrap_or_else(|e| {
            warn!(
                "Invalid jwt_expires_in '{}': {}, falling back to 7d",
                config.api.jwt_expires_in, e
            );
            Duration::days(7)
        });

        Self::new(&jwt_secret, expires_in)
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Generate an access token for the given admin
    pub fn generate_access_token(&self, admin_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: admin_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate Access Token
    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;

        // Verify token type
        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
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
        JwtService::new(SECRET, Duration::days(7))
    }

    fn sign(claims: &AccessClaims) -> String {
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        encode(&Header::default(), claims, &key).unwrap()
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();
        let token = service.generate_access_token("admin-id").unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "admin-id");
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_access_token("invalid.token.here").is_err());
        assert!(service.validate_access_token("loggedout").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", Duration::days(7));

        let token = service1.generate_access_token("admin-id").unwrap();
        assert!(service2.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        let now = Utc::now();
        let token = sign(&AccessClaims {
            sub: "admin-id".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        });
        assert!(create_test_service().validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        // 过期时间超过默认 leeway
        let now = Utc::now();
        let token = sign(&AccessClaims {
            sub: "admin-id".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
        });

        let err = service.validate_access_token(&token).unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }
}
