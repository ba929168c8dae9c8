use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims, Role};

/// Issues and validates the HS256 access tokens used for sessions.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_secs: config.token_ttl.as_secs() as i64,
        }
    }

    /// Create a signed token for the user. Returns (token, expires_in_seconds).
    pub fn issue(&self, username: &str, role: Role) -> Result<(String, i64)> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AppError::Internal(format!("Failed to sign token: {}", e))
        })?;

        Ok((token, self.token_ttl_secs))
    }

    /// Validate a bearer token and recover the identity it carries.
    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        let role = Role::parse(&data.claims.role)
            .ok_or_else(|| AppError::Unauthorized("Unknown role in token".to_string()))?;

        Ok(AuthenticatedUser {
            username: data.claims.sub,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            viewer_username: None,
            viewer_password: None,
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let tokens = TokenService::new(&test_config());
        let (token, expires_in) = tokens.issue("admin", Role::Admin).unwrap();
        assert_eq!(expires_in, 3600);

        let user = tokens.validate(&token).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let tokens = TokenService::new(&test_config());
        assert!(tokens.validate("not-a-token").is_err());
    }

    #[test]
    fn test_validate_rejects_foreign_signature() {
        let issuer = TokenService::new(&AuthConfig {
            jwt_secret: "other-secret".to_string(),
            ..test_config()
        });
        let verifier = TokenService::new(&test_config());

        let (token, _) = issuer.issue("admin", Role::Admin).unwrap();
        assert!(verifier.validate(&token).is_err());
    }
}
