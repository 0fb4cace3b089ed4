use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // 用户ID
    pub username: String, // 用户名
    pub email: String,    // 邮箱
    pub exp: i64,         // 过期时间
    pub iat: i64,         // 签发时间
}

pub fn generate_token(
    user_id: &str,
    username: &str,
    email: &str,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(config.jwt_expiration().as_secs() as i64))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        exp: expiration,
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// 校验令牌签名，并额外检查签发时间是否在新鲜度窗口内。
/// 窗口检查独立于 exp 声明：签发太久的令牌即使未到 exp 也拒绝。
pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    let claims = token_data.claims;
    let oldest_allowed = Utc::now().timestamp() - config.token_max_age().as_secs() as i64;
    if claims.iat < oldest_allowed {
        return Err(jsonwebtoken::errors::ErrorKind::ExpiredSignature.into());
    }

    Ok(claims)
}

// 所有 handler 统一返回 Json<ApiResponse<T>>
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: 0,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const NOT_FOUND: i32 = 1004;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            jwt_secret: "test-secret".into(),
            jwt_expiration_secs: 2 * 3600,
            token_max_age_secs: 2 * 3600,
            server_host: "127.0.0.1".into(),
            server_port: 0,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn fresh_token_round_trips_claims() {
        let config = test_config();
        let token = generate_token("u-1", "alice", "alice@example.com", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");

        // 同一令牌在窗口内重复校验结果一致
        let again = verify_token(&token, &config).unwrap();
        assert_eq!(claims, again);
    }

    #[test]
    fn token_issued_beyond_max_age_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        // 三小时前签发、exp 尚未到期：新鲜度窗口（2h）单独生效
        let claims = Claims {
            sub: "u-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            exp: now + 3600,
            iat: now - 3 * 3600,
        };
        let token = sign(&claims, &config.jwt_secret);

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            exp: now - 3600,
            iat: now - 600,
        };
        let token = sign(&claims, &config.jwt_secret);

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            exp: now + 3600,
            iat: now,
        };
        let token = sign(&claims, "some-other-secret");

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let config = test_config();
        let token = generate_token("u-1", "alice", "alice@example.com", &config).unwrap();

        // 替换 payload 段，签名随即失配
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = generate_token("u-2", "mallory", "m@example.com", &config).unwrap();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let tampered = parts.join(".");

        assert!(verify_token(&tampered, &config).is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hashed = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hashed).unwrap());
        assert!(!verify_password("hunter3", &hashed).unwrap());
    }
}
