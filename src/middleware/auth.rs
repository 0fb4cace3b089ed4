use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    config::Config,
    error::AppError,
    utils::{Claims, verify_token},
};

/// 经过校验的请求身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
        }
    }
}

/// 每个请求的身份上下文：匿名请求为 None
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext(Option<Identity>);

impl IdentityContext {
    pub fn anonymous() -> Self {
        IdentityContext(None)
    }

    pub fn authenticated(identity: Identity) -> Self {
        IdentityContext(Some(identity))
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    /// 受保护操作使用：身份缺失时返回认证错误
    pub fn require(&self) -> Result<&Identity, AppError> {
        self.0.as_ref().ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头解析并校验 Bearer 凭证。
///
/// 头缺失或为空视为匿名（Ok(None)），不算错误；凭证存在但签名无效、
/// 格式错误或签发时间超出新鲜度窗口时返回认证错误，不区分具体原因。
pub fn identity_from_headers(
    headers: &HeaderMap,
    config: &Config,
) -> Result<Option<Identity>, AppError> {
    let raw = match headers.get(header::AUTHORIZATION) {
        None => return Ok(None),
        // 头存在但不是合法字符串：按无效凭证拒绝，而非降级为匿名
        Some(value) => value.to_str().map_err(|_| {
            tracing::warn!("Authorization header is not valid UTF-8");
            AppError::Unauthorized
        })?,
    };

    if raw.trim().is_empty() {
        return Ok(None);
    }

    // 兼容旧客户端：取最后一段，允许省略 "Bearer " 前缀
    let token = raw.split_whitespace().last().unwrap_or("").trim();

    match verify_token(token, config) {
        Ok(claims) => Ok(Some(Identity::from(claims))),
        Err(e) => {
            tracing::warn!("Invalid token: {}", e);
            Err(AppError::Unauthorized)
        }
    }
}

/// 认证中间件：为每个请求写入 IdentityContext 扩展。
/// 无效凭证直接以认证错误拒绝，由上层转换为响应。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let context = match identity_from_headers(request.headers(), &state.config)? {
        Some(identity) => IdentityContext::authenticated(identity),
        None => IdentityContext::anonymous(),
    };
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generate_token;
    use axum::http::HeaderValue;

    fn test_config() -> Config {
        Config {
            jwt_secret: "test-secret".into(),
            jwt_expiration_secs: 2 * 3600,
            token_max_age_secs: 2 * 3600,
            server_host: "127.0.0.1".into(),
            server_port: 0,
        }
    }

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        let config = test_config();
        let identity = identity_from_headers(&HeaderMap::new(), &config).unwrap();
        assert!(identity.is_none());
    }

    #[test]
    fn empty_header_is_anonymous() {
        let config = test_config();
        let headers = headers_with_authorization("");
        let identity = identity_from_headers(&headers, &config).unwrap();
        assert!(identity.is_none());
    }

    #[test]
    fn bearer_token_yields_identity_from_claims() {
        let config = test_config();
        let token = generate_token("u-1", "alice", "alice@example.com", &config).unwrap();
        let headers = headers_with_authorization(&format!("Bearer {}", token));

        let identity = identity_from_headers(&headers, &config).unwrap().unwrap();
        assert_eq!(identity.user_id, "u-1");
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn bare_token_without_scheme_is_accepted() {
        let config = test_config();
        let token = generate_token("u-1", "alice", "alice@example.com", &config).unwrap();
        let headers = headers_with_authorization(&token);

        let identity = identity_from_headers(&headers, &config).unwrap();
        assert!(identity.is_some());
    }

    #[test]
    fn non_utf8_header_is_rejected_not_anonymous() {
        let config = test_config();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(&[0x42, 0xff, 0x42]).unwrap(),
        );

        assert_eq!(
            identity_from_headers(&headers, &config),
            Err(AppError::Unauthorized)
        );
    }

    #[test]
    fn malformed_token_is_rejected() {
        let config = test_config();
        let headers = headers_with_authorization("Bearer not-a-jwt");

        assert_eq!(
            identity_from_headers(&headers, &config),
            Err(AppError::Unauthorized)
        );
    }

    #[test]
    fn require_on_anonymous_context_fails() {
        let context = IdentityContext::anonymous();
        assert_eq!(context.require(), Err(AppError::Unauthorized));
    }
}
