use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::AppError,
    middleware::IdentityContext,
    utils::{
        error_codes, error_to_api_response, generate_token, hash_password,
        success_to_api_response, verify_password,
    },
};

use super::model::{AuthResponse, LoginRequest, RegisterRequest, User};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    // 基本格式检查
    if req.username.trim().is_empty() || !req.email.contains('@') || req.password.is_empty() {
        return (
            StatusCode::OK,
            error_to_api_response(
                error_codes::VALIDATION_ERROR,
                "用户名、邮箱或密码格式无效".to_string(),
            ),
        );
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(_) => {
            return (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "密码处理失败".to_string()),
            );
        }
    };

    let user = User {
        user_id: uuid::Uuid::new_v4().to_string(),
        username: req.username,
        email: req.email,
        password_hash,
        saved_books: Vec::new(),
    };

    let Some(user) = state.users.insert(user) else {
        return (
            StatusCode::OK,
            error_to_api_response(error_codes::USER_EXISTS, "用户已存在".to_string()),
        );
    };

    // 注册即登录，直接签发令牌
    match generate_token(&user.user_id, &user.username, &user.email, &state.config) {
        Ok(token) => (
            StatusCode::OK,
            success_to_api_response(AuthResponse { token, user }),
        ),
        Err(_) => (
            StatusCode::OK,
            error_to_api_response(error_codes::INTERNAL_ERROR, "生成令牌失败".to_string()),
        ),
    }
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let Some(user) = state.users.find_by_email(&req.email) else {
        return (
            StatusCode::OK,
            error_to_api_response(error_codes::AUTH_FAILED, "用户不存在".to_string()),
        );
    };

    // 验证密码
    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => (),
        Ok(false) => {
            return (
                StatusCode::OK,
                error_to_api_response(error_codes::AUTH_FAILED, "密码无效".to_string()),
            );
        }
        Err(_) => {
            return (
                StatusCode::OK,
                error_to_api_response(error_codes::INTERNAL_ERROR, "密码校验失败".to_string()),
            );
        }
    }

    match generate_token(&user.user_id, &user.username, &user.email, &state.config) {
        Ok(token) => (
            StatusCode::OK,
            success_to_api_response(AuthResponse { token, user }),
        ),
        Err(_) => (
            StatusCode::OK,
            error_to_api_response(error_codes::INTERNAL_ERROR, "生成令牌失败".to_string()),
        ),
    }
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(context): Extension<IdentityContext>,
) -> Result<impl IntoResponse, AppError> {
    let identity = context.require()?;

    let Some(user) = state.users.find_by_id(&identity.user_id) else {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        ));
    };

    Ok((StatusCode::OK, success_to_api_response(user)))
}
