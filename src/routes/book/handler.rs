use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::AppError,
    middleware::IdentityContext,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::SavedBook;
use crate::routes::user::model::RemoveBook;

#[axum::debug_handler]
pub async fn save_book(
    State(state): State<AppState>,
    Extension(context): Extension<IdentityContext>,
    Json(book): Json<SavedBook>,
) -> Result<impl IntoResponse, AppError> {
    let identity = context.require()?;

    if book.book_id.trim().is_empty() {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::VALIDATION_ERROR, "书籍ID不能为空".to_string()),
        ));
    }

    match state.users.save_book(&identity.user_id, book) {
        Some(user) => Ok((StatusCode::OK, success_to_api_response(user))),
        None => Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        )),
    }
}

#[axum::debug_handler]
pub async fn remove_book(
    State(state): State<AppState>,
    Extension(context): Extension<IdentityContext>,
    Path(book_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let identity = context.require()?;

    match state.users.remove_book(&identity.user_id, &book_id) {
        RemoveBook::Removed(user) => Ok((StatusCode::OK, success_to_api_response(user))),
        RemoveBook::NotSaved => Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::NOT_FOUND, "未找到要删除的书籍".to_string()),
        )),
        RemoveBook::NoSuchUser => Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        )),
    }
}
