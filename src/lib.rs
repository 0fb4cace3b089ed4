use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use config::Config;
use routes::user::UserStore;

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<UserStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            users: Arc::new(UserStore::default()),
        }
    }
}

/// 组装 /api 路由：认证中间件作用于全部接口，
/// 匿名请求照常通过，由各 handler 决定是否需要身份
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/users/register", post(routes::user::register))
        .route("/users/login", post(routes::user::login))
        .route("/users/me", get(routes::user::me))
        .route("/books/save", put(routes::book::save_book))
        .route("/books/{book_id}", delete(routes::book::remove_book))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::log_errors))
        .with_state(state)
}
