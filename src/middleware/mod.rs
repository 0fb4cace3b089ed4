mod auth;
mod error_handler;

pub use auth::{Identity, IdentityContext, auth_middleware, identity_from_headers};
pub use error_handler::log_errors;
