//! API middleware.

mod auth;

pub use auth::{auth_middleware, ensure_admin, require_admin, CurrentUser};
