//! Shared response envelopes.

mod response;

pub use response::{MessageResponse, UserListResponse, UserResponse};
