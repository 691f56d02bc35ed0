//! Custom request extractors.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `Json` whose rejections render as the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
