use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// `axum::Json`と同じだが、拒否時は`ApiError`（400）を返す
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path`と同じだが、拒否時は`ApiError`（400）を返す
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
