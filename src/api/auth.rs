use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::application::auth::{Principal, authenticate};

use super::{error::ApiError, handlers::AppState};

/// JWTで認証された利用者を取り出すエクストラクター
///
/// `Authorization: Bearer <token>`を検証し、ログアウト済みのトークンは拒否する。
pub struct AuthenticatedUser {
    pub principal: Principal,
    /// ログアウト時に無効化するため生のトークンも保持する
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthorized("Invalid authorization header format".to_string())
            })?;

        let principal = authenticate(&state.service_deps, &state.auth, token).await?;

        Ok(AuthenticatedUser {
            principal,
            token: token.to_string(),
        })
    }
}
