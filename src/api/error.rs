use crate::application::{
    ErrorKind, auth::AuthError, catalog::CatalogError, lending::LendingError,
    wishlist::WishlistError,
};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、`ErrorKind`でHTTPステータスに
/// マッピングする。
#[derive(Debug)]
pub enum ApiError {
    Lending(LendingError),
    Catalog(CatalogError),
    Wishlist(WishlistError),
    Auth(AuthError),
    /// リクエストの形式が不正（日付の形式など）
    BadRequest(String),
    /// 認証ヘッダーが無い・不正
    Unauthorized(String),
}

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        ApiError::Lending(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<WishlistError> for ApiError {
    fn from(err: WishlistError) -> Self {
        ApiError::Wishlist(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

// 本文・パスの解析失敗もErrorResponseの形式で400を返す
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl ApiError {
    fn kind_and_message(&self) -> (ErrorKind, String) {
        match self {
            ApiError::Lending(e) => (e.kind(), e.to_string()),
            ApiError::Catalog(e) => (e.kind(), e.to_string()),
            ApiError::Wishlist(e) => (e.kind(), e.to_string()),
            ApiError::Auth(e) => (e.kind(), e.to_string()),
            ApiError::BadRequest(msg) => (ErrorKind::InvalidArgument, msg.clone()),
            ApiError::Unauthorized(msg) => (ErrorKind::Unauthorized, msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (kind, message) = self.kind_and_message();

        let (status, error_type, message) = match kind {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
            ErrorKind::Conflict => {
                tracing::warn!("Request rejected: {}", message);
                (StatusCode::CONFLICT, "CONFLICT", message)
            }
            ErrorKind::InvalidArgument => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", message),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message),

            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ErrorKind::Internal => {
                tracing::error!(error = ?self, "Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lending_conflict_maps_to_409() {
        let response = ApiError::from(LendingError::BookOnLoan).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_loan_not_found_maps_to_404() {
        let response = ApiError::from(LendingError::LoanNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invariant_violation_maps_to_500() {
        let response =
            ApiError::from(LendingError::InvariantViolation("broken".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = ApiError::BadRequest("bad date".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
