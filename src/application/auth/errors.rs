use thiserror::Error;

use crate::application::ErrorKind;
use crate::ports::StoreError;

/// 認証のエラー
#[derive(Debug, Error)]
pub enum AuthError {
    /// メールアドレスまたはパスワードが違う
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// トークンが不正または期限切れ
    #[error("Invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// ログアウト済みのトークン
    #[error("Token has been revoked")]
    TokenRevoked,

    /// トークンの利用者が存在しない
    #[error("Unknown user")]
    UnknownUser,

    /// メールアドレスが登録済み
    #[error("Email is already registered")]
    EmailTaken,

    /// 入力が不正
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// パスワードハッシュの生成・解析に失敗
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// トークンの発行に失敗
    #[error("Token encoding error")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] StoreError),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken(_)
            | AuthError::TokenRevoked
            | AuthError::UnknownUser => ErrorKind::Unauthorized,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidInput(_) => ErrorKind::InvalidArgument,
            AuthError::PasswordHash(_) | AuthError::TokenEncoding(_) | AuthError::StoreError(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
