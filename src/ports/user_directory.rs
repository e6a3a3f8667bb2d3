use crate::domain::{User, UserId, UserSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::Result;

/// 利用者ディレクトリポート
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 利用者を登録する
    ///
    /// メールアドレスが重複する場合は`StoreError::UniqueViolation`。
    async fn create(&self, user: User) -> Result<()>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<User>>;

    async fn list_all(&self) -> Result<Vec<UserSummary>>;
}

/// 無効化済みトークンのポート（ログアウト）
#[async_trait]
pub trait TokenBlocklist: Send + Sync {
    /// トークンを無効化する。同じトークンの二重登録は成功扱い。
    /// 有効期限を過ぎた登録はこのとき破棄される。
    async fn invalidate(&self, token: &str, expires_at: DateTime<Utc>) -> Result<()>;

    async fn is_invalidated(&self, token: &str) -> Result<bool>;
}
