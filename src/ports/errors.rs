use thiserror::Error;

/// ストア層のエラー
///
/// 制約違反はアプリケーション層でビジネスエラー（Conflict / NotFound）に
/// 変換できるように区別して返す。それ以外は`Backend`にまとめる。
#[derive(Debug, Error)]
pub enum StoreError {
    /// 一意制約違反（制約名）
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// 外部キー制約違反（制約名）
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// 保存されている値がドメインの型に変換できない
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// 接続断、コミット失敗などの基盤エラー
    #[error("Store backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// ポート共通のResult型
pub type Result<T> = std::result::Result<T, StoreError>;
