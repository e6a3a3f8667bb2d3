pub mod auth;
pub mod catalog;
pub mod dependencies;
pub mod lending;
pub mod wishlist;

pub use dependencies::ServiceDependencies;

/// 呼び出し側に公開するエラー分類
///
/// 要求層はこの分類だけを見てトランスポートの応答に変換する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 参照先（書籍・貸出・お気に入り）が存在しない
    NotFound,
    /// 状態遷移の前提条件違反（競合に負けた貸出、お気に入りの重複など）
    Conflict,
    /// 入力が不正（逆転した貸出期間など）
    InvalidArgument,
    /// 認証情報が不正（認証まわりのみ）
    Unauthorized,
    /// ストア・トランザクションの失敗
    Internal,
}
