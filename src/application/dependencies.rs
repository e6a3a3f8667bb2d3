use crate::ports::*;
use std::sync::Arc;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、各サービス関数に明示的に渡す。
/// プロセス全体で共有するグローバルな接続は持たない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub lending_store: Arc<dyn LendingStore>,
    pub catalog_store: Arc<dyn CatalogStore>,
    pub loan_ledger: Arc<dyn LoanLedger>,
    pub wishlist_store: Arc<dyn WishlistStore>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub token_blocklist: Arc<dyn TokenBlocklist>,
}
