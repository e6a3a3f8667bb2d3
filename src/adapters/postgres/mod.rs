pub mod catalog_store;
pub mod lending_store;
pub mod loan_ledger;
pub mod user_directory;
pub mod wishlist_store;

// パブリックに型を再エクスポート
pub use catalog_store::CatalogStore as PostgresCatalogStore;
pub use lending_store::{
    LendingStore as PostgresLendingStore, LendingTransaction as PostgresLendingTransaction,
};
pub use loan_ledger::LoanLedger as PostgresLoanLedger;
pub use user_directory::UserDirectory as PostgresUserDirectory;
pub use wishlist_store::WishlistStore as PostgresWishlistStore;

use crate::application::ServiceDependencies;
use crate::ports::StoreError;
use sqlx::PgPool;
use std::sync::Arc;

/// sqlxのエラーをストアエラーに変換する
///
/// 一意制約・外部キー制約の違反は制約名付きで区別する。
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Backend(Box::new(err))
    }
}

/// コネクションプールから全ポートのPostgreSQL実装を組み立てる
pub fn service_dependencies(pool: PgPool) -> ServiceDependencies {
    let user_directory = Arc::new(PostgresUserDirectory::new(pool.clone()));

    ServiceDependencies {
        lending_store: Arc::new(PostgresLendingStore::new(pool.clone())),
        catalog_store: Arc::new(PostgresCatalogStore::new(pool.clone())),
        loan_ledger: Arc::new(PostgresLoanLedger::new(pool.clone())),
        wishlist_store: Arc::new(PostgresWishlistStore::new(pool)),
        user_directory: user_directory.clone(),
        token_blocklist: user_directory,
    }
}
