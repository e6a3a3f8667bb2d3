pub mod catalog_store;
pub mod errors;
pub mod lending_store;
pub mod loan_ledger;
pub mod user_directory;
pub mod wishlist_store;

pub use catalog_store::{CatalogStore, DeleteBookOutcome};
pub use errors::{Result, StoreError};
pub use lending_store::{LendingStore, LendingTransaction};
pub use loan_ledger::LoanLedger;
pub use user_directory::{TokenBlocklist, UserDirectory};
pub use wishlist_store::WishlistStore;
