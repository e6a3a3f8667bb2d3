mod library;
mod state;
mod transaction;

pub use library::{FailPoint, InMemoryLibrary};
pub use transaction::InMemoryTransaction;
