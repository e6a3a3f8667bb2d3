mod errors;
mod lending_service;

pub use errors::{LendingError, Result};
pub use lending_service::{borrow_book, list_active_loans, return_book};
