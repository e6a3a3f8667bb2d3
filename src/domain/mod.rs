pub mod book;
pub mod commands;
pub mod errors;
pub mod loan;
pub mod pagination;
pub mod user;
pub mod value_objects;
pub mod wishlist;

pub use book::{Book, BookDetails, BookDisplay, BookOwner, BookState, CatalogEntry};
pub use errors::*;
pub use loan::{ActiveLoan, Loan, LoanLookup};
pub use pagination::{Page, PageRequest, PageWindow};
pub use user::{Role, User, UserSummary};
pub use value_objects::*;
pub use wishlist::{WishlistEntry, WishlistedBook};
