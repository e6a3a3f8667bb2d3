mod errors;
mod wishlist_service;

pub use errors::{Result, WishlistError};
pub use wishlist_service::{add_to_wishlist, list_wishlist, remove_from_wishlist};
