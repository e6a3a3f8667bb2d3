mod auth_service;
mod errors;
mod password;
mod token;

pub use auth_service::{
    IssuedToken, MIN_PASSWORD_LENGTH, authenticate, list_users, login, logout, register,
};
pub use errors::{AuthError, Result};
pub use token::{AuthSettings, Claims, Principal};
