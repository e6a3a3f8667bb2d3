use thiserror::Error;

use crate::application::ErrorKind;
use crate::domain::BookValidationError;
use crate::ports::StoreError;

/// カタログ管理のエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Book not found")]
    BookNotFound,

    /// 貸出中の書籍は削除できない
    #[error("Book is on loan")]
    BookOnLoan,

    #[error("Invalid book: {0:?}")]
    InvalidBook(BookValidationError),

    #[error("Store error")]
    StoreError(#[source] StoreError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::BookNotFound => ErrorKind::NotFound,
            CatalogError::BookOnLoan => ErrorKind::Conflict,
            CatalogError::InvalidBook(_) => ErrorKind::InvalidArgument,
            CatalogError::StoreError(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
