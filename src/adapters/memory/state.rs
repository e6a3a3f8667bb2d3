use crate::domain::{Book, BookId, Loan, LoanId, User, UserId, WishlistEntry};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// インメモリストアの全状態
///
/// トランザクションはこの構造体を丸ごと複製して作業し、
/// コミット時に書き戻す。
#[derive(Debug, Clone, Default)]
pub(super) struct LibraryState {
    pub users: Vec<User>,
    /// 登録順
    pub books: Vec<Book>,
    pub loans: HashMap<LoanId, Loan>,
    /// 追加順
    pub wishlist: Vec<WishlistEntry>,
    pub invalidated_tokens: HashMap<String, DateTime<Utc>>,
}

impl LibraryState {
    pub fn book(&self, book_id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.book_id == book_id)
    }

    pub fn book_mut(&mut self, book_id: BookId) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.book_id == book_id)
    }

    pub fn loan_by_book(&self, book_id: BookId) -> Option<&Loan> {
        self.loans.values().find(|l| l.book_id == book_id)
    }

    pub fn user_name(&self, user_id: UserId) -> String {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    pub fn is_wishlisted(&self, user_id: UserId, book_id: BookId) -> bool {
        self.wishlist
            .iter()
            .any(|e| e.user_id == user_id && e.book_id == book_id)
    }
}
