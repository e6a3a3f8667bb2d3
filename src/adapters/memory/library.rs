use crate::application::ServiceDependencies;
use crate::domain::*;
use crate::ports::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::state::LibraryState;
use super::transaction::InMemoryTransaction;

/// 障害注入ポイント
///
/// 次に開始されるトランザクションの指定した箇所でBackendエラーを返す。
/// ロールバックの検証に使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    CreateLoan,
    SetLoanable,
    DeleteLoan,
    Commit,
}

/// 全ポートのインメモリ実装
///
/// テストやデータベースなしでの起動に使う。
/// 貸出トランザクションは状態全体のロックで直列化される。
pub struct InMemoryLibrary {
    state: Arc<Mutex<LibraryState>>,
    next_failure: std::sync::Mutex<Option<FailPoint>>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LibraryState::default())),
            next_failure: std::sync::Mutex::new(None),
        }
    }

    /// 次のトランザクションで障害を起こす
    pub fn fail_next_transaction_at(&self, point: FailPoint) {
        *self
            .next_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(point);
    }

    /// このストアを全ポートに割り当てた依存関係を作る
    pub fn service_dependencies(self: &Arc<Self>) -> ServiceDependencies {
        ServiceDependencies {
            lending_store: self.clone(),
            catalog_store: self.clone(),
            loan_ledger: self.clone(),
            wishlist_store: self.clone(),
            user_directory: self.clone(),
            token_blocklist: self.clone(),
        }
    }

    fn take_failure(&self) -> Option<FailPoint> {
        self.next_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Default for InMemoryLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LendingStore for InMemoryLibrary {
    async fn begin(&self) -> Result<Box<dyn LendingTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(InMemoryTransaction::new(guard, self.take_failure())))
    }
}

#[async_trait]
impl CatalogStore for InMemoryLibrary {
    async fn create(&self, book: Book) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.book(book.book_id).is_some() {
            return Err(StoreError::UniqueViolation("books_pkey".to_string()));
        }
        state.books.push(book);
        Ok(())
    }

    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.state.lock().await.book(book_id).cloned())
    }

    async fn list(&self, viewer_id: UserId, request: PageRequest) -> Result<Page<CatalogEntry>> {
        let state = self.state.lock().await;
        let total = state.books.len() as u64;
        let window = request.window(total);

        let items = window
            .slice(&state.books)
            .into_iter()
            .map(|book| CatalogEntry {
                owner: BookOwner {
                    user_id: book.owner_id,
                    name: state.user_name(book.owner_id),
                },
                is_wishlisted: state.is_wishlisted(viewer_id, book.book_id),
                loanable: book.loanable,
                book: book.display(),
            })
            .collect();

        Ok(Page::new(items, request, window, total))
    }

    async fn update_details(&self, book_id: BookId, details: &BookDetails) -> Result<Option<Book>> {
        let mut state = self.state.lock().await;
        let Some(book) = state.book_mut(book_id) else {
            return Ok(None);
        };
        book.title = details.title().to_string();
        book.image_url = details.image_url().to_string();
        book.updated_at = Utc::now();
        Ok(Some(book.clone()))
    }

    async fn delete_if_loanable(&self, book_id: BookId) -> Result<DeleteBookOutcome> {
        let mut state = self.state.lock().await;
        let Some(book) = state.book(book_id) else {
            return Ok(DeleteBookOutcome::NotFound);
        };
        if !book.loanable {
            return Ok(DeleteBookOutcome::OnLoan);
        }

        state.books.retain(|b| b.book_id != book_id);
        state.wishlist.retain(|e| e.book_id != book_id);
        Ok(DeleteBookOutcome::Deleted)
    }
}

#[async_trait]
impl LoanLedger for InMemoryLibrary {
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self.state.lock().await.loans.get(&loan_id).cloned())
    }

    async fn get_by_book_id(&self, book_id: BookId) -> Result<Option<Loan>> {
        Ok(self.state.lock().await.loan_by_book(book_id).cloned())
    }

    async fn list_by_borrower(&self, borrower_id: UserId) -> Result<Vec<ActiveLoan>> {
        let state = self.state.lock().await;
        let mut loans: Vec<ActiveLoan> = state
            .loans
            .values()
            .filter(|l| l.borrower_id == borrower_id)
            .filter_map(|l| {
                state.book(l.book_id).map(|book| ActiveLoan {
                    loan: l.clone(),
                    book: book.display(),
                })
            })
            .collect();
        loans.sort_by_key(|a| (a.loan.checkout_date, a.loan.created_at));
        Ok(loans)
    }
}

#[async_trait]
impl WishlistStore for InMemoryLibrary {
    async fn add(&self, entry: WishlistEntry) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.book(entry.book_id).is_none() {
            return Err(StoreError::ForeignKeyViolation(
                "wishlist_entries_book_id_fkey".to_string(),
            ));
        }
        if state.is_wishlisted(entry.user_id, entry.book_id) {
            return Err(StoreError::UniqueViolation(
                "wishlist_entries_pkey".to_string(),
            ));
        }
        state.wishlist.push(entry);
        Ok(())
    }

    async fn remove(&self, user_id: UserId, book_id: BookId) -> Result<bool> {
        let mut state = self.state.lock().await;
        let before = state.wishlist.len();
        state
            .wishlist
            .retain(|e| !(e.user_id == user_id && e.book_id == book_id));
        Ok(state.wishlist.len() != before)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        request: PageRequest,
    ) -> Result<Page<BookDisplay>> {
        let state = self.state.lock().await;
        let books: Vec<BookDisplay> = state
            .wishlist
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .filter_map(|e| state.book(e.book_id).map(Book::display))
            .collect();

        let total = books.len() as u64;
        let window = request.window(total);
        Ok(Page::new(window.slice(&books), request, window, total))
    }
}

#[async_trait]
impl UserDirectory for InMemoryLibrary {
    async fn create(&self, user: User) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        state.users.push(user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserSummary>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().map(User::summary).collect())
    }
}

#[async_trait]
impl TokenBlocklist for InMemoryLibrary {
    async fn invalidate(&self, token: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.lock().await;
        // 期限切れのトークンは検証で弾かれるので保持しない
        let now = Utc::now();
        state.invalidated_tokens.retain(|_, expires| *expires >= now);
        state
            .invalidated_tokens
            .insert(token.to_string(), expires_at);
        Ok(())
    }

    async fn is_invalidated(&self, token: &str) -> Result<bool> {
        Ok(self.state.lock().await.invalidated_tokens.contains_key(token))
    }
}
