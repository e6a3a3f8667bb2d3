use crate::domain::{Book, BookId, Loan, LoanId, LoanLookup};
use crate::ports::lending_store::LendingTransaction;
use crate::ports::{Result, StoreError};
use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::library::FailPoint;
use super::state::LibraryState;

/// インメモリの貸出トランザクション
///
/// 開始からコミット（または破棄）まで状態全体のロックを保持するため、
/// 同時に走るトランザクションは直列化される。
/// 書き込みは複製した作業用の状態に対して行い、コミットで書き戻す。
/// コミットせずに破棄された場合は作業用の状態ごと捨てられる。
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<LibraryState>,
    working: LibraryState,
    fail_point: Option<FailPoint>,
}

impl InMemoryTransaction {
    pub(super) fn new(guard: OwnedMutexGuard<LibraryState>, fail_point: Option<FailPoint>) -> Self {
        let working = (*guard).clone();
        Self {
            guard,
            working,
            fail_point,
        }
    }

    fn check(&self, point: FailPoint) -> Result<()> {
        if self.fail_point == Some(point) {
            return Err(StoreError::Backend(Box::new(std::io::Error::other(
                format!("injected failure at {:?}", point),
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl LendingTransaction for InMemoryTransaction {
    async fn lock_book(&mut self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.working.book(book_id).cloned())
    }

    async fn set_loanable(
        &mut self,
        book_id: BookId,
        expected: bool,
        new_value: bool,
    ) -> Result<bool> {
        self.check(FailPoint::SetLoanable)?;

        match self.working.book_mut(book_id) {
            Some(book) if book.loanable == expected => {
                book.loanable = new_value;
                book.updated_at = chrono::Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_loan(&mut self, loan: &Loan) -> Result<()> {
        self.check(FailPoint::CreateLoan)?;

        if self.working.book(loan.book_id).is_none() {
            return Err(StoreError::ForeignKeyViolation(
                "loans_book_id_fkey".to_string(),
            ));
        }
        if self.working.loan_by_book(loan.book_id).is_some()
            || self.working.loans.contains_key(&loan.loan_id)
        {
            return Err(StoreError::UniqueViolation("loans_book_id_key".to_string()));
        }

        self.working.loans.insert(loan.loan_id, loan.clone());
        Ok(())
    }

    async fn lock_loan(&mut self, lookup: LoanLookup) -> Result<Option<Loan>> {
        let loan = match lookup {
            LoanLookup::ByLoanId(loan_id) => self.working.loans.get(&loan_id),
            LoanLookup::ByBookId(book_id) => self.working.loan_by_book(book_id),
        };
        Ok(loan.cloned())
    }

    async fn delete_loan(&mut self, loan_id: LoanId) -> Result<bool> {
        self.check(FailPoint::DeleteLoan)?;
        Ok(self.working.loans.remove(&loan_id).is_some())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.check(FailPoint::Commit)?;

        let InMemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}
