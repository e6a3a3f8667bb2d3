use crate::domain::{Book, BookId, Loan, LoanId, LoanLookup};
use crate::ports::lending_store::{
    LendingStore as LendingStoreTrait, LendingTransaction as LendingTransactionTrait,
};
use crate::ports::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::catalog_store::map_row_to_book;
use super::loan_ledger::map_row_to_loan;

const SELECT_LOAN_BY_ID_FOR_UPDATE: &str = r#"
    SELECT id, borrower_id, book_id, checkout_date, due_date, created_at
    FROM loans
    WHERE id = $1
    FOR UPDATE
"#;

const SELECT_LOAN_BY_BOOK_FOR_UPDATE: &str = r#"
    SELECT id, borrower_id, book_id, checkout_date, due_date, created_at
    FROM loans
    WHERE book_id = $1
    FOR UPDATE
"#;

/// LendingStoreのPostgreSQL実装
///
/// 1回の貸出・返却が1つのデータベーストランザクションになる。
pub struct LendingStore {
    pool: PgPool,
}

impl LendingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LendingStoreTrait for LendingStore {
    async fn begin(&self) -> Result<Box<dyn LendingTransactionTrait>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(LendingTransaction { tx }))
    }
}

/// sqlxのトランザクションをラップする
///
/// `commit`されずにdropされるとsqlxがROLLBACKを発行する。
pub struct LendingTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LendingTransactionTrait for LendingTransaction {
    async fn lock_book(&mut self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, title, image_url, loanable, created_at, updated_at
            FROM books
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn set_loanable(
        &mut self,
        book_id: BookId,
        expected: bool,
        new_value: bool,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET loanable = $3, updated_at = NOW()
            WHERE id = $1 AND loanable = $2
            "#,
        )
        .bind(book_id.value())
        .bind(expected)
        .bind(new_value)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// 同じ書籍の貸出が既にあれば`loans_book_id_key`の一意制約違反になる
    async fn create_loan(&mut self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, borrower_id, book_id, checkout_date, due_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.borrower_id.value())
        .bind(loan.book_id.value())
        .bind(loan.checkout_date)
        .bind(loan.due_date)
        .bind(loan.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn lock_loan(&mut self, lookup: LoanLookup) -> Result<Option<Loan>> {
        let (sql, id) = match lookup {
            LoanLookup::ByLoanId(loan_id) => (SELECT_LOAN_BY_ID_FOR_UPDATE, loan_id.value()),
            LoanLookup::ByBookId(book_id) => (SELECT_LOAN_BY_BOOK_FOR_UPDATE, book_id.value()),
        };

        let row = sqlx::query(sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn delete_loan(&mut self, loan_id: LoanId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(loan_id.value())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
