use crate::domain::{ActiveLoan, BookDisplay, BookId, Loan, LoanId, UserId};
use crate::ports::loan_ledger::LoanLedger as LoanLedgerTrait;
use crate::ports::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをLoanに変換する
pub(super) fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    Ok(Loan {
        loan_id: LoanId::from_uuid(row.try_get("id")?),
        borrower_id: UserId::from_uuid(row.try_get("borrower_id")?),
        book_id: BookId::from_uuid(row.try_get("book_id")?),
        checkout_date: row.try_get("checkout_date")?,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_row_to_active_loan(row: &PgRow) -> Result<ActiveLoan> {
    let loan = map_row_to_loan(row)?;
    let book = BookDisplay {
        book_id: loan.book_id,
        title: row.try_get("title")?,
        image_url: row.try_get("image_url")?,
    };
    Ok(ActiveLoan { loan, book })
}

/// LoanLedgerのPostgreSQL実装（読み取り専用）
pub struct LoanLedger {
    pool: PgPool,
}

impl LoanLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanLedgerTrait for LoanLedger {
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT id, borrower_id, book_id, checkout_date, due_date, created_at
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn get_by_book_id(&self, book_id: BookId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT id, borrower_id, book_id, checkout_date, due_date, created_at
            FROM loans
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    /// (borrower_id)のインデックスを使用する
    async fn list_by_borrower(&self, borrower_id: UserId) -> Result<Vec<ActiveLoan>> {
        let rows = sqlx::query(
            r#"
            SELECT
                l.id,
                l.borrower_id,
                l.book_id,
                l.checkout_date,
                l.due_date,
                l.created_at,
                b.title,
                b.image_url
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE l.borrower_id = $1
            ORDER BY l.checkout_date, l.created_at
            "#,
        )
        .bind(borrower_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_active_loan).collect()
    }
}
