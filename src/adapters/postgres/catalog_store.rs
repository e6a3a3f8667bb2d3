use crate::domain::{
    Book, BookDetails, BookDisplay, BookId, BookOwner, CatalogEntry, Page, PageRequest, UserId,
};
use crate::ports::catalog_store::{CatalogStore as CatalogStoreTrait, DeleteBookOutcome};
use crate::ports::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをBookに変換する
pub(super) fn map_row_to_book(row: &PgRow) -> Result<Book> {
    Ok(Book {
        book_id: BookId::from_uuid(row.try_get("id")?),
        owner_id: UserId::from_uuid(row.try_get("owner_id")?),
        title: row.try_get("title")?,
        image_url: row.try_get("image_url")?,
        loanable: row.try_get("loanable")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_row_to_catalog_entry(row: &PgRow) -> Result<CatalogEntry> {
    Ok(CatalogEntry {
        book: BookDisplay {
            book_id: BookId::from_uuid(row.try_get("id")?),
            title: row.try_get("title")?,
            image_url: row.try_get("image_url")?,
        },
        loanable: row.try_get("loanable")?,
        owner: BookOwner {
            user_id: UserId::from_uuid(row.try_get("owner_id")?),
            name: row.try_get("owner_name")?,
        },
        is_wishlisted: row.try_get("is_wishlisted")?,
    })
}

/// CatalogStoreのPostgreSQL実装
pub struct CatalogStore {
    pool: PgPool,
}

impl CatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStoreTrait for CatalogStore {
    async fn create(&self, book: Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, owner_id, title, image_url, loanable, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(book.book_id.value())
        .bind(book.owner_id.value())
        .bind(&book.title)
        .bind(&book.image_url)
        .bind(book.loanable)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, title, image_url, loanable, created_at, updated_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// 登録順に一覧する
    ///
    /// 登録者名と閲覧者のお気に入り有無を結合する。
    async fn list(&self, viewer_id: UserId, request: PageRequest) -> Result<Page<CatalogEntry>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        let total = total as u64;
        let window = request.window(total);

        if window.is_empty() {
            return Ok(Page::new(Vec::new(), request, window, total));
        }

        let rows = sqlx::query(
            r#"
            SELECT
                b.id,
                b.title,
                b.image_url,
                b.loanable,
                b.owner_id,
                u.name AS owner_name,
                EXISTS (
                    SELECT 1 FROM wishlist_entries w
                    WHERE w.book_id = b.id AND w.user_id = $1
                ) AS is_wishlisted
            FROM books b
            JOIN users u ON u.id = b.owner_id
            ORDER BY b.created_at, b.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(viewer_id.value())
        .bind(window.limit as i64)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(map_row_to_catalog_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(items, request, window, total))
    }

    async fn update_details(&self, book_id: BookId, details: &BookDetails) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, image_url = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, title, image_url, loanable, created_at, updated_at
            "#,
        )
        .bind(book_id.value())
        .bind(details.title())
        .bind(details.image_url())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// `loanable = TRUE`を条件に削除する
    ///
    /// お気に入りは外部キーのON DELETE CASCADEで消える。
    async fn delete_if_loanable(&self, book_id: BookId) -> Result<DeleteBookOutcome> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND loanable = TRUE")
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(DeleteBookOutcome::Deleted);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id.value())
            .fetch_one(&self.pool)
            .await?;

        Ok(if exists {
            DeleteBookOutcome::OnLoan
        } else {
            DeleteBookOutcome::NotFound
        })
    }
}
