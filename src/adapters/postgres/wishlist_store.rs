use crate::domain::{BookDisplay, BookId, Page, PageRequest, UserId, WishlistEntry};
use crate::ports::wishlist_store::WishlistStore as WishlistStoreTrait;
use crate::ports::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// WishlistStoreのPostgreSQL実装
pub struct WishlistStore {
    pool: PgPool,
}

impl WishlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistStoreTrait for WishlistStore {
    /// 主キー(user_id, book_id)の違反は`wishlist_entries_pkey`として返る
    async fn add(&self, entry: WishlistEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wishlist_entries (user_id, book_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.user_id.value())
        .bind(entry.book_id.value())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, user_id: UserId, book_id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM wishlist_entries WHERE user_id = $1 AND book_id = $2")
            .bind(user_id.value())
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        request: PageRequest,
    ) -> Result<Page<BookDisplay>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM wishlist_entries WHERE user_id = $1")
                .bind(user_id.value())
                .fetch_one(&self.pool)
                .await?;
        let total = total as u64;
        let window = request.window(total);

        if window.is_empty() {
            return Ok(Page::new(Vec::new(), request, window, total));
        }

        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.image_url
            FROM wishlist_entries w
            JOIN books b ON b.id = w.book_id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC, b.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.value())
        .bind(window.limit as i64)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(|row| -> Result<BookDisplay> {
                Ok(BookDisplay {
                    book_id: BookId::from_uuid(row.try_get("id")?),
                    title: row.try_get("title")?,
                    image_url: row.try_get("image_url")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(items, request, window, total))
    }
}
