use crate::application::ServiceDependencies;
use crate::domain::{self, commands::*, *};
use crate::ports::DeleteBookOutcome;

use super::errors::{CatalogError, Result};

/// カタログ一覧を取得する
///
/// 各書籍に閲覧者のお気に入り状態（`is_wishlisted`）と
/// 現在の`loanable`を付けて返す。
#[tracing::instrument(skip(deps))]
pub async fn list_catalog(
    deps: &ServiceDependencies,
    viewer_id: UserId,
    request: PageRequest,
) -> Result<Page<CatalogEntry>> {
    deps.catalog_store
        .list(viewer_id, request)
        .await
        .map_err(CatalogError::StoreError)
}

/// IDで書籍を取得する
#[tracing::instrument(skip(deps))]
pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.catalog_store
        .get_by_id(book_id)
        .await
        .map_err(CatalogError::StoreError)?
        .ok_or(CatalogError::BookNotFound)
}

/// 書籍を登録する
///
/// 登録直後の書籍は貸出可能（Available）。
#[tracing::instrument(skip(deps, cmd), fields(owner_id = %cmd.owner_id))]
pub async fn create_book(deps: &ServiceDependencies, cmd: CreateBook) -> Result<Book> {
    let details = BookDetails::new(cmd.title, cmd.image_url).map_err(CatalogError::InvalidBook)?;
    let book = domain::book::new_book(cmd.owner_id, details, chrono::Utc::now());

    deps.catalog_store
        .create(book.clone())
        .await
        .map_err(CatalogError::StoreError)?;

    tracing::info!(book_id = %book.book_id, "Book created");

    Ok(book)
}

/// 書籍の表示項目を更新する
///
/// `loanable`は貸出エンジンだけが変更するため、ここでは受け付けない。
#[tracing::instrument(skip(deps, cmd), fields(book_id = %cmd.book_id))]
pub async fn update_book(deps: &ServiceDependencies, cmd: UpdateBook) -> Result<Book> {
    let details = BookDetails::new(cmd.title, cmd.image_url).map_err(CatalogError::InvalidBook)?;

    deps.catalog_store
        .update_details(cmd.book_id, &details)
        .await
        .map_err(CatalogError::StoreError)?
        .ok_or(CatalogError::BookNotFound)
}

/// 書籍を削除する
///
/// 貸出中の書籍は削除できない（`BookOnLoan`）。
#[tracing::instrument(skip(deps))]
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let outcome = deps
        .catalog_store
        .delete_if_loanable(book_id)
        .await
        .map_err(CatalogError::StoreError)?;

    match outcome {
        DeleteBookOutcome::Deleted => {
            tracing::info!("Book deleted");
            Ok(())
        }
        DeleteBookOutcome::NotFound => Err(CatalogError::BookNotFound),
        DeleteBookOutcome::OnLoan => Err(CatalogError::BookOnLoan),
    }
}
