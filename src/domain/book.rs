use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, BookValidationError, UserId};

/// タイトル・画像URLの最大長（VARCHAR(255)）
pub const MAX_FIELD_LENGTH: usize = 255;

/// 書籍の貸出状態
///
/// `loanable`フラグから導出される。保存はしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookState {
    /// 貸出可能（貸出レコードなし）
    Available,
    /// 貸出中（貸出レコードがちょうど1件）
    OnLoan,
}

/// 書籍 - カタログの1レコード、物理的な1冊に対応する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub owner_id: UserId,
    pub title: String,
    pub image_url: String,
    pub loanable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn state(&self) -> BookState {
        if self.loanable {
            BookState::Available
        } else {
            BookState::OnLoan
        }
    }

    pub fn display(&self) -> BookDisplay {
        BookDisplay {
            book_id: self.book_id,
            title: self.title.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// 一覧表示用の書籍情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDisplay {
    pub book_id: BookId,
    pub title: String,
    pub image_url: String,
}

/// 書籍の登録者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOwner {
    pub user_id: UserId,
    pub name: String,
}

/// カタログ一覧の1行
///
/// `is_wishlisted`は閲覧者ごとに読み取り時に結合される値で、保存されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub book: BookDisplay,
    pub loanable: bool,
    pub owner: BookOwner,
    pub is_wishlisted: bool,
}

/// 書籍の表示項目（タイトル・画像URL）
///
/// 新規登録と更新の両方で使う。`loanable`は含まない。
/// 貸出状態を変更できるのは貸出エンジンだけ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    title: String,
    image_url: String,
}

impl BookDetails {
    pub fn new(
        title: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Result<Self, BookValidationError> {
        let title = title.into().trim().to_string();
        let image_url = image_url.into().trim().to_string();

        if title.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if image_url.is_empty() {
            return Err(BookValidationError::EmptyImageUrl);
        }
        if title.chars().count() > MAX_FIELD_LENGTH {
            return Err(BookValidationError::TooLong {
                field: "title",
                max: MAX_FIELD_LENGTH,
            });
        }
        if image_url.chars().count() > MAX_FIELD_LENGTH {
            return Err(BookValidationError::TooLong {
                field: "image_url",
                max: MAX_FIELD_LENGTH,
            });
        }

        Ok(Self { title, image_url })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}

/// 純粋関数：新しい書籍を作成する
///
/// 新規登録された書籍は常に貸出可能状態から始まる。
pub fn new_book(owner_id: UserId, details: BookDetails, now: DateTime<Utc>) -> Book {
    Book {
        book_id: BookId::new(),
        owner_id,
        title: details.title,
        image_url: details.image_url,
        loanable: true,
        created_at: now,
        updated_at: now,
    }
}
