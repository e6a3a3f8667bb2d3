use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::application::auth::IssuedToken;
use crate::domain::{
    ActiveLoan, BookDisplay, CatalogEntry, Loan, LoanLookup, Page, PageRequest, UserSummary,
    WishlistedBook, pagination::DEFAULT_PAGE,
};
use crate::domain::{BookId, LoanId};

/// 日付の入出力形式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD`形式の日付をパースする
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("{} must be a date in YYYY-MM-DD format", field))
}

// ============================================================================
// Requests
// ============================================================================

/// 利用者登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 書籍登録・更新リクエスト
///
/// `loanable`は受け付けない。貸出状態は貸出・返却でのみ変わる。
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub image_url: String,
}

/// 貸出リクエスト
///
/// 日付は文字列で受け取り、ハンドラーで`YYYY-MM-DD`としてパースする。
#[derive(Debug, Deserialize)]
pub struct BorrowBookRequest {
    pub book_id: Uuid,
    pub checkout_date: String,
    pub return_due_date: String,
}

/// 返却リクエスト（貸出IDか書籍IDのどちらか）
#[derive(Debug, Deserialize)]
pub struct ReturnBookRequest {
    pub borrowed_book_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
}

impl ReturnBookRequest {
    /// 貸出IDを優先する。どちらも無ければ`None`。
    pub fn lookup(&self) -> Option<LoanLookup> {
        match (self.borrowed_book_id, self.book_id) {
            (Some(loan_id), _) => Some(LoanLookup::ByLoanId(LoanId::from_uuid(loan_id))),
            (None, Some(book_id)) => Some(LoanLookup::ByBookId(BookId::from_uuid(book_id))),
            (None, None) => None,
        }
    }
}

/// お気に入り追加リクエスト
#[derive(Debug, Deserialize)]
pub struct AddToWishListRequest {
    pub book_id: Uuid,
}

/// ページングのクエリパラメータ（`?page=&perPage=`）
///
/// 数値として読めない値や0以下は無視して既定値を使う。
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    #[serde(default, deserialize_with = "lenient_positive")]
    pub page: Option<u32>,
    #[serde(default, rename = "perPage", deserialize_with = "lenient_positive")]
    pub per_page: Option<u32>,
}

impl PaginationQuery {
    pub fn to_request(&self, default_per_page: u32) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.per_page.unwrap_or(default_per_page),
        )
    }
}

fn lenient_positive<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0))
}

// ============================================================================
// Responses
// ============================================================================

/// メッセージのみのレスポンス
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<UserSummary> for UserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.user_id.value(),
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl From<IssuedToken> for AuthResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
            user: issued.user.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookOwnerResponse {
    pub id: Uuid,
    pub name: String,
}

/// カタログの1行
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub loanable: bool,
    pub is_wishlisted: bool,
    pub user: BookOwnerResponse,
}

impl From<CatalogEntry> for BookResponse {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.book.book_id.value(),
            title: entry.book.title,
            image_url: entry.book.image_url,
            loanable: entry.loanable,
            is_wishlisted: entry.is_wishlisted,
            user: BookOwnerResponse {
                id: entry.owner.user_id.value(),
                name: entry.owner.name,
            },
        }
    }
}

/// カタログ一覧（GET /api/books）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListResponse {
    pub books: Vec<BookResponse>,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u32,
    pub total: u64,
}

impl From<Page<CatalogEntry>> for BookListResponse {
    fn from(page: Page<CatalogEntry>) -> Self {
        let page = page.map(BookResponse::from);
        Self {
            books: page.items,
            current_page: page.current_page,
            last_page: page.last_page,
            per_page: page.per_page,
            total: page.total,
        }
    }
}

/// 登録・更新後の書籍
#[derive(Debug, Serialize)]
pub struct SavedBookResponse {
    pub message: String,
    pub book: SavedBook,
}

#[derive(Debug, Serialize)]
pub struct SavedBook {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub loanable: bool,
    pub user_id: Uuid,
}

impl From<crate::domain::Book> for SavedBook {
    fn from(book: crate::domain::Book) -> Self {
        Self {
            id: book.book_id.value(),
            title: book.title,
            image_url: book.image_url,
            loanable: book.loanable,
            user_id: book.owner_id.value(),
        }
    }
}

/// 貸出レコード
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub checkout_date: String,
    pub return_due_date: String,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.loan_id.value(),
            user_id: loan.borrower_id.value(),
            book_id: loan.book_id.value(),
            checkout_date: loan.checkout_date.format(DATE_FORMAT).to_string(),
            return_due_date: loan.due_date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// 貸出完了（POST /api/books/borrow）
#[derive(Debug, Serialize)]
pub struct BorrowBookResponse {
    pub message: String,
    pub borrowed_book: LoanResponse,
}

/// 利用者の貸出一覧の1行
#[derive(Debug, Serialize)]
pub struct BorrowedBookResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub checkout_date: String,
    pub return_due_date: String,
}

impl From<ActiveLoan> for BorrowedBookResponse {
    fn from(active: ActiveLoan) -> Self {
        Self {
            id: active.loan.loan_id.value(),
            book_id: active.book.book_id.value(),
            title: active.book.title,
            image_url: active.book.image_url,
            checkout_date: active.loan.checkout_date.format(DATE_FORMAT).to_string(),
            return_due_date: active.loan.due_date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BorrowedBooksResponse {
    pub borrowed_books: Vec<BorrowedBookResponse>,
}

/// お気に入りの1件
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListResponse {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
}

impl From<BookDisplay> for WishListResponse {
    fn from(book: BookDisplay) -> Self {
        Self {
            id: book.book_id.value(),
            title: book.title,
            image_url: book.image_url,
        }
    }
}

/// お気に入り追加（POST /api/books/wish-list）
#[derive(Debug, Serialize)]
pub struct AddToWishListResponse {
    pub message: String,
    pub wish_list: WishListResponse,
}

impl From<WishlistedBook> for AddToWishListResponse {
    fn from(added: WishlistedBook) -> Self {
        Self {
            message: "Added to wish list".to_string(),
            wish_list: added.book.into(),
        }
    }
}

/// お気に入り一覧（GET /api/books/wish-list）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListResponseWrapper {
    pub wish_list: Vec<WishListResponse>,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u32,
    pub total: u64,
}

impl From<Page<BookDisplay>> for WishListResponseWrapper {
    fn from(page: Page<BookDisplay>) -> Self {
        let page = page.map(WishListResponse::from);
        Self {
            wish_list: page.items,
            current_page: page.current_page,
            last_page: page.last_page,
            per_page: page.per_page,
            total: page.total,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        let date = parse_date("2024-06-01", "checkout_date").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("06/01/2024", "checkout_date").is_err());
        assert!(parse_date("2024-02-30", "checkout_date").is_err());
    }

    #[test]
    fn test_return_request_prefers_loan_id() {
        let loan_id = Uuid::new_v4();
        let request = ReturnBookRequest {
            borrowed_book_id: Some(loan_id),
            book_id: Some(Uuid::new_v4()),
        };
        assert_eq!(
            request.lookup(),
            Some(LoanLookup::ByLoanId(LoanId::from_uuid(loan_id)))
        );
    }

    #[test]
    fn test_return_request_without_ids_has_no_lookup() {
        let request = ReturnBookRequest {
            borrowed_book_id: None,
            book_id: None,
        };
        assert_eq!(request.lookup(), None);
    }

    #[test]
    fn test_pagination_query_ignores_invalid_values() {
        let query: PaginationQuery =
            serde_json::from_value(serde_json::json!({ "page": "abc", "perPage": "0" })).unwrap();
        let request = query.to_request(50);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 50);
    }

    #[test]
    fn test_pagination_query_reads_values() {
        let query: PaginationQuery =
            serde_json::from_value(serde_json::json!({ "page": "2", "perPage": "10" })).unwrap();
        let request = query.to_request(50);
        assert_eq!(request.page(), 2);
        assert_eq!(request.per_page(), 10);
    }
}
