use crate::application::{
    ServiceDependencies,
    auth::{self, AuthSettings},
    catalog, lending, wishlist,
};
use crate::domain::{
    BookId,
    commands::{BorrowBook, CreateBook, RegisterUser, ReturnBook, UpdateBook},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    auth::AuthenticatedUser,
    error::ApiError,
    extract::{ApiJson, ApiPath},
    types::{
        AddToWishListRequest, AddToWishListResponse, AuthResponse, BookListResponse, BookRequest,
        BorrowBookRequest, BorrowBookResponse, BorrowedBookResponse, BorrowedBooksResponse,
        LoginRequest, MessageResponse, PaginationQuery, RegisterRequest, ReturnBookRequest,
        SavedBookResponse, UserResponse, UsersResponse, WishListResponseWrapper, parse_date,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
    pub auth: AuthSettings,
    /// `perPage`が指定されなかった場合の件数
    pub default_per_page: u32,
}

// ============================================================================
// Public endpoints
// ============================================================================

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the rusty library"))
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// POST /api/register - 利用者登録
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let cmd = RegisterUser {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let user = auth::register(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/login - ログインしてトークンを受け取る
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let issued = auth::login(&state.service_deps, &state.auth, &req.email, &req.password).await?;
    Ok(Json(issued.into()))
}

// ============================================================================
// Authenticated endpoints
// ============================================================================

/// POST /api/logout - 提示されたトークンを無効化する
pub async fn logout(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<MessageResponse>, ApiError> {
    auth::logout(&state.service_deps, &user.principal, &user.token).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = auth::list_users(&state.service_deps).await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/books - カタログ一覧
///
/// 各書籍に閲覧者のお気に入り状態を付けて返す。
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<BookListResponse>, ApiError> {
    let request = query.to_request(state.default_per_page);
    let page = catalog::list_catalog(&state.service_deps, user.principal.user_id, request).await?;
    Ok(Json(page.into()))
}

/// POST /api/books - 書籍を登録する（登録者は認証済み利用者）
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<SavedBookResponse>), ApiError> {
    let cmd = CreateBook {
        owner_id: user.principal.user_id,
        title: req.title,
        image_url: req.image_url,
    };

    let book = catalog::create_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedBookResponse {
            message: "Book created".to_string(),
            book: book.into(),
        }),
    ))
}

/// PUT /api/books/:id - タイトル・画像URLを更新する
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    ApiPath(book_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Json<SavedBookResponse>, ApiError> {
    let cmd = UpdateBook {
        book_id: BookId::from_uuid(book_id),
        title: req.title,
        image_url: req.image_url,
    };

    let book = catalog::update_book(&state.service_deps, cmd).await?;

    Ok(Json(SavedBookResponse {
        message: "Book updated".to_string(),
        book: book.into(),
    }))
}

/// DELETE /api/books/:id - 書籍を削除する（貸出中は409）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    ApiPath(book_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    catalog::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(MessageResponse::new("Book deleted")))
}

/// POST /api/books/borrow - 書籍を借りる
///
/// 借り手は常に認証済み利用者。日付は`YYYY-MM-DD`。
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<BorrowBookRequest>,
) -> Result<(StatusCode, Json<BorrowBookResponse>), ApiError> {
    let checkout_date =
        parse_date(&req.checkout_date, "checkout_date").map_err(ApiError::BadRequest)?;
    let due_date =
        parse_date(&req.return_due_date, "return_due_date").map_err(ApiError::BadRequest)?;

    let cmd = BorrowBook {
        borrower_id: user.principal.user_id,
        book_id: BookId::from_uuid(req.book_id),
        checkout_date,
        due_date,
    };

    let loan = lending::borrow_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowBookResponse {
            message: "Book borrowed".to_string(),
            borrowed_book: loan.into(),
        }),
    ))
}

/// POST /api/books/return - 書籍を返却する
///
/// `borrowed_book_id`（貸出ID）か`book_id`のどちらかを指定する。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    ApiJson(req): ApiJson<ReturnBookRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let target = req.lookup().ok_or_else(|| {
        ApiError::BadRequest("borrowed_book_id or book_id is required".to_string())
    })?;

    lending::return_book(&state.service_deps, ReturnBook { target }).await?;

    Ok(Json(MessageResponse::new("Book returned")))
}

/// GET /api/books/borrowed - 自分が借りている書籍
pub async fn borrowed_books(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<BorrowedBooksResponse>, ApiError> {
    let loans = lending::list_active_loans(&state.service_deps, user.principal.user_id).await?;
    Ok(Json(BorrowedBooksResponse {
        borrowed_books: loans.into_iter().map(BorrowedBookResponse::from).collect(),
    }))
}

/// POST /api/books/wish-list - お気に入りに追加する
pub async fn add_to_wish_list(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<AddToWishListRequest>,
) -> Result<(StatusCode, Json<AddToWishListResponse>), ApiError> {
    let added = wishlist::add_to_wishlist(
        &state.service_deps,
        user.principal.user_id,
        BookId::from_uuid(req.book_id),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(added.into())))
}

/// DELETE /api/books/wish-list/:book_id - お気に入りから削除する
pub async fn remove_from_wish_list(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiPath(book_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    wishlist::remove_from_wishlist(
        &state.service_deps,
        user.principal.user_id,
        BookId::from_uuid(book_id),
    )
    .await?;

    Ok(Json(MessageResponse::new("Removed from wish list")))
}

/// GET /api/books/wish-list - お気に入り一覧（新しい順）
pub async fn wish_list(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<WishListResponseWrapper>, ApiError> {
    let request = query.to_request(state.default_per_page);
    let page = wishlist::list_wishlist(&state.service_deps, user.principal.user_id, request).await?;
    Ok(Json(page.into()))
}
