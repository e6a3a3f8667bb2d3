use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{
    AppState, add_to_wish_list, borrow_book, borrowed_books, create_book, delete_book,
    health_check, list_books, list_users, login, logout, register, remove_from_wish_list,
    return_book, root, update_book, wish_list,
};

/// ルーターのミドルウェア設定
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// CORSで許可するオリジン。空なら許可しない。
    pub allowed_origins: Vec<HeaderValue>,
    pub request_timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// APIルーターを作成する
///
/// 公開：
/// - GET / , GET /health
/// - POST /api/register, POST /api/login
///
/// 要認証（Bearerトークン）：
/// - POST /api/logout, GET /api/users
/// - GET/POST /api/books, PUT/DELETE /api/books/:id
/// - POST /api/books/borrow, POST /api/books/return, GET /api/books/borrowed
/// - GET/POST /api/books/wish-list, DELETE /api/books/wish-list/:book_id
pub fn create_router(state: Arc<AppState>, options: RouterOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(options.allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60));

    let api = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/users", get(list_users))
        .route("/books", get(list_books).post(create_book))
        // 固定パスは:idより先に解決される
        .route("/books/borrow", post(borrow_book))
        .route("/books/return", post(return_book))
        .route("/books/borrowed", get(borrowed_books))
        .route("/books/wish-list", get(wish_list).post(add_to_wish_list))
        .route("/books/wish-list/:book_id", delete(remove_from_wish_list))
        .route("/books/:id", put(update_book).delete(delete_book));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    options.request_timeout,
                ))
                .layer(cors),
        )
        .with_state(state)
}
