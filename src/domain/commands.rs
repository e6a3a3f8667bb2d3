use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, LoanLookup, UserId};

/// コマンド：書籍を借りる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowBook {
    pub borrower_id: UserId,
    pub book_id: BookId,
    pub checkout_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnBook {
    pub target: LoanLookup,
}

/// コマンド：書籍を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub owner_id: UserId,
    pub title: String,
    pub image_url: String,
}

/// コマンド：書籍の表示項目を更新する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub title: String,
    pub image_url: String,
}

/// コマンド：利用者登録
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}
