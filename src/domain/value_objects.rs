use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::LoanPeriodError;

/// 貸出ID - 貸出台帳のレコードID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 書籍ID - カタログのレコードID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 利用者ID - 認証済みプリンシパルの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 貸出期間
///
/// 不変条件：貸出日 <= 返却予定日
/// 逆転した期間は型として構築できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPeriod {
    checkout_date: NaiveDate,
    due_date: NaiveDate,
}

impl LoanPeriod {
    /// # エラー
    /// 返却予定日が貸出日より前の場合は`LoanPeriodError::DueBeforeCheckout`を返す
    pub fn new(checkout_date: NaiveDate, due_date: NaiveDate) -> Result<Self, LoanPeriodError> {
        if due_date < checkout_date {
            return Err(LoanPeriodError::DueBeforeCheckout {
                checkout_date,
                due_date,
            });
        }
        Ok(Self {
            checkout_date,
            due_date,
        })
    }

    pub fn checkout_date(&self) -> NaiveDate {
        self.checkout_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_loan_period_accepts_ordered_dates() {
        let period = LoanPeriod::new(date("2024-01-01"), date("2024-01-15")).unwrap();
        assert_eq!(period.checkout_date(), date("2024-01-01"));
        assert_eq!(period.due_date(), date("2024-01-15"));
    }

    #[test]
    fn test_loan_period_accepts_same_day_return() {
        let result = LoanPeriod::new(date("2024-01-01"), date("2024-01-01"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_loan_period_rejects_inverted_range() {
        let result = LoanPeriod::new(date("2024-01-15"), date("2024-01-01"));
        assert_eq!(
            result.unwrap_err(),
            LoanPeriodError::DueBeforeCheckout {
                checkout_date: date("2024-01-15"),
                due_date: date("2024-01-01"),
            }
        );
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(LoanId::new(), LoanId::new());
        assert_ne!(BookId::new(), BookId::new());
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn test_book_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = BookId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
