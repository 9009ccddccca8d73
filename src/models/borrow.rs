//! Borrow (ledger) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrow record from database
///
/// `quantity` is the outstanding amount: it starts at the borrowed quantity
/// and is decremented by each return. `returned` flips to true and
/// `return_date` is stamped exactly when it reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    /// Borrower display name captured at creation; not kept in sync with
    /// later renames.
    pub user_name: String,
    pub book_id: i32,
    pub quantity: i32,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub returned: bool,
}

/// Borrow request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub book_id: i32,
    pub quantity: i32,
}

/// Return request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub quantity: i32,
}

/// Borrow response with the book's remaining stock
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowResponse {
    pub borrow: BorrowRecord,
    pub remaining_stock: i32,
}

/// Classification of a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReturnOutcome {
    Full,
    Partial,
}

impl ReturnOutcome {
    /// Classify by the outstanding quantity left after the return
    pub fn classify(outstanding: i32) -> Self {
        if outstanding == 0 {
            ReturnOutcome::Full
        } else {
            ReturnOutcome::Partial
        }
    }
}

/// Return receipt
#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnReceipt {
    pub outcome: ReturnOutcome,
    pub returned_quantity: i32,
    /// Quantity still outstanding on the record after this return
    pub outstanding: i32,
    /// Book stock after the returned copies were added back
    pub remaining_stock: i32,
    pub return_date: Option<DateTime<Utc>>,
}

/// Borrower reference resolved for display
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowerRef {
    pub id: i32,
    pub name: String,
}

/// Book reference resolved for display; `title` is absent when the book has
/// been deleted after the record was fully returned.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookRef {
    pub id: i32,
    pub title: Option<String>,
}

/// Borrow record with resolved user and book references
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub user: BorrowerRef,
    pub book: BookRef,
    pub quantity: i32,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub returned: bool,
}
