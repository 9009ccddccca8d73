//! Lending engine: borrow/return state transitions and stock arithmetic

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowDetails, BorrowRecord, BorrowResponse, ReturnOutcome, ReturnReceipt},
        user::UserClaims,
    },
    policy::Action,
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow `quantity` copies of a book for the requesting user
    pub async fn borrow_book(
        &self,
        identity: &UserClaims,
        book_id: i32,
        quantity: i32,
    ) -> AppResult<BorrowResponse> {
        if quantity <= 0 {
            return Err(AppError::Validation(
                "Quantity must be a positive whole number".to_string(),
            ));
        }

        identity.authorize(Action::Borrow)?;

        // The live profile supplies the borrower-name snapshot.
        let user = self.repository.users.get_by_id(identity.user_id).await?;

        let (borrow, remaining_stock) =
            self.repository.borrows.borrow(&user, book_id, quantity).await?;

        tracing::info!(
            user_id = user.id,
            book_id,
            quantity,
            remaining_stock,
            "book borrowed"
        );

        Ok(BorrowResponse {
            borrow,
            remaining_stock,
        })
    }

    /// Return `quantity` copies against a borrow record
    pub async fn return_book(
        &self,
        identity: &UserClaims,
        borrow_id: i32,
        quantity: i32,
    ) -> AppResult<ReturnReceipt> {
        if quantity <= 0 {
            return Err(AppError::Validation(
                "Quantity must be a positive whole number".to_string(),
            ));
        }

        identity.authorize(Action::Borrow)?;

        // The requesting user must still exist.
        self.repository.users.get_by_id(identity.user_id).await?;

        let (record, remaining_stock) = self
            .repository
            .borrows
            .return_quantity(borrow_id, quantity)
            .await?;

        let outcome = ReturnOutcome::classify(record.quantity);

        tracing::info!(
            user_id = identity.user_id,
            borrow_id,
            quantity,
            outstanding = record.quantity,
            remaining_stock,
            ?outcome,
            "book returned"
        );

        Ok(ReturnReceipt {
            outcome,
            returned_quantity: quantity,
            outstanding: record.quantity,
            remaining_stock,
            return_date: record.return_date,
        })
    }

    /// List every borrow record (admin only)
    pub async fn list_borrow_records(&self, identity: &UserClaims) -> AppResult<Vec<BorrowRecord>> {
        identity.authorize(Action::ListBorrows)?;

        let records = self.repository.borrows.list().await?;
        if records.is_empty() {
            return Err(AppError::NotFound("No borrow records found".to_string()));
        }
        Ok(records)
    }

    /// Get a borrow record with resolved user and book references
    pub async fn get_borrow_record(&self, borrow_id: i32) -> AppResult<BorrowDetails> {
        self.repository.borrows.get_details(borrow_id).await
    }
}
