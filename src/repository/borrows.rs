//! Borrows repository for database operations
//!
//! Stock arithmetic lives here: every borrow and return runs in a single
//! transaction with a row lock on the contended row, and the UPDATE statements
//! re-assert their precondition (`stock >= q`, `quantity >= q`) so the counts
//! can never go negative even without the lock.

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BookRef, BorrowDetails, BorrowRecord, BorrowerRef},
        user::User,
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// List all borrow records, newest first
    pub async fn list(&self) -> AppResult<Vec<BorrowRecord>> {
        let records =
            sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrows ORDER BY borrow_date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(records)
    }

    /// Create a borrow record and decrement the book's stock in one
    /// transaction. Returns the record and the book's remaining stock.
    pub async fn borrow(
        &self,
        user: &User,
        book_id: i32,
        quantity: i32,
    ) -> AppResult<(BorrowRecord, i32)> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent borrows of the same book.
        let stock: i32 = sqlx::query_scalar("SELECT stock FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        if stock < quantity {
            return Err(AppError::InsufficientStock {
                available: stock,
                requested: quantity,
            });
        }

        let remaining: i32 = sqlx::query_scalar(
            r#"
            UPDATE books
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2
            RETURNING stock
            "#,
        )
        .bind(book_id)
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::InsufficientStock {
            available: stock,
            requested: quantity,
        })?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrows (user_id, user_name, book_id, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(book_id)
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((record, remaining))
    }

    /// Decrement a record's outstanding quantity and put the copies back into
    /// the book's stock in one transaction. Marks the record returned and
    /// stamps the return date when the outstanding quantity reaches zero.
    /// Returns the updated record and the book's new stock.
    pub async fn return_quantity(
        &self,
        borrow_id: i32,
        quantity: i32,
    ) -> AppResult<(BorrowRecord, i32)> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrows WHERE id = $1 FOR UPDATE",
        )
        .bind(borrow_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Borrow record with id {} not found", borrow_id))
        })?;

        if record.returned || record.quantity == 0 {
            return Err(AppError::AlreadyReturned);
        }
        if quantity > record.quantity {
            return Err(AppError::ExcessReturn {
                outstanding: record.quantity,
                requested: quantity,
            });
        }

        let updated = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrows
            SET quantity = quantity - $2,
                returned = (quantity - $2 = 0),
                return_date = CASE WHEN quantity - $2 = 0 THEN NOW() ELSE return_date END
            WHERE id = $1 AND quantity >= $2
            RETURNING *
            "#,
        )
        .bind(borrow_id)
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::ExcessReturn {
            outstanding: record.quantity,
            requested: quantity,
        })?;

        let remaining: i32 = sqlx::query_scalar(
            r#"
            UPDATE books
            SET stock = stock + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING stock
            "#,
        )
        .bind(record.book_id)
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Book with id {} no longer exists", record.book_id))
        })?;

        tx.commit().await?;

        Ok((updated, remaining))
    }

    /// Get a borrow record with resolved user and book references. The user
    /// name prefers the live profile and falls back to the snapshot captured
    /// at borrow time.
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowDetails> {
        let row = sqlx::query(
            r#"
            SELECT b.id, b.user_id, b.user_name, b.book_id, b.quantity,
                   b.borrow_date, b.return_date, b.returned,
                   u.name AS live_user_name, bk.title AS book_title
            FROM borrows b
            LEFT JOIN users u ON u.id = b.user_id
            LEFT JOIN books bk ON bk.id = b.book_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))?;

        let snapshot_name: String = row.get("user_name");
        let live_name: Option<String> = row.get("live_user_name");

        Ok(BorrowDetails {
            id: row.get("id"),
            user: BorrowerRef {
                id: row.get("user_id"),
                name: live_name.unwrap_or(snapshot_name),
            },
            book: BookRef {
                id: row.get("book_id"),
                title: row.get("book_title"),
            },
            quantity: row.get("quantity"),
            borrow_date: row.get("borrow_date"),
            return_date: row.get("return_date"),
            returned: row.get("returned"),
        })
    }
}
