//! Borrow and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow::{BorrowDetails, BorrowRecord, BorrowRequest, BorrowResponse, ReturnReceipt, ReturnRequest},
};

use super::AuthenticatedUser;

/// Borrow copies of a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrows",
    security(("session_token" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Borrow record created", body = BorrowResponse),
        (status = 400, description = "Invalid quantity or insufficient stock"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrators cannot borrow books"),
        (status = 404, description = "Book or user not found")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let response = state
        .services
        .lending
        .borrow_book(&claims, request.book_id, request.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List all borrow records
#[utoipa::path(
    get,
    path = "/borrow",
    tag = "borrows",
    security(("session_token" = [])),
    responses(
        (status = 200, description = "All borrow records", body = Vec<BorrowRecord>),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "No borrow records found")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let records = state.services.lending.list_borrow_records(&claims).await?;
    Ok(Json(records))
}

/// Get a borrow record with resolved user and book references
#[utoipa::path(
    get,
    path = "/borrow/{id}",
    tag = "borrows",
    security(("session_token" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow record details", body = BorrowDetails),
        (status = 400, description = "Malformed borrow ID"),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn get_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowDetails>> {
    let details = state.services.lending.get_borrow_record(id).await?;
    Ok(Json(details))
}

/// Return copies against a borrow record
#[utoipa::path(
    put,
    path = "/borrow/return/{id}",
    tag = "borrows",
    security(("session_token" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Return receipt with full/partial outcome", body = ReturnReceipt),
        (status = 400, description = "Invalid quantity, excess return, or already returned"),
        (status = 403, description = "Administrators cannot return books"),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<ReturnReceipt>> {
    let receipt = state
        .services
        .lending
        .return_book(&claims, id, request.quantity)
        .await?;

    Ok(Json(receipt))
}
