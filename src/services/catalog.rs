//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    models::user::UserClaims,
    policy::Action,
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// List books by exact author match
    pub async fn list_books_by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        let books = self.repository.books.list_by_author(author).await?;
        if books.is_empty() {
            return Err(AppError::NotFound(format!(
                "No books found for author {}",
                author
            )));
        }
        Ok(books)
    }

    /// Create a new book (admin only), rejecting duplicate (title, author)
    pub async fn create_book(&self, identity: &UserClaims, book: CreateBook) -> AppResult<Book> {
        identity.authorize(Action::ManageCatalog)?;

        if self
            .repository
            .books
            .exists_by_title_author(&book.title, &book.author)
            .await?
        {
            return Err(AppError::Conflict(
                "A book with this title and author already exists".to_string(),
            ));
        }

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "book created");
        Ok(created)
    }

    /// Update an existing book (admin only, partial field merge)
    pub async fn update_book(
        &self,
        identity: &UserClaims,
        id: i32,
        book: UpdateBook,
    ) -> AppResult<Book> {
        identity.authorize(Action::ManageCatalog)?;
        self.repository.books.update(id, &book).await
    }

    /// Delete a book (admin only); refused while outstanding borrows
    /// reference it
    pub async fn delete_book(&self, identity: &UserClaims, id: i32) -> AppResult<()> {
        identity.authorize(Action::ManageCatalog)?;

        self.repository.books.get_by_id(id).await?;

        if self.repository.books.has_outstanding_borrows(id).await? {
            return Err(AppError::Conflict(
                "Book still has outstanding borrowed copies".to_string(),
            ));
        }

        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }
}
