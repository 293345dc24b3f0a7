//! Database Infrastructure Layer
//!
//! Handles the SQLite connection, schema bootstrap, and the catalog queries.
//! Rows are mapped into [`crate::models`] entities before leaving this module.

use std::{ops::Deref, str::FromStr};

use chrono::NaiveDate;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::{debug, info};

use crate::models::{Author, Book, NewAuthor, NewBook, NewReview, NewUser, Review, User};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("Database query error: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Database row for the books table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub isbn: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub genre: String,
    pub publisher: Option<String>,
    pub year_published: Option<NaiveDate>,
    pub copies_sold: Option<i64>,
    pub avg_rating: Option<i64>,
    pub author_id: Option<i64>,
}

/// Database row for the authors table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthorRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub biography: Option<String>,
    pub publisher: Option<String>,
}

/// Database row for the users table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub home_address: Option<String>,
}

/// Database row for the reviews table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub rating: i64,
    pub date_posted: NaiveDate,
    pub comment: Option<String>,
    pub book_id: i64,
    pub user_id: i64,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Deref for Database {
    type Target = SqlitePool;
    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let database_config = SqliteConnectOptions::from_str(database_url)
            .map_err(DatabaseError::Connection)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_lazy_with(database_config);

        let db = Self { pool };
        db.initialize_tables().await?;

        info!("Database initialized at {}", database_url);
        Ok(db)
    }

    /// Private in-memory database, mostly for tests.
    ///
    /// Pinned to a single connection that never expires, since every new
    /// connection to `sqlite::memory:` opens a fresh empty database.
    pub async fn new_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(DatabaseError::Connection)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(DatabaseError::Connection)?;

        let db = Self { pool };
        db.initialize_tables().await?;
        Ok(db)
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }

    async fn initialize_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS authors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                biography TEXT UNIQUE,
                publisher TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                isbn TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL UNIQUE,
                description TEXT UNIQUE,
                price INTEGER NOT NULL,
                genre TEXT NOT NULL,
                publisher TEXT,
                year_published TEXT,
                copies_sold INTEGER,
                avg_rating INTEGER,
                author_id INTEGER,
                FOREIGN KEY (author_id) REFERENCES authors(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Password length cap is part of the data model, weak as it is.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL UNIQUE CHECK (length(password) <= 8),
                email TEXT UNIQUE,
                name TEXT UNIQUE,
                home_address TEXT UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rating INTEGER NOT NULL,
                date_posted TEXT NOT NULL DEFAULT CURRENT_DATE,
                comment TEXT,
                book_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY (book_id) REFERENCES books(id),
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_genre ON books(genre)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_book_id ON reviews(book_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_user_id ON reviews(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ========== User Operations ==========

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, email, name, home_address
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, email, name, home_address)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.home_address)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    // ========== Book Operations ==========

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, isbn, name, description, price, genre, publisher,
                   year_published, copies_sold, avg_rating, author_id
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Books whose genre matches exactly (case-sensitive)
    pub async fn books_by_genre(&self, genre: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, isbn, name, description, price, genre, publisher,
                   year_published, copies_sold, avg_rating, author_id
            FROM books
            WHERE genre = ?
            ORDER BY id
            "#,
        )
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Up to `limit` best sellers, highest copies sold first.
    ///
    /// Ties keep storage order and books without a sales figure sort last.
    pub async fn top_sold_books(&self, limit: i64) -> Result<Vec<Book>> {
        // SQLite treats a negative LIMIT as "no limit"
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, isbn, name, description, price, genre, publisher,
                   year_published, copies_sold, avg_rating, author_id
            FROM books
            ORDER BY copies_sold IS NULL, copies_sold DESC, id
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Books rated at least `rating`. Unrated books never match.
    pub async fn books_with_min_rating(&self, rating: f64) -> Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, isbn, name, description, price, genre, publisher,
                   year_published, copies_sold, avg_rating, author_id
            FROM books
            WHERE avg_rating IS NOT NULL AND avg_rating >= ?
            ORDER BY id
            "#,
        )
        .bind(rating)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// The first `limit` books in storage order
    pub async fn first_books(&self, limit: i64) -> Result<Vec<Book>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, isbn, name, description, price, genre, publisher,
                   year_published, copies_sold, avg_rating, author_id
            FROM books
            ORDER BY id
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, isbn, name, description, price, genre, publisher,
                   year_published, copies_sold, avg_rating, author_id
            FROM books
            WHERE author_id = ?
            ORDER BY id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn create_book(&self, book: &NewBook) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (
                isbn, name, description, price, genre, publisher,
                year_published, copies_sold, avg_rating, author_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.name)
        .bind(&book.description)
        .bind(book.price)
        .bind(&book.genre)
        .bind(&book.publisher)
        .bind(book.year_published)
        .bind(book.copies_sold)
        .bind(book.avg_rating)
        .bind(book.author_id)
        .execute(&self.pool)
        .await?;

        debug!(isbn = book.isbn.as_str(), "Book stored");
        Ok(result.last_insert_rowid())
    }

    // ========== Author Operations ==========

    pub async fn get_author(&self, id: i64) -> Result<Author> {
        sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, first_name, last_name, biography, publisher
            FROM authors
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map(Author::from)
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                DatabaseError::NotFound(format!("Author with id {} not found", id))
            }
            e => DatabaseError::Query(e),
        })
    }

    pub async fn create_author(&self, author: &NewAuthor) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO authors (first_name, last_name, biography, publisher)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.biography)
        .bind(&author.publisher)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    // ========== Review Operations ==========

    pub async fn reviews_for_book(&self, book_id: i64) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, rating, date_posted, comment, book_id, user_id
            FROM reviews
            WHERE book_id = ?
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn reviews_by_user(&self, user_id: i64) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, rating, date_posted, comment, book_id, user_id
            FROM reviews
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn create_review(&self, review: &NewReview) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO reviews (rating, date_posted, comment, book_id, user_id)
            VALUES (?, COALESCE(?, CURRENT_DATE), ?, ?, ?)
            "#,
        )
        .bind(review.rating)
        .bind(review.date_posted)
        .bind(&review.comment)
        .bind(review.book_id)
        .bind(review.user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
