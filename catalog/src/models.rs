//! Domain Models
//!
//! Catalog entities as handlers see them. Relationships are plain foreign-key
//! ids; follow them through the lookup helpers on [`crate::Database`].

use std::fmt;

use chrono::NaiveDate;

use crate::database::{AuthorRow, BookRow, ReviewRow, UserRow};

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub genre: String,
    pub publisher: Option<String>,
    pub year_published: Option<NaiveDate>,
    pub copies_sold: Option<i64>,
    /// Stored as written. Never recomputed from reviews.
    pub avg_rating: Option<i64>,
    pub author_id: Option<i64>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            isbn: row.isbn,
            name: row.name,
            description: row.description,
            price: row.price,
            genre: row.genre,
            publisher: row.publisher,
            year_published: row.year_published,
            copies_sold: row.copies_sold,
            avg_rating: row.avg_rating,
            author_id: row.author_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub biography: Option<String>,
    pub publisher: Option<String>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            biography: row.biography,
            publisher: row.publisher,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub home_address: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password: row.password,
            email: row.email,
            name: row.name,
            home_address: row.home_address,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i64,
    pub rating: i64,
    pub date_posted: NaiveDate,
    pub comment: Option<String>,
    pub book_id: i64,
    pub user_id: i64,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            rating: row.rating,
            date_posted: row.date_posted,
            comment: row.comment,
            book_id: row.book_id,
            user_id: row.user_id,
        }
    }
}

// Inputs for direct store writes

#[derive(Debug, Clone, Default)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub biography: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewBook {
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

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    /// At most 8 characters, enforced by the schema.
    pub password: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub home_address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewReview {
    pub rating: i64,
    /// Defaults to the current date when `None`.
    pub date_posted: Option<NaiveDate>,
    pub comment: Option<String>,
    pub book_id: i64,
    pub user_id: i64,
}
