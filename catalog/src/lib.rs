mod config;
mod database;
mod error;
mod models;
mod projection;
mod web;

pub use config::Config;
pub use database::{Database, DatabaseError};
pub use error::ApiError;
pub use models::{Author, Book, NewAuthor, NewBook, NewReview, NewUser, Review, User};
pub use projection::{BOOK_FIELDS, Projectable, Projection, USER_FIELDS, project, project_all};
pub use web::{AppState, PathParam, routes};
