//! Catalog HTTP Handlers
//!
//! Read-only JSON endpoints over the catalog:
//! - `GET /` - Greeting
//! - `GET /users` - All users
//! - `GET /books` - All books
//! - `GET /books/filter_by_genre/{genre}` - Books of one genre
//! - `GET /books/filter_by_sold/{sold}` - Top sellers
//! - `GET /books/filter_by_rating/{rating}` - Books rated at least `rating`
//! - `GET /books/show_list/{x}` - First `x` books
//!
//! Path parameters that don't parse as the expected type answer 404, the same
//! as a route that doesn't exist.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::{
    database::Database,
    error::ApiError,
    projection::{Projection, project_all},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// A single path segment coerced into `T`, rejecting with 404 when it doesn't parse
#[derive(Debug)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: FromStr + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;

        raw.parse().map(PathParam).map_err(|_| {
            debug!(segment = raw.as_str(), "Path parameter failed coercion");
            ApiError::NotFound
        })
    }
}

type JsonList = Result<Json<Vec<Projection>>, ApiError>;

async fn home() -> &'static str {
    "Hello there!"
}

/// All users, username and email only
async fn users(State(state): State<AppState>) -> JsonList {
    let users = state.db.list_users().await?;
    Ok(Json(project_all(&users)))
}

async fn books(State(state): State<AppState>) -> JsonList {
    let books = state.db.list_books().await?;
    Ok(Json(project_all(&books)))
}

async fn filter_by_genre(
    State(state): State<AppState>,
    PathParam(genre): PathParam<String>,
) -> JsonList {
    let books = state.db.books_by_genre(&genre).await?;
    debug!(genre = genre.as_str(), matches = books.len(), "Filtered by genre");
    Ok(Json(project_all(&books)))
}

async fn filter_by_sold(
    State(state): State<AppState>,
    PathParam(sold): PathParam<i64>,
) -> JsonList {
    let books = state.db.top_sold_books(sold).await?;
    Ok(Json(project_all(&books)))
}

async fn filter_by_rating(
    State(state): State<AppState>,
    PathParam(rating): PathParam<f64>,
) -> JsonList {
    // "inf" and "NaN" parse as f64 but aren't ratings
    if !rating.is_finite() {
        return Err(ApiError::NotFound);
    }

    let books = state.db.books_with_min_rating(rating).await?;
    debug!(rating, matches = books.len(), "Filtered by rating");
    Ok(Json(project_all(&books)))
}

async fn show_list(State(state): State<AppState>, PathParam(x): PathParam<i64>) -> JsonList {
    let books = state.db.first_books(x).await?;
    Ok(Json(project_all(&books)))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Build the catalog routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/users", get(users))
        .route("/books", get(books))
        .route("/books/filter_by_genre/{genre}", get(filter_by_genre))
        .route("/books/filter_by_sold/{sold}", get(filter_by_sold))
        .route("/books/filter_by_rating/{rating}", get(filter_by_rating))
        .route("/books/show_list/{x}", get(show_list))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}
