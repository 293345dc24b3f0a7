//! End-to-end tests for the catalog routes against an in-memory store.
//!
//! Requests go through the full router (extractors, fallback, error mapping)
//! via `tower::ServiceExt::oneshot`, no listener involved.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use catalog::{AppState, Database, NewBook, NewUser, routes};
use serde_json::{Value, json};
use tower::ServiceExt;

fn book(name: &str, genre: &str, copies_sold: Option<i64>, avg_rating: Option<i64>) -> NewBook {
    NewBook {
        isbn: format!("isbn-{}", name),
        name: name.to_string(),
        description: Some(format!("About {}", name)),
        price: 25,
        genre: genre.to_string(),
        publisher: Some("Tor".to_string()),
        copies_sold,
        avg_rating,
        ..Default::default()
    }
}

async fn app_with(books: &[NewBook]) -> (Router, Database) {
    let db = Database::new_in_memory().await.unwrap();
    for b in books {
        db.create_book(b).await.unwrap();
    }
    let app = routes().with_state(AppState::new(db.clone()));
    (app, db)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn names(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn home_returns_greeting() {
    let (app, _) = app_with(&[]).await;
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Hello there!");
}

#[tokio::test]
async fn books_are_projected() {
    let (app, _) = app_with(&[book("Dune", "Sci-Fi", Some(100), Some(5))]).await;
    let (status, body) = get_json(&app, "/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "name": "Dune",
            "isbn": "isbn-Dune",
            "genre": "Sci-Fi",
            "copies_sold": 100,
            "avg_rating": 5
        }])
    );
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let (app, _) = app_with(&[]).await;

    assert_eq!(get_json(&app, "/books").await, (StatusCode::OK, json!([])));
    assert_eq!(get_json(&app, "/users").await, (StatusCode::OK, json!([])));
}

#[tokio::test]
async fn users_expose_username_and_email_only() {
    let (app, db) = app_with(&[]).await;
    db.create_user(&NewUser {
        username: "leto".into(),
        password: "duke".into(),
        email: Some("leto@caladan.org".into()),
        home_address: Some("Castle Caladan".into()),
        ..Default::default()
    })
    .await
    .unwrap();

    let (status, body) = get_json(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "username": "leto", "email": "leto@caladan.org" }]));
}

#[tokio::test]
async fn filter_by_genre_matches_exactly() {
    let (app, _) = app_with(&[
        book("D", "Fantasy", None, None),
        book("E", "Sci-Fi", None, None),
    ])
    .await;

    let (status, body) = get_json(&app, "/books/filter_by_genre/Sci-Fi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["E"]);

    let (status, body) = get_json(&app, "/books/filter_by_genre/Horror").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn filter_by_genre_decodes_path_segment() {
    let (app, _) = app_with(&[book("Hyperion", "Science Fiction", None, None)]).await;
    let (_, body) = get_json(&app, "/books/filter_by_genre/Science%20Fiction").await;

    assert_eq!(names(&body), vec!["Hyperion"]);
}

#[tokio::test]
async fn filter_by_sold_returns_top_sellers() {
    let (app, _) = app_with(&[
        book("A", "Fiction", Some(100), None),
        book("B", "Fiction", Some(50), None),
        book("C", "Fiction", Some(200), None),
    ])
    .await;

    let (status, body) = get_json(&app, "/books/filter_by_sold/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["C", "A"]);

    let (_, body) = get_json(&app, "/books/filter_by_sold/0").await;
    assert_eq!(body, json!([]));

    let (_, body) = get_json(&app, "/books/filter_by_sold/-4").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn filter_by_sold_rejects_non_integers() {
    let (app, _) = app_with(&[book("A", "Fiction", Some(1), None)]).await;

    for uri in [
        "/books/filter_by_sold/abc",
        "/books/filter_by_sold/2.5",
        "/books/filter_by_sold/99999999999999999999",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "error": "Not found" }));
    }
}

#[tokio::test]
async fn filter_by_rating_accepts_floats() {
    let (app, _) = app_with(&[
        book("Low", "Fiction", None, Some(2)),
        book("High", "Fiction", None, Some(4)),
        book("Unrated", "Fiction", None, None),
    ])
    .await;

    let (status, body) = get_json(&app, "/books/filter_by_rating/3.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["High"]);

    let (_, body) = get_json(&app, "/books/filter_by_rating/2").await;
    assert_eq!(names(&body), vec!["Low", "High"]);
}

#[tokio::test]
async fn filter_by_rating_rejects_non_numbers() {
    let (app, _) = app_with(&[]).await;

    for uri in [
        "/books/filter_by_rating/good",
        "/books/filter_by_rating/NaN",
        "/books/filter_by_rating/inf",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn show_list_limits_in_storage_order() {
    let (app, _) = app_with(&[
        book("One", "Fiction", None, None),
        book("Two", "Fiction", None, None),
        book("Three", "Fiction", None, None),
    ])
    .await;

    let (_, body) = get_json(&app, "/books/show_list/2").await;
    assert_eq!(names(&body), vec!["One", "Two"]);

    let (_, body) = get_json(&app, "/books/show_list/10").await;
    assert_eq!(names(&body), vec!["One", "Two", "Three"]);

    let (_, body) = get_json(&app, "/books/show_list/-1").await;
    assert_eq!(body, json!([]));

    let (status, _) = get(&app, "/books/show_list/three").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (app, _) = app_with(&[]).await;

    let (status, body) = get_json(&app, "/authors").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));

    let (status, _) = get(&app, "/books/filter_by_sold").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn closed_store_is_a_server_error() {
    let (app, db) = app_with(&[book("A", "Fiction", None, None)]).await;
    db.close().await;

    let (status, body) = get_json(&app, "/books").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
}
