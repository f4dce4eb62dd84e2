//! End-to-end tests for the Wayfarer HTTP API
//!
//! Drives the assembled router (public + admin) against an in-memory
//! database seeded with the demo catalog, the way the deployed binary
//! serves it.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use wayfarer::api::AppState;
use wayfarer::cache::CatalogCache;
use wayfarer::email::LogNotifier;
use wayfarer::form::TourDraft;
use wayfarer::models::Difficulty;
use wayfarer::seed;
use wayfarer::store::Db;
use wayfarer::web;
use wayfarer::WayfarerConfig;

const ADMIN_TOKEN: &str = "integration-test-admin-token";

async fn test_app() -> (Router, tempfile::TempDir) {
    let db = Db::connect_in_memory().await.unwrap();
    db.migrate().await.unwrap();
    seed::run(&db).await.unwrap();

    let cache_dir = tempfile::tempdir().unwrap();
    let cache = CatalogCache::open(
        cache_dir.path().join("cache"),
        std::time::Duration::from_secs(60),
    )
    .unwrap();

    let mut config = WayfarerConfig::default();
    config.admin.token = Some(ADMIN_TOKEN.to_string());
    config.validate().unwrap();

    let state = AppState {
        db,
        cache,
        notifier: Arc::new(LogNotifier),
        config: Arc::new(config.clone()),
    };
    (web::app(&config, state), cache_dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_tour_listing_and_detail() {
    let (app, _cache_dir) = test_app().await;

    let (status, body) = send(&app, get("/api/tours")).await;
    assert_eq!(status, StatusCode::OK);
    let tours = body.as_array().unwrap();
    assert_eq!(tours.len(), 3);
    // Second request is served from the listing cache and stays identical
    let (status, cached) = send(&app, get("/api/tours")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached.as_array().unwrap().len(), 3);

    let (status, detail) = send(
        &app,
        get("/api/tours/annapurna-base-camp-trek?currency=eur&locale=de"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["slug"], "annapurna-base-camp-trek");
    // Authored EUR price, not a conversion
    assert_eq!(detail["price"], json!(1290.0));
    assert_eq!(detail["currency"], "eur");
    assert_eq!(detail["difficulty_label"], "Anspruchsvoll");
    assert_eq!(detail["itinerary"].as_array().unwrap().len(), 3);

    let (status, error) = send(&app, get("/api/tours/no-such-tour")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_tour_listing_filters() {
    let (app, _cache_dir) = test_app().await;

    let (status, body) = send(&app, get("/api/tours?difficulty=easy")).await;
    assert_eq!(status, StatusCode::OK);
    let tours = body.as_array().unwrap();
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0]["slug"], "sahara-desert-expedition");

    let (status, body) = send(&app, get("/api/tours?country=Iceland&month=june")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/api/tours?month=december")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_blog_and_pages() {
    let (app, _cache_dir) = test_app().await;

    let (status, posts) = send(&app, get("/api/posts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 2);

    let slug = posts[0]["slug"].as_str().unwrap().to_string();
    let (status, post) = send(&app, get(&format!("/api/posts/{slug}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(post["body"].as_str().unwrap().contains("<p>"));

    let (status, page) = send(&app, get("/api/pages/privacy-policy")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["title"], "Privacy Policy");

    let (status, _) = send(&app, get("/api/pages/imprint")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_requires_token() {
    let (app, _cache_dir) = test_app().await;

    let (status, error) = send(&app, get("/api/admin/tours")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(error["error"].as_str().unwrap().contains("admin token"));

    let wrong = Request::builder()
        .uri("/api/admin/tours")
        .header(header::AUTHORIZATION, "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, tours) = send(&app, admin_json("GET", "/api/admin/tours", &Value::Null)).await;
    assert_eq!(status, StatusCode::OK);
    // Admin sees drafts too; the seed catalog is all published
    assert_eq!(tours.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_admin_create_update_delete_tour() {
    let (app, _cache_dir) = test_app().await;

    // Author a new tour exactly as the admin form would
    let mut draft = TourDraft::new();
    draft.title = "Dolomites Alta Via".to_string();
    draft.price_usd = "1750".to_string();
    draft.duration_days = "8".to_string();
    draft.country = "Italy".to_string();
    draft.country_code = "it".to_string();
    draft.city = "Bolzano".to_string();
    draft.difficulty = Difficulty::Challenging;
    let payload = serde_json::to_value(draft.serialize().unwrap()).unwrap();

    let (status, created) = send(&app, admin_json("POST", "/api/admin/tours", &payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "dolomites-alta-via");
    let id = created["id"].as_i64().unwrap();

    // Unpublished: invisible publicly, visible to admin
    let (status, _) = send(&app, get("/api/tours/dolomites-alta-via")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Publish through the edit cycle
    draft.published = true;
    let payload = serde_json::to_value(draft.serialize().unwrap()).unwrap();
    let (status, updated) =
        send(&app, admin_json("PUT", &format!("/api/admin/tours/{id}"), &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["published"], json!(true));

    let (status, listing) = send(&app, get("/api/tours")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 4, "cache was invalidated");

    // Duplicate slug rejected as a validation error
    let (status, error) = send(&app, admin_json("POST", "/api/admin/tours", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("slug"));

    // Malformed payload rejected before touching the database
    let mut bad = payload.clone();
    bad["itinerary"] = json!("[not json");
    let (status, _) = send(&app, admin_json("POST", "/api/admin/tours", &bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/admin/tours/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, listing) = send(&app, get("/api/tours")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_contact_form_validation_and_submit() {
    let (app, _cache_dir) = test_app().await;

    let invalid = json!({
        "name": "Ada",
        "email": "not-an-email",
        "subject": "Hello",
        "message": "A long enough message body."
    });
    let (status, error) = send(&app, json_request("POST", "/api/contact", &invalid)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error["error"].as_str().unwrap().contains("email"));

    let valid = json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "subject": "Group discount",
        "message": "There are six of us interested in the Sahara trip."
    });
    let (status, message) = send(&app, json_request("POST", "/api/contact", &valid)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["subject"], "Group discount");
}

#[tokio::test]
async fn test_newsletter_subscribe_and_unsubscribe() {
    let (app, _cache_dir) = test_app().await;

    let (status, subscriber) = send(
        &app,
        json_request("POST", "/api/newsletter", &json!({"email": "Ada@Example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscriber["email"], "ada@example.com");
    assert_eq!(subscriber["active"], json!(true));

    let unsubscribe = Request::builder()
        .method("DELETE")
        .uri("/api/newsletter/ada@example.com")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, unsubscribe).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let unknown = Request::builder()
        .method("DELETE")
        .uri("/api/newsletter/ghost@example.com")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, unknown).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_flow_and_dashboard() {
    let (app, _cache_dir) = test_app().await;

    let request = json!({
        "tour_slug": "sahara-desert-expedition",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "departure_date": "2026-10-12",
        "travelers": 2,
        "currency": "eur"
    });
    let (status, booking) = send(&app, json_request("POST", "/api/bookings", &request)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(booking["reference"].as_str().unwrap().starts_with("WF-"));
    assert_eq!(booking["status"], "pending");
    // Authored EUR price 905 x 2 travelers
    assert_eq!(booking["total_price"], json!(1810.0));
    assert_eq!(booking["tour_title"], "Sahara Desert Expedition");
    let id = booking["id"].as_i64().unwrap();

    // Zero travelers is rejected up front
    let mut invalid = request.clone();
    invalid["travelers"] = json!(0);
    let (status, _) = send(&app, json_request("POST", "/api/bookings", &invalid)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Unknown tours cannot be booked
    let mut unknown = request.clone();
    unknown["tour_slug"] = json!("atlantis-cruise");
    let (status, _) = send(&app, json_request("POST", "/api/bookings", &unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Customer dashboard lists the booking
    let (status, dashboard) = send(&app, get("/api/bookings?email=ada@example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard.as_array().unwrap().len(), 1);

    // Admin confirms it
    let (status, confirmed) = send(
        &app,
        admin_json(
            "PUT",
            &format!("/api/admin/bookings/{id}/status"),
            &json!({"status": "confirmed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");
}

#[tokio::test]
async fn test_admin_page_upsert() {
    let (app, _cache_dir) = test_app().await;

    let (status, page) = send(
        &app,
        admin_json(
            "PUT",
            "/api/admin/pages/imprint",
            &json!({"title": "Imprint", "body": "Wayfarer Travel Ltd."}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["slug"], "imprint");

    let (status, fetched) = send(&app, get("/api/pages/imprint")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["body"], "Wayfarer Travel Ltd.");

    let (status, _) = send(
        &app,
        admin_json(
            "PUT",
            "/api/admin/pages/Not-A-Slug",
            &json!({"title": "Bad", "body": "x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
