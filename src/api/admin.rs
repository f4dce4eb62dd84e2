//! Admin authoring API
//!
//! Accepts exactly the submission serializer's payloads: POST creates,
//! PUT updates, DELETE removes (deletion is its own action, never part of
//! the form flow). Every write invalidates the catalog cache. All routes
//! sit behind a bearer token; without one configured the admin API is off.

use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Json, Response};
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;
use validator::Validate;

use super::AppState;
use crate::error::ApiError;
use crate::form::{
    decode_faqs, decode_itinerary, decode_months, decode_string_list, slugify, BlogPostPayload,
    TourPayload,
};
use crate::models::{BlogPost, Booking, BookingStatus, Page, Tour};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/tours", get(list_tours).post(create_tour))
        .route("/tours/{id}", put(update_tour).delete(delete_tour))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .route("/pages/{slug}", put(upsert_page))
        .route("/bookings/{id}/status", put(update_booking_status))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.admin.token.as_deref() else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Admin API is not configured",
        ));
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => Ok(next.run(request).await),
        _ => Err(ApiError::unauthorized("Invalid or missing admin token")),
    }
}

/// Server-side check of an inbound tour payload. The admin UI serializes
/// through the same rules, but the endpoint re-verifies: normalized slug,
/// non-negative prices, decodable collection columns.
fn validate_tour_payload(payload: &TourPayload) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    if payload.slug.is_empty() || slugify(&payload.slug) != payload.slug {
        return Err(ApiError::bad_request(
            "Slug must be lowercase, hyphen-separated, and non-empty",
        ));
    }
    for (field, value) in [
        ("price_usd", Some(payload.price_usd)),
        ("price_eur", payload.price_eur),
        ("price_gbp", payload.price_gbp),
        ("price_inr", payload.price_inr),
    ] {
        if let Some(price) = value {
            if !price.is_finite() || price < 0.0 {
                return Err(ApiError::bad_request(format!(
                    "Field '{field}' must be a non-negative number"
                )));
            }
        }
    }
    if payload.duration_days < 1 {
        return Err(ApiError::bad_request("Duration must be at least one day"));
    }
    decode_months(&payload.best_months)?;
    decode_string_list(&payload.highlights)?;
    decode_string_list(&payload.inclusions)?;
    decode_string_list(&payload.exclusions)?;
    decode_string_list(&payload.requirements)?;
    decode_itinerary(&payload.itinerary)?;
    decode_faqs(&payload.faqs)?;
    Ok(())
}

fn validate_post_payload(payload: &BlogPostPayload) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    if payload.slug.is_empty() || slugify(&payload.slug) != payload.slug {
        return Err(ApiError::bad_request(
            "Slug must be lowercase, hyphen-separated, and non-empty",
        ));
    }
    if payload.author.trim().is_empty() {
        return Err(ApiError::bad_request("Author is required"));
    }
    decode_string_list(&payload.tags)?;
    Ok(())
}

async fn invalidate_catalog(state: &AppState) {
    if let Err(err) = state.cache.invalidate_catalog().await {
        tracing::warn!("catalog cache invalidation failed: {err:#}");
    }
}

// ---- tours ----

/// Admin index: every tour, drafts included
async fn list_tours(State(state): State<AppState>) -> Result<Json<Vec<Tour>>, ApiError> {
    Ok(Json(state.db.list_all_tours().await?))
}

async fn create_tour(
    State(state): State<AppState>,
    Json(payload): Json<TourPayload>,
) -> Result<(StatusCode, Json<Tour>), ApiError> {
    validate_tour_payload(&payload)?;
    let tour = state.db.create_tour(&payload).await?;
    invalidate_catalog(&state).await;
    tracing::info!(slug = %tour.slug, id = tour.id, "tour created");
    Ok((StatusCode::CREATED, Json(tour)))
}

async fn update_tour(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TourPayload>,
) -> Result<Json<Tour>, ApiError> {
    validate_tour_payload(&payload)?;
    let tour = state.db.update_tour(id, &payload).await?;
    invalidate_catalog(&state).await;
    tracing::info!(slug = %tour.slug, id = tour.id, "tour updated");
    Ok(Json(tour))
}

async fn delete_tour(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_tour(id).await?;
    invalidate_catalog(&state).await;
    tracing::info!(id, "tour deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---- blog ----

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    Ok(Json(state.db.list_all_posts().await?))
}

async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<BlogPostPayload>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    validate_post_payload(&payload)?;
    let post = state.db.create_post(&payload).await?;
    invalidate_catalog(&state).await;
    tracing::info!(slug = %post.slug, id = post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BlogPostPayload>,
) -> Result<Json<BlogPost>, ApiError> {
    validate_post_payload(&payload)?;
    let post = state.db.update_post(id, &payload).await?;
    invalidate_catalog(&state).await;
    Ok(Json(post))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_post(id).await?;
    invalidate_catalog(&state).await;
    Ok(StatusCode::NO_CONTENT)
}

// ---- pages ----

#[derive(Debug, Deserialize, Validate)]
pub struct PageRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub body: String,
}

async fn upsert_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<PageRequest>,
) -> Result<Json<Page>, ApiError> {
    request.validate()?;
    if slug.is_empty() || slugify(&slug) != slug {
        return Err(ApiError::bad_request(
            "Page slug must be lowercase and hyphen-separated",
        ));
    }
    let page = state.db.upsert_page(&slug, &request.title, &request.body).await?;
    Ok(Json(page))
}

// ---- bookings ----

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
}

/// Confirm or cancel a booking after availability is checked
async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.db.update_booking_status(id, request.status).await?;
    tracing::info!(reference = %booking.reference, status = %booking.status, "booking status updated");
    Ok(Json(booking))
}
