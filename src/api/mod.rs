//! Public HTTP API
//!
//! Everything the marketing site reads and the visitor-facing forms post
//! to. Admin authoring endpoints live in [`admin`] behind a bearer token.
//! Responses are plain JSON; errors arrive as `{"error": "..."}`.

pub mod admin;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cache::{CatalogCache, POSTS_KEY, TOURS_KEY};
use crate::config::WayfarerConfig;
use crate::currency::Currency;
use crate::email::Notifier;
use crate::error::ApiError;
use crate::i18n::Locale;
use crate::models::{
    Booking, ContactMessage, Difficulty, Month, NewsletterSubscriber, Page, PostSummary, Tour,
    TourSummary,
};
use crate::store::{booking_reference, Db, NewBooking, TourFilter};

/// Shared handler state; cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub cache: CatalogCache,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<WayfarerConfig>,
}

/// The full `/api` router, admin routes included
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tours", get(list_tours))
        .route("/tours/{slug}", get(get_tour))
        .route("/posts", get(list_posts))
        .route("/posts/{slug}", get(get_post))
        .route("/pages/{slug}", get(get_page))
        .route("/contact", post(submit_contact))
        .route("/newsletter", post(subscribe_newsletter))
        .route("/newsletter/{email}", delete(unsubscribe_newsletter))
        .route("/bookings", post(create_booking).get(list_bookings))
        .nest("/admin", admin::router(state.clone()))
        .with_state(state)
}

#[derive(Debug, Deserialize, Default)]
pub struct TourListQuery {
    pub difficulty: Option<Difficulty>,
    pub country: Option<String>,
    pub month: Option<Month>,
    pub currency: Option<Currency>,
    pub locale: Option<Locale>,
}

async fn list_tours(
    State(state): State<AppState>,
    Query(query): Query<TourListQuery>,
) -> Result<Json<Vec<TourSummary>>, ApiError> {
    let currency = query.currency.unwrap_or_default();
    let locale = query.locale.unwrap_or_default();
    // Only the default listing is cached; filtered views hit the database
    let cacheable = query.difficulty.is_none()
        && query.country.is_none()
        && query.month.is_none()
        && currency == Currency::Usd
        && locale == Locale::En;

    if cacheable {
        match state.cache.get::<Vec<TourSummary>>(TOURS_KEY).await {
            Ok(Some(cached)) => return Ok(Json(cached)),
            Ok(None) => {}
            Err(err) => tracing::warn!("tour listing cache read failed: {err:#}"),
        }
    }

    let filter = TourFilter {
        difficulty: query.difficulty,
        country: query.country.clone(),
        month: query.month,
    };
    let tours = state.db.list_tours(&filter).await?;
    let summaries: Vec<TourSummary> = tours.iter().map(|t| t.summary(currency, locale)).collect();

    if cacheable {
        if let Err(err) = state.cache.put(TOURS_KEY, summaries.clone()).await {
            tracing::warn!("tour listing cache write failed: {err:#}");
        }
    }
    Ok(Json(summaries))
}

#[derive(Debug, Deserialize, Default)]
pub struct DisplayQuery {
    pub currency: Option<Currency>,
    pub locale: Option<Locale>,
}

/// Tour detail: the full entity plus its price re-denominated for display
#[derive(Debug, Serialize)]
pub struct TourDetail {
    #[serde(flatten)]
    pub tour: Tour,
    pub price: f64,
    pub currency: String,
    pub difficulty_label: String,
}

async fn get_tour(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<DisplayQuery>,
) -> Result<Json<TourDetail>, ApiError> {
    let currency = query.currency.unwrap_or_default();
    let locale = query.locale.unwrap_or_default();
    let tour = state.db.get_tour_by_slug(&slug).await?;
    let price = tour.price_in(currency);
    let difficulty_label = tour.difficulty.label(locale);
    Ok(Json(TourDetail {
        price,
        currency: currency.code().to_string(),
        difficulty_label,
        tour,
    }))
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostSummary>>, ApiError> {
    match state.cache.get::<Vec<PostSummary>>(POSTS_KEY).await {
        Ok(Some(cached)) => return Ok(Json(cached)),
        Ok(None) => {}
        Err(err) => tracing::warn!("post listing cache read failed: {err:#}"),
    }

    let posts = state.db.list_posts().await?;
    let summaries: Vec<PostSummary> = posts.iter().map(crate::models::BlogPost::summary).collect();

    if let Err(err) = state.cache.put(POSTS_KEY, summaries.clone()).await {
        tracing::warn!("post listing cache write failed: {err:#}");
    }
    Ok(Json(summaries))
}

async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<crate::models::BlogPost>, ApiError> {
    Ok(Json(state.db.get_post_by_slug(&slug).await?))
}

async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Page>, ApiError> {
    Ok(Json(state.db.get_page(&slug).await?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 10, max = 5000))]
    pub message: String,
}

async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    request.validate()?;
    let message = state
        .db
        .insert_contact_message(&request.name, &request.email, &request.subject, &request.message)
        .await?;
    // The message is persisted either way; a mail failure is not the
    // visitor's problem
    if let Err(err) = state.notifier.contact_received(&message).await {
        tracing::warn!("contact notification failed: {err:#}");
    }
    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email)]
    pub email: String,
}

async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<NewsletterSubscriber>), ApiError> {
    request.validate()?;
    let subscriber = state.db.subscribe(&request.email).await?;
    if let Err(err) = state.notifier.newsletter_welcome(&subscriber.email).await {
        tracing::warn!("newsletter welcome failed: {err:#}");
    }
    Ok((StatusCode::CREATED, Json(subscriber)))
}

async fn unsubscribe_newsletter(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.db.unsubscribe(&email).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Subscriber not found"))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookingRequest {
    pub tour_slug: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub departure_date: NaiveDate,
    #[validate(range(min = 1, max = 40))]
    pub travelers: i64,
    pub currency: Option<Currency>,
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    request.validate()?;
    // Only published tours are bookable; drafts 404 like any public lookup
    let tour = state.db.get_tour_by_slug(&request.tour_slug).await?;

    let currency = request.currency.unwrap_or_default();
    let unit_price = tour.price_in(currency);
    let total_price = (unit_price * request.travelers as f64 * 100.0).round() / 100.0;

    let booking = state
        .db
        .create_booking(&NewBooking {
            reference: booking_reference(),
            tour_id: tour.id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            departure_date: request.departure_date,
            travelers: request.travelers,
            currency,
            total_price,
        })
        .await?;

    if let Err(err) = state.notifier.booking_confirmation(&booking, &tour).await {
        tracing::warn!("booking confirmation failed: {err:#}");
    }
    Ok((StatusCode::CREATED, Json(booking)))
}

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub email: String,
}

/// The customer dashboard view: bookings for one email address
async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.db.list_bookings_for_email(&query.email).await?))
}
