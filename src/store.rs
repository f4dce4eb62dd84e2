//! Persistence layer over SQLite
//!
//! Ordered collections (highlights, itinerary, FAQs, tags, months) live in
//! TEXT columns holding the submission serializer's JSON strings; decoding
//! rows back into domain types goes through the form module's round-trip
//! helpers. Slug and email uniqueness are enforced by unique indexes and
//! surfaced as validation errors.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rand::RngExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::config::DatabaseConfig;
use crate::currency::Currency;
use crate::form::{
    decode_faqs, decode_itinerary, decode_months, decode_string_list, BlogPostPayload, TourPayload,
};
use crate::models::{
    BlogPost, Booking, BookingStatus, ContactMessage, Difficulty, Month, NewsletterSubscriber,
    Page, Tour,
};
use crate::{Result, WayfarerError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tours (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price_usd REAL NOT NULL,
    price_eur REAL,
    price_gbp REAL,
    price_inr REAL,
    duration_days INTEGER NOT NULL,
    country TEXT NOT NULL,
    country_code TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    latitude REAL,
    longitude REAL,
    difficulty TEXT NOT NULL DEFAULT 'moderate',
    group_size_min INTEGER,
    group_size_max INTEGER,
    min_age INTEGER,
    accommodation TEXT,
    meal_plan TEXT,
    best_months TEXT NOT NULL DEFAULT '[]',
    highlights TEXT NOT NULL DEFAULT '[]',
    inclusions TEXT NOT NULL DEFAULT '[]',
    exclusions TEXT NOT NULL DEFAULT '[]',
    requirements TEXT NOT NULL DEFAULT '[]',
    itinerary TEXT NOT NULL DEFAULT '[]',
    faqs TEXT NOT NULL DEFAULT '[]',
    published INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_tours_slug ON tours(slug);

CREATE TABLE IF NOT EXISTS blog_posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    excerpt TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT '',
    cover_image TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    author TEXT NOT NULL,
    published INTEGER NOT NULL DEFAULT 0,
    published_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_blog_posts_slug ON blog_posts(slug);

CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reference TEXT NOT NULL,
    tour_id INTEGER NOT NULL REFERENCES tours(id),
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    departure_date TEXT NOT NULL,
    travelers INTEGER NOT NULL,
    currency TEXT NOT NULL,
    total_price REAL NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_reference ON bookings(reference);

CREATE TABLE IF NOT EXISTS contact_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    subject TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS newsletter_subscribers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    subscribed_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_newsletter_email ON newsletter_subscribers(email);

CREATE TABLE IF NOT EXISTS pages (
    slug TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Handle on the application database; cheap to clone
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

/// Filters for the public tour listing
#[derive(Debug, Clone, Default)]
pub struct TourFilter {
    pub difficulty: Option<Difficulty>,
    pub country: Option<String>,
    pub month: Option<Month>,
}

/// Data for a new booking row, priced and referenced by the caller
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub reference: String,
    pub tour_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub departure_date: NaiveDate,
    pub travelers: i64,
    pub currency: Currency,
    pub total_price: f64,
}

/// Generate a human-readable booking reference like `WF-7KQ2MX`.
/// The alphabet omits easily confused characters (0/O, 1/I).
#[must_use]
pub fn booking_reference() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::rng();
    let code: String = (0..6)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();
    format!("WF-{code}")
}

#[derive(sqlx::FromRow)]
struct TourRow {
    id: i64,
    title: String,
    slug: String,
    description: String,
    price_usd: f64,
    price_eur: Option<f64>,
    price_gbp: Option<f64>,
    price_inr: Option<f64>,
    duration_days: i64,
    country: String,
    country_code: String,
    city: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    difficulty: String,
    group_size_min: Option<i64>,
    group_size_max: Option<i64>,
    min_age: Option<i64>,
    accommodation: Option<String>,
    meal_plan: Option<String>,
    best_months: String,
    highlights: String,
    inclusions: String,
    exclusions: String,
    requirements: String,
    itinerary: String,
    faqs: String,
    published: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl TourRow {
    fn into_tour(self) -> Result<Tour> {
        Ok(Tour {
            id: self.id,
            title: self.title,
            slug: self.slug,
            description: self.description,
            price_usd: self.price_usd,
            price_eur: self.price_eur,
            price_gbp: self.price_gbp,
            price_inr: self.price_inr,
            duration_days: self.duration_days,
            country: self.country,
            country_code: self.country_code,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            difficulty: Difficulty::from_str(&self.difficulty)?,
            group_size_min: self.group_size_min,
            group_size_max: self.group_size_max,
            min_age: self.min_age,
            accommodation: self.accommodation,
            meal_plan: self.meal_plan,
            best_months: decode_months(&self.best_months)?,
            highlights: decode_string_list(&self.highlights)?,
            inclusions: decode_string_list(&self.inclusions)?,
            exclusions: decode_string_list(&self.exclusions)?,
            requirements: decode_string_list(&self.requirements)?,
            itinerary: decode_itinerary(&self.itinerary)?,
            faqs: decode_faqs(&self.faqs)?,
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BlogPostRow {
    id: i64,
    title: String,
    slug: String,
    excerpt: String,
    body: String,
    cover_image: Option<String>,
    tags: String,
    author: String,
    published: bool,
    published_at: Option<chrono::DateTime<Utc>>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl BlogPostRow {
    fn into_post(self) -> Result<BlogPost> {
        Ok(BlogPost {
            id: self.id,
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            body: self.body,
            cover_image: self.cover_image,
            tags: decode_string_list(&self.tags)?,
            author: self.author,
            published: self.published,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    reference: String,
    tour_id: i64,
    tour_title: String,
    name: String,
    email: String,
    phone: Option<String>,
    departure_date: NaiveDate,
    travelers: i64,
    currency: String,
    total_price: f64,
    status: String,
    created_at: chrono::DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking> {
        Ok(Booking {
            id: self.id,
            reference: self.reference,
            tour_id: self.tour_id,
            tour_title: self.tour_title,
            name: self.name,
            email: self.email,
            phone: self.phone,
            departure_date: self.departure_date,
            travelers: self.travelers,
            currency: Currency::from_str(&self.currency)?,
            total_price: self.total_price,
            status: BookingStatus::from_str(&self.status)?,
            created_at: self.created_at,
        })
    }
}

fn unique_violation(err: sqlx::Error, message: &str) -> WayfarerError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return WayfarerError::validation(message.to_string());
        }
    }
    err.into()
}

impl Db {
    /// Open the configured database, creating the file if missing
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(WayfarerError::from)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Private in-memory database, used by tests and ad-hoc tooling
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(WayfarerError::from)?
            .foreign_keys(true);
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Apply the embedded schema; safe to run on every startup
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("database schema up to date");
        Ok(())
    }

    // ---- tours ----

    /// Insert a tour from the admin submission payload
    #[instrument(skip(self, payload), fields(slug = %payload.slug))]
    pub async fn create_tour(&self, payload: &TourPayload) -> Result<Tour> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tours (title, slug, description, price_usd, price_eur, price_gbp, \
             price_inr, duration_days, country, country_code, city, latitude, longitude, \
             difficulty, group_size_min, group_size_max, min_age, accommodation, meal_plan, \
             best_months, highlights, inclusions, exclusions, requirements, itinerary, faqs, \
             published, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.description)
        .bind(payload.price_usd)
        .bind(payload.price_eur)
        .bind(payload.price_gbp)
        .bind(payload.price_inr)
        .bind(payload.duration_days)
        .bind(&payload.country)
        .bind(&payload.country_code)
        .bind(&payload.city)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(payload.difficulty.as_str())
        .bind(payload.group_size_min)
        .bind(payload.group_size_max)
        .bind(payload.min_age)
        .bind(&payload.accommodation)
        .bind(&payload.meal_plan)
        .bind(&payload.best_months)
        .bind(&payload.highlights)
        .bind(&payload.inclusions)
        .bind(&payload.exclusions)
        .bind(&payload.requirements)
        .bind(&payload.itinerary)
        .bind(&payload.faqs)
        .bind(payload.published)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| unique_violation(err, "A tour with this slug already exists"))?;

        self.get_tour(result.last_insert_rowid()).await
    }

    /// Overwrite a tour from the admin submission payload
    #[instrument(skip(self, payload), fields(id, slug = %payload.slug))]
    pub async fn update_tour(&self, id: i64, payload: &TourPayload) -> Result<Tour> {
        let result = sqlx::query(
            "UPDATE tours SET title = ?, slug = ?, description = ?, price_usd = ?, \
             price_eur = ?, price_gbp = ?, price_inr = ?, duration_days = ?, country = ?, \
             country_code = ?, city = ?, latitude = ?, longitude = ?, difficulty = ?, \
             group_size_min = ?, group_size_max = ?, min_age = ?, accommodation = ?, \
             meal_plan = ?, best_months = ?, highlights = ?, inclusions = ?, exclusions = ?, \
             requirements = ?, itinerary = ?, faqs = ?, published = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.description)
        .bind(payload.price_usd)
        .bind(payload.price_eur)
        .bind(payload.price_gbp)
        .bind(payload.price_inr)
        .bind(payload.duration_days)
        .bind(&payload.country)
        .bind(&payload.country_code)
        .bind(&payload.city)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(payload.difficulty.as_str())
        .bind(payload.group_size_min)
        .bind(payload.group_size_max)
        .bind(payload.min_age)
        .bind(&payload.accommodation)
        .bind(&payload.meal_plan)
        .bind(&payload.best_months)
        .bind(&payload.highlights)
        .bind(&payload.inclusions)
        .bind(&payload.exclusions)
        .bind(&payload.requirements)
        .bind(&payload.itinerary)
        .bind(&payload.faqs)
        .bind(payload.published)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| unique_violation(err, "A tour with this slug already exists"))?;

        if result.rows_affected() == 0 {
            return Err(WayfarerError::not_found("Tour"));
        }
        self.get_tour(id).await
    }

    /// Fetch any tour by id, drafts included
    pub async fn get_tour(&self, id: i64) -> Result<Tour> {
        sqlx::query_as::<_, TourRow>("SELECT * FROM tours WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| WayfarerError::not_found("Tour"))?
            .into_tour()
    }

    /// Fetch a published tour by slug, as the public detail page does
    pub async fn get_tour_by_slug(&self, slug: &str) -> Result<Tour> {
        sqlx::query_as::<_, TourRow>("SELECT * FROM tours WHERE slug = ? AND published = 1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| WayfarerError::not_found("Tour"))?
            .into_tour()
    }

    /// Published tours, newest first, with optional filters
    #[instrument(skip(self))]
    pub async fn list_tours(&self, filter: &TourFilter) -> Result<Vec<Tour>> {
        let mut sql =
            String::from("SELECT * FROM tours WHERE published = 1");
        if filter.difficulty.is_some() {
            sql.push_str(" AND difficulty = ?");
        }
        if filter.country.is_some() {
            sql.push_str(" AND country = ? COLLATE NOCASE");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query_as::<_, TourRow>(&sql);
        if let Some(difficulty) = filter.difficulty {
            query = query.bind(difficulty.as_str());
        }
        if let Some(country) = &filter.country {
            query = query.bind(country);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let mut tours = Vec::with_capacity(rows.len());
        for row in rows {
            tours.push(row.into_tour()?);
        }
        // The month set lives in a JSON column; filter after decoding
        if let Some(month) = filter.month {
            tours.retain(|tour| tour.best_months.contains(&month));
        }
        Ok(tours)
    }

    /// Every tour, drafts included, for the admin index
    pub async fn list_all_tours(&self) -> Result<Vec<Tour>> {
        let rows =
            sqlx::query_as::<_, TourRow>("SELECT * FROM tours ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(TourRow::into_tour).collect()
    }

    /// Remove a tour; separate admin action, never part of the form flow
    pub async fn delete_tour(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tours WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(WayfarerError::not_found("Tour"));
        }
        Ok(())
    }

    // ---- blog ----

    #[instrument(skip(self, payload), fields(slug = %payload.slug))]
    pub async fn create_post(&self, payload: &BlogPostPayload) -> Result<BlogPost> {
        let now = Utc::now();
        let published_at = payload.published.then_some(now);
        let result = sqlx::query(
            "INSERT INTO blog_posts (title, slug, excerpt, body, cover_image, tags, author, \
             published, published_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.excerpt)
        .bind(&payload.body)
        .bind(&payload.cover_image)
        .bind(&payload.tags)
        .bind(&payload.author)
        .bind(payload.published)
        .bind(published_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| unique_violation(err, "A post with this slug already exists"))?;

        self.get_post(result.last_insert_rowid()).await
    }

    #[instrument(skip(self, payload), fields(id, slug = %payload.slug))]
    pub async fn update_post(&self, id: i64, payload: &BlogPostPayload) -> Result<BlogPost> {
        let existing = self.get_post(id).await?;
        // First transition to published stamps the publication time
        let published_at = match (existing.published_at, payload.published) {
            (Some(at), _) => Some(at),
            (None, true) => Some(Utc::now()),
            (None, false) => None,
        };
        let result = sqlx::query(
            "UPDATE blog_posts SET title = ?, slug = ?, excerpt = ?, body = ?, cover_image = ?, \
             tags = ?, author = ?, published = ?, published_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.excerpt)
        .bind(&payload.body)
        .bind(&payload.cover_image)
        .bind(&payload.tags)
        .bind(&payload.author)
        .bind(payload.published)
        .bind(published_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| unique_violation(err, "A post with this slug already exists"))?;

        if result.rows_affected() == 0 {
            return Err(WayfarerError::not_found("Post"));
        }
        self.get_post(id).await
    }

    pub async fn get_post(&self, id: i64) -> Result<BlogPost> {
        sqlx::query_as::<_, BlogPostRow>("SELECT * FROM blog_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| WayfarerError::not_found("Post"))?
            .into_post()
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost> {
        sqlx::query_as::<_, BlogPostRow>(
            "SELECT * FROM blog_posts WHERE slug = ? AND published = 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| WayfarerError::not_found("Post"))?
        .into_post()
    }

    /// Published posts, most recently published first
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, BlogPostRow>(
            "SELECT * FROM blog_posts WHERE published = 1 ORDER BY published_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BlogPostRow::into_post).collect()
    }

    /// Every post, drafts included, for the admin index
    pub async fn list_all_posts(&self) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, BlogPostRow>(
            "SELECT * FROM blog_posts ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BlogPostRow::into_post).collect()
    }

    pub async fn delete_post(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(WayfarerError::not_found("Post"));
        }
        Ok(())
    }

    // ---- bookings ----

    #[instrument(skip(self, booking), fields(reference = %booking.reference, tour_id = booking.tour_id))]
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking> {
        let result = sqlx::query(
            "INSERT INTO bookings (reference, tour_id, name, email, phone, departure_date, \
             travelers, currency, total_price, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&booking.reference)
        .bind(booking.tour_id)
        .bind(&booking.name)
        .bind(&booking.email)
        .bind(&booking.phone)
        .bind(booking.departure_date)
        .bind(booking.travelers)
        .bind(booking.currency.code())
        .bind(booking.total_price)
        .bind(BookingStatus::Pending.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get_booking(result.last_insert_rowid()).await
    }

    pub async fn get_booking(&self, id: i64) -> Result<Booking> {
        sqlx::query_as::<_, BookingRow>(
            "SELECT b.*, t.title AS tour_title FROM bookings b \
             JOIN tours t ON t.id = b.tour_id WHERE b.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| WayfarerError::not_found("Booking"))?
        .into_booking()
    }

    /// A customer's bookings, newest first - the dashboard view
    pub async fn list_bookings_for_email(&self, email: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT b.*, t.title AS tour_title FROM bookings b \
             JOIN tours t ON t.id = b.tour_id \
             WHERE b.email = ? COLLATE NOCASE ORDER BY b.created_at DESC, b.id DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    pub async fn update_booking_status(&self, id: i64, status: BookingStatus) -> Result<Booking> {
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(WayfarerError::not_found("Booking"));
        }
        self.get_booking(id).await
    }

    // ---- contact & newsletter ----

    pub async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<ContactMessage> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO contact_messages (name, email, subject, message, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(subject)
        .bind(message)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(ContactMessage {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
            created_at: now,
        })
    }

    /// Subscribe an address; re-subscribing an unsubscribed address
    /// reactivates it instead of failing on the unique index
    pub async fn subscribe(&self, email: &str) -> Result<NewsletterSubscriber> {
        let email = email.trim().to_ascii_lowercase();
        sqlx::query(
            "INSERT INTO newsletter_subscribers (email, active, subscribed_at) VALUES (?, 1, ?) \
             ON CONFLICT(email) DO UPDATE SET active = 1",
        )
        .bind(&email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let subscriber = sqlx::query_as::<_, (i64, String, bool, chrono::DateTime<Utc>)>(
            "SELECT id, email, active, subscribed_at FROM newsletter_subscribers WHERE email = ?",
        )
        .bind(&email)
        .fetch_one(&self.pool)
        .await?;
        Ok(NewsletterSubscriber {
            id: subscriber.0,
            email: subscriber.1,
            active: subscriber.2,
            subscribed_at: subscriber.3,
        })
    }

    /// Deactivate a subscription; returns whether the address was known
    pub async fn unsubscribe(&self, email: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE newsletter_subscribers SET active = 0 WHERE email = ? COLLATE NOCASE")
                .bind(email.trim())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- static pages ----

    pub async fn upsert_page(&self, slug: &str, title: &str, body: &str) -> Result<Page> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO pages (slug, title, body, updated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(slug) DO UPDATE SET title = excluded.title, body = excluded.body, \
             updated_at = excluded.updated_at",
        )
        .bind(slug)
        .bind(title)
        .bind(body)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.get_page(slug).await
    }

    pub async fn get_page(&self, slug: &str) -> Result<Page> {
        sqlx::query_as::<_, (String, String, String, chrono::DateTime<Utc>)>(
            "SELECT slug, title, body, updated_at FROM pages WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .map(|(slug, title, body, updated_at)| Page {
            slug,
            title,
            body,
            updated_at,
        })
        .ok_or_else(|| WayfarerError::not_found("Page"))
    }

    pub async fn list_pages(&self) -> Result<Vec<Page>> {
        let rows = sqlx::query_as::<_, (String, String, String, chrono::DateTime<Utc>)>(
            "SELECT slug, title, body, updated_at FROM pages ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(slug, title, body, updated_at)| Page {
                slug,
                title,
                body,
                updated_at,
            })
            .collect())
    }
}
