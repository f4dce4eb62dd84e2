//! Domain model for tours, blog content, bookings, and site intake
//!
//! These are the decoded, in-memory shapes. The persistence layer stores
//! the ordered collections (highlights, itinerary, FAQs, ...) as JSON text
//! columns; decoding back into these structs goes through the form module's
//! round-trip helpers so there is exactly one encode/decode implementation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::{self, Currency};
use crate::i18n::{self, Locale};
use crate::WayfarerError;

/// Physical difficulty classification of a tour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Moderate,
    Challenging,
    Extreme,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Challenging => "challenging",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Localized display label
    #[must_use]
    pub fn label(self, locale: Locale) -> String {
        i18n::translate(locale, &format!("difficulty.{}", self.as_str())).to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = WayfarerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" => Ok(Difficulty::Moderate),
            "challenging" => Ok(Difficulty::Challenging),
            "extreme" => Ok(Difficulty::Extreme),
            other => Err(WayfarerError::validation(format!(
                "Unknown difficulty '{other}'. Must be one of: easy, moderate, challenging, extreme"
            ))),
        }
    }
}

/// Calendar month, used for a tour's recommended travel window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }

    /// Localized display label
    #[must_use]
    pub fn label(self, locale: Locale) -> String {
        i18n::translate(locale, &format!("month.{}", self.as_str())).to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Month {
    type Err = WayfarerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| WayfarerError::validation(format!("Unknown month '{s}'")))
    }
}

/// One day of a tour's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    /// Day number, always position + 1 after serialization
    pub day: u32,
    /// Short headline for the day
    pub title: String,
    /// Free-text description of the day's plan
    pub description: String,
    /// Planned activities
    #[serde(default)]
    pub activities: Vec<String>,
    /// Included meals ("breakfast", "lunch", "dinner")
    #[serde(default)]
    pub meals: Vec<String>,
    /// Overnight accommodation for this day, if any
    #[serde(default)]
    pub accommodation: Option<String>,
}

impl ItineraryDay {
    /// Blank day record as appended by the admin editor
    #[must_use]
    pub fn empty(day: u32) -> Self {
        Self {
            day,
            title: String::new(),
            description: String::new(),
            activities: Vec::new(),
            meals: Vec::new(),
            accommodation: None,
        }
    }
}

/// A question/answer pair shown on the tour detail page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// The central content entity: one bookable travel package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: i64,
    pub title: String,
    /// Unique, URL-path-safe identifier (lowercase, hyphen-separated)
    pub slug: String,
    pub description: String,
    /// Base price; always present
    pub price_usd: f64,
    /// Explicitly authored prices in other currencies; `None` means
    /// "derive from the base price", never zero
    pub price_eur: Option<f64>,
    pub price_gbp: Option<f64>,
    pub price_inr: Option<f64>,
    pub duration_days: i64,
    pub country: String,
    /// ISO 3166-1 alpha-2
    pub country_code: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub difficulty: Difficulty,
    pub group_size_min: Option<i64>,
    pub group_size_max: Option<i64>,
    /// Minimum participant age, if restricted
    pub min_age: Option<i64>,
    pub accommodation: Option<String>,
    pub meal_plan: Option<String>,
    /// Recommended travel months, in calendar order
    pub best_months: Vec<Month>,
    pub highlights: Vec<String>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub requirements: Vec<String>,
    pub itinerary: Vec<ItineraryDay>,
    pub faqs: Vec<Faq>,
    /// Gates public visibility; drafts are admin-only
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    /// Price in the requested currency: the explicitly authored value when
    /// present, otherwise the base price through the fixed conversion table
    #[must_use]
    pub fn price_in(&self, currency: Currency) -> f64 {
        let explicit = match currency {
            Currency::Usd => Some(self.price_usd),
            Currency::Eur => self.price_eur,
            Currency::Gbp => self.price_gbp,
            Currency::Inr => self.price_inr,
        };
        explicit.unwrap_or_else(|| currency::convert(self.price_usd, Currency::Usd, currency))
    }

    /// Listing card projection in the requested currency and locale
    #[must_use]
    pub fn summary(&self, currency: Currency, locale: Locale) -> TourSummary {
        TourSummary {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            summary: excerpt(&self.description, 200),
            duration_days: self.duration_days,
            country: self.country.clone(),
            city: self.city.clone(),
            difficulty: self.difficulty,
            difficulty_label: self.difficulty.label(locale),
            price: self.price_in(currency),
            currency: currency.code().to_string(),
            best_months: self.best_months.clone(),
        }
    }
}

/// Compact tour projection for listing pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub duration_days: i64,
    pub country: String,
    pub city: String,
    pub difficulty: Difficulty,
    pub difficulty_label: String,
    pub price: f64,
    pub currency: String,
    pub best_months: Vec<Month>,
}

/// A blog article; `body` is opaque rich-text HTML from the admin editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Listing card projection
    #[must_use]
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            cover_image: self.cover_image.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            published_at: self.published_at,
        }
    }
}

/// Compact blog projection for listing pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Localized display label
    #[must_use]
    pub fn label(self, locale: Locale) -> String {
        i18n::translate(locale, &format!("booking.status.{}", self.as_str())).to_string()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = WayfarerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(WayfarerError::validation(format!(
                "Unknown booking status '{other}'"
            ))),
        }
    }
}

/// A customer's reservation of a tour departure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    /// Human-readable reference code quoted in correspondence
    pub reference: String,
    pub tour_id: i64,
    pub tour_title: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub departure_date: NaiveDate,
    pub travelers: i64,
    pub currency: Currency,
    /// Unit price in `currency` at booking time, times `travelers`
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// A message submitted through the contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// One newsletter signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: i64,
    pub email: String,
    pub active: bool,
    pub subscribed_at: DateTime<Utc>,
}

/// A static content page (legal, policies, about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// First `max_chars` of a text, cut at a word boundary with an ellipsis
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    let cut = truncated.rfind(char::is_whitespace).unwrap_or(truncated.len());
    let mut out = truncated[..cut].trim_end().to_string();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tour() -> Tour {
        Tour {
            id: 1,
            title: "Annapurna Base Camp Trek".to_string(),
            slug: "annapurna-base-camp-trek".to_string(),
            description: "A classic Himalayan trek through rhododendron forests and \
                          Gurung villages to the Annapurna sanctuary."
                .to_string(),
            price_usd: 1400.0,
            price_eur: Some(1290.0),
            price_gbp: None,
            price_inr: None,
            duration_days: 12,
            country: "Nepal".to_string(),
            country_code: "NP".to_string(),
            city: "Pokhara".to_string(),
            latitude: Some(28.2096),
            longitude: Some(83.9856),
            difficulty: Difficulty::Challenging,
            group_size_min: Some(2),
            group_size_max: Some(12),
            min_age: Some(16),
            accommodation: Some("Teahouses".to_string()),
            meal_plan: Some("Full board on trek".to_string()),
            best_months: vec![Month::March, Month::April, Month::October],
            highlights: vec!["Sunrise over Machapuchare".to_string()],
            inclusions: vec!["All permits".to_string()],
            exclusions: vec!["International flights".to_string()],
            requirements: vec!["Good physical condition".to_string()],
            itinerary: vec![ItineraryDay {
                day: 1,
                title: "Arrival in Pokhara".to_string(),
                description: "Transfer and briefing".to_string(),
                activities: vec!["Welcome dinner".to_string()],
                meals: vec!["dinner".to_string()],
                accommodation: Some("Hotel".to_string()),
            }],
            faqs: vec![Faq {
                question: "Do I need a guide?".to_string(),
                answer: "Yes, all our treks are guided.".to_string(),
            }],
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_in_prefers_explicit_price() {
        let tour = sample_tour();
        assert_eq!(tour.price_in(Currency::Usd), 1400.0);
        // Authored EUR price wins over the converted value
        assert_eq!(tour.price_in(Currency::Eur), 1290.0);
        // No authored GBP price: fixed-table conversion from USD
        assert_eq!(tour.price_in(Currency::Gbp), 1106.0);
    }

    #[test]
    fn test_summary_projection() {
        let tour = sample_tour();
        let summary = tour.summary(Currency::Eur, Locale::De);
        assert_eq!(summary.slug, "annapurna-base-camp-trek");
        assert_eq!(summary.price, 1290.0);
        assert_eq!(summary.currency, "eur");
        assert_eq!(summary.difficulty_label, "Anspruchsvoll");
        assert_eq!(summary.best_months, vec![Month::March, Month::April, Month::October]);
    }

    #[test]
    fn test_difficulty_round_trip() {
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Moderate,
            Difficulty::Challenging,
            Difficulty::Extreme,
        ] {
            assert_eq!(difficulty.as_str().parse::<Difficulty>().unwrap(), difficulty);
        }
        assert!("vertical".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_month_parse_and_order() {
        assert_eq!("October".parse::<Month>().unwrap(), Month::October);
        assert!(Month::January < Month::December);
        assert!("midsummer".parse::<Month>().is_err());
    }

    #[test]
    fn test_itinerary_day_serde_defaults() {
        // Stored records written before activities/meals existed still decode
        let json = r#"{"day":1,"title":"Arrival","description":"Transfer"}"#;
        let day: ItineraryDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.day, 1);
        assert!(day.activities.is_empty());
        assert!(day.meals.is_empty());
        assert!(day.accommodation.is_none());
    }

    #[test]
    fn test_excerpt_cuts_at_word_boundary() {
        let text = "The quick brown fox jumps over the lazy dog";
        assert_eq!(excerpt(text, 100), text);
        let short = excerpt(text, 15);
        assert_eq!(short, "The quick…");
        assert!(short.chars().count() <= 16);
    }

    #[test]
    fn test_booking_status_labels() {
        assert_eq!(BookingStatus::Pending.label(Locale::En), "Pending");
        assert_eq!(BookingStatus::Confirmed.label(Locale::De), "Bestätigt");
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
    }
}
