//! Single source of truth for the admin tour and blog forms
//!
//! A draft holds the scalar field store (numeric fields as raw text, the
//! way controlled inputs deliver them) plus one list editor per ordered
//! collection. Every mutation of a tour draft flows through
//! [`TourDraft::apply`] with a named action per form section, so sections
//! cannot race each other with partial updates.

use serde::{Deserialize, Serialize};

use super::list_editor::ListEditor;
use super::record_editor::RecordListEditor;
use super::serializer::{
    encode_list, optional_count, optional_decimal, optional_price, optional_text, renumber_itinerary,
    required_count, required_price, required_text, slugify, BlogPostPayload, TourPayload,
};
use super::FormError;
use crate::currency::Currency;
use crate::models::{BlogPost, Difficulty, Faq, ItineraryDay, Month, Tour};

/// The four flat string collections of the tour form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListField {
    Highlights,
    Inclusions,
    Exclusions,
    Requirements,
}

/// Field-level edit of one itinerary day; each variant replaces exactly
/// one named field of the addressed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItineraryEdit {
    Day(u32),
    Title(String),
    Description(String),
    Activities(Vec<String>),
    Meals(Vec<String>),
    Accommodation(Option<String>),
}

/// Field-level edit of one FAQ entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FaqEdit {
    Question(String),
    Answer(String),
}

/// Every mutation the tour form supports, one named action per section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TourFormAction {
    SetTitle(String),
    SetSlug(String),
    SetDescription(String),
    SetPrice(Currency, String),
    SetDurationDays(String),
    SetCountry(String),
    SetCountryCode(String),
    SetCity(String),
    SetLatitude(String),
    SetLongitude(String),
    SetDifficulty(Difficulty),
    SetGroupSizeMin(String),
    SetGroupSizeMax(String),
    SetMinAge(String),
    SetAccommodation(String),
    SetMealPlan(String),
    /// Add the month if absent, remove it if present; the set stays in
    /// calendar order either way
    ToggleBestMonth(Month),
    SetPublished(bool),
    ListPush(ListField),
    ListUpdate(ListField, usize, String),
    ListRemove(ListField, usize),
    ItineraryPush,
    ItineraryUpdate(usize, ItineraryEdit),
    ItineraryRemove(usize),
    FaqPush,
    FaqUpdate(usize, FaqEdit),
    FaqRemove(usize),
}

/// In-memory state of the admin tour form
#[derive(Debug, Clone, PartialEq)]
pub struct TourDraft {
    pub title: String,
    /// Left empty to derive from the title at serialization time
    pub slug: String,
    pub description: String,
    pub price_usd: String,
    pub price_eur: String,
    pub price_gbp: String,
    pub price_inr: String,
    pub duration_days: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub latitude: String,
    pub longitude: String,
    pub difficulty: Difficulty,
    pub group_size_min: String,
    pub group_size_max: String,
    pub min_age: String,
    pub accommodation: String,
    pub meal_plan: String,
    pub best_months: Vec<Month>,
    pub published: bool,
    pub highlights: ListEditor,
    pub inclusions: ListEditor,
    pub exclusions: ListEditor,
    pub requirements: ListEditor,
    pub itinerary: RecordListEditor<ItineraryDay>,
    pub faqs: RecordListEditor<Faq>,
    submitting: bool,
}

impl Default for TourDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl TourDraft {
    /// Create-form defaults: string collections start with one empty
    /// placeholder row, the itinerary with a blank day 1, FAQs empty
    #[must_use]
    pub fn new() -> Self {
        let mut itinerary = RecordListEditor::new();
        itinerary.push(ItineraryDay::empty(1));
        Self {
            title: String::new(),
            slug: String::new(),
            description: String::new(),
            price_usd: String::new(),
            price_eur: String::new(),
            price_gbp: String::new(),
            price_inr: String::new(),
            duration_days: String::new(),
            country: String::new(),
            country_code: String::new(),
            city: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            difficulty: Difficulty::default(),
            group_size_min: String::new(),
            group_size_max: String::new(),
            min_age: String::new(),
            accommodation: String::new(),
            meal_plan: String::new(),
            best_months: Vec::new(),
            published: false,
            highlights: ListEditor::single_empty(),
            inclusions: ListEditor::single_empty(),
            exclusions: ListEditor::single_empty(),
            requirements: ListEditor::single_empty(),
            itinerary,
            faqs: RecordListEditor::new(),
            submitting: false,
        }
    }

    /// Edit-form state decoded from a persisted tour
    #[must_use]
    pub fn from_tour(tour: &Tour) -> Self {
        fn fmt_opt_f64(value: Option<f64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }
        fn fmt_opt_i64(value: Option<i64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            title: tour.title.clone(),
            slug: tour.slug.clone(),
            description: tour.description.clone(),
            price_usd: tour.price_usd.to_string(),
            price_eur: fmt_opt_f64(tour.price_eur),
            price_gbp: fmt_opt_f64(tour.price_gbp),
            price_inr: fmt_opt_f64(tour.price_inr),
            duration_days: tour.duration_days.to_string(),
            country: tour.country.clone(),
            country_code: tour.country_code.clone(),
            city: tour.city.clone(),
            latitude: fmt_opt_f64(tour.latitude),
            longitude: fmt_opt_f64(tour.longitude),
            difficulty: tour.difficulty,
            group_size_min: fmt_opt_i64(tour.group_size_min),
            group_size_max: fmt_opt_i64(tour.group_size_max),
            min_age: fmt_opt_i64(tour.min_age),
            accommodation: tour.accommodation.clone().unwrap_or_default(),
            meal_plan: tour.meal_plan.clone().unwrap_or_default(),
            best_months: tour.best_months.clone(),
            published: tour.published,
            highlights: ListEditor::from_items(tour.highlights.clone()),
            inclusions: ListEditor::from_items(tour.inclusions.clone()),
            exclusions: ListEditor::from_items(tour.exclusions.clone()),
            requirements: ListEditor::from_items(tour.requirements.clone()),
            itinerary: RecordListEditor::from_records(tour.itinerary.clone()),
            faqs: RecordListEditor::from_records(tour.faqs.clone()),
            submitting: false,
        }
    }

    fn list_editor(&mut self, field: ListField) -> &mut ListEditor {
        match field {
            ListField::Highlights => &mut self.highlights,
            ListField::Inclusions => &mut self.inclusions,
            ListField::Exclusions => &mut self.exclusions,
            ListField::Requirements => &mut self.requirements,
        }
    }

    /// Apply one form action. List operations are bounds-checked; scalar
    /// sets always succeed.
    pub fn apply(&mut self, action: TourFormAction) -> Result<(), FormError> {
        match action {
            TourFormAction::SetTitle(value) => self.title = value,
            TourFormAction::SetSlug(value) => self.slug = value,
            TourFormAction::SetDescription(value) => self.description = value,
            TourFormAction::SetPrice(currency, value) => match currency {
                Currency::Usd => self.price_usd = value,
                Currency::Eur => self.price_eur = value,
                Currency::Gbp => self.price_gbp = value,
                Currency::Inr => self.price_inr = value,
            },
            TourFormAction::SetDurationDays(value) => self.duration_days = value,
            TourFormAction::SetCountry(value) => self.country = value,
            TourFormAction::SetCountryCode(value) => self.country_code = value,
            TourFormAction::SetCity(value) => self.city = value,
            TourFormAction::SetLatitude(value) => self.latitude = value,
            TourFormAction::SetLongitude(value) => self.longitude = value,
            TourFormAction::SetDifficulty(value) => self.difficulty = value,
            TourFormAction::SetGroupSizeMin(value) => self.group_size_min = value,
            TourFormAction::SetGroupSizeMax(value) => self.group_size_max = value,
            TourFormAction::SetMinAge(value) => self.min_age = value,
            TourFormAction::SetAccommodation(value) => self.accommodation = value,
            TourFormAction::SetMealPlan(value) => self.meal_plan = value,
            TourFormAction::ToggleBestMonth(month) => {
                if let Some(position) = self.best_months.iter().position(|m| *m == month) {
                    self.best_months.remove(position);
                } else {
                    self.best_months.push(month);
                    self.best_months.sort();
                }
            }
            TourFormAction::SetPublished(value) => self.published = value,
            TourFormAction::ListPush(field) => self.list_editor(field).push(String::new()),
            TourFormAction::ListUpdate(field, index, value) => {
                self.list_editor(field).update(index, value)?;
            }
            TourFormAction::ListRemove(field, index) => {
                self.list_editor(field).remove(index)?;
            }
            TourFormAction::ItineraryPush => {
                let next_day = self.itinerary.len() as u32 + 1;
                self.itinerary.push(ItineraryDay::empty(next_day));
            }
            TourFormAction::ItineraryUpdate(index, edit) => {
                self.itinerary.update(index, |day| match edit {
                    ItineraryEdit::Day(value) => day.day = value,
                    ItineraryEdit::Title(value) => day.title = value,
                    ItineraryEdit::Description(value) => day.description = value,
                    ItineraryEdit::Activities(value) => day.activities = value,
                    ItineraryEdit::Meals(value) => day.meals = value,
                    ItineraryEdit::Accommodation(value) => day.accommodation = value,
                })?;
            }
            TourFormAction::ItineraryRemove(index) => {
                self.itinerary.remove(index)?;
            }
            TourFormAction::FaqPush => self.faqs.push(Faq::default()),
            TourFormAction::FaqUpdate(index, edit) => {
                self.faqs.update(index, |faq| match edit {
                    FaqEdit::Question(value) => faq.question = value,
                    FaqEdit::Answer(value) => faq.answer = value,
                })?;
            }
            TourFormAction::FaqRemove(index) => {
                self.faqs.remove(index)?;
            }
        }
        Ok(())
    }

    /// Whether a submission is currently outstanding
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Gate a submission attempt. Returns `false` when one is already
    /// outstanding, so a double-click produces exactly one request.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Re-enable submission after the request resolved (success or error)
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Assemble the wire payload: coerce numeric fields, normalize the
    /// slug, renumber itinerary days, JSON-encode every collection.
    /// Pure transform; the draft is left untouched.
    pub fn serialize(&self) -> Result<TourPayload, FormError> {
        let title = required_text("title", &self.title)?;
        let slug_source = if self.slug.trim().is_empty() {
            &title
        } else {
            &self.slug
        };
        let slug = slugify(slug_source);
        if slug.is_empty() {
            return Err(FormError::MissingField { field: "slug" });
        }

        let itinerary = renumber_itinerary(self.itinerary.records().to_vec());

        Ok(TourPayload {
            title,
            slug,
            description: self.description.trim().to_string(),
            price_usd: required_price("price_usd", &self.price_usd)?,
            price_eur: optional_price("price_eur", &self.price_eur)?,
            price_gbp: optional_price("price_gbp", &self.price_gbp)?,
            price_inr: optional_price("price_inr", &self.price_inr)?,
            duration_days: required_count("duration_days", &self.duration_days)?,
            country: required_text("country", &self.country)?,
            country_code: self.country_code.trim().to_uppercase(),
            city: self.city.trim().to_string(),
            latitude: optional_decimal("latitude", &self.latitude)?,
            longitude: optional_decimal("longitude", &self.longitude)?,
            difficulty: self.difficulty,
            group_size_min: optional_count("group_size_min", &self.group_size_min)?,
            group_size_max: optional_count("group_size_max", &self.group_size_max)?,
            min_age: optional_count("min_age", &self.min_age)?,
            accommodation: optional_text(&self.accommodation),
            meal_plan: optional_text(&self.meal_plan),
            best_months: encode_list("months", &self.best_months)?,
            highlights: encode_list("highlights", self.highlights.items())?,
            inclusions: encode_list("inclusions", self.inclusions.items())?,
            exclusions: encode_list("exclusions", self.exclusions.items())?,
            requirements: encode_list("requirements", self.requirements.items())?,
            itinerary: encode_list("itinerary", &itinerary)?,
            faqs: encode_list("faqs", self.faqs.records())?,
            published: self.published,
        })
    }
}

/// In-memory state of the admin blog post form; same model as the tour
/// draft with a single tag list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlogPostDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: String,
    pub author: String,
    pub published: bool,
    pub tags: ListEditor,
}

impl BlogPostDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit-form state decoded from a persisted post
    #[must_use]
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            body: post.body.clone(),
            cover_image: post.cover_image.clone().unwrap_or_default(),
            author: post.author.clone(),
            published: post.published,
            tags: ListEditor::from_items(post.tags.clone()),
        }
    }

    /// Assemble the wire payload, JSON-encoding the tag list
    pub fn serialize(&self) -> Result<BlogPostPayload, FormError> {
        let title = required_text("title", &self.title)?;
        let slug_source = if self.slug.trim().is_empty() {
            &title
        } else {
            &self.slug
        };
        let slug = slugify(slug_source);
        if slug.is_empty() {
            return Err(FormError::MissingField { field: "slug" });
        }

        Ok(BlogPostPayload {
            title,
            slug,
            excerpt: self.excerpt.trim().to_string(),
            body: self.body.clone(),
            cover_image: optional_text(&self.cover_image),
            tags: encode_list("tags", self.tags.items())?,
            author: required_text("author", &self.author)?,
            published: self.published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::serializer::{decode_itinerary, decode_string_list};
    use chrono::Utc;

    fn filled_draft() -> TourDraft {
        let mut draft = TourDraft::new();
        for action in [
            TourFormAction::SetTitle("Sahara Desert Expedition".to_string()),
            TourFormAction::SetDescription("Camel treks and desert camps".to_string()),
            TourFormAction::SetPrice(Currency::Usd, "980".to_string()),
            TourFormAction::SetDurationDays("7".to_string()),
            TourFormAction::SetCountry("Morocco".to_string()),
            TourFormAction::SetCountryCode("ma".to_string()),
            TourFormAction::SetCity("Marrakesh".to_string()),
            TourFormAction::SetDifficulty(Difficulty::Easy),
        ] {
            draft.apply(action).unwrap();
        }
        draft
    }

    #[test]
    fn test_create_with_default_placeholder_lists() {
        // A brand-new form submitted untouched except for required scalars
        let draft = filled_draft();
        let payload = draft.serialize().unwrap();

        // Single-empty-placeholder collections serialize as [""], not an error
        assert_eq!(payload.highlights, r#"[""]"#);
        assert_eq!(payload.inclusions, r#"[""]"#);
        assert_eq!(payload.exclusions, r#"[""]"#);
        assert_eq!(payload.requirements, r#"[""]"#);
        // The blank day-1 placeholder is retained and numbered
        let days = decode_itinerary(&payload.itinerary).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, 1);
        assert_eq!(payload.faqs, "[]");
        assert_eq!(payload.slug, "sahara-desert-expedition");
        assert_eq!(payload.country_code, "MA");
    }

    #[test]
    fn test_missing_required_scalar_fails() {
        let draft = TourDraft::new();
        let err = draft.serialize().unwrap_err();
        assert!(matches!(err, FormError::MissingField { field: "title" }));
    }

    #[test]
    fn test_invalid_number_is_designed_error() {
        let mut draft = filled_draft();
        draft
            .apply(TourFormAction::SetPrice(Currency::Eur, "twelve".to_string()))
            .unwrap();
        let err = draft.serialize().unwrap_err();
        assert!(matches!(err, FormError::InvalidNumber { field: "price_eur", .. }));
    }

    #[test]
    fn test_empty_optional_price_is_null_not_zero() {
        let draft = filled_draft();
        let payload = draft.serialize().unwrap();
        assert_eq!(payload.price_eur, None);
        assert_eq!(payload.price_gbp, None);
        assert_eq!(payload.price_inr, None);
    }

    #[test]
    fn test_edit_round_trip_appending_a_day() {
        // Load a tour whose stored itinerary has one day...
        let tour = Tour {
            id: 7,
            title: "Iceland Ring Road".to_string(),
            slug: "iceland-ring-road".to_string(),
            description: "Waterfalls, glaciers, black beaches".to_string(),
            price_usd: 2100.0,
            price_eur: None,
            price_gbp: None,
            price_inr: None,
            duration_days: 10,
            country: "Iceland".to_string(),
            country_code: "IS".to_string(),
            city: "Reykjavík".to_string(),
            latitude: None,
            longitude: None,
            difficulty: Difficulty::Moderate,
            group_size_min: None,
            group_size_max: Some(14),
            min_age: None,
            accommodation: Some("Guesthouses".to_string()),
            meal_plan: None,
            best_months: vec![Month::June, Month::July],
            highlights: vec!["Jökulsárlón glacier lagoon".to_string()],
            inclusions: vec![],
            exclusions: vec![],
            requirements: vec![],
            itinerary: vec![ItineraryDay {
                day: 1,
                title: "Arrival".to_string(),
                description: "Pick-up in Reykjavík".to_string(),
                activities: vec![],
                meals: vec![],
                accommodation: None,
            }],
            faqs: vec![],
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut draft = TourDraft::from_tour(&tour);
        // ...append a second day through the reducer...
        draft.apply(TourFormAction::ItineraryPush).unwrap();
        let payload = draft.serialize().unwrap();

        // ...and the payload holds two days, the first unchanged
        let days = decode_itinerary(&payload.itinerary).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0], tour.itinerary[0]);
        assert_eq!(days[1], ItineraryDay::empty(2));
        // Scalars survived the round trip
        assert_eq!(payload.slug, "iceland-ring-road");
        assert_eq!(payload.price_usd, 2100.0);
        assert_eq!(payload.group_size_max, Some(14));
        assert_eq!(payload.group_size_min, None);
    }

    #[test]
    fn test_double_submit_yields_one_request() {
        let mut draft = filled_draft();

        assert!(draft.begin_submit(), "first submit must proceed");
        assert!(!draft.begin_submit(), "second submit must be swallowed");
        assert!(draft.is_submitting());

        draft.finish_submit();
        assert!(draft.begin_submit(), "submit re-enabled after completion");
    }

    #[test]
    fn test_list_actions_route_to_the_right_editor() {
        let mut draft = filled_draft();
        draft
            .apply(TourFormAction::ListUpdate(
                ListField::Highlights,
                0,
                "Erg Chebbi dunes".to_string(),
            ))
            .unwrap();
        draft.apply(TourFormAction::ListPush(ListField::Highlights)).unwrap();
        draft
            .apply(TourFormAction::ListUpdate(
                ListField::Inclusions,
                0,
                "Desert camp".to_string(),
            ))
            .unwrap();

        assert_eq!(draft.highlights.items(), ["Erg Chebbi dunes", ""]);
        assert_eq!(draft.inclusions.items(), ["Desert camp"]);
        // Sibling editors untouched
        assert_eq!(draft.exclusions.items(), [""]);

        let err = draft
            .apply(TourFormAction::ListRemove(ListField::Requirements, 9))
            .unwrap_err();
        assert!(matches!(err, FormError::IndexOutOfBounds { index: 9, len: 1 }));
    }

    #[test]
    fn test_itinerary_day_numbers_renumbered_at_serialize() {
        let mut draft = filled_draft();
        draft.apply(TourFormAction::ItineraryPush).unwrap();
        draft.apply(TourFormAction::ItineraryPush).unwrap();
        // Drift the stored day numbers out of sync, then drop the middle row
        draft
            .apply(TourFormAction::ItineraryUpdate(2, ItineraryEdit::Day(9)))
            .unwrap();
        draft.apply(TourFormAction::ItineraryRemove(1)).unwrap();

        let payload = draft.serialize().unwrap();
        let days = decode_itinerary(&payload.itinerary).unwrap();
        let numbers: Vec<u32> = days.iter().map(|d| d.day).collect();
        assert_eq!(numbers, vec![1, 2]);
        // The draft itself is not mutated by serialization
        assert_eq!(draft.itinerary.records()[1].day, 9);
    }

    #[test]
    fn test_toggle_best_month_keeps_calendar_order() {
        let mut draft = filled_draft();
        draft.apply(TourFormAction::ToggleBestMonth(Month::October)).unwrap();
        draft.apply(TourFormAction::ToggleBestMonth(Month::March)).unwrap();
        assert_eq!(draft.best_months, vec![Month::March, Month::October]);

        draft.apply(TourFormAction::ToggleBestMonth(Month::October)).unwrap();
        assert_eq!(draft.best_months, vec![Month::March]);
    }

    #[test]
    fn test_blog_draft_serializes_tags() {
        let mut draft = BlogPostDraft::new();
        draft.title = "Packing for the Himalayas".to_string();
        draft.author = "Maya".to_string();
        draft.excerpt = "What actually goes in the duffel".to_string();
        draft.body = "<p>Layers, always layers.</p>".to_string();
        draft.tags.push("packing");
        draft.tags.push("trekking");

        let payload = draft.serialize().unwrap();
        assert_eq!(payload.slug, "packing-for-the-himalayas");
        assert_eq!(decode_string_list(&payload.tags).unwrap(), vec!["packing", "trekking"]);
        assert_eq!(payload.cover_image, None);
    }
}
