//! Demo catalog seeding
//!
//! Inserts a small but realistic content set through the same draft ->
//! serialize -> persist path the admin API uses, so seeded rows are
//! byte-compatible with form-authored ones. Existing slugs are skipped,
//! making the command safe to re-run.

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::form::{BlogPostDraft, ListEditor, RecordListEditor, TourDraft};
use crate::models::{Difficulty, Faq, ItineraryDay, Month};
use crate::store::Db;

/// Seed tours, blog posts, and static pages
pub async fn run(db: &Db) -> Result<()> {
    let existing_tours: HashSet<String> = db
        .list_all_tours()
        .await
        .context("Failed to list existing tours")?
        .into_iter()
        .map(|tour| tour.slug)
        .collect();

    let mut created = 0;
    for draft in [annapurna(), iceland(), sahara()] {
        let payload = draft.serialize().context("Seed tour failed to serialize")?;
        if existing_tours.contains(&payload.slug) {
            tracing::debug!(slug = %payload.slug, "seed tour already present, skipping");
            continue;
        }
        db.create_tour(&payload).await.context("Failed to insert seed tour")?;
        created += 1;
    }
    tracing::info!(created, "seeded tours");

    let existing_posts: HashSet<String> = db
        .list_all_posts()
        .await
        .context("Failed to list existing posts")?
        .into_iter()
        .map(|post| post.slug)
        .collect();

    let mut created = 0;
    for draft in [packing_post(), teahouse_post()] {
        let payload = draft.serialize().context("Seed post failed to serialize")?;
        if existing_posts.contains(&payload.slug) {
            continue;
        }
        db.create_post(&payload).await.context("Failed to insert seed post")?;
        created += 1;
    }
    tracing::info!(created, "seeded blog posts");

    for (slug, title, body) in pages() {
        db.upsert_page(slug, title, body)
            .await
            .context("Failed to upsert seed page")?;
    }
    tracing::info!("seeded static pages");

    Ok(())
}

fn string_list(items: &[&str]) -> ListEditor {
    ListEditor::from_items(items.iter().map(ToString::to_string).collect())
}

fn day(
    number: u32,
    title: &str,
    description: &str,
    activities: &[&str],
    meals: &[&str],
    accommodation: Option<&str>,
) -> ItineraryDay {
    ItineraryDay {
        day: number,
        title: title.to_string(),
        description: description.to_string(),
        activities: activities.iter().map(ToString::to_string).collect(),
        meals: meals.iter().map(ToString::to_string).collect(),
        accommodation: accommodation.map(ToString::to_string),
    }
}

fn faq(question: &str, answer: &str) -> Faq {
    Faq {
        question: question.to_string(),
        answer: answer.to_string(),
    }
}

fn annapurna() -> TourDraft {
    let mut draft = TourDraft::new();
    draft.title = "Annapurna Base Camp Trek".to_string();
    draft.description = "Twelve days through rhododendron forest, terraced \
        fields, and Gurung villages to the natural amphitheatre of the \
        Annapurna Sanctuary at 4,130 m. Teahouse-based, fully guided, with \
        porters carrying the main bags."
        .to_string();
    draft.price_usd = "1400".to_string();
    draft.price_eur = "1290".to_string();
    draft.duration_days = "12".to_string();
    draft.country = "Nepal".to_string();
    draft.country_code = "np".to_string();
    draft.city = "Pokhara".to_string();
    draft.latitude = "28.2096".to_string();
    draft.longitude = "83.9856".to_string();
    draft.difficulty = Difficulty::Challenging;
    draft.group_size_min = "2".to_string();
    draft.group_size_max = "12".to_string();
    draft.min_age = "16".to_string();
    draft.accommodation = "Teahouses and one hotel night in Pokhara".to_string();
    draft.meal_plan = "Full board on trek".to_string();
    draft.best_months = vec![Month::March, Month::April, Month::October, Month::November];
    draft.published = true;
    draft.highlights = string_list(&[
        "Sunrise over Machapuchare from Poon Hill",
        "A night inside the Annapurna Sanctuary",
        "Hot springs at Jhinu Danda on the way out",
    ]);
    draft.inclusions = string_list(&[
        "All trekking permits and TIMS card",
        "English-speaking guide and porters",
        "Teahouse accommodation and meals on trek",
    ]);
    draft.exclusions = string_list(&[
        "International flights",
        "Nepalese visa",
        "Travel insurance with helicopter evacuation cover",
    ]);
    draft.requirements = string_list(&[
        "Good physical condition; 5-7 hours of walking per day",
        "No technical climbing experience needed",
    ]);
    draft.itinerary = RecordListEditor::from_records(vec![
        day(
            1,
            "Arrival in Pokhara",
            "Airport pick-up, gear check, and trek briefing over dinner by the lake.",
            &["Gear check", "Welcome dinner"],
            &["dinner"],
            Some("Hotel in Pokhara"),
        ),
        day(
            2,
            "Drive to Nayapul, trek to Ulleri",
            "A short drive to the trailhead, then the long stone staircase to Ulleri.",
            &["3,200 stone steps"],
            &["breakfast", "lunch", "dinner"],
            Some("Teahouse"),
        ),
        day(
            3,
            "Poon Hill sunrise, on to Tadapani",
            "Pre-dawn climb to Poon Hill for the Dhaulagiri-Annapurna panorama.",
            &["Poon Hill viewpoint"],
            &["breakfast", "lunch", "dinner"],
            Some("Teahouse"),
        ),
    ]);
    draft.faqs = RecordListEditor::from_records(vec![
        faq(
            "Do I need previous trekking experience?",
            "No, but you should be comfortable walking 5-7 hours a day on \
             steep stone trails. We recommend three months of regular hill \
             walking before departure.",
        ),
        faq(
            "What happens if I get altitude sickness?",
            "Our guides carry oximeters and follow a conservative ascent \
             profile. If symptoms persist we descend; your insurance must \
             cover helicopter evacuation above 3,000 m.",
        ),
    ]);
    draft
}

fn iceland() -> TourDraft {
    let mut draft = TourDraft::new();
    draft.title = "Iceland Ring Road Adventure".to_string();
    draft.description = "A ten-day small-group loop of Route 1: waterfalls, \
        glacier lagoons, black-sand beaches, and a night under the sky in \
        the east fjords. Minibus-based with short daily hikes."
        .to_string();
    draft.price_usd = "2100".to_string();
    draft.duration_days = "10".to_string();
    draft.country = "Iceland".to_string();
    draft.country_code = "is".to_string();
    draft.city = "Reykjavík".to_string();
    draft.latitude = "64.1466".to_string();
    draft.longitude = "-21.9426".to_string();
    draft.difficulty = Difficulty::Moderate;
    draft.group_size_min = "4".to_string();
    draft.group_size_max = "14".to_string();
    draft.accommodation = "Guesthouses and country hotels".to_string();
    draft.meal_plan = "Breakfast included".to_string();
    draft.best_months = vec![Month::June, Month::July, Month::August];
    draft.published = true;
    draft.highlights = string_list(&[
        "Icebergs at Jökulsárlón glacier lagoon",
        "Walking behind Seljalandsfoss",
        "Whale watching from Húsavík",
    ]);
    draft.inclusions = string_list(&[
        "Minibus transport with driver-guide",
        "Nine nights of accommodation with breakfast",
        "Glacier lagoon boat trip",
    ]);
    draft.exclusions = string_list(&["Flights to Iceland", "Lunches and dinners"]);
    draft.requirements = string_list(&["Ability to walk 2-3 hours on uneven ground"]);
    draft.itinerary = RecordListEditor::from_records(vec![
        day(
            1,
            "Reykjavík and the Golden Circle",
            "Þingvellir rift valley, Geysir, and Gullfoss before the first night out east.",
            &["Þingvellir walk", "Gullfoss"],
            &["breakfast"],
            Some("Guesthouse, Hella"),
        ),
        day(
            2,
            "South coast waterfalls",
            "Seljalandsfoss and Skógafoss, then the black sand at Reynisfjara.",
            &["Reynisfjara beach"],
            &["breakfast"],
            Some("Guesthouse, Vík"),
        ),
    ]);
    draft.faqs = RecordListEditor::from_records(vec![faq(
        "Will we see the northern lights?",
        "On summer departures no - the nights are bright. September and \
         later departures have a fair chance away from town lights.",
    )]);
    draft
}

fn sahara() -> TourDraft {
    let mut draft = TourDraft::new();
    draft.title = "Sahara Desert Expedition".to_string();
    draft.description = "Seven relaxed days from Marrakesh over the High \
        Atlas to the Erg Chebbi dunes: kasbahs, palm oases, a camel trek at \
        sunset, and two nights in a desert camp."
        .to_string();
    draft.price_usd = "980".to_string();
    draft.price_eur = "905".to_string();
    draft.price_gbp = "780".to_string();
    draft.duration_days = "7".to_string();
    draft.country = "Morocco".to_string();
    draft.country_code = "ma".to_string();
    draft.city = "Marrakesh".to_string();
    draft.difficulty = Difficulty::Easy;
    draft.group_size_min = "2".to_string();
    draft.group_size_max = "16".to_string();
    draft.accommodation = "Riads and a fixed desert camp".to_string();
    draft.meal_plan = "Half board".to_string();
    draft.best_months = vec![Month::March, Month::April, Month::October, Month::November];
    draft.published = true;
    draft.highlights = string_list(&[
        "Sunset camel trek into Erg Chebbi",
        "Aït Benhaddou kasbah",
        "A night sky with zero light pollution",
    ]);
    draft.inclusions = string_list(&[
        "4x4 transport with driver",
        "Desert camp with private tents",
        "Daily breakfast and dinner",
    ]);
    draft.exclusions = string_list(&["Lunches", "Tips for drivers and camel handlers"]);
    draft.requirements = string_list(&["Suitable for all fitness levels"]);
    draft.itinerary = RecordListEditor::from_records(vec![
        day(
            1,
            "Marrakesh to Aït Benhaddou",
            "Over the Tizi n'Tichka pass to the fortified village of Aït Benhaddou.",
            &["Kasbah visit"],
            &["breakfast", "dinner"],
            Some("Riad, Ouarzazate"),
        ),
        day(
            2,
            "Dades valley and gorges",
            "Palm groves, the Road of a Thousand Kasbahs, and an evening gorge walk.",
            &["Gorge walk"],
            &["breakfast", "dinner"],
            Some("Guesthouse, Dades"),
        ),
        day(
            3,
            "Into the dunes",
            "Reach Merzouga by afternoon and swap the 4x4 for camels at the dune edge.",
            &["Camel trek", "Berber drumming at camp"],
            &["breakfast", "dinner"],
            Some("Desert camp"),
        ),
    ]);
    draft.faqs = RecordListEditor::from_records(vec![faq(
        "How cold are desert nights?",
        "In spring and autumn it drops to around 8 °C after midnight; the \
         camp provides thick blankets, but bring a warm layer.",
    )]);
    draft
}

fn packing_post() -> BlogPostDraft {
    let mut draft = BlogPostDraft::new();
    draft.title = "Packing for the Himalayas: what actually goes in the duffel".to_string();
    draft.excerpt = "Our guides see the same five packing mistakes every season. \
        Here is the list we wish every trekker read first."
        .to_string();
    draft.body = "<p>Layers beat bulk. A down jacket you can compress, two \
        synthetic base layers, and a shell will cover everything the \
        Annapurna region throws at you between March and November.</p>\
        <p>Leave the jeans at the hotel. Cotton stays wet, and wet at \
        3,000&nbsp;m is a problem.</p>"
        .to_string();
    draft.author = "Maya Gurung".to_string();
    draft.published = true;
    draft.tags.push("packing");
    draft.tags.push("trekking");
    draft.tags.push("nepal");
    draft
}

fn teahouse_post() -> BlogPostDraft {
    let mut draft = BlogPostDraft::new();
    draft.title = "What staying in a teahouse is really like".to_string();
    draft.excerpt = "Plywood walls, dal bhat refills, and the warmest dining \
        rooms in the mountains - a short field guide to teahouse etiquette."
        .to_string();
    draft.body = "<p>A teahouse is a family home first and a lodge second. \
        Order dinner where you sleep, charge your battery at the dining-room \
        socket, and remember the menu prices climb with the altitude because \
        everything on it climbed too - on somebody's back.</p>"
        .to_string();
    draft.author = "Tom Askey".to_string();
    draft.published = true;
    draft.tags.push("nepal");
    draft.tags.push("culture");
    draft
}

fn pages() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        (
            "privacy-policy",
            "Privacy Policy",
            "We store the details you submit through our booking and contact \
             forms solely to operate your trip. We never sell personal data. \
             Newsletter addresses are kept until you unsubscribe.",
        ),
        (
            "terms-of-service",
            "Terms of Service",
            "Bookings are confirmed once our team verifies availability and \
             you receive a confirmation email. Prices are per person unless \
             stated otherwise. Local taxes may apply.",
        ),
        (
            "cancellation-policy",
            "Cancellation Policy",
            "Free cancellation up to 30 days before departure. Between 30 and \
             14 days we retain the deposit. Within 14 days the full amount is \
             due, unless we can refill your place.",
        ),
    ]
}
