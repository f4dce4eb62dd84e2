//! Static translations for API-facing labels
//!
//! A plain key-to-string dictionary per locale. Lookups fall back to
//! English, then to the key itself, so a missing entry never breaks a
//! response.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::WayfarerError;

/// Locales the public API can label responses in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
    Fr,
}

impl Locale {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = WayfarerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            "fr" => Ok(Locale::Fr),
            other => Err(WayfarerError::validation(format!(
                "Unsupported locale '{other}'. Must be one of: en, de, fr"
            ))),
        }
    }
}

macro_rules! dictionary {
    ($($key:literal => $value:literal),* $(,)?) => {
        LazyLock::new(|| HashMap::from([$(($key, $value)),*]))
    };
}

static EN: LazyLock<HashMap<&'static str, &'static str>> = dictionary! {
    "difficulty.easy" => "Easy",
    "difficulty.moderate" => "Moderate",
    "difficulty.challenging" => "Challenging",
    "difficulty.extreme" => "Extreme",
    "booking.status.pending" => "Pending",
    "booking.status.confirmed" => "Confirmed",
    "booking.status.cancelled" => "Cancelled",
    "month.january" => "January",
    "month.february" => "February",
    "month.march" => "March",
    "month.april" => "April",
    "month.may" => "May",
    "month.june" => "June",
    "month.july" => "July",
    "month.august" => "August",
    "month.september" => "September",
    "month.october" => "October",
    "month.november" => "November",
    "month.december" => "December",
};

static DE: LazyLock<HashMap<&'static str, &'static str>> = dictionary! {
    "difficulty.easy" => "Leicht",
    "difficulty.moderate" => "Mittel",
    "difficulty.challenging" => "Anspruchsvoll",
    "difficulty.extreme" => "Extrem",
    "booking.status.pending" => "Ausstehend",
    "booking.status.confirmed" => "Bestätigt",
    "booking.status.cancelled" => "Storniert",
    "month.january" => "Januar",
    "month.february" => "Februar",
    "month.march" => "März",
    "month.april" => "April",
    "month.may" => "Mai",
    "month.june" => "Juni",
    "month.july" => "Juli",
    "month.august" => "August",
    "month.september" => "September",
    "month.october" => "Oktober",
    "month.november" => "November",
    "month.december" => "Dezember",
};

static FR: LazyLock<HashMap<&'static str, &'static str>> = dictionary! {
    "difficulty.easy" => "Facile",
    "difficulty.moderate" => "Modéré",
    "difficulty.challenging" => "Difficile",
    "difficulty.extreme" => "Extrême",
    "booking.status.pending" => "En attente",
    "booking.status.confirmed" => "Confirmée",
    "booking.status.cancelled" => "Annulée",
    "month.january" => "Janvier",
    "month.february" => "Février",
    "month.march" => "Mars",
    "month.april" => "Avril",
    "month.may" => "Mai",
    "month.june" => "Juin",
    "month.july" => "Juillet",
    "month.august" => "Août",
    "month.september" => "Septembre",
    "month.october" => "Octobre",
    "month.november" => "Novembre",
    "month.december" => "Décembre",
};

fn dictionary_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    match locale {
        Locale::En => &EN,
        Locale::De => &DE,
        Locale::Fr => &FR,
    }
}

/// Look up a label, falling back to English and finally to the key itself
#[must_use]
pub fn translate(locale: Locale, key: &str) -> &str {
    if let Some(value) = dictionary_for(locale).get(key) {
        return value;
    }
    if let Some(value) = EN.get(key) {
        return value;
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_per_locale() {
        assert_eq!(translate(Locale::En, "difficulty.easy"), "Easy");
        assert_eq!(translate(Locale::De, "difficulty.easy"), "Leicht");
        assert_eq!(translate(Locale::Fr, "difficulty.easy"), "Facile");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(translate(Locale::De, "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("de".parse::<Locale>().unwrap(), Locale::De);
        assert_eq!("FR".parse::<Locale>().unwrap(), Locale::Fr);
        assert!("es".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn test_dictionaries_cover_same_keys() {
        for key in EN.keys() {
            assert!(DE.contains_key(key), "missing German label for {key}");
            assert!(FR.contains_key(key), "missing French label for {key}");
        }
    }
}
