// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, Time};

use crate::ids::ShowId;

/// Venue block attached to a show. Every field is optional; the scraper
/// upstream fills in what it can and the renderer substitutes "TBA".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// One event record from the shows feed. Immutable once fetched; the wire
/// shape follows the upstream scraper (camelCase keys, nullable everything).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: ShowId,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, with = "serde_local_date")]
    pub local_date: Option<Date>,
    #[serde(default, with = "serde_local_time")]
    pub local_time: Option<Time>,
    #[serde(default, rename = "dateTBA")]
    pub date_tba: bool,
    #[serde(default, rename = "timeTBA")]
    pub time_tba: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub venue: Venue,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub hp: u32,
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
}

/// One entry of the pokedex variant. Category tags are the type names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub species_url: Option<String>,
}

/// Seam between the filter engine and the two record kinds. The engine only
/// sees identifiers, searchable text, and category tags.
pub trait Record {
    fn ident(&self) -> String;
    fn display_name(&self) -> &str;
    fn search_fields(&self) -> Vec<&str>;
    fn tags(&self) -> Vec<&str>;

    /// Numeric identifier for kinds whose ids are dex-style numbers.
    /// Search matches it by exact string equality only, never substring.
    fn numeric_ident(&self) -> Option<u32> {
        None
    }
}

impl Record for Show {
    fn ident(&self) -> String {
        self.id.as_str().to_owned()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        for field in [&self.venue.name, &self.venue.city, &self.venue.state] {
            if let Some(value) = field {
                fields.push(value.as_str());
            }
        }
        fields
    }

    fn tags(&self) -> Vec<&str> {
        vec![self.source.as_str()]
    }
}

impl Record for Pokemon {
    fn ident(&self) -> String {
        self.id.to_string()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn tags(&self) -> Vec<&str> {
        self.types.iter().map(String::as_str).collect()
    }

    fn numeric_ident(&self) -> Option<u32> {
        Some(self.id)
    }
}

/// Registry of category tags to display labels. Known venue tags carry
/// curated labels; anything else (pokedex types included) is humanized
/// from the raw tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRegistry {
    labels: BTreeMap<String, String>,
}

impl TagRegistry {
    pub fn builtin() -> Self {
        let mut labels = BTreeMap::new();
        for (tag, label) in [
            ("harlows", "Harlow's"),
            ("the_starlet_room", "The Starlet Room"),
            ("ace_of_spades", "Ace of Spades"),
            ("cafe_colonial", "Cafe Colonial"),
            ("channel_24", "Channel 24"),
            ("goldfield_trading_post", "Goldfield Trading Post"),
            ("old_ironsides", "Old Ironsides"),
            ("the_boardwalk", "The Boardwalk"),
        ] {
            labels.insert(tag.to_owned(), label.to_owned());
        }
        Self { labels }
    }

    pub fn label(&self, tag: &str) -> String {
        match self.labels.get(tag) {
            Some(label) => label.clone(),
            None => humanize_tag(tag),
        }
    }

    /// Distinct tags present in the fetched records, in first-seen order.
    /// This is the startup validation point: the filter panel is built from
    /// what the data actually contains, not from the registry alone.
    pub fn reconcile<R: Record>(&self, records: &[R]) -> Vec<String> {
        let mut seen = Vec::new();
        for record in records {
            for tag in record.tags() {
                if !seen.iter().any(|existing: &String| existing == tag) {
                    seen.push(tag.to_owned());
                }
            }
        }
        seen
    }
}

fn humanize_tag(tag: &str) -> String {
    tag.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

mod serde_local_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::macros::format_description;

    const FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
        format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_some(
                &date
                    .format(FORMAT)
                    .map_err(|error| serde::ser::Error::custom(error.to_string()))?,
            ),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(text) => Date::parse(&text, FORMAT)
                .map(Some)
                .map_err(|error| serde::de::Error::custom(format!("bad date {text:?}: {error}"))),
            None => Ok(None),
        }
    }
}

mod serde_local_time {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Time;
    use time::macros::format_description;

    const WITH_SECONDS: &[time::format_description::BorrowedFormatItem<'static>] =
        format_description!("[hour]:[minute]:[second]");
    const WITHOUT_SECONDS: &[time::format_description::BorrowedFormatItem<'static>] =
        format_description!("[hour]:[minute]");

    pub fn serialize<S: Serializer>(value: &Option<Time>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_some(
                &time
                    .format(WITH_SECONDS)
                    .map_err(|error| serde::ser::Error::custom(error.to_string()))?,
            ),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Time>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(text) => Time::parse(&text, WITH_SECONDS)
                .or_else(|_| Time::parse(&text, WITHOUT_SECONDS))
                .map(Some)
                .map_err(|error| serde::de::Error::custom(format!("bad time {text:?}: {error}"))),
            None => Ok(None),
        }
    }
}
