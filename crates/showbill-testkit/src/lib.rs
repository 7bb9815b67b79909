// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use showbill_app::{Pokemon, Show, ShowId, Stats, Venue};
use time::{Date, Month, Time};

/// Minimal show builder for filter and render tests. The venue block is
/// filled from the source tag the way the upstream scraper does.
pub fn show(name: &str, source: &str) -> Show {
    let venue_name = match source {
        "harlows" => Some("Harlow's"),
        "ace_of_spades" => Some("Ace of Spades"),
        "cafe_colonial" => Some("Cafe Colonial"),
        _ => None,
    };
    Show {
        id: ShowId::derive(source, None, name, None),
        name: name.to_owned(),
        url: None,
        local_date: None,
        local_time: None,
        date_tba: true,
        time_tba: true,
        status: None,
        image: None,
        price_min: None,
        price_max: None,
        currency: None,
        genre: None,
        venue: Venue {
            name: venue_name.map(str::to_owned),
            address: None,
            city: Some("Sacramento".to_owned()),
            state: Some("CA".to_owned()),
            postal_code: None,
        },
        source: source.to_owned(),
    }
}

pub fn show_with_date(name: &str, source: &str, year: i32, month: Month, day: u8) -> Show {
    let date = Date::from_calendar_date(year, month, day).expect("valid calendar date");
    let mut built = show(name, source);
    built.id = ShowId::derive(source, None, name, Some(date));
    built.local_date = Some(date);
    built.local_time = Time::from_hms(19, 0, 0).ok();
    built.date_tba = false;
    built.time_tba = false;
    built
}

/// The three-venue set used by the filter scenarios.
pub fn sample_shows() -> Vec<Show> {
    vec![
        show_with_date("Night Moves", "harlows", 2026, Month::September, 12),
        show_with_date("Metal Monday", "ace_of_spades", 2026, Month::September, 14),
        show("Open Mic", "cafe_colonial"),
    ]
}

pub fn pokemon(id: u32, name: &str, types: &[&str]) -> Pokemon {
    Pokemon {
        id,
        name: name.to_owned(),
        sprite: Some(format!(
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{id}.png"
        )),
        types: types.iter().map(|kind| (*kind).to_owned()).collect(),
        stats: Stats {
            hp: 35 + id % 60,
            attack: 40 + id % 50,
            defense: 30 + id % 70,
        },
        height: 7,
        weight: 69,
        species_url: Some(format!("https://pokeapi.co/api/v2/pokemon-species/{id}/")),
    }
}

/// A pokedex slice that includes the 25-versus-250 search pair.
pub fn sample_pokedex() -> Vec<Pokemon> {
    vec![
        pokemon(1, "bulbasaur", &["grass", "poison"]),
        pokemon(6, "charizard", &["fire", "flying"]),
        pokemon(25, "pikachu", &["electric"]),
        pokemon(250, "ho-oh", &["fire", "flying"]),
    ]
}

/// Feed envelope JSON as the shows API serves it, for mock servers and
/// fallback snapshot files.
pub fn feed_json(shows: &[Show]) -> String {
    let events = serde_json::to_value(shows).expect("encode shows");
    serde_json::json!({ "events": events, "error": null }).to_string()
}

#[cfg(test)]
mod tests {
    use super::{feed_json, sample_pokedex, sample_shows};
    use showbill_app::Show;

    #[test]
    fn sample_shows_cover_three_sources() {
        let shows = sample_shows();
        let sources: Vec<&str> = shows.iter().map(|show| show.source.as_str()).collect();
        assert_eq!(sources, vec!["harlows", "ace_of_spades", "cafe_colonial"]);
    }

    #[test]
    fn sample_pokedex_contains_the_exact_match_pair() {
        let dex = sample_pokedex();
        assert!(dex.iter().any(|p| p.id == 25));
        assert!(dex.iter().any(|p| p.id == 250));
    }

    #[test]
    fn feed_json_round_trips() {
        let encoded = feed_json(&sample_shows());
        let value: serde_json::Value = serde_json::from_str(&encoded).expect("valid json");
        let events = value.get("events").expect("events key");
        let decoded: Vec<Show> =
            serde_json::from_value(events.clone()).expect("decode events array");
        assert_eq!(decoded, sample_shows());
    }
}
