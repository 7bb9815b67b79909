// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use showbill_app::{Pokemon, Record, Show, TagRegistry};
use time::macros::format_description;
use time::{Date, Time};

use crate::html::safe_image_url;

/// Shared card projection: both record kinds flatten into this before the
/// grid renderer sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub ident: String,
    pub title: String,
    pub image: String,
    pub tag_labels: Vec<String>,
    pub detail_lines: Vec<String>,
}

impl Card {
    pub fn from_show(show: &Show, registry: &TagRegistry) -> Self {
        let mut detail_lines = vec![venue_line(show), date_line(show)];
        if let Some(price) = price_line(show.price_min, show.price_max) {
            detail_lines.push(price);
        }
        Self {
            ident: show.ident(),
            title: show.name.clone(),
            image: safe_image_url(show.image.as_deref(), show.id.as_str()),
            tag_labels: vec![registry.label(&show.source)],
            detail_lines,
        }
    }

    pub fn from_pokemon(pokemon: &Pokemon, registry: &TagRegistry) -> Self {
        Self {
            ident: pokemon.ident(),
            title: pokemon.name.clone(),
            image: safe_image_url(pokemon.sprite.as_deref(), &pokemon.ident()),
            tag_labels: pokemon
                .types
                .iter()
                .map(|kind| registry.label(kind))
                .collect(),
            detail_lines: vec![format!("#{:03}", pokemon.id)],
        }
    }
}

fn venue_line(show: &Show) -> String {
    let name = show.venue.name.as_deref().unwrap_or("Venue TBA");
    match (show.venue.city.as_deref(), show.venue.state.as_deref()) {
        (Some(city), Some(state)) => format!("{name} — {city}, {state}"),
        (Some(city), None) => format!("{name} — {city}"),
        _ => name.to_owned(),
    }
}

fn date_line(show: &Show) -> String {
    let date = if show.date_tba {
        None
    } else {
        show.local_date
    };
    let time = if show.time_tba {
        None
    } else {
        show.local_time
    };
    match (date, time) {
        (Some(date), Some(time)) => format!("{} · {}", format_date(date), format_time(time)),
        (Some(date), None) => format_date(date),
        _ => "Date TBA".to_owned(),
    }
}

pub(crate) fn format_date(date: Date) -> String {
    date.format(format_description!(
        "[weekday repr:short] [month repr:short] [day padding:none]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

pub(crate) fn format_time(time: Time) -> String {
    time.format(format_description!(
        "[hour repr:12 padding:none]:[minute] [period]"
    ))
    .unwrap_or_else(|_| time.to_string())
}

pub(crate) fn price_line(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(low), Some(high)) if (high - low).abs() > f64::EPSILON => {
            Some(format!("${low}–${high}"))
        }
        (Some(only), _) | (None, Some(only)) => Some(format!("${only}")),
        (None, None) => None,
    }
}
