// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use showbill_app::{Pokemon, Record, Show, TagRegistry};

use crate::card::{format_date, format_time, price_line};
use crate::html::{escape_html, safe_image_url, safe_link_url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalFact {
    pub label: &'static str,
    pub value: String,
}

/// Detail overlay projection. Built fully before any markup is emitted, so
/// a failed secondary lookup never produces a half-rendered dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub ident: String,
    pub title: String,
    pub image: String,
    pub facts: Vec<ModalFact>,
    pub body: String,
    pub action: Option<(String, String)>,
}

impl Modal {
    pub fn from_show(show: &Show, registry: &TagRegistry) -> Self {
        let date = match (show.date_tba, show.local_date) {
            (false, Some(date)) => format_date(date),
            _ => "TBA".to_owned(),
        };
        let time = match (show.time_tba, show.local_time) {
            (false, Some(time)) => format_time(time),
            _ => "TBA".to_owned(),
        };
        let mut facts = vec![
            ModalFact {
                label: "Date",
                value: date,
            },
            ModalFact {
                label: "Time",
                value: time,
            },
        ];
        if let Some(price) = price_line(show.price_min, show.price_max) {
            facts.push(ModalFact {
                label: "Price",
                value: price,
            });
        } else if let Some(status) = &show.status {
            facts.push(ModalFact {
                label: "Status",
                value: status.clone(),
            });
        }

        let mut body_parts = vec![registry.label(&show.source)];
        if let Some(address) = &show.venue.address {
            body_parts.push(address.clone());
        }
        if let Some(genre) = &show.genre {
            body_parts.push(genre.clone());
        }

        Self {
            ident: show.ident(),
            title: show.name.clone(),
            image: safe_image_url(show.image.as_deref(), show.id.as_str()),
            facts,
            body: body_parts.join(" · "),
            action: safe_link_url(show.url.as_deref())
                .map(|url| ("Get tickets".to_owned(), url)),
        }
    }

    /// The pokedex modal is only built once the species flavor text has
    /// been fetched; the controller closes instead when that lookup fails.
    pub fn from_pokemon(pokemon: &Pokemon, registry: &TagRegistry, flavor_text: &str) -> Self {
        let types = pokemon
            .types
            .iter()
            .map(|kind| registry.label(kind))
            .collect::<Vec<_>>()
            .join(" / ");
        Self {
            ident: pokemon.ident(),
            title: pokemon.name.clone(),
            image: safe_image_url(pokemon.sprite.as_deref(), &pokemon.ident()),
            facts: vec![
                ModalFact {
                    label: "Type",
                    value: types,
                },
                ModalFact {
                    label: "HP",
                    value: pokemon.stats.hp.to_string(),
                },
                ModalFact {
                    label: "ATK / DEF",
                    value: format!("{} / {}", pokemon.stats.attack, pokemon.stats.defense),
                },
            ],
            body: flavor_text.to_owned(),
            action: None,
        }
    }
}

/// Renders the overlay fragment: backdrop, dialog, close affordances, and
/// the optional external action link. `data-close` markers are what the
/// page shell wires the three dismiss paths to.
pub fn render_modal(modal: &Modal) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"modal-backdrop\" data-close=\"backdrop\">\n");
    out.push_str(&format!(
        "  <div class=\"modal-dialog\" role=\"dialog\" aria-modal=\"true\" data-ident=\"{}\">\n",
        escape_html(&modal.ident)
    ));
    out.push_str(
        "    <button class=\"modal-close\" data-close=\"button\" aria-label=\"Close\">&times;</button>\n",
    );
    out.push_str(&format!(
        "    <img class=\"modal-image\" src=\"{}\" alt=\"{}\">\n",
        escape_html(&modal.image),
        escape_html(&modal.title)
    ));
    out.push_str(&format!(
        "    <h2 class=\"modal-title\">{}</h2>\n",
        escape_html(&modal.title)
    ));
    out.push_str("    <ul class=\"modal-facts\">\n");
    for fact in &modal.facts {
        out.push_str(&format!(
            "      <li><span class=\"fact-label\">{}</span><span class=\"fact-value\">{}</span></li>\n",
            escape_html(fact.label),
            escape_html(&fact.value)
        ));
    }
    out.push_str("    </ul>\n");
    if !modal.body.is_empty() {
        out.push_str(&format!(
            "    <p class=\"modal-body\">{}</p>\n",
            escape_html(&modal.body)
        ));
    }
    if let Some((label, url)) = &modal.action {
        out.push_str(&format!(
            "    <a class=\"modal-action\" href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>\n",
            escape_html(url),
            escape_html(label)
        ));
    }
    out.push_str("  </div>\n</div>\n");
    out
}
