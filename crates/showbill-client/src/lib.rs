// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use showbill_app::{Pokemon, Show, Stats};
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("cannot reach feed: {detail}")]
    Network { detail: String },
    #[error("request timed out")]
    Timeout,
    #[error("server returned {status}")]
    BadStatus { status: u16 },
    #[error("malformed response: {detail}")]
    Decode { detail: String },
    #[error("fallback file unusable: {detail}")]
    Fallback { detail: String },
    #[error("detail lookup failed: {detail}")]
    SecondaryFetch { detail: String },
}

impl FetchError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network {
                detail: error.to_string(),
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Feed result plus whether it came from the bundled fallback file
/// instead of the live endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOutcome {
    pub shows: Vec<Show>,
    pub from_fallback: bool,
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    #[serde(default)]
    events: Vec<Show>,
    #[serde(default)]
    error: Option<String>,
}

fn decode_feed(body: &str) -> Result<Vec<Show>, FetchError> {
    let envelope: FeedEnvelope = serde_json::from_str(body).map_err(|error| FetchError::Decode {
        detail: error.to_string(),
    })?;
    match envelope.error {
        // An envelope error alongside a populated list means the server
        // answered from its stale cache; serve the list anyway.
        Some(detail) if envelope.events.is_empty() => Err(FetchError::Network { detail }),
        _ => Ok(envelope.events),
    }
}

#[derive(Debug, Clone)]
pub struct ShowsClient {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl ShowsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("feed.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the event feed. `refresh` asks the feed to bypass its
    /// server-side cache and re-scrape.
    pub fn fetch_shows(&self, refresh: bool) -> Result<Vec<Show>, FetchError> {
        let mut url = format!("{}/events", self.base_url);
        if refresh {
            url.push_str("?refresh=true");
        }

        let response = self
            .http
            .get(url)
            .send()
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(FetchError::from_transport)?;
        decode_feed(&body)
    }
}

/// Loads the feed, falling back to a bundled snapshot file when the live
/// endpoint is unreachable, times out, or errors. Decode failures on a
/// live 2xx body do not fall back; that is a bug worth surfacing, not an
/// outage to paper over.
pub fn load_show_feed(
    client: &ShowsClient,
    refresh: bool,
    fallback_path: Option<&Path>,
) -> Result<FeedOutcome, FetchError> {
    let fetch_error = match client.fetch_shows(refresh) {
        Ok(shows) => {
            return Ok(FeedOutcome {
                shows,
                from_fallback: false,
            });
        }
        Err(error @ FetchError::Decode { .. }) => return Err(error),
        Err(error) => error,
    };

    let Some(path) = fallback_path else {
        return Err(fetch_error);
    };

    // Keep the primary failure in the message so callers can still tell a
    // timeout from an unreachable host when the snapshot is also broken.
    let fallback_failure = |error: &dyn std::fmt::Display| FetchError::Fallback {
        detail: format!("{fetch_error}; fallback {}: {error}", path.display()),
    };
    let body = fs::read_to_string(path).map_err(|error| fallback_failure(&error))?;
    let shows = decode_feed(&body).map_err(|error| fallback_failure(&error))?;

    Ok(FeedOutcome {
        shows,
        from_fallback: true,
    })
}

/// Roster row from the list endpoint; the detail URL is fetched per entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct RosterEnvelope {
    results: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    id: u32,
    name: String,
    sprites: SpriteBody,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    stats: Vec<StatSlot>,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    species: Option<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct SpriteBody {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: Option<String>,
}

impl DetailBody {
    fn into_pokemon(self) -> Pokemon {
        let mut stats = Stats::default();
        for slot in &self.stats {
            match slot.stat.name.as_str() {
                "hp" => stats.hp = slot.base_stat,
                "attack" => stats.attack = slot.base_stat,
                "defense" => stats.defense = slot.base_stat,
                _ => {}
            }
        }

        Pokemon {
            id: self.id,
            name: self.name,
            sprite: self.sprites.front_default,
            types: self.types.into_iter().map(|slot| slot.kind.name).collect(),
            stats,
            height: self.height,
            weight: self.weight,
            species_url: self.species.and_then(|species| species.url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpeciesBody {
    #[serde(default)]
    flavor_text_entries: Vec<FlavorEntry>,
}

#[derive(Debug, Deserialize)]
struct FlavorEntry {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Debug, Clone)]
pub struct PokedexClient {
    base_url: String,
    http: HttpClient,
}

impl PokedexClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("pokedex.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_roster(&self, limit: u32) -> Result<Vec<RosterEntry>, FetchError> {
        let body = self.get_text(&format!("{}/pokemon?limit={limit}", self.base_url))?;
        let envelope: RosterEnvelope =
            serde_json::from_str(&body).map_err(|error| FetchError::Decode {
                detail: error.to_string(),
            })?;
        Ok(envelope.results)
    }

    /// Fetches every roster entry's detail record concurrently and returns
    /// them sorted by dex number, regardless of arrival order. One bad
    /// entry fails the whole load.
    pub fn fetch_details(&self, roster: &[RosterEntry]) -> Result<Vec<Pokemon>, FetchError> {
        let (sender, receiver) = mpsc::channel();
        let mut handles = Vec::with_capacity(roster.len());

        for entry in roster {
            let client = self.clone();
            let url = entry.url.clone();
            let sender = sender.clone();
            handles.push(thread::spawn(move || {
                let result = client.fetch_detail(&url);
                // Receiver only hangs up on early error return.
                let _ = sender.send(result);
            }));
        }
        drop(sender);

        let mut dex = Vec::with_capacity(roster.len());
        for result in receiver {
            dex.push(result?);
        }
        for handle in handles {
            let _ = handle.join();
        }

        dex.sort_by_key(|pokemon| pokemon.id);
        Ok(dex)
    }

    fn fetch_detail(&self, url: &str) -> Result<Pokemon, FetchError> {
        let body = self.get_text(url)?;
        let detail: DetailBody =
            serde_json::from_str(&body).map_err(|error| FetchError::Decode {
                detail: error.to_string(),
            })?;
        Ok(detail.into_pokemon())
    }

    /// Secondary lookup for the detail modal: the English flavor text from
    /// the species endpoint, with the source's embedded line breaks and
    /// page-feed characters flattened to spaces.
    pub fn fetch_species(&self, species_url: &str) -> Result<String, FetchError> {
        let run = || -> Result<String, FetchError> {
            let body = self.get_text(species_url)?;
            let species: SpeciesBody =
                serde_json::from_str(&body).map_err(|error| FetchError::Decode {
                    detail: error.to_string(),
                })?;

            let flavor = species
                .flavor_text_entries
                .into_iter()
                .find(|entry| entry.language.name == "en")
                .map(|entry| entry.flavor_text)
                .unwrap_or_default();

            Ok(flavor
                .split(['\n', '\u{c}'])
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "))
        };

        run().map_err(|error| FetchError::SecondaryFetch {
            detail: error.to_string(),
        })
    }

    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
            });
        }

        response.text().map_err(FetchError::from_transport)
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchError, decode_feed};

    #[test]
    fn decode_feed_reads_the_events_envelope() {
        let shows = decode_feed(r#"{"events":[],"error":null}"#).unwrap();
        assert!(shows.is_empty());
    }

    #[test]
    fn envelope_error_with_no_events_is_a_network_failure() {
        let error = decode_feed(r#"{"events":[],"error":"scrape failed"}"#).unwrap_err();
        assert!(matches!(error, FetchError::Network { detail } if detail == "scrape failed"));
    }

    #[test]
    fn stale_cache_with_envelope_error_still_serves_the_list() {
        let events = serde_json::to_string(&showbill_testkit::sample_shows()).unwrap();
        let body = format!(r#"{{"events":{events},"error":"refresh failed"}}"#);
        let shows = decode_feed(&body).unwrap();
        assert_eq!(shows.len(), 3);
    }

    #[test]
    fn decode_feed_rejects_non_json() {
        let error = decode_feed("<html>guru meditation</html>").unwrap_err();
        assert!(matches!(error, FetchError::Decode { .. }));
    }

    #[test]
    fn detail_body_maps_the_named_stat_slots() {
        let body = r#"{
            "id": 25,
            "name": "pikachu",
            "sprites": {"front_default": "https://img.example/25.png"},
            "types": [{"type": {"name": "electric"}}],
            "stats": [
                {"base_stat": 35, "stat": {"name": "hp"}},
                {"base_stat": 55, "stat": {"name": "attack"}},
                {"base_stat": 40, "stat": {"name": "defense"}},
                {"base_stat": 90, "stat": {"name": "speed"}}
            ],
            "height": 4,
            "weight": 60,
            "species": {"name": "pikachu", "url": "https://api.example/species/25/"}
        }"#;
        let detail: super::DetailBody = serde_json::from_str(body).unwrap();
        let pokemon = detail.into_pokemon();
        assert_eq!(pokemon.id, 25);
        assert_eq!(pokemon.stats.hp, 35);
        assert_eq!(pokemon.stats.attack, 55);
        assert_eq!(pokemon.stats.defense, 40);
        assert_eq!(pokemon.types, vec!["electric".to_owned()]);
        assert_eq!(
            pokemon.species_url.as_deref(),
            Some("https://api.example/species/25/")
        );
    }
}
