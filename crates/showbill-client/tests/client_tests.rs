// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use showbill_client::{FetchError, PokedexClient, ShowsClient, load_show_feed};
use showbill_testkit::{feed_json, sample_shows};
use std::io::Write;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_response(body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(200)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn fetch_shows_parses_the_feed_envelope() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/events");
        request
            .respond(json_response(feed_json(&sample_shows())))
            .expect("response should succeed");
    });

    let client = ShowsClient::new(&addr, Duration::from_secs(1))?;
    let shows = client.fetch_shows(false).map_err(|error| anyhow!(error))?;
    assert_eq!(shows.len(), 3);
    assert_eq!(shows[0].name, "Night Moves");
    assert_eq!(shows[0].source, "harlows");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn refresh_asks_the_feed_to_bypass_its_cache() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/events?refresh=true");
        request
            .respond(json_response(feed_json(&[])))
            .expect("response should succeed");
    });

    let client = ShowsClient::new(&addr, Duration::from_secs(1))?;
    let shows = client.fetch_shows(true).map_err(|error| anyhow!(error))?;
    assert!(shows.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn non_success_status_is_reported_with_the_code() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(Response::from_string("scraper down").with_status_code(503))
            .expect("response should succeed");
    });

    let client = ShowsClient::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_shows(false)
        .expect_err("503 should not parse as a feed");
    assert!(matches!(error, FetchError::BadStatus { status: 503 }));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn slow_server_surfaces_a_timeout_not_a_generic_network_error() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        thread::sleep(Duration::from_millis(400));
        let _ = request.respond(json_response(feed_json(&[])));
    });

    let client = ShowsClient::new(&addr, Duration::from_millis(100))?;
    let error = client
        .fetch_shows(false)
        .expect_err("response past the deadline should time out");
    assert!(error.is_timeout(), "got {error}");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_feed_falls_back_to_the_bundled_snapshot() -> Result<()> {
    let mut fallback = tempfile::NamedTempFile::new()?;
    fallback.write_all(feed_json(&sample_shows()).as_bytes())?;

    let client = ShowsClient::new("http://127.0.0.1:1", Duration::from_millis(50))?;
    let outcome = load_show_feed(&client, false, Some(fallback.path()))
        .map_err(|error| anyhow!(error))?;

    assert!(outcome.from_fallback);
    assert_eq!(outcome.shows.len(), 3);
    Ok(())
}

#[test]
fn missing_fallback_file_is_its_own_error() -> Result<()> {
    let client = ShowsClient::new("http://127.0.0.1:1", Duration::from_millis(50))?;
    let error = load_show_feed(
        &client,
        false,
        Some(std::path::Path::new("/nonexistent/shows.json")),
    )
    .expect_err("no server, no file");
    assert!(matches!(error, FetchError::Fallback { .. }));
    let message = error.to_string();
    assert!(
        message.contains("cannot reach feed") || message.contains("timed out"),
        "fallback error should name the primary failure: {message}"
    );
    Ok(())
}

#[test]
fn unreachable_feed_without_a_fallback_keeps_the_network_error() -> Result<()> {
    let client = ShowsClient::new("http://127.0.0.1:1", Duration::from_millis(50))?;
    let error = load_show_feed(&client, false, None).expect_err("nothing to fall back to");
    assert!(matches!(
        error,
        FetchError::Network { .. } | FetchError::Timeout
    ));
    Ok(())
}

fn detail_json(id: u32, name: &str, kind: &str) -> String {
    format!(
        r#"{{
            "id": {id},
            "name": "{name}",
            "sprites": {{"front_default": "https://img.example/{id}.png"}},
            "types": [{{"type": {{"name": "{kind}"}}}}],
            "stats": [
                {{"base_stat": 35, "stat": {{"name": "hp"}}}},
                {{"base_stat": 55, "stat": {{"name": "attack"}}}},
                {{"base_stat": 40, "stat": {{"name": "defense"}}}}
            ],
            "height": 4,
            "weight": 60,
            "species": {{"name": "{name}", "url": "https://api.example/species/{id}/"}}
        }}"#
    )
}

#[test]
fn pokedex_details_arrive_sorted_by_dex_number() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let roster_body = format!(
        r#"{{"results":[
            {{"name":"pikachu","url":"{addr}/pokemon/25/"}},
            {{"name":"bulbasaur","url":"{addr}/pokemon/1/"}},
            {{"name":"charizard","url":"{addr}/pokemon/6/"}}
        ]}}"#
    );

    let handle = thread::spawn(move || {
        for _ in 0..4 {
            let request = server.recv().expect("request expected");
            let body = match request.url() {
                "/pokemon?limit=3" => roster_body.clone(),
                "/pokemon/1/" => detail_json(1, "bulbasaur", "grass"),
                "/pokemon/6/" => detail_json(6, "charizard", "fire"),
                "/pokemon/25/" => detail_json(25, "pikachu", "electric"),
                other => panic!("unexpected url {other}"),
            };
            request
                .respond(json_response(body))
                .expect("response should succeed");
        }
    });

    let client = PokedexClient::new(&addr, Duration::from_secs(1))?;
    let roster = client.fetch_roster(3).map_err(|error| anyhow!(error))?;
    assert_eq!(roster.len(), 3);

    let dex = client
        .fetch_details(&roster)
        .map_err(|error| anyhow!(error))?;
    let ids: Vec<u32> = dex.iter().map(|pokemon| pokemon.id).collect();
    assert_eq!(ids, vec![1, 6, 25]);
    assert_eq!(dex[2].name, "pikachu");
    assert_eq!(dex[2].types, vec!["electric".to_owned()]);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn species_lookup_returns_flattened_english_flavor_text() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/pokemon-species/25/");
        let body = concat!(
            r#"{"flavor_text_entries":["#,
            r#"{"flavor_text":"Als premier.","language":{"name":"de"}},"#,
            "{\"flavor_text\":\"When several of\\nthese POK\\u00e9MON\\fgather.\",",
            r#""language":{"name":"en"}}"#,
            r#"]}"#,
        );
        request
            .respond(json_response(body.to_owned()))
            .expect("response should succeed");
    });

    let client = PokedexClient::new(&addr, Duration::from_secs(1))?;
    let flavor = client
        .fetch_species(&format!("{addr}/pokemon-species/25/"))
        .map_err(|error| anyhow!(error))?;
    assert_eq!(flavor, "When several of these POKéMON gather.");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn species_failures_are_scoped_as_secondary_fetch_errors() -> Result<()> {
    let client = PokedexClient::new("http://127.0.0.1:1", Duration::from_millis(50))?;
    let error = client
        .fetch_species("http://127.0.0.1:1/pokemon-species/25/")
        .expect_err("no server listening");
    assert!(matches!(error, FetchError::SecondaryFetch { .. }));
    Ok(())
}
