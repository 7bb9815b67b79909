// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use showbill_app::{FetchPhase, FilterState, Record, TagRegistry, apply};
use showbill_client::{FetchError, PokedexClient, ShowsClient, load_show_feed};
use showbill_ui::{Card, escape_html, render_active_tags, render_grid, render_results_count};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `showbill --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        // Constructing both clients validates base URLs and timeouts.
        ShowsClient::new(config.feed_base_url(), config.feed_timeout()?)?;
        PokedexClient::new(config.pokedex_base_url(), config.pokedex_timeout()?)?;
        return Ok(());
    }

    let page = if options.pokedex {
        render_pokedex_page(&config, &options)?
    } else {
        render_shows_page(&config, &options)?
    };

    match &options.out_path {
        Some(path) => fs::write(path, page)
            .with_context(|| format!("write output {}", path.display()))?,
        None => print!("{page}"),
    }
    Ok(())
}

fn render_shows_page(config: &Config, options: &CliOptions) -> Result<String> {
    let client = ShowsClient::new(config.feed_base_url(), config.feed_timeout()?)?;
    let fallback = config.feed_fallback_path();

    let mut phase = FetchPhase::default();
    phase.start();
    let outcome = match load_show_feed(&client, options.refresh, fallback.as_deref()) {
        Ok(outcome) => outcome,
        Err(error) => {
            phase.fail();
            return Err(feed_error(&client, error));
        }
    };
    phase.succeed(outcome.from_fallback);
    if phase.served_from_fallback() {
        eprintln!(
            "feed at {} unavailable, rendering from the bundled snapshot",
            client.base_url()
        );
    }

    let registry = TagRegistry::builtin();
    let filter = seeded_filter(options, &outcome.shows, &registry);
    let visible = apply(&outcome.shows, &filter);

    let cards: Vec<Card> = visible
        .iter()
        .take(config.page_size())
        .map(|show| Card::from_show(show, &registry))
        .collect();

    Ok(render_page(
        "Sacramento shows",
        &cards,
        visible.len(),
        outcome.shows.len(),
        &filter,
        &registry,
        phase.served_from_fallback(),
    ))
}

fn render_pokedex_page(config: &Config, options: &CliOptions) -> Result<String> {
    let client = PokedexClient::new(config.pokedex_base_url(), config.pokedex_timeout()?)?;

    let mut phase = FetchPhase::default();
    phase.start();
    let dex = match client
        .fetch_roster(config.roster_limit())
        .and_then(|roster| client.fetch_details(&roster))
    {
        Ok(dex) => dex,
        Err(error) => {
            phase.fail();
            return Err(anyhow!(error))
                .with_context(|| format!("load pokedex from {}", client.base_url()));
        }
    };
    phase.succeed(false);

    let registry = TagRegistry::builtin();
    let filter = seeded_filter(options, &dex, &registry);
    let visible = apply(&dex, &filter);

    let cards: Vec<Card> = visible
        .iter()
        .take(config.page_size())
        .map(|pokemon| Card::from_pokemon(pokemon, &registry))
        .collect();

    Ok(render_page(
        "Pokedex",
        &cards,
        visible.len(),
        dex.len(),
        &filter,
        &registry,
        phase.served_from_fallback(),
    ))
}

fn seeded_filter<R: Record>(
    options: &CliOptions,
    records: &[R],
    registry: &TagRegistry,
) -> FilterState {
    let mut filter = FilterState::seeded(options.query.as_deref());
    let known = registry.reconcile(records);
    for tag in &options.tags {
        if known.iter().any(|candidate| candidate == tag) {
            filter.toggle_tag(tag);
        } else {
            eprintln!("ignoring unknown tag {tag:?}");
        }
    }
    filter
}

fn render_page(
    title: &str,
    cards: &[Card],
    shown: usize,
    total: usize,
    filter: &FilterState,
    registry: &TagRegistry,
    from_fallback: bool,
) -> String {
    let labels: Vec<String> = filter
        .selected()
        .iter()
        .map(|tag| registry.label(tag))
        .collect();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    if from_fallback {
        out.push_str("<p class=\"notice\">Live feed unavailable; showing a saved snapshot.</p>\n");
    }
    // The counter fragment is already markup; escaping it would flatten the span.
    out.push_str(&format!(
        "<p class=\"count\">{}</p>\n",
        render_results_count(shown, total)
    ));
    let active = render_active_tags(&labels);
    if !active.is_empty() {
        out.push_str(&active);
        out.push('\n');
    }
    out.push_str(&render_grid(cards));
    out.push_str("\n</body>\n</html>\n");
    out
}

fn feed_error(client: &ShowsClient, error: FetchError) -> anyhow::Error {
    if error.is_timeout() {
        anyhow!(
            "feed at {} did not answer within {:?}; raise feed.timeout or set feed.fallback_path",
            client.base_url(),
            client.timeout()
        )
    } else {
        anyhow!(error).context(format!("load show feed from {}", client.base_url()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    query: Option<String>,
    tags: Vec<String>,
    refresh: bool,
    pokedex: bool,
    out_path: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        query: None,
        tags: Vec::new(),
        refresh: false,
        pokedex: false,
        out_path: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--q" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--q requires a search term"))?;
                options.query = Some(value.as_ref().to_owned());
            }
            "--tag" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--tag requires a tag name"))?;
                options.tags.push(value.as_ref().to_owned());
            }
            "--out" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--out requires a file path"))?;
                options.out_path = Some(PathBuf::from(value.as_ref()));
            }
            "--refresh" => {
                options.refresh = true;
            }
            "--pokedex" => {
                options.pokedex = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    if options.refresh && options.pokedex {
        bail!("--refresh only applies to the show feed, not --pokedex");
    }

    Ok(options)
}

fn print_help() {
    println!("showbill");
    println!("  --config <path>          Use a specific config path");
    println!("  --q <term>               Seed the search filter");
    println!("  --tag <tag>              Select a category tag (repeatable)");
    println!("  --refresh                Ask the feed to re-scrape instead of serving its cache");
    println!("  --pokedex                Render the pokedex instead of the show feed");
    println!("  --out <path>             Write the rendered page to a file instead of stdout");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config without fetching");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args, render_page, seeded_filter};
    use anyhow::Result;
    use showbill_app::TagRegistry;
    use showbill_testkit::sample_shows;
    use showbill_ui::Card;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/showbill-config.toml")
    }

    fn parsed(args: Vec<&str>) -> Result<CliOptions> {
        parse_cli_args(args, default_options_path())
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parsed(Vec::new())?;
        assert_eq!(options.config_path, default_options_path());
        assert_eq!(options.query, None);
        assert!(options.tags.is_empty());
        assert!(!options.refresh);
        assert!(!options.pokedex);
        Ok(())
    }

    #[test]
    fn parse_cli_args_collects_repeated_tags() -> Result<()> {
        let options = parsed(vec!["--tag", "harlows", "--tag", "ace_of_spades"])?;
        assert_eq!(
            options.tags,
            vec!["harlows".to_owned(), "ace_of_spades".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_query_and_output() -> Result<()> {
        let options = parsed(vec!["--q", "pikachu", "--pokedex", "--out", "/tmp/dex.html"])?;
        assert_eq!(options.query.as_deref(), Some("pikachu"));
        assert!(options.pokedex);
        assert_eq!(options.out_path, Some(PathBuf::from("/tmp/dex.html")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for flag in ["--config", "--q", "--tag", "--out"] {
            let error = parsed(vec![flag]).expect_err("missing value should fail");
            assert!(error.to_string().contains("requires"), "flag {flag}");
        }
    }

    #[test]
    fn parse_cli_args_rejects_refresh_with_pokedex() {
        let error = parsed(vec!["--refresh", "--pokedex"]).expect_err("conflicting flags");
        assert!(error.to_string().contains("--refresh"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parsed(vec!["--wat"]).expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn seeded_filter_drops_unknown_tags() -> Result<()> {
        let options = CliOptions {
            tags: vec!["harlows".to_owned(), "no_such_venue".to_owned()],
            ..parsed(Vec::new())?
        };
        let shows = sample_shows();
        let filter = seeded_filter(&options, &shows, &TagRegistry::builtin());
        assert_eq!(filter.selected().len(), 1);
        assert!(filter.selected().contains("harlows"));
        Ok(())
    }

    #[test]
    fn render_page_wraps_the_grid_and_escapes_the_title() {
        let registry = TagRegistry::builtin();
        let shows = sample_shows();
        let cards: Vec<Card> = shows
            .iter()
            .map(|show| Card::from_show(show, &registry))
            .collect();
        let filter = showbill_app::FilterState::default();

        let page = render_page("Shows <live>", &cards, 3, 3, &filter, &registry, true);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("Shows &lt;live&gt;"));
        assert!(page.contains("saved snapshot"));
        assert!(page.contains("<p class=\"count\"><span class=\"results-count\">3 shows</span></p>"));
        assert!(page.contains("class=\"card\""));
    }

    #[test]
    fn render_page_keeps_the_counter_fragment_as_markup() {
        let registry = TagRegistry::builtin();
        let filter = showbill_app::FilterState::default();

        let page = render_page("Shows", &[], 0, 3, &filter, &registry, false);
        assert!(page.contains("<span class=\"results-count\">0 of 3 shows</span>"));
        assert!(!page.contains("&lt;span"));
    }
}
