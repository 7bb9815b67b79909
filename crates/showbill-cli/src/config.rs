// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "showbill";
const DEFAULT_FEED_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_POKEDEX_BASE_URL: &str = "https://pokeapi.co/api/v2";
const DEFAULT_TIMEOUT: &str = "15s";
const DEFAULT_ROSTER_LIMIT: u32 = 151;
const DEFAULT_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub feed: Feed,
    #[serde(default)]
    pub pokedex: Pokedex,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            feed: Feed::default(),
            pokedex: Pokedex::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub fallback_path: Option<String>,
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_FEED_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            fallback_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pokedex {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub roster_limit: Option<u32>,
}

impl Default for Pokedex {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_POKEDEX_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            roster_limit: Some(DEFAULT_ROSTER_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<usize>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SHOWBILL_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set SHOWBILL_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [feed], [pokedex], and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (section, timeout) in [
            ("feed", self.feed.timeout.as_deref()),
            ("pokedex", self.pokedex.timeout.as_deref()),
        ] {
            if let Some(timeout) = timeout {
                let parsed = parse_duration(timeout)?;
                if parsed <= Duration::ZERO {
                    bail!(
                        "{section}.timeout in {} must be positive, got {}",
                        path.display(),
                        timeout
                    );
                }
            }
        }

        if let Some(limit) = self.pokedex.roster_limit
            && limit == 0
        {
            bail!(
                "pokedex.roster_limit in {} must be positive",
                path.display()
            );
        }

        if let Some(page_size) = self.ui.page_size
            && page_size == 0
        {
            bail!("ui.page_size in {} must be positive", path.display());
        }

        Ok(())
    }

    pub fn feed_base_url(&self) -> &str {
        self.feed
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_FEED_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn feed_timeout(&self) -> Result<Duration> {
        parse_duration(self.feed.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn feed_fallback_path(&self) -> Option<PathBuf> {
        self.feed.fallback_path.as_deref().map(PathBuf::from)
    }

    pub fn pokedex_base_url(&self) -> &str {
        self.pokedex
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_POKEDEX_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn pokedex_timeout(&self) -> Result<Duration> {
        parse_duration(self.pokedex.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn roster_limit(&self) -> u32 {
        self.pokedex.roster_limit.unwrap_or(DEFAULT_ROSTER_LIMIT)
    }

    pub fn page_size(&self) -> usize {
        self.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# showbill config\n# Place this file at: {}\n\nversion = 1\n\n[feed]\nbase_url = \"{}\"\ntimeout = \"{}\"\n# Optional. Snapshot served when the feed is unreachable or times out.\n# fallback_path = \"/absolute/path/to/shows.json\"\n\n[pokedex]\nbase_url = \"{}\"\ntimeout = \"{}\"\nroster_limit = {}\n\n[ui]\npage_size = {}\n",
            path.display(),
            DEFAULT_FEED_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_POKEDEX_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_ROSTER_LIMIT,
            DEFAULT_PAGE_SIZE,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 15s)")
}
