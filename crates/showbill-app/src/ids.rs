// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::Date;

/// Stable identifier for a show, derived from the fields that survive a
/// re-scrape. Two fetches of the same listing produce the same id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(String);

impl ShowId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn derive(source: &str, url: Option<&str>, name: &str, local_date: Option<Date>) -> Self {
        let date = local_date.map(|date| date.to_string()).unwrap_or_default();
        let base = format!("{source}|{}|{name}|{date}", url.unwrap_or_default());
        let digest = Sha256::digest(base.as_bytes());
        let mut ident = String::with_capacity(12);
        for byte in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut ident, "{byte:02x}");
        }
        Self(ident)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ShowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
