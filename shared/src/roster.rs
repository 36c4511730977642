//! Roster directory: the list of known people and their relationship
//! metadata.
//!
//! The roster lives in a Google Sheet, one row per person:
//! `name, email, nickname, they_call_me, relationship, relationship_level`.
//! Rows are fetched through the Sheets v4 values endpoint and indexed by
//! normalized name and email. A failed fetch degrades to an empty roster
//! rather than failing the request.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{error, info};

use crate::config::Config;
use crate::error::FetchError;

/// Relationship level meaning "never met"; also the default for rows whose
/// level column is missing or non-numeric.
pub const NEVER_MET: u8 = 10;

/// Fixed legend for the 1-10 relationship closeness scale (1 is closest).
pub const RELATIONSHIP_LEVELS: [(u8, &str); 10] = [
    (1, "very good close friend I see often"),
    (2, "family, very close"),
    (3, "very good close friend I don't see very often"),
    (4, "good friend mostly connected through my softball team"),
    (5, "friend through the event - mostly just see them there"),
    (6, "good friend but we haven't really stayed in touch"),
    (7, "friend - but more a friend of friends"),
    (8, "family, less close"),
    (9, "acquaintance, have only met a few times"),
    (10, "never met"),
];

/// A person from the roster. Immutable once built; reconstructed on every
/// lookup cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub nickname: String,
    pub they_call_me: String,
    pub relationship: String,
    pub relationship_level: u8,
}

impl Person {
    /// First whitespace-delimited token of the full name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

fn column<'a>(row: &'a [String], index: usize) -> &'a str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn parse_level(raw: &str) -> u8 {
    raw.trim().parse().unwrap_or(NEVER_MET)
}

/// The roster with its lookup indexes.
///
/// Entries keep sheet row order, and both indexes point into the same
/// entries. Row order matters: the resolver's substring tier returns the
/// first match in that order.
#[derive(Debug, Default)]
pub struct Roster {
    entries: Vec<Person>,
    by_name: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
}

impl Roster {
    /// An empty roster, used when the source is unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a roster from raw sheet rows.
    ///
    /// Missing trailing columns default to empty strings; rows with a blank
    /// name are skipped; a non-numeric level column normalizes to
    /// [`NEVER_MET`]. Index keys are trimmed and lower-cased.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let mut roster = Self::default();
        for row in &rows {
            let name = column(row, 0).trim();
            if name.is_empty() {
                continue;
            }
            roster.push(Person {
                name: name.to_string(),
                email: column(row, 1).trim().to_string(),
                nickname: column(row, 2).trim().to_string(),
                they_call_me: column(row, 3).trim().to_string(),
                relationship: column(row, 4).trim().to_string(),
                relationship_level: parse_level(column(row, 5)),
            });
        }
        roster
    }

    fn push(&mut self, person: Person) {
        let index = self.entries.len();
        self.by_name.insert(person.name.to_lowercase(), index);
        if !person.email.is_empty() {
            self.by_email.insert(person.email.to_lowercase(), index);
        }
        self.entries.push(person);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a free-text identifier to a roster entry.
    ///
    /// Tiers, first match wins: exact email (when the query contains `@`),
    /// exact name, then a bidirectional substring scan over names in sheet
    /// row order. Returns `None` for a blank query or when no tier matches.
    pub fn identify(&self, query: &str) -> Option<&Person> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        if normalized.contains('@') {
            if let Some(&index) = self.by_email.get(&normalized) {
                return Some(&self.entries[index]);
            }
        }

        if let Some(&index) = self.by_name.get(&normalized) {
            return Some(&self.entries[index]);
        }

        // Coarse by intent: the first row matching in either direction wins,
        // not the closest match.
        self.entries.iter().find(|person| {
            let key = person.name.to_lowercase();
            key.contains(&normalized) || normalized.contains(&key)
        })
    }
}

/// Shape of the Sheets v4 `values.get` response.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Fetches roster rows from the Google Sheets values endpoint.
pub struct RosterClient {
    http: reqwest::Client,
    sheet_id: Option<String>,
    api_key: Option<String>,
    range: String,
}

impl RosterClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            sheet_id: config.roster_sheet_id.clone(),
            api_key: config.sheets_api_key.clone(),
            range: config.roster_range.clone(),
        }
    }

    /// Fetch and index the roster.
    pub async fn fetch(&self) -> Result<Roster, FetchError> {
        let sheet_id = self
            .sheet_id
            .as_deref()
            .ok_or(FetchError::NotConfigured("ROSTER_SHEET_ID"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::NotConfigured("SHEETS_API_KEY"))?;

        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            sheet_id, self.range
        );
        let response = self
            .http
            .get(&url)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let value_range: ValueRange = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        if value_range.values.is_empty() {
            return Err(FetchError::Empty);
        }

        let roster = Roster::from_rows(value_range.values);
        info!(people = roster.len(), "Loaded roster");
        Ok(roster)
    }

    /// Fetch the roster, degrading to an empty one when the source is
    /// unavailable. Personalization then falls back to unknown-person
    /// defaults.
    pub async fn fetch_or_empty(&self) -> Roster {
        match self.fetch().await {
            Ok(roster) => roster,
            Err(e) => {
                error!(error = %e, "Failed to load roster, continuing without personalization");
                Roster::empty()
            }
        }
    }
}
