use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-language strings, keyed by language code.
pub type LocalizedText = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tale {
    pub title: LocalizedText,
    pub author: String,
    #[serde(with = "parser::date")]
    pub last_updated: NaiveDate,
    #[serde(default)]
    pub language: BTreeSet<String>,
}

impl Tale {
    pub fn year(&self) -> i32 {
        self.last_updated.year()
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.language.contains(language)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub name: LocalizedText,
    #[serde(with = "parser::date")]
    pub last_updated: NaiveDate,
    #[serde(default)]
    pub language: BTreeSet<String>,
    /// Declared display order of the member tales.
    #[serde(default)]
    pub tales: Vec<String>,
}

impl parser::Entry for Tale {
    fn languages(&self) -> &BTreeSet<String> {
        &self.language
    }
}

impl parser::Entry for Collection {
    fn languages(&self) -> &BTreeSet<String> {
        &self.language
    }
}

pub type TalesData = BTreeMap<String, Tale>;
pub type CollectionsData = BTreeMap<String, Collection>;

/// Both indexes, fetched together for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indexes {
    pub tales: TalesData,
    pub collections: CollectionsData,
}

pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod language;
pub mod parser;
pub mod reader;
pub mod render;
pub mod server;
pub mod slug;
pub mod source;
pub mod telemetry;
pub mod view;

pub use error::ReaderError;
