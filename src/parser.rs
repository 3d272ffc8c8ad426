use crate::error::{ReaderError, Result};
use crate::slug;
use crate::*;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub const TALES_INDEX: &str = "_tales.json";
pub const COLLECTIONS_INDEX: &str = "_collections.json";

/// An index entry. Its language codes end up in routes and file paths.
pub trait Entry: DeserializeOwned {
    fn languages(&self) -> &BTreeSet<String>;
}

/// Parses the two JSON indexes into typed maps.
///
/// By default a malformed entry fails the whole index. With `skip_invalid`
/// such entries (bad shape, bad date, non URL-safe key or language) are logged and
/// dropped, and the rest of the index is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexParser {
    skip_invalid: bool,
}

impl IndexParser {
    pub fn new(skip_invalid: bool) -> Self {
        Self { skip_invalid }
    }

    pub fn parse_tales(&self, json: &str) -> Result<TalesData> {
        self.parse_index(TALES_INDEX, json)
    }

    pub fn parse_collections(&self, json: &str) -> Result<CollectionsData> {
        self.parse_index(COLLECTIONS_INDEX, json)
    }

    fn parse_index<T: Entry>(&self, what: &str, json: &str) -> Result<BTreeMap<String, T>> {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|source| ReaderError::Parse {
                what: what.to_string(),
                source,
            })?;

        let mut out = BTreeMap::new();
        for (key, value) in raw {
            if !slug::is_valid(&key) {
                if self.skip_invalid {
                    warn!(index = what, key = %key, "skipping entry with invalid slug");
                    continue;
                }
                return Err(ReaderError::InvalidSlug(key));
            }
            match serde_json::from_value::<T>(value) {
                Ok(entry) => match entry.languages().iter().find(|l| !slug::is_valid(l)) {
                    None => {
                        out.insert(key, entry);
                    }
                    Some(language) if self.skip_invalid => {
                        warn!(index = what, key = %key, language = %language, "skipping entry with invalid language");
                    }
                    Some(language) => {
                        return Err(ReaderError::InvalidLanguage {
                            what: what.to_string(),
                            language: language.clone(),
                            key,
                        });
                    }
                },
                Err(source) if self.skip_invalid => {
                    warn!(index = what, key = %key, error = %source, "skipping invalid entry");
                }
                Err(source) => {
                    return Err(ReaderError::Parse {
                        what: format!("{what} entry '{key}'"),
                        source,
                    });
                }
            }
        }
        Ok(out)
    }
}

/// `lastUpdated` accepts a plain date or an RFC 3339 timestamp and is
/// written back as a plain date.
pub(crate) mod date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        NaiveDate::parse_from_str(value, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TALES: &str = r#"{
        "fox": {
            "title": { "en": "The Fox", "vi": "Con Cáo" },
            "author": "Lan",
            "lastUpdated": "2024-03-02",
            "language": ["en", "vi"]
        },
        "owl": {
            "title": { "en": "The Owl" },
            "author": "Minh",
            "lastUpdated": "2023-11-20T08:30:00Z",
            "language": ["en"]
        }
    }"#;

    #[test]
    fn parses_tale_index() {
        let tales = IndexParser::default().parse_tales(TALES).unwrap();
        assert_eq!(tales.len(), 2);

        let fox = &tales["fox"];
        assert_eq!(fox.title["vi"], "Con Cáo");
        assert_eq!(fox.author, "Lan");
        assert_eq!(fox.year(), 2024);
        assert!(fox.has_language("vi"));

        assert_eq!(tales["owl"].year(), 2023);
    }

    #[test]
    fn parses_collection_index_keeping_tale_order() {
        let json = r#"{
            "animals": {
                "name": { "en": "Animals" },
                "lastUpdated": "2024-01-01",
                "language": ["en"],
                "tales": ["owl", "fox", "cat"]
            }
        }"#;
        let collections = IndexParser::default().parse_collections(json).unwrap();
        assert_eq!(collections["animals"].tales, vec!["owl", "fox", "cat"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = IndexParser::default().parse_tales("{ not json").unwrap_err();
        assert!(matches!(err, ReaderError::Parse { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn bad_entry_fails_strict_parse() {
        let json = r#"{
            "fox": { "title": { "en": "Fox" }, "author": "Lan", "lastUpdated": "yesterday", "language": ["en"] }
        }"#;
        let err = IndexParser::default().parse_tales(json).unwrap_err();
        assert!(matches!(err, ReaderError::Parse { .. }));
    }

    #[test]
    fn bad_entries_are_dropped_when_skipping() {
        let json = r#"{
            "fox": { "title": { "en": "Fox" }, "author": "Lan", "lastUpdated": "2024-01-01", "language": ["en"] },
            "owl": { "title": { "en": "Owl" }, "lastUpdated": "2024-01-01" },
            "../etc": { "title": { "en": "Nope" }, "author": "x", "lastUpdated": "2024-01-01" }
        }"#;
        let tales = IndexParser::new(true).parse_tales(json).unwrap();
        assert_eq!(tales.keys().collect::<Vec<_>>(), vec!["fox"]);
    }

    #[test]
    fn unsafe_key_fails_strict_parse() {
        let json = r#"{ "../etc": { "title": {}, "author": "x", "lastUpdated": "2024-01-01" } }"#;
        let err = IndexParser::default().parse_tales(json).unwrap_err();
        assert!(matches!(err, ReaderError::InvalidSlug(_)));
    }

    #[test]
    fn unsafe_language_fails_strict_parse() {
        let json = r#"{
            "fox": { "title": { "en": "Fox" }, "author": "Lan", "lastUpdated": "2024-01-01", "language": ["en", "../escaped"] }
        }"#;
        let err = IndexParser::default().parse_tales(json).unwrap_err();
        assert!(matches!(
            err,
            ReaderError::InvalidLanguage { ref key, ref language, .. } if key == "fox" && language == "../escaped"
        ));

        let json = r#"{
            "animals": { "name": { "en": "Animals" }, "lastUpdated": "2024-01-01", "language": ["/tmp/x"], "tales": [] }
        }"#;
        let err = IndexParser::default().parse_collections(json).unwrap_err();
        assert!(matches!(err, ReaderError::InvalidLanguage { .. }));
    }

    #[test]
    fn unsafe_language_is_dropped_when_skipping() {
        let json = r#"{
            "fox": { "title": { "en": "Fox" }, "author": "Lan", "lastUpdated": "2024-01-01", "language": ["en", "pt-br"] },
            "owl": { "title": { "en": "Owl" }, "author": "Minh", "lastUpdated": "2024-01-01", "language": ["../escaped"] }
        }"#;
        let tales = IndexParser::new(true).parse_tales(json).unwrap();
        assert_eq!(tales.keys().collect::<Vec<_>>(), vec!["fox"]);
        assert!(tales["fox"].has_language("pt-br"));
    }

    #[test]
    fn date_round_trips_as_plain_date() {
        let tales = IndexParser::default().parse_tales(TALES).unwrap();
        let json = serde_json::to_value(&tales["owl"]).unwrap();
        assert_eq!(json["lastUpdated"], "2023-11-20");
    }
}
