use crate::{LocalizedText, TalesData};
use serde::Serialize;
use std::collections::BTreeSet;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Picks the display string for `selected`, then `fallback`, then the first
/// entry in key order. `None` only for an empty map.
pub fn resolve<'a>(text: &'a LocalizedText, selected: &str, fallback: &str) -> Option<&'a str> {
    text.get(selected)
        .or_else(|| text.get(fallback))
        .or_else(|| text.values().next())
        .map(String::as_str)
}

/// Every language any tale is written in, sorted.
pub fn available_languages(tales: &TalesData) -> Vec<String> {
    tales
        .values()
        .flat_map(|tale| tale.language.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Lowercased, trimmed language code; empty input maps to `default`.
pub fn normalize(code: &str, default: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        default.to_ascii_lowercase()
    } else {
        code.to_ascii_lowercase()
    }
}

/// One entry of the language selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageOption {
    pub code: String,
    pub label: String,
    pub selected: bool,
}

/// Selector options, or nothing when there is no choice to make.
pub fn selector(languages: &[String], selected: &str) -> Vec<LanguageOption> {
    if languages.len() <= 1 {
        return Vec::new();
    }
    languages
        .iter()
        .map(|code| LanguageOption {
            code: code.clone(),
            label: code.to_uppercase(),
            selected: code == selected,
        })
        .collect()
}
