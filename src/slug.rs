//! Route keys for tale documents.
//!
//! A tale's markdown lives at `tales/{slug}-{language}.md`; the same
//! `{slug}-{language}` string is the key of the detail route.

use crate::error::{ReaderError, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Reserved collection slug for tales that belong to no collection.
pub const STANDALONE: &str = "standalone";

fn slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").expect("slug pattern"))
}

/// URL-safe and safe to join onto a path.
pub fn is_valid(slug: &str) -> bool {
    slug_regex().is_match(slug)
}

pub fn validate(slug: &str) -> Result<&str> {
    if is_valid(slug) {
        Ok(slug)
    } else {
        Err(ReaderError::InvalidSlug(slug.to_string()))
    }
}

/// Route key for reading `slug` in `target`, falling back to
/// `default_language` when the tale does not declare `target`.
pub fn resolve_route(
    slug: &str,
    languages: &BTreeSet<String>,
    target: &str,
    default_language: &str,
) -> String {
    let language = if languages.contains(target) {
        target
    } else {
        default_language
    };
    format!("{slug}-{language}")
}

/// Every `(slug, language)` reading of a route key, splitting at each `-`
/// from the last one backwards. Both slugs and language codes may contain
/// `-`, so the caller picks the reading the index knows.
pub fn route_splits(route: &str) -> impl Iterator<Item = (&str, &str)> + '_ {
    route
        .rmatch_indices('-')
        .map(move |(i, _)| (&route[..i], &route[i + 1..]))
        .filter(|(slug, language)| !slug.is_empty() && !language.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn uses_target_language_when_declared() {
        assert_eq!(resolve_route("foo", &langs(&["en", "fr"]), "fr", "en"), "foo-fr");
    }

    #[test]
    fn falls_back_to_default_language() {
        assert_eq!(resolve_route("foo", &langs(&["en"]), "fr", "en"), "foo-en");
        assert_eq!(resolve_route("foo", &langs(&["vi"]), "fr", "vi"), "foo-vi");
    }

    #[test]
    fn splits_at_every_dash_from_the_right() {
        let splits: Vec<_> = route_splits("old-fox-pt-br").collect();
        assert_eq!(
            splits,
            vec![("old-fox-pt", "br"), ("old-fox", "pt-br"), ("old", "fox-pt-br")]
        );
        assert_eq!(route_splits("fox").count(), 0);
        assert_eq!(route_splits("fox-").count(), 0);
        assert_eq!(route_splits("-en").count(), 0);
    }

    #[test]
    fn rejects_path_like_slugs() {
        assert!(is_valid("fox-en"));
        assert!(is_valid("story_01"));
        assert!(!is_valid(""));
        assert!(!is_valid("-fox"));
        assert!(!is_valid("../secret"));
        assert!(!is_valid("a/b"));
        assert!(!is_valid("fox.md"));
        assert!(matches!(validate("a b"), Err(ReaderError::InvalidSlug(_))));
    }
}
