use crate::error::{ReaderError, Result};
use crate::language;
use crate::slug::{self, STANDALONE};
use crate::*;
use serde::Serialize;
use std::collections::HashMap;

/// One tale as shown in a list.
#[derive(Debug, Clone, Serialize)]
pub struct TaleEntry<'a> {
    pub slug: &'a str,
    pub tale: &'a Tale,
    pub title: &'a str,
    pub year: i32,
    /// Whether the tale is written in the selected language.
    pub available: bool,
    /// Route key of the document to open.
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionGroup<'a> {
    pub slug: &'a str,
    pub name: &'a str,
    pub collection: &'a Collection,
    pub entries: Vec<TaleEntry<'a>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewModel<'a> {
    pub collections: Vec<CollectionGroup<'a>>,
    pub standalone: Vec<TaleEntry<'a>>,
}

impl<'a> ViewModel<'a> {
    pub fn collection(&self, slug: &str) -> Option<&CollectionGroup<'a>> {
        self.collections.iter().find(|group| group.slug == slug)
    }
}

/// A folder on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub slug: String,
    pub name: String,
    pub is_standalone: bool,
}

/// The tales listed on one collection page.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionPage<'a> {
    pub slug: String,
    pub name: String,
    pub entries: Vec<TaleEntry<'a>>,
}

/// A resolved detail route.
#[derive(Debug, Clone, Serialize)]
pub struct TaleDetail<'a> {
    pub route: String,
    pub slug: &'a str,
    pub tale: &'a Tale,
    pub title: &'a str,
    pub year: i32,
    /// Owning collection, or `standalone`.
    pub collection: &'a str,
}

/// Maps each tale slug to the first collection (in slug order) listing it.
pub fn owner_index(collections: &CollectionsData) -> HashMap<&str, &str> {
    let mut owners = HashMap::new();
    for (collection_slug, collection) in collections {
        for tale_slug in &collection.tales {
            owners
                .entry(tale_slug.as_str())
                .or_insert(collection_slug.as_str());
        }
    }
    owners
}

/// Builds list views over a pair of indexes for one selected language.
pub struct ViewBuilder<'a> {
    indexes: &'a Indexes,
    language: &'a str,
    fallback: &'a str,
}

impl<'a> ViewBuilder<'a> {
    pub fn new(indexes: &'a Indexes, language: &'a str, fallback: &'a str) -> Self {
        Self {
            indexes,
            language,
            fallback,
        }
    }

    pub fn language(&self) -> &'a str {
        self.language
    }

    fn entry(&self, slug: &'a str, tale: &'a Tale) -> TaleEntry<'a> {
        TaleEntry {
            slug,
            tale,
            title: language::resolve(&tale.title, self.language, self.fallback).unwrap_or(slug),
            year: tale.year(),
            available: tale.has_language(self.language),
            href: slug::resolve_route(slug, &tale.language, self.language, self.fallback),
        }
    }

    fn collection_name(&self, slug: &'a str, collection: &'a Collection) -> &'a str {
        language::resolve(&collection.name, self.language, self.fallback).unwrap_or(slug)
    }

    /// Partitions every tale into its owning collection or the standalone
    /// bucket. Collection members keep their declared order; standalone
    /// tales are ordered by slug. Slugs listed by a collection but missing
    /// from the tale index are skipped.
    pub fn build(&self) -> ViewModel<'a> {
        let owners = owner_index(&self.indexes.collections);
        let mut buckets: HashMap<&str, Vec<TaleEntry<'a>>> = HashMap::new();
        let mut standalone = Vec::new();

        for (slug, tale) in &self.indexes.tales {
            let entry = self.entry(slug, tale);
            match owners.get(slug.as_str()) {
                Some(owner) => buckets.entry(*owner).or_default().push(entry),
                None => standalone.push(entry),
            }
        }

        let collections = self
            .indexes
            .collections
            .iter()
            .map(|(slug, collection)| {
                let order: HashMap<&str, usize> = collection
                    .tales
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, s)| (s.as_str(), i))
                    .collect();
                let mut entries = buckets.remove(slug.as_str()).unwrap_or_default();
                entries.sort_by_key(|e| order.get(e.slug).copied().unwrap_or(usize::MAX));
                CollectionGroup {
                    slug,
                    name: self.collection_name(slug, collection),
                    collection,
                    entries,
                }
            })
            .collect();

        ViewModel {
            collections,
            standalone,
        }
    }

    /// Landing page folders: collections written in the selected language
    /// with at least one readable tale, then the standalone folder when it
    /// has readable tales.
    pub fn folders(&self, view: &ViewModel<'a>, standalone_label: &str) -> Vec<Folder> {
        let mut folders: Vec<Folder> = view
            .collections
            .iter()
            .filter(|group| {
                group.collection.language.contains(self.language)
                    && group.entries.iter().any(|e| e.available)
            })
            .map(|group| Folder {
                slug: group.slug.to_string(),
                name: group.name.to_string(),
                is_standalone: false,
            })
            .collect();

        if view.standalone.iter().any(|e| e.available) {
            folders.push(Folder {
                slug: STANDALONE.to_string(),
                name: standalone_label.to_string(),
                is_standalone: true,
            });
        }
        folders
    }

    /// Readable tales of one collection, or of the standalone bucket.
    pub fn collection_page(
        &self,
        view: &ViewModel<'a>,
        collection_slug: &str,
        standalone_label: &str,
    ) -> Result<CollectionPage<'a>> {
        let (name, entries) = if collection_slug == STANDALONE {
            (standalone_label.to_string(), &view.standalone)
        } else {
            let group = view
                .collection(collection_slug)
                .ok_or_else(|| ReaderError::not_found("collection", collection_slug))?;
            (group.name.to_string(), &group.entries)
        };

        Ok(CollectionPage {
            slug: collection_slug.to_string(),
            name,
            entries: entries.iter().filter(|e| e.available).cloned().collect(),
        })
    }

    /// Resolves a detail route (`{slug}-{language}`, or a bare tale slug)
    /// against the tale index. The split that names a known tale in one of
    /// its declared languages wins.
    pub fn detail(&self, route: &str) -> Result<TaleDetail<'a>> {
        slug::validate(route)?;
        let tales = &self.indexes.tales;

        let (slug, tale, language) = match tales.get_key_value(route) {
            Some((slug, tale)) => (slug, tale, None),
            None => {
                let candidates: Vec<_> = slug::route_splits(route)
                    .filter_map(|(base, language)| {
                        tales.get_key_value(base).map(|(slug, tale)| (slug, tale, language))
                    })
                    .collect();
                match candidates.iter().find(|(_, tale, language)| tale.has_language(language)) {
                    Some(&(slug, tale, language)) => (slug, tale, Some(language)),
                    None => {
                        return Err(match candidates.first() {
                            Some((slug, _, language)) => ReaderError::LanguageUnavailable {
                                slug: slug.to_string(),
                                language: language.to_string(),
                            },
                            None => ReaderError::not_found("tale", route),
                        });
                    }
                }
            }
        };

        let display_language = language.unwrap_or(self.language);
        let owners = owner_index(&self.indexes.collections);
        let collection = owners.get(slug.as_str()).copied().unwrap_or(STANDALONE);

        Ok(TaleDetail {
            route: route.to_string(),
            slug,
            tale,
            title: language::resolve(&tale.title, display_language, self.fallback)
                .unwrap_or(slug.as_str()),
            year: tale.year(),
            collection,
        })
    }
}
