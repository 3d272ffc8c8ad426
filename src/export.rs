//! Static export of the reader.
//!
//! Every language gets its own directory and every page is an
//! `index.html`, so the output can be served by any static file host:
//! `{lang}/`, `{lang}/collection/{slug}/` and `{lang}/tale/{route}/`.
//! The landing page of the default language is copied to the root.

use crate::config::ReaderConfig;
use crate::content::{self, Converter};
use crate::error::{ReaderError, Result};
use crate::language;
use crate::render::{self, LinkStyle, Links, Renderer, Site};
use crate::slug;
use crate::source::Source;
use crate::view::ViewBuilder;
use crate::Indexes;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Declared `{slug}-{language}` documents absent from a directory source.
/// Sources that cannot list their documents report nothing.
pub fn missing_documents(source: &Source, indexes: &Indexes) -> Vec<String> {
    let Some(documents) = source.documents() else {
        return Vec::new();
    };
    let mut missing = Vec::new();
    for (slug, tale) in &indexes.tales {
        for lang in &tale.language {
            let route = format!("{slug}-{lang}");
            if !documents.contains(&route) {
                warn!(route = %route, "declared document is missing");
                missing.push(route);
            }
        }
    }
    missing
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Pages written per language, in export order.
    pub pages: Vec<(String, usize)>,
    /// Language whose landing page was copied to the root.
    pub home: String,
}

impl ExportSummary {
    pub fn total(&self) -> usize {
        self.pages.iter().map(|(_, count)| count).sum()
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReaderError + '_ {
    move |source| ReaderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub struct Exporter<'a> {
    out: &'a Path,
    base_path: &'a str,
    config: &'a ReaderConfig,
    source: &'a Source,
    renderer: Renderer,
    converter: Converter,
    fallback: String,
}

impl<'a> Exporter<'a> {
    pub fn new(config: &'a ReaderConfig, source: &'a Source, out: &'a Path, base_path: &'a str) -> Result<Self> {
        Ok(Self {
            out,
            base_path,
            config,
            source,
            renderer: Renderer::new()?,
            converter: Converter::default(),
            fallback: config.fallback(),
        })
    }

    /// Every language a tale is written in, or the default language for an
    /// empty site.
    pub fn languages(&self, indexes: &Indexes) -> Vec<String> {
        let mut languages = language::available_languages(&indexes.tales);
        if languages.is_empty() {
            languages.push(self.config.language_or_default(None));
        }
        languages
    }

    /// Writes the stylesheet, every language and the root landing page.
    pub async fn export_all(&self, indexes: &Indexes) -> Result<ExportSummary> {
        let languages = self.languages(indexes);
        fs::create_dir_all(self.out).map_err(io_error(self.out))?;
        let styles = self.out.join("styles.css");
        fs::write(&styles, render::stylesheet()).map_err(io_error(&styles))?;

        let mut pages = Vec::with_capacity(languages.len());
        for lang in &languages {
            let count = self.export(indexes, &languages, lang).await?;
            pages.push((lang.clone(), count));
        }

        let default = self.config.language_or_default(None);
        let home = if languages.contains(&default) {
            default
        } else {
            languages[0].clone()
        };
        let root = self.out.join("index.html");
        fs::copy(self.out.join(&home).join("index.html"), &root).map_err(io_error(&root))?;

        Ok(ExportSummary { pages, home })
    }

    fn site<'s>(&'s self, lang: &str, languages: &'s [String]) -> Site<'s> {
        Site {
            title: &self.config.title,
            links: Links::new(LinkStyle::Directory, self.base_path, lang),
            languages,
        }
    }

    /// Writes `{out}/{parts..}/index.html`. Every part must be URL-safe, so
    /// nothing taken from the indexes can leave the output directory.
    fn write(&self, parts: &[&str], html: &str) -> Result<()> {
        let mut dir = self.out.to_path_buf();
        for part in parts {
            dir.push(slug::validate(part)?);
        }
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;
        let file = dir.join("index.html");
        fs::write(&file, html).map_err(io_error(&file))?;
        debug!(path = %file.display(), "wrote page");
        Ok(())
    }

    /// Writes the landing page, collection pages and tale pages of one
    /// language. Returns the number of pages written.
    pub async fn export(&self, indexes: &Indexes, languages: &[String], lang: &str) -> Result<usize> {
        slug::validate(lang)?;
        let site = self.site(lang, languages);
        let label = &self.config.standalone_label;
        let builder = ViewBuilder::new(indexes, lang, &self.fallback);
        let view = builder.build();
        let folders = builder.folders(&view, label);

        self.write(&[lang], &self.renderer.folders_page(&site, &folders)?)?;
        let mut pages = 1;
        let mut written = HashSet::new();

        for folder in &folders {
            let page = builder.collection_page(&view, &folder.slug, label)?;
            self.write(
                &[lang, "collection", folder.slug.as_str()],
                &self.renderer.collection_page(&site, &page)?,
            )?;
            pages += 1;

            for entry in &page.entries {
                if !written.insert(entry.href.clone()) {
                    continue;
                }
                let detail = match builder.detail(&entry.href) {
                    Ok(detail) => detail,
                    Err(err) => {
                        warn!(route = %entry.href, error = %err, "skipping tale");
                        continue;
                    }
                };
                let state = content::load(self.source, &self.converter, &detail.route).await;
                self.write(
                    &[lang, "tale", detail.route.as_str()],
                    &self.renderer.tale_page(&site, &detail, &state)?,
                )?;
                pages += 1;
            }
        }
        Ok(pages)
    }
}
