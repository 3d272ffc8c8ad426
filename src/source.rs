use crate::error::{ReaderError, Result};
use crate::parser::{IndexParser, COLLECTIONS_INDEX, TALES_INDEX};
use crate::slug;
use crate::Indexes;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directory holding the indexes and the markdown documents.
pub const TALES_DIR: &str = "tales";

/// Where indexes and documents are read from. Both variants expose the
/// same layout: `tales/_tales.json`, `tales/_collections.json` and
/// `tales/{route}.md` under a base.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    Dir(DirSource),
}

impl Source {
    /// `http://` and `https://` bases are fetched over the network; anything
    /// else is a local directory.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ReaderError::InvalidSource(input.to_string()));
        }
        if input.starts_with("http://") || input.starts_with("https://") {
            Ok(Source::Http(HttpSource::new(input)))
        } else {
            Ok(Source::Dir(DirSource::new(input)))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Http(http) => http.base.clone(),
            Source::Dir(dir) => dir.root.display().to_string(),
        }
    }

    async fn fetch_text(&self, name: &str) -> Result<String> {
        match self {
            Source::Http(http) => http.get(name).await,
            Source::Dir(dir) => dir.read(name).await,
        }
    }

    /// Fetches both indexes concurrently; fails if either fails.
    pub async fn fetch_indexes(&self, parser: &IndexParser) -> Result<Indexes> {
        let (tales, collections) = tokio::try_join!(
            async { parser.parse_tales(&self.fetch_text(TALES_INDEX).await?) },
            async { parser.parse_collections(&self.fetch_text(COLLECTIONS_INDEX).await?) },
        )?;
        debug!(
            source = %self.describe(),
            tales = tales.len(),
            collections = collections.len(),
            "fetched indexes"
        );
        Ok(Indexes { tales, collections })
    }

    /// Raw markdown for a route key.
    pub async fn fetch_markdown(&self, route: &str) -> Result<String> {
        let route = slug::validate(route)?;
        self.fetch_text(&format!("{route}.md")).await
    }

    /// Route keys of every markdown document present, when the source can
    /// list them.
    pub fn documents(&self) -> Option<BTreeSet<String>> {
        match self {
            Source::Http(_) => None,
            Source::Dir(dir) => Some(dir.documents()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.base, TALES_DIR, name)
    }

    async fn get(&self, name: &str) -> Result<String> {
        let url = self.url(name);
        let network = |source: reqwest::Error| ReaderError::Network {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReaderError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(network)
    }
}

#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tales_dir(&self) -> PathBuf {
        self.root.join(TALES_DIR)
    }

    async fn read(&self, name: &str) -> Result<String> {
        let path = self.tales_dir().join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ReaderError::not_found("document", path.display().to_string()))
            }
            Err(source) => Err(ReaderError::Io { path, source }),
        }
    }

    fn documents(&self) -> BTreeSet<String> {
        let dir = self.tales_dir();
        WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("md"))
            .filter_map(|e| e.path().file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect()
    }
}
