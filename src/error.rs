use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} '{slug}' not found")]
    NotFound { kind: &'static str, slug: String },

    #[error("tale '{slug}' is not available in '{language}'")]
    LanguageUnavailable { slug: String, language: String },

    #[error("invalid slug '{0}'")]
    InvalidSlug(String),

    #[error("{what} entry '{key}' declares invalid language '{language}'")]
    InvalidLanguage {
        what: String,
        key: String,
        language: String,
    },

    #[error("invalid source '{0}'")]
    InvalidSource(String),

    #[error("markdown conversion failed: {0}")]
    Markdown(String),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl ReaderError {
    pub fn not_found(kind: &'static str, slug: impl Into<String>) -> Self {
        ReaderError::NotFound {
            kind,
            slug: slug.into(),
        }
    }

    /// Missing documents and unknown or unreachable slugs, as opposed to
    /// failures of the source itself.
    pub fn is_not_found(&self) -> bool {
        match self {
            ReaderError::Status { status, .. } => *status == 404,
            ReaderError::NotFound { .. }
            | ReaderError::LanguageUnavailable { .. }
            | ReaderError::InvalidSlug(_) => true,
            ReaderError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Text shown to the reader in place of the content.
    pub fn user_message(&self) -> &'static str {
        match self {
            ReaderError::NotFound {
                kind: "collection", ..
            } => "Collection not found",
            e if e.is_not_found() => "Tale not found",
            _ => "Error loading tale content",
        }
    }
}

pub type Result<T, E = ReaderError> = std::result::Result<T, E>;
