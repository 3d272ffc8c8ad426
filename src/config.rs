use crate::error::Result;
use crate::language::{self, DEFAULT_LANGUAGE};
use crate::parser::IndexParser;
use crate::source::Source;
use clap::Args;

pub const DEFAULT_TITLE: &str = "Disjointed tales of pixels";
pub const DEFAULT_STANDALONE_LABEL: &str = "Standalone things";

/// Settings shared by every binary.
#[derive(Debug, Clone, Args)]
pub struct ReaderConfig {
    /// Site base URL (http/https) or local directory containing `tales/`
    #[arg(short, long, env = "TALES_SOURCE", default_value = ".")]
    pub source: String,

    /// Language selected when none is requested
    #[arg(short, long, env = "TALES_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Language used when a title or document is missing in the selected one
    #[arg(long, env = "TALES_FALLBACK_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub fallback_language: String,

    /// Folder name for tales that belong to no collection
    #[arg(long, default_value = DEFAULT_STANDALONE_LABEL)]
    pub standalone_label: String,

    /// Heading shown on the landing page
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Drop malformed index entries instead of failing the whole index
    #[arg(long)]
    pub skip_invalid: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            fallback_language: DEFAULT_LANGUAGE.to_string(),
            standalone_label: DEFAULT_STANDALONE_LABEL.to_string(),
            title: DEFAULT_TITLE.to_string(),
            skip_invalid: false,
        }
    }
}

impl ReaderConfig {
    pub fn source(&self) -> Result<Source> {
        Source::parse(&self.source)
    }

    pub fn parser(&self) -> IndexParser {
        IndexParser::new(self.skip_invalid)
    }

    pub fn fallback(&self) -> String {
        language::normalize(&self.fallback_language, DEFAULT_LANGUAGE)
    }

    /// The requested language, or the configured default.
    pub fn language_or_default(&self, requested: Option<&str>) -> String {
        language::normalize(requested.unwrap_or(""), &self.language)
    }
}
