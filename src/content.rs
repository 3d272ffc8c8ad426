use crate::error::{ReaderError, Result};
use crate::source::Source;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Markdown to display-ready HTML.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    gfm: bool,
}

impl Default for Converter {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl Converter {
    pub fn new(gfm: bool) -> Self {
        Self { gfm }
    }

    /// Converts and sanitizes. The output is safe to embed unescaped.
    pub fn to_html(&self, text: &str) -> Result<String> {
        let options = if self.gfm {
            markdown::Options::gfm()
        } else {
            markdown::Options::default()
        };
        let html = markdown::to_html_with_options(text, &options)
            .map_err(|message| ReaderError::Markdown(message.to_string()))?;
        Ok(sanitize(&html))
    }
}

/// Runs HTML through ammonia's tag/attribute allow-list, keeping only
/// web and mail links.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .url_schemes(HashSet::from(["http", "https", "mailto"]))
        .clean(html)
        .to_string()
}

/// What the detail view shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState {
    #[default]
    Idle,
    Loading,
    Loaded {
        html: String,
    },
    NotFound {
        message: String,
    },
    Error {
        message: String,
    },
}

impl ContentState {
    pub fn failed(err: &ReaderError) -> Self {
        let message = err.user_message().to_string();
        if err.is_not_found() {
            ContentState::NotFound { message }
        } else {
            ContentState::Error { message }
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ContentState::Idle | ContentState::Loading)
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            ContentState::Loaded { html } => Some(html),
            _ => None,
        }
    }
}

/// Fetches, converts and sanitizes one document.
pub async fn fetch(source: &Source, converter: &Converter, route: &str) -> Result<String> {
    let text = source.fetch_markdown(route).await?;
    converter.to_html(&text)
}

/// [`fetch`], with failures logged and turned into a terminal state.
/// Nothing is retried.
pub async fn load(source: &Source, converter: &Converter, route: &str) -> ContentState {
    match fetch(source, converter, route).await {
        Ok(html) => ContentState::Loaded { html },
        Err(err) => {
            warn!(route, error = %err, "failed to load tale content");
            ContentState::failed(&err)
        }
    }
}

/// Identifies one navigation of a [`ContentView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    route: Option<String>,
    state: ContentState,
}

/// Detail view state shared by concurrent navigations. Only the result of
/// the most recent navigation is ever committed.
#[derive(Debug, Default)]
pub struct ContentView {
    slot: Mutex<Slot>,
}

impl ContentView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a navigation, superseding any in flight.
    pub fn begin(&self, route: &str) -> Ticket {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        slot.route = Some(route.to_string());
        slot.state = ContentState::Loading;
        Ticket(slot.generation)
    }

    /// Stores `state` if `ticket` is still the latest navigation.
    pub fn commit(&self, ticket: Ticket, state: ContentState) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != ticket.0 {
            debug!(
                ticket = ticket.0,
                current = slot.generation,
                "discarding stale content"
            );
            return false;
        }
        slot.state = state;
        true
    }

    pub fn state(&self) -> ContentState {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    pub fn route(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .route
            .clone()
    }

    /// Loads `route` and commits the result unless a newer navigation
    /// started meanwhile. Returns whether the result was committed.
    pub async fn navigate(&self, source: &Source, converter: &Converter, route: &str) -> bool {
        let ticket = self.begin(route);
        let state = load(source, converter, route).await;
        self.commit(ticket, state)
    }
}
