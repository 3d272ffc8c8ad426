//! HTTP front end for the reader.
//!
//! Every page fetches both indexes, builds its view for the requested
//! language (`?lang=`) and renders it. Nothing is cached between requests.

use crate::config::ReaderConfig;
use crate::content::{self, ContentState, Converter};
use crate::error::{ReaderError, Result};
use crate::language;
use crate::render::{self, LinkStyle, Links, Renderer, Site};
use crate::slug;
use crate::source::Source;
use crate::view::ViewBuilder;
use crate::Indexes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ReaderConfig,
    source: Source,
    renderer: Renderer,
    converter: Converter,
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    lang: Option<String>,
}

type Page = Result<(StatusCode, String)>;

impl AppState {
    pub fn new(config: ReaderConfig) -> Result<Self> {
        let source = config.source()?;
        Ok(Self {
            inner: Arc::new(Inner {
                source,
                renderer: Renderer::new()?,
                converter: Converter::default(),
                config,
            }),
        })
    }

    pub fn source(&self) -> &Source {
        &self.inner.source
    }

    fn language(&self, query: &LangQuery) -> String {
        let config = &self.inner.config;
        let requested = config.language_or_default(query.lang.as_deref());
        if slug::is_valid(&requested) {
            requested
        } else {
            config.language_or_default(None)
        }
    }

    fn site<'a>(&'a self, language: &str, languages: &'a [String]) -> Site<'a> {
        Site {
            title: &self.inner.config.title,
            links: Links::new(LinkStyle::Query, "", language),
            languages,
        }
    }

    async fn indexes(&self) -> Result<Indexes> {
        self.inner
            .source
            .fetch_indexes(&self.inner.config.parser())
            .await
    }

    fn respond(&self, language: &str, page: Page) -> Response {
        match page {
            Ok((status, html)) => (status, Html(html)).into_response(),
            Err(err) => {
                warn!(error = %err, "request failed");
                let status = status_for(&err);
                match self
                    .inner
                    .renderer
                    .error_page(&self.site(language, &[]), err.user_message())
                {
                    Ok(html) => (status, Html(html)).into_response(),
                    Err(_) => (status, err.user_message()).into_response(),
                }
            }
        }
    }
}

/// Not-found kinds are 404, failures of a remote source 502, anything else
/// (local I/O, markdown, templates) 500.
pub fn status_for(err: &ReaderError) -> StatusCode {
    match err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        ReaderError::Network { .. } | ReaderError::Status { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(folders))
        .route("/collection/:collection_slug", get(collection))
        .route("/tale/:slug", get(tale))
        .route("/styles.css", get(styles));

    // Directory sources are also served raw, so this server can act as an
    // HTTP source for another reader.
    if let Source::Dir(dir) = state.source() {
        router = router.nest_service("/tales", ServeDir::new(dir.tales_dir()));
    }

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn folders(State(state): State<AppState>, Query(query): Query<LangQuery>) -> Response {
    let language = state.language(&query);
    let page = async {
        let config = &state.inner.config;
        let indexes = state.indexes().await?;
        let languages = language::available_languages(&indexes.tales);
        let fallback = config.fallback();
        let builder = ViewBuilder::new(&indexes, &language, &fallback);
        let view = builder.build();
        let folders = builder.folders(&view, &config.standalone_label);
        let html = state
            .inner
            .renderer
            .folders_page(&state.site(&language, &languages), &folders)?;
        Ok::<_, ReaderError>((StatusCode::OK, html))
    }
    .await;
    state.respond(&language, page)
}

async fn collection(
    State(state): State<AppState>,
    Path(collection_slug): Path<String>,
    Query(query): Query<LangQuery>,
) -> Response {
    let language = state.language(&query);
    let page = async {
        let config = &state.inner.config;
        let indexes = state.indexes().await?;
        let languages = language::available_languages(&indexes.tales);
        let fallback = config.fallback();
        let builder = ViewBuilder::new(&indexes, &language, &fallback);
        let view = builder.build();
        let page = builder.collection_page(&view, &collection_slug, &config.standalone_label)?;
        let html = state
            .inner
            .renderer
            .collection_page(&state.site(&language, &languages), &page)?;
        Ok::<_, ReaderError>((StatusCode::OK, html))
    }
    .await;
    state.respond(&language, page)
}

async fn tale(
    State(state): State<AppState>,
    Path(route): Path<String>,
    Query(query): Query<LangQuery>,
) -> Response {
    let language = state.language(&query);
    let page = async {
        let indexes = state.indexes().await?;
        let languages = language::available_languages(&indexes.tales);
        let fallback = state.inner.config.fallback();
        let builder = ViewBuilder::new(&indexes, &language, &fallback);
        let detail = builder.detail(&route)?;

        let (status, content) =
            match content::fetch(&state.inner.source, &state.inner.converter, &detail.route).await {
                Ok(html) => (StatusCode::OK, ContentState::Loaded { html }),
                Err(err) => {
                    warn!(route = %detail.route, error = %err, "failed to load tale content");
                    (status_for(&err), ContentState::failed(&err))
                }
            };
        let html = state
            .inner
            .renderer
            .tale_page(&state.site(&language, &languages), &detail, &content)?;
        Ok::<_, ReaderError>((status, html))
    }
    .await;
    state.respond(&language, page)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        render::stylesheet(),
    )
}
