use crate::content::{self, Converter};
use crate::error::Result;
use crate::source::Source;
use crate::view::{TaleDetail, ViewBuilder};
use serde::Serialize;

/// What `read` prints as the body of a tale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Markdown,
    Html,
}

/// One tale as printed by the terminal reader.
#[derive(Debug, Clone, Serialize)]
pub struct Reading<'a> {
    pub tale: TaleDetail<'a>,
    pub body: String,
}

impl Reading<'_> {
    pub fn to_text(&self) -> String {
        format!(
            "{}\nby {} ({})\n\n{}",
            self.tale.title, self.tale.tale.author, self.tale.year, self.body
        )
    }
}

/// Resolves `route` and fetches its document, as markdown source or as
/// sanitized HTML.
pub async fn read<'a>(
    source: &Source,
    builder: &ViewBuilder<'a>,
    route: &str,
    body: Body,
) -> Result<Reading<'a>> {
    let tale = builder.detail(route)?;
    let body = match body {
        Body::Markdown => source.fetch_markdown(&tale.route).await?,
        Body::Html => content::fetch(source, &Converter::default(), &tale.route).await?,
    };
    Ok(Reading { tale, body })
}
