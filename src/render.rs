use crate::content::ContentState;
use crate::error::Result;
use crate::language::{self, LanguageOption};
use crate::view::{CollectionPage, Folder, TaleDetail};
use handlebars::Handlebars;
use include_dir::{include_dir, Dir};
use serde::Serialize;
use serde_json::json;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");
static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

pub fn stylesheet() -> &'static str {
    ASSETS
        .get_file("styles.css")
        .and_then(|f| f.contents_utf8())
        .unwrap_or("/* styles not found */")
}

/// How pages link to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Server routes; the language travels as `?lang=`.
    Query,
    /// Exported files; every language has its own directory.
    Directory,
}

#[derive(Debug, Clone)]
pub struct Links {
    style: LinkStyle,
    base_path: String,
    language: String,
}

impl Links {
    pub fn new(style: LinkStyle, base_path: &str, language: &str) -> Self {
        Self {
            style,
            base_path: base_path.trim_end_matches('/').to_string(),
            language: language.to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn page(&self, language: &str, path: &str) -> String {
        match self.style {
            LinkStyle::Query => format!("{}/{}?lang={}", self.base_path, path, language),
            LinkStyle::Directory if path.is_empty() => format!("{}/{}/", self.base_path, language),
            LinkStyle::Directory => format!("{}/{}/{}/", self.base_path, language, path),
        }
    }

    pub fn home(&self) -> String {
        self.page(&self.language, "")
    }

    pub fn home_in(&self, language: &str) -> String {
        self.page(language, "")
    }

    pub fn collection(&self, slug: &str) -> String {
        self.page(&self.language, &format!("collection/{slug}"))
    }

    pub fn tale(&self, route: &str) -> String {
        self.page(&self.language, &format!("tale/{route}"))
    }

    pub fn stylesheet(&self) -> String {
        format!("{}/styles.css", self.base_path)
    }
}

/// Per-page surroundings: title, links and the language selector.
pub struct Site<'a> {
    pub title: &'a str,
    pub links: Links,
    pub languages: &'a [String],
}

#[derive(Serialize)]
struct LanguageLink {
    #[serde(flatten)]
    option: LanguageOption,
    href: String,
}

impl Site<'_> {
    fn chrome(&self) -> serde_json::Value {
        let languages: Vec<LanguageLink> = language::selector(self.languages, self.links.language())
            .into_iter()
            .map(|option| LanguageLink {
                href: self.links.home_in(&option.code),
                option,
            })
            .collect();
        json!({
            "site_title": self.title,
            "lang": self.links.language(),
            "styles_href": self.links.stylesheet(),
            "home_href": self.links.home(),
            "languages": languages,
        })
    }
}

/// Template registry with every page and partial preloaded.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(escape_html);

        for file in TEMPLATES.files() {
            register(&mut registry, file, false)?;
        }
        if let Some(partials) = TEMPLATES.get_dir("partials") {
            for file in partials.files() {
                register(&mut registry, file, true)?;
            }
        }
        Ok(Self { registry })
    }

    fn render(&self, template: &str, site: &Site, page: serde_json::Value) -> Result<String> {
        let mut data = site.chrome();
        if let (Some(data), serde_json::Value::Object(page)) = (data.as_object_mut(), page) {
            data.extend(page);
        }
        Ok(self.registry.render(template, &data)?)
    }

    pub fn folders_page(&self, site: &Site, folders: &[Folder]) -> Result<String> {
        let folders: Vec<_> = folders
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "href": site.links.collection(&f.slug),
                    "is_standalone": f.is_standalone,
                })
            })
            .collect();
        self.render("folders", site, json!({ "heading": site.title, "folders": folders }))
    }

    pub fn collection_page(&self, site: &Site, page: &CollectionPage) -> Result<String> {
        let tales: Vec<_> = page
            .entries
            .iter()
            .map(|e| {
                json!({
                    "label": format!("{} - {} ({})", e.title, e.tale.author, e.year),
                    "href": site.links.tale(&e.href),
                })
            })
            .collect();
        self.render(
            "collection",
            site,
            json!({ "heading": page.name, "back_href": site.links.home(), "tales": tales }),
        )
    }

    pub fn tale_page(&self, site: &Site, detail: &TaleDetail, content: &ContentState) -> Result<String> {
        let message = match content {
            ContentState::NotFound { message } | ContentState::Error { message } => Some(message.as_str()),
            _ => None,
        };
        self.render(
            "tale",
            site,
            json!({
                "heading": detail.title,
                "author": detail.tale.author,
                "year": detail.year,
                "back_href": site.links.collection(detail.collection),
                "loading": !content.is_terminal(),
                "html": content.html(),
                "message": message,
            }),
        )
    }

    pub fn error_page(&self, site: &Site, message: &str) -> Result<String> {
        self.render(
            "error",
            site,
            json!({ "heading": message, "back_href": site.links.home() }),
        )
    }
}

/// Attribute- and text-safe escaping that leaves `=` and backticks alone,
/// so query strings in hrefs stay readable.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn register(registry: &mut Handlebars<'static>, file: &include_dir::File<'_>, partial: bool) -> Result<()> {
    let path = file.path();
    if path.extension().and_then(|e| e.to_str()) != Some("hbs") {
        return Ok(());
    }
    let (Some(name), Some(source)) = (path.file_stem().and_then(|s| s.to_str()), file.contents_utf8()) else {
        return Ok(());
    };
    if partial {
        registry.register_partial(name, source)?;
    } else {
        registry.register_template_string(name, source)?;
    }
    Ok(())
}
