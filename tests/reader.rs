mod common;

use tales_reader::reader::{self, Body};
use tales_reader::view::ViewBuilder;

#[tokio::test]
async fn read_html_is_sanitized_and_serializes() {
    let site = common::site();
    let config = common::config(site.path());
    let source = config.source().unwrap();
    let indexes = source.fetch_indexes(&config.parser()).await.unwrap();
    let builder = ViewBuilder::new(&indexes, "en", "en");

    let reading = reader::read(&source, &builder, "fox-vi", Body::Html).await.unwrap();
    assert!(reading.body.contains("<em>nhanh</em>"));
    assert!(reading.to_text().starts_with("Con Cáo\nby Lan (2024)\n\n"));

    let json = serde_json::to_value(&reading).unwrap();
    assert_eq!(json["tale"]["slug"], "fox");
    assert_eq!(json["tale"]["route"], "fox-vi");
    assert_eq!(json["tale"]["collection"], "animals");
    assert_eq!(json["tale"]["tale"]["lastUpdated"], "2024-03-02");
    assert!(json["body"].as_str().unwrap().starts_with("<h1>"));

    let lonely = reader::read(&source, &builder, "lonely-en", Body::Html).await.unwrap();
    assert!(!lonely.body.contains("<script"));
}

#[tokio::test]
async fn read_markdown_returns_the_source_text() {
    let site = common::site();
    let config = common::config(site.path());
    let source = config.source().unwrap();
    let indexes = source.fetch_indexes(&config.parser()).await.unwrap();
    let builder = ViewBuilder::new(&indexes, "en", "en");

    let reading = reader::read(&source, &builder, "owl-en", Body::Markdown).await.unwrap();
    assert_eq!(reading.body, "# The Owl\n\nWho?");
    assert_eq!(reading.tale.title, "The Owl");
}

#[tokio::test]
async fn read_reports_missing_tales_and_documents() {
    let site = common::site();
    let config = common::config(site.path());
    let source = config.source().unwrap();
    let indexes = source.fetch_indexes(&config.parser()).await.unwrap();
    let builder = ViewBuilder::new(&indexes, "en", "en");

    let err = reader::read(&source, &builder, "lonely-vi", Body::Html).await.unwrap_err();
    assert!(err.is_not_found());

    let err = reader::read(&source, &builder, "owl-vi", Body::Markdown).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn list_json_carries_routes() {
    let site = common::site();
    let config = common::config(site.path());
    let source = config.source().unwrap();
    let indexes = source.fetch_indexes(&config.parser()).await.unwrap();
    let builder = ViewBuilder::new(&indexes, "vi", "en");
    let view = builder.build();

    let page = builder
        .collection_page(&view, "animals", &config.standalone_label)
        .unwrap();
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["name"], "Động vật");
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["href"], "fox-vi");
    assert_eq!(entries[0]["title"], "Con Cáo");
    assert_eq!(entries[0]["available"], true);
}
