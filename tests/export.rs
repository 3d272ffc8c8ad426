mod common;

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tales_reader::export::{self, Exporter};
use tales_reader::source::Source;
use tales_reader::{Indexes, ReaderError, Tale};

async fn load(root: &Path) -> (Source, Indexes) {
    let config = common::config(root);
    let source = config.source().unwrap();
    let indexes = source.fetch_indexes(&config.parser()).await.unwrap();
    (source, indexes)
}

fn page(out: &Path, rel: &str) -> String {
    fs::read_to_string(out.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

#[tokio::test]
async fn writes_one_directory_per_language() {
    let site = common::site();
    let config = common::config(site.path());
    let (source, indexes) = load(site.path()).await;
    let out = site.path().join("dist");

    let exporter = Exporter::new(&config, &source, &out, "/pixels").unwrap();
    let summary = exporter.export_all(&indexes).await.unwrap();

    // en: landing, animals, standalone, owl, fox, lonely
    // vi: landing, animals, standalone, fox, lonely
    assert_eq!(summary.pages, vec![("en".to_string(), 6), ("vi".to_string(), 5)]);
    assert_eq!(summary.total(), 11);
    assert_eq!(summary.home, "en");

    for rel in [
        "styles.css",
        "index.html",
        "en/index.html",
        "en/collection/animals/index.html",
        "en/collection/standalone/index.html",
        "en/tale/owl-en/index.html",
        "en/tale/fox-en/index.html",
        "en/tale/lonely-en/index.html",
        "vi/index.html",
        "vi/tale/fox-vi/index.html",
        "vi/tale/lonely-vi/index.html",
    ] {
        assert!(out.join(rel).is_file(), "missing {rel}");
    }
    assert!(!out.join("vi/tale/owl-vi").exists());
    assert!(!out.join("vi/tale/owl-en").exists());

    assert_eq!(page(&out, "index.html"), page(&out, "en/index.html"));
    assert!(page(&out, "styles.css").contains('{'));
}

#[tokio::test]
async fn exported_pages_link_within_the_export() {
    let site = common::site();
    let config = common::config(site.path());
    let (source, indexes) = load(site.path()).await;
    let out = site.path().join("dist");

    Exporter::new(&config, &source, &out, "/pixels/")
        .unwrap()
        .export_all(&indexes)
        .await
        .unwrap();

    let landing = page(&out, "en/index.html");
    assert!(landing.contains(r#"href="/pixels/en/collection/animals/""#));
    assert!(landing.contains(r#"href="/pixels/vi/""#));

    let animals = page(&out, "en/collection/animals/index.html");
    let owl = animals.find(r#"href="/pixels/en/tale/owl-en/""#).unwrap();
    let fox = animals.find(r#"href="/pixels/en/tale/fox-en/""#).unwrap();
    assert!(owl < fox);

    let fox = page(&out, "en/tale/fox-en/index.html");
    assert!(fox.contains(r#"href="/pixels/styles.css""#));
    assert!(fox.contains(r#"href="/pixels/en/collection/animals/""#));
    assert!(fox.contains("<em>quick</em>"));

    let lonely = page(&out, "en/tale/lonely-en/index.html");
    assert!(lonely.contains(r#"href="/pixels/en/collection/standalone/""#));
    assert!(!lonely.contains("<script"));

    let missing = page(&out, "vi/tale/lonely-vi/index.html");
    assert!(missing.contains("Tale not found"));
    assert!(!missing.contains("tale-content"));
}

#[tokio::test]
async fn reports_missing_documents() {
    let site = common::site();
    let (source, indexes) = load(site.path()).await;
    assert_eq!(export::missing_documents(&source, &indexes), vec!["lonely-vi"]);

    let remote = Source::parse("http://127.0.0.1:9").unwrap();
    assert!(export::missing_documents(&remote, &indexes).is_empty());
}

#[tokio::test]
async fn language_codes_never_leave_the_output_directory() {
    let site = common::site();
    let config = common::config(site.path());
    let source = config.source().unwrap();
    let out = site.path().join("dist");

    let mut indexes = Indexes::default();
    indexes.tales.insert(
        "fox".into(),
        Tale {
            title: [("../escaped".to_string(), "Fox".to_string())].into_iter().collect(),
            author: "Lan".into(),
            last_updated: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            language: ["../escaped".to_string()].into_iter().collect(),
        },
    );

    let err = Exporter::new(&config, &source, &out, "")
        .unwrap()
        .export_all(&indexes)
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::InvalidSlug(ref slug) if slug == "../escaped"));
    assert!(!site.path().join("escaped").exists());
    assert!(!out.join("index.html").exists());
}
