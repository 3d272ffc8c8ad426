#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tales_reader::config::ReaderConfig;
use tempfile::TempDir;

const TALES: &str = r#"{
    "fox": {
        "title": { "en": "The Fox", "vi": "Con Cáo" },
        "author": "Lan",
        "lastUpdated": "2024-03-02",
        "language": ["en", "vi"]
    },
    "owl": {
        "title": { "en": "The Owl" },
        "author": "Minh",
        "lastUpdated": "2023-11-20",
        "language": ["en"]
    },
    "lonely": {
        "title": { "en": "Alone", "vi": "Một mình" },
        "author": "Lan",
        "lastUpdated": "2022-01-15",
        "language": ["en", "vi"]
    }
}"#;

const COLLECTIONS: &str = r#"{
    "animals": {
        "name": { "en": "Animals", "vi": "Động vật" },
        "lastUpdated": "2024-03-02",
        "language": ["en", "vi"],
        "tales": ["owl", "fox"]
    }
}"#;

/// A site directory with two indexes and every document except
/// `lonely-vi.md`.
pub fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let tales = dir.path().join("tales");
    fs::create_dir_all(&tales).unwrap();
    fs::write(tales.join("_tales.json"), TALES).unwrap();
    fs::write(tales.join("_collections.json"), COLLECTIONS).unwrap();
    fs::write(tales.join("fox-en.md"), "# The Fox\n\nThe *quick* fox.").unwrap();
    fs::write(tales.join("fox-vi.md"), "# Con Cáo\n\nCon cáo *nhanh*.").unwrap();
    fs::write(tales.join("owl-en.md"), "# The Owl\n\nWho?").unwrap();
    fs::write(tales.join("lonely-en.md"), "Alone <script>alert(1)</script>").unwrap();
    dir
}

pub fn config(root: &Path) -> ReaderConfig {
    ReaderConfig {
        source: root.display().to_string(),
        ..ReaderConfig::default()
    }
}
