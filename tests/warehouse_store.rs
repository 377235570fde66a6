use std::fs;

use kvengine::warehouse::{category, read_words, Warehouse};
use tempfile::tempdir;

#[test]
fn load_missing_file_is_empty_not_an_error() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    assert!(warehouse.load("Mood").unwrap().is_empty());
}

#[test]
fn add_persists_one_keyword_per_line() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    assert!(warehouse.add("Mood", "calm").unwrap());
    assert!(warehouse.add("Mood", " bold ").unwrap());

    let path = dir.path().join(category("Mood").unwrap().path);
    assert_eq!(fs::read_to_string(path).unwrap(), "calm\nbold");
}

#[test]
fn add_is_idempotent() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    assert!(warehouse.add("Mood", "calm").unwrap());
    assert!(!warehouse.add("Mood", "calm").unwrap());
    assert_eq!(warehouse.load("Mood").unwrap().len(), 1);
}

#[test]
fn add_rejects_whitespace_only_keywords() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    assert!(!warehouse.add("Mood", "   ").unwrap());
    assert!(warehouse.load("Mood").unwrap().is_empty());
}

#[test]
fn add_matches_case_sensitively() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    assert!(warehouse.add("Mood", "calm").unwrap());
    assert!(warehouse.add("Mood", "Calm").unwrap());
    assert_eq!(warehouse.load("Mood").unwrap().len(), 2);
}

#[test]
fn remove_missing_keyword_changes_nothing() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    warehouse.add("Mood", "calm").unwrap();
    assert!(!warehouse.remove("Mood", "bold").unwrap());
    assert_eq!(warehouse.load("Mood").unwrap(), ["calm"]);
}

#[test]
fn remove_filters_by_exact_match_and_persists() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    warehouse.add("Mood", "calm").unwrap();
    warehouse.add("Mood", "bold").unwrap();
    assert!(warehouse.remove("Mood", "calm").unwrap());

    let path = dir.path().join(category("Mood").unwrap().path);
    assert_eq!(fs::read_to_string(path).unwrap(), "bold");
}

#[test]
fn reader_skips_blank_lines_and_trims() {
    let dir = tempdir().unwrap();
    let spec = category("Mood").unwrap();
    let path = dir.path().join(spec.path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "  calm  \n\n   \nbold\n").unwrap();

    assert_eq!(read_words(&path).unwrap(), ["calm", "bold"]);

    let mut warehouse = Warehouse::open(dir.path());
    assert_eq!(warehouse.load("Mood").unwrap(), ["calm", "bold"]);
}

#[test]
fn insertion_order_is_preserved() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    for word in ["zeta", "alpha", "mid"] {
        warehouse.add("Mood", word).unwrap();
    }
    assert_eq!(warehouse.load("Mood").unwrap(), ["zeta", "alpha", "mid"]);
}

#[test]
fn unknown_category_is_an_error() {
    let dir = tempdir().unwrap();
    let mut warehouse = Warehouse::open(dir.path());
    assert!(warehouse.load("Texture").is_err());
    assert!(warehouse.add("Texture", "rough").is_err());
}
