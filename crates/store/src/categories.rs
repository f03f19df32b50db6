//! User-defined game categories.
//!
//! A category maps a name to the set of app ids assigned to it. Member
//! lists are kept sorted and de-duplicated, which makes import a pure
//! union: importing the same document twice yields the same map.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{KvStore, StoreError};

const CATEGORIES_KEY: &str = "categories";

/// Category name → sorted, de-duplicated app ids.
pub type CategoryMap = BTreeMap<String, Vec<String>>;

/// Loads the stored categories map, empty if never written.
pub fn load_categories(store: &KvStore) -> Result<CategoryMap, StoreError> {
    Ok(store.get(CATEGORIES_KEY)?.unwrap_or_default())
}

/// Persists the categories map.
pub fn save_categories(store: &KvStore, map: &CategoryMap) -> Result<(), StoreError> {
    store.set(CATEGORIES_KEY, map)
}

/// Adds `app_id` to `category`, creating the category if needed.
pub fn assign_category(map: &mut CategoryMap, category: &str, app_id: &str) {
    let members = map.entry(category.to_string()).or_default();
    if !members.iter().any(|m| m == app_id) {
        members.push(app_id.to_string());
        members.sort();
    }
}

/// Removes `app_id` from `category`; an emptied category is dropped.
pub fn unassign_category(map: &mut CategoryMap, category: &str, app_id: &str) {
    if let Some(members) = map.get_mut(category) {
        members.retain(|m| m != app_id);
        if members.is_empty() {
            map.remove(category);
        }
    }
}

/// Unions two category maps.
///
/// Game-ID arrays are merged with duplicates collapsed; the result is
/// independent of argument order and stable under repetition.
pub fn merge_categories(base: &CategoryMap, incoming: &CategoryMap) -> CategoryMap {
    let mut merged = base.clone();
    for (category, members) in incoming {
        let target = merged.entry(category.clone()).or_default();
        target.extend(members.iter().cloned());
        target.sort();
        target.dedup();
    }
    // Normalize pre-existing entries too, so stored duplicates collapse.
    for members in merged.values_mut() {
        members.sort();
        members.dedup();
    }
    merged
}

/// Imports categories from a JSON file, merging them into the store.
///
/// Returns the merged map. Re-importing the same file with no other
/// state change yields an identical result.
pub fn import_categories(store: &KvStore, path: &Path) -> Result<CategoryMap, StoreError> {
    let text = std::fs::read_to_string(path)?;
    let incoming: CategoryMap = serde_json::from_str(&text)?;

    let merged = merge_categories(&load_categories(store)?, &incoming);
    save_categories(store, &merged)?;
    Ok(merged)
}

/// Writes the stored categories map to a standalone JSON file.
pub fn export_categories(store: &KvStore, path: &Path) -> Result<(), StoreError> {
    let map = load_categories(store)?;
    let json = serde_json::to_string_pretty(&map)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &[&str])]) -> CategoryMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn assign_and_unassign() {
        let mut categories = CategoryMap::new();
        assign_category(&mut categories, "RPG", "lib-g1");
        assign_category(&mut categories, "RPG", "lib-g2");
        assign_category(&mut categories, "RPG", "lib-g1"); // duplicate, ignored

        assert_eq!(categories["RPG"], vec!["lib-g1", "lib-g2"]);

        unassign_category(&mut categories, "RPG", "lib-g1");
        assert_eq!(categories["RPG"], vec!["lib-g2"]);

        unassign_category(&mut categories, "RPG", "lib-g2");
        assert!(!categories.contains_key("RPG"), "empty category dropped");
    }

    #[test]
    fn merge_unions_and_collapses_duplicates() {
        let base = map(&[("RPG", &["a", "b"]), ("Indie", &["c"])]);
        let incoming = map(&[("RPG", &["b", "d"]), ("Racing", &["e"])]);

        let merged = merge_categories(&base, &incoming);
        assert_eq!(merged["RPG"], vec!["a", "b", "d"]);
        assert_eq!(merged["Indie"], vec!["c"]);
        assert_eq!(merged["Racing"], vec!["e"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let base = map(&[("RPG", &["a"])]);
        let incoming = map(&[("RPG", &["a", "b"])]);

        let once = merge_categories(&base, &incoming);
        let twice = merge_categories(&once, &incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn import_merges_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KvStore::new(tmp.path().join("store")).unwrap();
        save_categories(&store, &map(&[("RPG", &["a"])])).unwrap();

        let import_file = tmp.path().join("import.json");
        std::fs::write(
            &import_file,
            serde_json::to_string(&map(&[("RPG", &["b", "a"]), ("Indie", &["c"])])).unwrap(),
        )
        .unwrap();

        let merged = import_categories(&store, &import_file).unwrap();
        assert_eq!(merged["RPG"], vec!["a", "b"]);
        assert_eq!(merged["Indie"], vec!["c"]);

        // The merge landed in the store.
        assert_eq!(load_categories(&store).unwrap(), merged);
    }

    #[test]
    fn reimport_same_file_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KvStore::new(tmp.path().join("store")).unwrap();

        let import_file = tmp.path().join("import.json");
        std::fs::write(
            &import_file,
            serde_json::to_string(&map(&[("RPG", &["a", "b"])])).unwrap(),
        )
        .unwrap();

        let first = import_categories(&store, &import_file).unwrap();
        let second = import_categories(&store, &import_file).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn export_then_import_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KvStore::new(tmp.path().join("store")).unwrap();
        let original = map(&[("RPG", &["a", "b"]), ("Indie", &["c"])]);
        save_categories(&store, &original).unwrap();

        let exported = tmp.path().join("export.json");
        export_categories(&store, &exported).unwrap();

        let other_store = KvStore::new(tmp.path().join("other")).unwrap();
        let imported = import_categories(&other_store, &exported).unwrap();
        assert_eq!(imported, original);
    }

    #[test]
    fn import_invalid_json_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KvStore::new(tmp.path().join("store")).unwrap();

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "[1, 2, 3]").unwrap();
        assert!(import_categories(&store, &bad).is_err());
    }
}
