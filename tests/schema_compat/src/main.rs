fn main() {
    println!("Run `cargo test -p schema-compat` to execute schema compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use gamedock_schema::{CustomLibrary, Task, namespaced_app_id};
    use gamedock_store::CategoryMap;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and
    /// compares the JSON values (field-order independent).
    ///
    /// Documents written against the published schema must survive a trip
    /// through our types byte-for-byte in meaning: no dropped fields, no
    /// invented defaults leaking into output.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  ours:    {reserialized}"
        );
    }

    // --- Library document ---

    #[test]
    fn fixture_custom_library_roundtrip() {
        roundtrip_test::<CustomLibrary>("custom_library.json");
    }

    #[test]
    fn fixture_custom_library_contents() {
        let library: CustomLibrary =
            serde_json::from_value(load_fixture("custom_library.json")).unwrap();

        assert_eq!(library.name, "Community Shelf");
        assert_eq!(library.games.len(), 2);

        let freequest = &library.games[0];
        assert_eq!(freequest.install_tasks.len(), 3);
        assert!(matches!(freequest.install_tasks[0], Task::Download { .. }));
        assert!(matches!(freequest.install_tasks[1], Task::Extract { .. }));
        assert!(matches!(freequest.install_tasks[2], Task::Run { .. }));
        assert_eq!(freequest.uninstall_tasks.len(), 1);

        let tuxracer = &library.games[1];
        assert_eq!(tuxracer.platform.as_deref(), Some("linux"));
        assert_eq!(tuxracer.launch_args, vec!["--fullscreen"]);
    }

    #[test]
    fn fixture_app_ids_are_namespaced() {
        let library: CustomLibrary =
            serde_json::from_value(load_fixture("custom_library.json")).unwrap();

        let ids: Vec<String> = library
            .games
            .iter()
            .map(|g| namespaced_app_id(&library.name, &g.app_name))
            .collect();
        assert_eq!(
            ids,
            vec!["community-shelf-freequest", "community-shelf-tuxracer"]
        );
    }

    // --- Task shapes ---

    #[test]
    fn fixture_tasks_roundtrip() {
        roundtrip_test::<Vec<Task>>("tasks.json");
    }

    #[test]
    fn fixture_tasks_cover_every_variant() {
        let tasks: Vec<Task> = serde_json::from_value(load_fixture("tasks.json")).unwrap();
        assert_eq!(tasks.len(), 3);
        assert!(matches!(
            &tasks[0],
            Task::Download { filename: Some(f), destination: Some(d), .. }
                if f == "archive.7z" && d == "dl"
        ));
        assert!(matches!(
            &tasks[1],
            Task::Extract { destination: Some(d), .. } if d == "content"
        ));
        assert!(matches!(&tasks[2], Task::Run { args, .. } if args == &["--quiet"]));
    }

    // --- Categories export document ---

    #[test]
    fn fixture_categories_roundtrip() {
        roundtrip_test::<CategoryMap>("categories.json");
    }

    #[test]
    fn fixture_categories_contents() {
        let categories: CategoryMap =
            serde_json::from_value(load_fixture("categories.json")).unwrap();
        assert_eq!(categories.len(), 3);
        assert_eq!(
            categories["RPG"],
            vec!["community-shelf-freequest", "other-shelf-dungeons"]
        );
    }
}
