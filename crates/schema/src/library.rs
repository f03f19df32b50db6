use serde::{Deserialize, Serialize};

use crate::task::Task;

/// A named collection of game entries supplied as one JSON document.
///
/// Consumed from a remote URL or pasted inline. `name` and `games` are
/// required; a document without a `games` array fails to parse and is
/// skipped by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLibrary {
    pub name: String,
    pub games: Vec<GameEntry>,
}

/// One game described by a custom library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEntry {
    pub app_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub executable: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub install_tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uninstall_tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Upstream version string. A change here invalidates cached metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Target platform (`linux`, `windows`, ...). Absent means windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub launch_args: Vec<String>,
}

impl CustomLibrary {
    /// Parses a library document from JSON text.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// URL-safe slug of the library name, used to namespace app ids.
    pub fn slug(&self) -> String {
        library_slug(&self.name)
    }
}

/// Lowercases a library name and collapses non-alphanumeric runs to `-`.
pub fn library_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Builds the globally unique app identifier for a game entry.
///
/// `app_name` values are only unique within one library, so they are
/// namespaced with the owning library's slug.
pub fn namespaced_app_id(library_name: &str, app_name: &str) -> String {
    format!("{}-{}", library_slug(library_name), app_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "My Shelf",
        "games": [
            {
                "app_name": "game1",
                "title": "Game One",
                "executable": "game1.exe",
                "version": "1.2.0",
                "install_tasks": [
                    {"type": "download", "url": "https://x/installer.exe"},
                    {"type": "extract", "source": "installer.exe"},
                    {"type": "run", "executable": "setup.exe", "args": ["--silent"]}
                ],
                "uninstall_tasks": [
                    {"type": "run", "executable": "uninstall.exe"}
                ]
            }
        ]
    }"#;

    #[test]
    fn parse_full_library() {
        let lib = CustomLibrary::parse(SAMPLE).unwrap();
        assert_eq!(lib.name, "My Shelf");
        assert_eq!(lib.games.len(), 1);

        let game = &lib.games[0];
        assert_eq!(game.app_name, "game1");
        assert_eq!(game.install_tasks.len(), 3);
        assert_eq!(game.uninstall_tasks.len(), 1);
        assert_eq!(game.version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn parse_rejects_missing_games() {
        let result = CustomLibrary::parse(r#"{"name": "Empty"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_missing_name() {
        let result = CustomLibrary::parse(r#"{"games": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_tolerates_minimal_game() {
        let json = r#"{"name": "L", "games": [{"app_name": "g", "title": "G"}]}"#;
        let lib = CustomLibrary::parse(json).unwrap();
        let game = &lib.games[0];
        assert!(game.executable.is_empty());
        assert!(game.install_tasks.is_empty());
        assert!(game.platform.is_none());
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(library_slug("My Shelf"), "my-shelf");
        assert_eq!(library_slug("Bob's  Games!!"), "bob-s-games");
        assert_eq!(library_slug("UPPER"), "upper");
    }

    #[test]
    fn slug_trims_trailing_dash() {
        assert_eq!(library_slug("Games "), "games");
        assert_eq!(library_slug("---"), "");
    }

    #[test]
    fn namespaced_id_uses_slug() {
        assert_eq!(namespaced_app_id("My Shelf", "game1"), "my-shelf-game1");
    }

    #[test]
    fn namespaced_ids_differ_across_libraries() {
        let a = namespaced_app_id("Shelf A", "game1");
        let b = namespaced_app_id("Shelf B", "game1");
        assert_ne!(a, b);
    }

    #[test]
    fn library_json_roundtrip() {
        let lib = CustomLibrary::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&lib).unwrap();
        let reparsed = CustomLibrary::parse(&json).unwrap();
        assert_eq!(lib, reparsed);
    }
}
