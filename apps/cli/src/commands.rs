//! Subcommand implementations.

use std::io::Write as _;

use anyhow::{Context, bail};
use chrono::Utc;
use gamedock_library::{HttpFetcher, LibraryAggregator, LibraryGame, LibrarySource, MetadataCache, NoMetadata};
use gamedock_runtime::{WineInvoker, WineSettings, is_native};
use gamedock_store::{
    KvStore, assign_category, export_categories, import_categories, load_categories,
    load_playtime, record_session, save_categories, save_playtime, unassign_category,
};
use gamedock_tasks::{InstallContext, InstallEvent, TaskRunner, event_channel};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::AppConfig;

const LIBRARY_KEY: &str = "library";
const METADATA_CACHE_KEY: &str = "metadata_cache";

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

pub async fn refresh_library(config: &AppConfig, store: &KvStore) -> anyhow::Result<()> {
    if config.sources.is_empty() {
        bail!("no library sources configured; add one with `gamedock library add-source <url>`");
    }

    let fetcher = HttpFetcher::new(reqwest::Client::new());
    let mut cache: MetadataCache = store.get(METADATA_CACHE_KEY)?.unwrap_or_default();

    let games = LibraryAggregator::new(config.fetch_concurrency)
        .aggregate(&config.sources, &fetcher, &NoMetadata, &mut cache)
        .await;

    store.set(METADATA_CACHE_KEY, &cache)?;
    store.set(LIBRARY_KEY, &games)?;

    info!(games = games.len(), sources = config.sources.len(), "library refreshed");
    println!(
        "{} games aggregated from {} sources",
        games.len(),
        config.sources.len()
    );
    Ok(())
}

pub fn list_library(store: &KvStore) -> anyhow::Result<()> {
    let games = load_library(store)?;
    if games.is_empty() {
        println!("library is empty; run `gamedock library refresh` first");
        return Ok(());
    }

    for game in &games {
        let genre = game.genre.as_deref().unwrap_or("-");
        println!(
            "{:<32} {:<28} {:<16} {genre}",
            game.app_id, game.entry.title, game.library
        );
    }
    Ok(())
}

pub fn add_source(mut config: AppConfig, url: String) -> anyhow::Result<()> {
    let source = LibrarySource::Url(url.clone());
    if config.sources.contains(&source) {
        println!("source already configured: {url}");
        return Ok(());
    }
    config.sources.push(source);
    config.save()?;
    println!("added library source {url}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Install / uninstall / run
// ---------------------------------------------------------------------------

pub async fn install(config: &AppConfig, store: &KvStore, app: &str) -> anyhow::Result<()> {
    let game = find_game(store, app)?;
    run_task_list(config, &game, &game.entry.install_tasks).await?;
    println!(
        "installed {} to {}",
        game.entry.title,
        config.game_folder(&game.app_id).display()
    );
    Ok(())
}

pub async fn uninstall(config: &AppConfig, store: &KvStore, app: &str) -> anyhow::Result<()> {
    let game = find_game(store, app)?;
    run_task_list(config, &game, &game.entry.uninstall_tasks).await?;
    println!("uninstalled {}", game.entry.title);
    Ok(())
}

pub async fn run_game(config: &AppConfig, store: &KvStore, app: &str) -> anyhow::Result<()> {
    let game = find_game(store, app)?;
    if game.entry.executable.is_empty() {
        bail!("{} has no executable configured", game.entry.title);
    }

    let folder = config.game_folder(&game.app_id);
    let native = is_native(game.entry.platform.as_deref());
    let wine = wine_invoker(config);

    let start = Utc::now();
    gamedock_tasks::run::run_executable_task(
        &folder,
        &game.entry.executable,
        &game.entry.launch_args,
        native,
        &wine,
    )
    .await
    .with_context(|| format!("failed to launch {}", game.entry.title))?;
    let end = Utc::now();

    let mut playtime = load_playtime(store)?;
    record_session(&mut playtime, &game.app_id, start, end);
    save_playtime(store, &playtime)?;

    info!(app = %game.app_id, seconds = (end - start).num_seconds(), "session recorded");
    Ok(())
}

async fn run_task_list(
    config: &AppConfig,
    game: &LibraryGame,
    tasks: &[gamedock_schema::Task],
) -> anyhow::Result<()> {
    let folder = config.game_folder(&game.app_id);
    let native = is_native(game.entry.platform.as_deref());
    let wine = wine_invoker(config);
    let runner = TaskRunner::new(reqwest::Client::new());

    let (tx, rx) = event_channel();
    let printer = tokio::spawn(print_events(rx));

    let ctx = InstallContext {
        app_id: &game.app_id,
        game_folder: &folder,
        native,
        wine: &wine,
    };
    let result = runner.run_list(&ctx, tasks, &tx).await;
    drop(tx);
    let _ = printer.await;

    result.map_err(anyhow::Error::from)
}

fn wine_invoker(config: &AppConfig) -> WineInvoker {
    WineInvoker::new(WineSettings {
        binary: config.wine_binary.clone(),
        prefix: config.wine_prefix.clone(),
        env: Vec::new(),
    })
}

async fn print_events(mut rx: mpsc::Receiver<InstallEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            InstallEvent::TaskStarted { index, label, .. } => {
                println!("[{}] {label}", index + 1);
            }
            InstallEvent::DownloadProgress { bytes, percent, .. } => {
                match percent {
                    Some(p) => print!("\r    {p:>5.1}%"),
                    None => print!("\r    {bytes} bytes"),
                }
                let _ = std::io::stdout().flush();
            }
            InstallEvent::TaskFinished { .. } => {
                println!("\r    done");
            }
            InstallEvent::TaskFailed { error, .. } => {
                println!("\r    failed: {error}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub fn categories_list(store: &KvStore) -> anyhow::Result<()> {
    let categories = load_categories(store)?;
    if categories.is_empty() {
        println!("no categories defined");
        return Ok(());
    }
    for (category, members) in &categories {
        println!("{category}: {}", members.join(", "));
    }
    Ok(())
}

pub fn categories_add(store: &KvStore, category: &str, app: &str) -> anyhow::Result<()> {
    let mut categories = load_categories(store)?;
    assign_category(&mut categories, category, app);
    save_categories(store, &categories)?;
    println!("added {app} to {category}");
    Ok(())
}

pub fn categories_remove(store: &KvStore, category: &str, app: &str) -> anyhow::Result<()> {
    let mut categories = load_categories(store)?;
    unassign_category(&mut categories, category, app);
    save_categories(store, &categories)?;
    println!("removed {app} from {category}");
    Ok(())
}

pub fn categories_import(store: &KvStore, file: &std::path::Path) -> anyhow::Result<()> {
    let merged = import_categories(store, file)
        .with_context(|| format!("failed to import categories from {}", file.display()))?;
    println!("imported; {} categories total", merged.len());
    Ok(())
}

pub fn categories_export(store: &KvStore, file: &std::path::Path) -> anyhow::Result<()> {
    export_categories(store, file)
        .with_context(|| format!("failed to export categories to {}", file.display()))?;
    println!("exported categories to {}", file.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Playtime
// ---------------------------------------------------------------------------

pub fn playtime(store: &KvStore, app: Option<&str>) -> anyhow::Result<()> {
    let records = load_playtime(store)?;

    let mut shown = 0;
    for (app_id, record) in &records {
        if let Some(filter) = app
            && filter != app_id
        {
            continue;
        }
        let last = record
            .last_played
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<32} {:>8}  {} sessions  last {last}",
            app_id,
            format_duration(record.total_seconds),
            record.session_count
        );
        shown += 1;
    }

    if shown == 0 {
        println!("no playtime recorded");
    }
    Ok(())
}

fn format_duration(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_library(store: &KvStore) -> anyhow::Result<Vec<LibraryGame>> {
    Ok(store.get(LIBRARY_KEY)?.unwrap_or_default())
}

fn find_game(store: &KvStore, query: &str) -> anyhow::Result<LibraryGame> {
    let games = load_library(store)?;
    if games.is_empty() {
        bail!("library is empty; run `gamedock library refresh` first");
    }

    if let Some(game) = games.iter().find(|g| g.app_id == query) {
        return Ok(game.clone());
    }

    let by_name: Vec<&LibraryGame> =
        games.iter().filter(|g| g.entry.app_name == query).collect();
    match by_name.as_slice() {
        [game] => Ok((*game).clone()),
        [] => bail!("no game named {query} in the library"),
        multiple => bail!(
            "{query} is ambiguous; use one of: {}",
            multiple
                .iter()
                .map(|g| g.app_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(3600), "1h 00m");
        assert_eq!(format_duration(5400), "1h 30m");
    }

    fn sample_game(app_id: &str, app_name: &str) -> LibraryGame {
        LibraryGame {
            app_id: app_id.into(),
            library: "Shelf".into(),
            entry: gamedock_schema::GameEntry {
                app_name: app_name.into(),
                title: app_name.into(),
                executable: String::new(),
                install_tasks: vec![],
                uninstall_tasks: vec![],
                art_cover: None,
                description: None,
                genre: None,
                version: None,
                platform: None,
                launch_args: vec![],
            },
            art_cover: None,
            description: None,
            genre: None,
        }
    }

    #[test]
    fn find_game_by_app_id_and_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KvStore::new(tmp.path()).unwrap();
        store
            .set(
                LIBRARY_KEY,
                &vec![sample_game("shelf-g1", "g1"), sample_game("shelf-g2", "g2")],
            )
            .unwrap();

        assert_eq!(find_game(&store, "shelf-g1").unwrap().app_id, "shelf-g1");
        assert_eq!(find_game(&store, "g2").unwrap().app_id, "shelf-g2");
        assert!(find_game(&store, "g3").is_err());
    }

    #[test]
    fn find_game_ambiguous_name_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KvStore::new(tmp.path()).unwrap();
        store
            .set(
                LIBRARY_KEY,
                &vec![sample_game("a-g1", "g1"), sample_game("b-g1", "g1")],
            )
            .unwrap();

        let err = find_game(&store, "g1").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }
}
