mod cli;
mod commands;
mod config;

use clap::Parser;
use gamedock_store::KvStore;
use tracing_subscriber::EnvFilter;

use cli::{CategoryCommands, Cli, Commands, LibraryCommands};
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gamedock=debug")),
        )
        .init();

    let args = Cli::parse();
    let config = AppConfig::load();
    let store = KvStore::open_default()?;

    match args.command {
        Commands::Library { action } => match action {
            LibraryCommands::Refresh => commands::refresh_library(&config, &store).await?,
            LibraryCommands::List => commands::list_library(&store)?,
            LibraryCommands::AddSource { url } => commands::add_source(config, url)?,
        },
        Commands::Install { app } => commands::install(&config, &store, &app).await?,
        Commands::Uninstall { app } => commands::uninstall(&config, &store, &app).await?,
        Commands::Run { app } => commands::run_game(&config, &store, &app).await?,
        Commands::Categories { action } => match action {
            CategoryCommands::List => commands::categories_list(&store)?,
            CategoryCommands::Add { category, app } => {
                commands::categories_add(&store, &category, &app)?
            }
            CategoryCommands::Remove { category, app } => {
                commands::categories_remove(&store, &category, &app)?
            }
            CategoryCommands::Import { file } => commands::categories_import(&store, &file)?,
            CategoryCommands::Export { file } => commands::categories_export(&store, &file)?,
        },
        Commands::Playtime { app } => commands::playtime(&store, app.as_deref())?,
    }

    Ok(())
}
