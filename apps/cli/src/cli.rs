//! Command line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gamedock",
    version,
    about = "Launcher for custom game libraries",
    long_about = "Aggregates user-supplied JSON game libraries and runs their \
                  declarative install, uninstall and launch procedures."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Manage the aggregated game library")]
    Library {
        #[command(subcommand)]
        action: LibraryCommands,
    },

    #[command(about = "Run a game's install task list")]
    Install {
        #[arg(help = "App id (or unique app name) from the library")]
        app: String,
    },

    #[command(about = "Run a game's uninstall task list")]
    Uninstall {
        #[arg(help = "App id (or unique app name) from the library")]
        app: String,
    },

    #[command(about = "Launch an installed game and track the session")]
    Run {
        #[arg(help = "App id (or unique app name) from the library")]
        app: String,
    },

    #[command(about = "Manage game categories")]
    Categories {
        #[command(subcommand)]
        action: CategoryCommands,
    },

    #[command(about = "Show recorded playtime")]
    Playtime {
        #[arg(help = "Limit output to one app")]
        app: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LibraryCommands {
    #[command(about = "Fetch all configured sources and rebuild the library")]
    Refresh,

    #[command(about = "List the aggregated games")]
    List,

    #[command(about = "Add a library source URL")]
    AddSource {
        #[arg(help = "URL of a custom library JSON document")]
        url: String,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    #[command(about = "List categories and their games")]
    List,

    #[command(about = "Assign a game to a category")]
    Add {
        category: String,
        #[arg(help = "App id")]
        app: String,
    },

    #[command(about = "Remove a game from a category")]
    Remove {
        category: String,
        #[arg(help = "App id")]
        app: String,
    },

    #[command(about = "Merge categories from an exported JSON file")]
    Import {
        #[arg(help = "Path to a categories JSON file")]
        file: PathBuf,
    },

    #[command(about = "Write all categories to a JSON file")]
    Export {
        #[arg(help = "Destination path")]
        file: PathBuf,
    },
}
