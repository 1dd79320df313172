use crate::{config::DEFAULT_CONFIG_PATH, db::bookmarks::COLLECTION};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Bookmark saving REST backend")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Serve the HTTP API (the default)
    Serve,

    /// Replace a collection with the bookmarks in a JSON file
    Seed {
        file: PathBuf,

        #[arg(long, default_value = COLLECTION)]
        collection: String,
    },
}
