use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pairbox", about = concat!("pairbox v", env!("CARGO_PKG_VERSION"), " - a shared wishlist and letters bot for two"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ./pairbox.toml, if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding wishlist.json and letters.json (overrides config)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (default)
    Run(RunArgs),
    /// Validate the data files and report what they hold
    Check,
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Bot API token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
