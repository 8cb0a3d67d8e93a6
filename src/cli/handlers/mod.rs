use std::path::{Path, PathBuf};

use crate::bot::App;
use crate::cli::commands::*;
use crate::cli::output::CheckReport;
use crate::io::config_io;
use crate::io::lock::InstanceLock;
use crate::io::recovery;
use crate::io::store_io;
use crate::model::config::{BotConfig, LogConfig};
use crate::telegram::TelegramClient;
use crate::telegram::runner;

/// Config file looked up in the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "pairbox.toml";

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref(), cli.data_dir)?;
    init_logging(&config.log);

    match cli.command {
        None => cmd_run(&config, RunArgs::default()),
        Some(Commands::Run(args)) => cmd_run(&config, args),
        Some(Commands::Check) => cmd_check(&config, cli.json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read the config file and apply command-line overrides
pub fn load_config(
    path: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Result<BotConfig, config_io::ConfigError> {
    let mut config = match path {
        Some(p) => config_io::read_config(p, true)?,
        None => config_io::read_config(Path::new(DEFAULT_CONFIG_FILE), false)?,
    };
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
    Ok(config)
}

/// RUST_LOG wins; otherwise the config's level, otherwise `info`
fn init_logging(log: &LogConfig) {
    let default = log.level.as_deref().unwrap_or("info");
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .try_init();
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_run(config: &BotConfig, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Without a subcommand clap never saw --token, so read the env here too
    let token = args
        .token
        .or_else(|| std::env::var("BOT_TOKEN").ok())
        .filter(|t| !t.is_empty())
        .ok_or("BOT_TOKEN is not set")?;

    let storage = &config.storage;
    std::fs::create_dir_all(&storage.data_dir)?;
    let _lock = InstanceLock::acquire(&storage.data_dir)?;
    let store = store_io::open_store(storage)?;
    log::info!(
        "loaded {} wish(es) and {} letter(s) from {}",
        store.wishes.len(),
        store.letters.len(),
        storage.data_dir.display()
    );
    let mut app = App::new(store, &config.ui);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let client = TelegramClient::new(
            &config.telegram.api_url,
            &token,
            config.telegram.poll_timeout_secs,
        )?;
        let me = client.get_me().await?;
        log::info!(
            "bot started as @{}",
            me.username.as_deref().unwrap_or(&me.first_name)
        );
        runner::run(&mut app, &client).await;
        log::info!("bot stopped");
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn cmd_check(config: &BotConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let storage = &config.storage;
    let wishlist_file = storage.wishlist_path();
    let letters_file = storage.letters_path();
    let doc = store_io::load_wishlist(&wishlist_file)?;
    let letters = store_io::load_letters(&letters_file)?;

    let report = CheckReport {
        data_dir: storage.data_dir.clone(),
        wishlist_file,
        wishes: doc.shared.len(),
        other_partitions: doc.others.keys().cloned().collect(),
        letters_file,
        letters: letters.len(),
        recovery_entries: recovery::recovery_entry_count(&storage.data_dir),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}
