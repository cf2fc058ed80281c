use anyhow::anyhow;
use directories::ProjectDirs;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use smoothdo::cli::{Command::*, CommandLineArgs};
use smoothdo::config::{Overrides, StoreConfig};
use smoothdo::interface;
use smoothdo::storage::SqliteSlots;
use smoothdo::store::TaskStore;
use smoothdo::view::Filter;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "gozque", "smoothdo")
}

fn find_default_store_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("store.sqlite"))
}

fn find_default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Log to stderr. RUST_LOG wins over the level picked by -v.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    // Get the command-line arguments.
    let CommandLineArgs {
        action,
        store_file,
        config,
        insert,
        verbose,
    } = CommandLineArgs::from_args();

    init_logging(verbose);

    let config = StoreConfig::load(
        config.as_deref(),
        find_default_config_file(),
        &Overrides { insert },
    )?;

    // Unpack the store file.
    let store_file = store_file
        .or_else(find_default_store_file)
        .ok_or_else(|| anyhow!("Failed to find store file."))?;

    let mut store = TaskStore::open(SqliteSlots::open(&store_file)?, config);

    // Perform the action.
    match action {
        Add {
            text,
            priority,
            category,
        } => interface::add_task(&mut store, &text, priority, category),
        List {
            status,
            category,
            priority,
        } => interface::list(&store, &Filter::new(status, category).with_priority(priority)),
        Done { id } => interface::toggle_task(&mut store, id),
        Edit { id, text } => interface::edit_task(&mut store, id, &text),
        Rm { id } => interface::remove_task(&mut store, id),
        Mv { id, target } => interface::move_task(&mut store, id, target),
        Clear { all, yes } => interface::clear(&mut store, all, yes),
        Categories => interface::categories(&store),
    }?;
    Ok(())
}
