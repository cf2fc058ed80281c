use std::path::PathBuf;
use structopt::StructOpt;

use crate::config::InsertAt;
use crate::model::Priority;
use crate::view::{CategoryFilter, PriorityFilter, StatusFilter};

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Add a new task.
    Add {
        /// The task text.
        #[structopt()]
        text: String,

        /// Task priority (low, medium, high).
        #[structopt(short, long)]
        priority: Option<Priority>,

        /// Task category.
        #[structopt(short, long)]
        category: Option<String>,
    },
    /// List tasks, optionally filtered.
    List {
        /// Completion state to show (all, pending, completed).
        #[structopt(short, long, default_value = "all")]
        status: StatusFilter,

        /// Category to show, or "all".
        #[structopt(short, long, default_value = "all")]
        category: CategoryFilter,

        /// Priority to show (low, medium, high), or "all".
        #[structopt(short, long, default_value = "all")]
        priority: PriorityFilter,
    },
    /// Toggle a task between pending and completed.
    Done {
        #[structopt()]
        id: u64,
    },
    /// Replace the text of a task.
    Edit {
        #[structopt()]
        id: u64,

        #[structopt()]
        text: String,
    },
    /// Remove a task.
    Rm {
        #[structopt()]
        id: u64,
    },
    /// Move a task to the position held by another task.
    Mv {
        #[structopt()]
        id: u64,

        /// The task whose position is taken.
        #[structopt()]
        target: u64,
    },
    /// Remove completed tasks, or every task with --all.
    Clear {
        /// Remove every task, completed or not.
        #[structopt(long)]
        all: bool,

        /// Do not ask for confirmation.
        #[structopt(short, long, requires = "all")]
        yes: bool,
    },
    /// List the categories in use.
    Categories,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "smoothdo",
    about = "A smooth, minimalistic to-do list."
)]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Command,

    /// Use a different store file.
    #[structopt(parse(from_os_str), short = "f", long)]
    pub store_file: Option<PathBuf>,

    /// Use a different config file.
    #[structopt(parse(from_os_str), long)]
    pub config: Option<PathBuf>,

    /// Where new tasks go (front, back).
    #[structopt(long)]
    pub insert: Option<InsertAt>,

    /// Log more (repeat for more detail).
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}
