use anyhow::{Context, Result};
use prettytable::{format, Cell, Row, Table};
use std::io::{BufRead, Write};

use crate::config::StoreConfig;
use crate::model::{Attributes, Priority, Task, TaskState};
use crate::storage::Slots;
use crate::store::{Event, NoOpReason, TaskStore};
use crate::view::{self, Counts, Filter};

/// Width the task text is wrapped at in the list table.
const TEXT_WIDTH: usize = 40;

pub fn add_task<S: Slots>(
    store: &mut TaskStore<S>,
    text: &str,
    priority: Option<Priority>,
    category: Option<String>,
) -> Result<()> {
    let event = store.add(text, Attributes { priority, category })?;
    report(store, &event, &mut std::io::stdout())
}

pub fn toggle_task<S: Slots>(store: &mut TaskStore<S>, id: u64) -> Result<()> {
    let event = store.toggle_complete(id)?;
    report(store, &event, &mut std::io::stdout())
}

pub fn edit_task<S: Slots>(store: &mut TaskStore<S>, id: u64, text: &str) -> Result<()> {
    let event = store.edit(id, text)?;
    report(store, &event, &mut std::io::stdout())
}

pub fn remove_task<S: Slots>(store: &mut TaskStore<S>, id: u64) -> Result<()> {
    let event = store.remove(id)?;
    report(store, &event, &mut std::io::stdout())
}

pub fn move_task<S: Slots>(store: &mut TaskStore<S>, id: u64, target: u64) -> Result<()> {
    let event = store.reorder(id, target)?;
    report(store, &event, &mut std::io::stdout())
}

/// Clear completed tasks, or all of them once the user agrees.
pub fn clear<S: Slots>(store: &mut TaskStore<S>, all: bool, yes: bool) -> Result<()> {
    let event = if all {
        let confirmed = yes
            || store.is_empty()
            || confirm(
                "Clear all tasks?",
                &mut std::io::stdin().lock(),
                &mut std::io::stdout(),
            )?;
        store.clear_all(confirmed)?
    } else {
        store.clear_completed()?
    };
    report(store, &event, &mut std::io::stdout())
}

pub fn list<S: Slots>(store: &TaskStore<S>, filter: &Filter) -> Result<()> {
    let visible = view::select(store.tasks(), filter);
    if visible.is_empty() {
        if store.is_empty() {
            println!("No tasks yet! Use 'smoothdo add' to add one.");
        } else {
            println!("No tasks match the current filter.");
        }
        return Ok(());
    }

    task_table(&visible, store.config()).printstd();

    let counts = Counts::of(store.tasks());
    println!(
        "{} pending, {} completed ({} shown).",
        counts.pending,
        counts.completed,
        visible.len()
    );
    Ok(())
}

pub fn categories<S: Slots>(store: &TaskStore<S>) -> Result<()> {
    let categories = view::categories(store.tasks());
    if categories.is_empty() {
        println!("No categories in use.");
    }
    for category in categories {
        println!("{}", category);
    }
    Ok(())
}

/// Build the list table. Category and priority columns only appear when the
/// configuration enables them.
pub fn task_table(tasks: &[&Task], config: &StoreConfig) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    let mut header = vec!["id", "", "task", "created"];
    if config.category {
        header.push("category");
    }
    if config.priority {
        header.push("priority");
    }
    table.set_titles(Row::new(header.into_iter().map(Cell::new).collect()));

    for task in tasks {
        let mut cells = vec![
            Cell::new(&task.id.to_string()),
            Cell::new(state_marker(task)),
            Cell::new(&textwrap::fill(&task.text, TEXT_WIDTH)),
            Cell::new(&task.time),
        ];
        if config.category {
            cells.push(Cell::new(task.category.as_deref().unwrap_or("-")));
        }
        if config.priority {
            cells.push(Cell::new(task.priority.map_or("-", Priority::as_str)));
        }
        table.add_row(Row::new(cells));
    }
    table
}

/// Print the feedback line for `event`, followed by the list totals when
/// the list changed.
fn report<S: Slots, W: Write>(store: &TaskStore<S>, event: &Event, out: &mut W) -> Result<()> {
    writeln!(out, "{}", feedback(event)).context("Failed to write output.")?;
    if event.changed() {
        let counts = Counts::of(store.tasks());
        writeln!(out, "{} pending, {} completed.", counts.pending, counts.completed)
            .context("Failed to write output.")?;
    }
    Ok(())
}

fn state_marker(task: &Task) -> &'static str {
    match task.state() {
        TaskState::Done => "[x]",
        TaskState::Pending => "[ ]",
    }
}

/// The line shown to the user after a store operation.
pub fn feedback(event: &Event) -> String {
    match event {
        Event::Added(task) => format!("Added {}: {}", task.id, task.text),
        Event::Toggled {
            id,
            completed: true,
        } => format!("Task {} completed. Well done!", id),
        Event::Toggled {
            id,
            completed: false,
        } => format!("Task {} is pending again.", id),
        Event::Edited { id } => format!("Task {} updated.", id),
        Event::Deleted(task) => format!("Deleted {}: {}", task.id, task.text),
        Event::Reordered { id, target } => {
            format!("Moved task {} to the position of task {}.", id, target)
        }
        Event::Cleared { removed: 1 } => "Cleared 1 task.".to_string(),
        Event::Cleared { removed } => format!("Cleared {} tasks.", removed),
        Event::NoOp(NoOpReason::EmptyText) => "Task text cannot be empty.".to_string(),
        Event::NoOp(NoOpReason::NotFound(id)) => format!("No task with id {}.", id),
        Event::NoOp(NoOpReason::SameTask) => "A task cannot be moved onto itself.".to_string(),
        Event::NoOp(NoOpReason::NotConfirmed) => "Nothing cleared.".to_string(),
        Event::NoOp(NoOpReason::NothingToClear) => "Nothing to clear.".to_string(),
    }
}

/// Ask a yes/no question. Anything but "y" or "yes" is a no.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{} [y/N] ", question).context("Failed to write prompt.")?;
    output.flush().context("Failed to write prompt.")?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read answer.")?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
