use anyhow::Result;
use chrono::{DateTime, Local};
use std::convert::TryFrom;
use tracing::{debug, warn};

use crate::config::{InsertAt, StoreConfig};
use crate::model::{decode_tasks, encode_tasks, format_time, Attributes, Task};
use crate::storage::Slots;

/// What a store operation did. The presentation layer decides which
/// feedback, if any, to play for each event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Added(Task),
    Toggled { id: u64, completed: bool },
    Edited { id: u64 },
    Deleted(Task),
    Reordered { id: u64, target: u64 },
    Cleared { removed: usize },
    NoOp(NoOpReason),
}

/// Why an operation left the collection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    EmptyText,
    NotFound(u64),
    SameTask,
    NotConfirmed,
    NothingToClear,
}

impl Event {
    /// Whether the collection was mutated (and persisted).
    pub fn changed(&self) -> bool {
        !matches!(self, Event::NoOp(_))
    }
}

/// An ordered collection of tasks mirrored to a slot. Every mutation
/// overwrites the slot with the full collection.
pub struct TaskStore<S: Slots> {
    slots: S,
    config: StoreConfig,
    tasks: Vec<Task>,
    last_id: u64,
    clock: fn() -> DateTime<Local>,
}

impl<S: Slots> TaskStore<S> {
    /// Build a store and fill it from the persisted snapshot.
    pub fn open(slots: S, config: StoreConfig) -> Self {
        let mut store = TaskStore {
            slots,
            config,
            tasks: Vec::new(),
            last_id: 0,
            clock: Local::now,
        };
        store.tasks = store.load();
        store.last_id = store.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        store
    }

    /// Replace the clock used for ids and creation times.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Read the persisted snapshot. Absent or unreadable data is an empty list.
    pub fn load(&self) -> Vec<Task> {
        let key = &self.config.key;
        let raw = match self.slots.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = key.as_str(), "no stored tasks");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "failed to read stored tasks, starting empty");
                return Vec::new();
            }
        };
        match decode_tasks(&raw) {
            Ok(tasks) => {
                debug!(key = key.as_str(), count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "ignoring unparsable stored tasks");
                Vec::new()
            }
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> &S {
        &self.slots
    }

    /// Create a task from `text` and put it at the configured end of the list.
    pub fn add(&mut self, text: &str, attributes: Attributes) -> Result<Event> {
        let text = text.trim();
        if text.is_empty() {
            warn!("refusing to add a task with empty text");
            return Ok(Event::NoOp(NoOpReason::EmptyText));
        }

        let now = (self.clock)();
        let task = Task {
            id: self.next_id(now),
            text: text.to_string(),
            completed: false,
            priority: if self.config.priority {
                attributes.priority.or(self.config.default_priority)
            } else {
                None
            },
            category: if self.config.category {
                attributes
                    .category
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .or_else(|| self.config.default_category.clone())
            } else {
                None
            },
            time: format_time(now),
        };

        match self.config.insert {
            InsertAt::Front => self.tasks.insert(0, task.clone()),
            InsertAt::Back => self.tasks.push(task.clone()),
        }
        self.persist()?;
        Ok(Event::Added(task))
    }

    /// Flip the completion flag of the task with `id`.
    pub fn toggle_complete(&mut self, id: u64) -> Result<Event> {
        let task = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => task,
            None => return Ok(Event::NoOp(NoOpReason::NotFound(id))),
        };
        task.completed = !task.completed;
        let completed = task.completed;
        self.persist()?;
        Ok(Event::Toggled { id, completed })
    }

    /// Replace the text of the task with `id`. Only the text changes.
    pub fn edit(&mut self, id: u64, new_text: &str) -> Result<Event> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Ok(Event::NoOp(NoOpReason::EmptyText));
        }
        let task = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => task,
            None => return Ok(Event::NoOp(NoOpReason::NotFound(id))),
        };
        task.text = new_text.to_string();
        self.persist()?;
        Ok(Event::Edited { id })
    }

    pub fn remove(&mut self, id: u64) -> Result<Event> {
        let index = match self.position(id) {
            Some(index) => index,
            None => return Ok(Event::NoOp(NoOpReason::NotFound(id))),
        };
        let task = self.tasks.remove(index);
        self.persist()?;
        Ok(Event::Deleted(task))
    }

    /// Move the task with `id` to the position currently held by `target`.
    /// Both positions are taken before the task is lifted out, so after the
    /// move the task sits at the target's old index in either direction.
    pub fn reorder(&mut self, id: u64, target: u64) -> Result<Event> {
        if id == target {
            return Ok(Event::NoOp(NoOpReason::SameTask));
        }
        let from = match self.position(id) {
            Some(index) => index,
            None => return Ok(Event::NoOp(NoOpReason::NotFound(id))),
        };
        let to = match self.position(target) {
            Some(index) => index,
            None => return Ok(Event::NoOp(NoOpReason::NotFound(target))),
        };
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        self.persist()?;
        Ok(Event::Reordered { id, target })
    }

    pub fn clear_completed(&mut self) -> Result<Event> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Ok(Event::NoOp(NoOpReason::NothingToClear));
        }
        self.persist()?;
        Ok(Event::Cleared { removed })
    }

    /// Empty the collection. `confirmed` is the caller's answer to the
    /// confirmation prompt; the store never asks itself.
    pub fn clear_all(&mut self, confirmed: bool) -> Result<Event> {
        if !confirmed {
            return Ok(Event::NoOp(NoOpReason::NotConfirmed));
        }
        if self.tasks.is_empty() {
            return Ok(Event::NoOp(NoOpReason::NothingToClear));
        }
        let removed = self.tasks.len();
        self.tasks.clear();
        self.persist()?;
        Ok(Event::Cleared { removed })
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Ids follow the creation time in milliseconds, bumped past the last
    /// issued id when the clock has not moved on.
    fn next_id(&mut self, now: DateTime<Local>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    fn persist(&mut self) -> Result<()> {
        let raw = encode_tasks(&self.tasks)?;
        self.slots.set(&self.config.key, &raw)?;
        debug!(count = self.tasks.len(), "persisted tasks");
        Ok(())
    }
}
