use std::str::FromStr;

use crate::model::{Priority, Task};

/// Completion state a task must be in to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

/// Priority a task must carry to be shown. Kept apart from the status axis:
/// "high" is a priority, not a completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityFilter {
    All,
    Only(Priority),
}

/// The three filter axes, combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub priority: PriorityFilter,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            status: StatusFilter::All,
            category: CategoryFilter::All,
            priority: PriorityFilter::All,
        }
    }
}

impl Filter {
    pub fn new(status: StatusFilter, category: CategoryFilter) -> Self {
        Filter {
            status,
            category,
            priority: PriorityFilter::All,
        }
    }

    pub fn status(status: StatusFilter) -> Self {
        Filter::new(status, CategoryFilter::All)
    }

    pub fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        let status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        };
        let category = match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => task.category.as_deref() == Some(wanted.as_str()),
        };
        let priority = match self.priority {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => task.priority == Some(wanted),
        };
        status && category && priority
    }
}

/// Tasks matching `filter`, in their stored order.
pub fn select<'a>(tasks: &'a [Task], filter: &Filter) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

/// Distinct categories in the order they first appear.
pub fn categories(tasks: &[Task]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for category in tasks.iter().filter_map(|t| t.category.as_deref()) {
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of<'a, I: IntoIterator<Item = &'a Task>>(tasks: I) -> Self {
        tasks.into_iter().fold(Counts::default(), |mut counts, task| {
            counts.total += 1;
            if task.completed {
                counts.completed += 1;
            } else {
                counts.pending += 1;
            }
            counts
        })
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "high" => Err("'high' is a priority, use --priority high".to_string()),
            other => Err(format!(
                "unknown status '{}', expected one of: all, pending, completed",
                other
            )),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.to_string()))
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(PriorityFilter::All)
        } else {
            s.parse().map(PriorityFilter::Only)
        }
    }
}
