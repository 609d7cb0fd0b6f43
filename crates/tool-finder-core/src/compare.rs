/// Bounded, deduplicated selection of tools for side-by-side comparison.
///
/// Invariants: at most `MAX_COMPARE` entries, no two entries share an id,
/// insertion order is kept. A full set rejects additions with a `Notice`
/// rather than an error.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::Tool;

pub const MAX_COMPARE: usize = 3;

/// A user-facing toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    pub fn limit_reached() -> Self {
        Self {
            title: "Maximum tools reached".to_string(),
            description: format!(
                "You can compare up to {MAX_COMPARE} tools at once. Remove a tool to add another."
            ),
            destructive: true,
        }
    }

    pub fn added(name: &str) -> Self {
        Self {
            title: "Tool added to comparison".to_string(),
            description: format!("{name} has been added to your comparison."),
            destructive: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    LimitReached,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSet {
    tools: Vec<Tool>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from arbitrary input, dropping duplicates and anything
    /// past the limit.
    pub fn from_tools<I: IntoIterator<Item = Tool>>(tools: I) -> Self {
        let mut set = Self::new();
        for tool in tools {
            if set.is_full() {
                break;
            }
            set.add(tool);
        }
        set
    }

    /// Tools page "Compare" button.
    pub fn toggle(&mut self, tool: &Tool) -> ToggleOutcome {
        if self.remove(&tool.id) {
            return ToggleOutcome::Removed;
        }
        if self.is_full() {
            return ToggleOutcome::LimitReached;
        }
        self.tools.push(tool.clone());
        ToggleOutcome::Added
    }

    /// Compare page picker.
    pub fn add(&mut self, tool: Tool) -> AddOutcome {
        if self.contains(&tool.id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.is_full() {
            return AddOutcome::LimitReached;
        }
        self.tools.push(tool);
        AddOutcome::Added
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tools.len();
        self.tools.retain(|t| t.id != id);
        self.tools.len() != before
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tools.iter().any(|t| t.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tools.len() >= MAX_COMPARE
    }

    /// "Compare Now" needs at least two selections.
    pub fn ready_to_compare(&self) -> bool {
        self.tools.len() >= 2
    }
}
