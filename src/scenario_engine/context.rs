//! Append-only log of declared actions.
//!
//! The "last raiser" and "last opener" pointers are a projection of the log.
//! They are recomputed from the entries after every change, so a truncated or
//! edited log can never disagree with them.

use serde::{Deserialize, Serialize};

use crate::scenario_engine::{
    error::{EngineError, Result},
    models::{Action, NodeId, Position},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub node: NodeId,
    pub seat: Position,
    pub action: Action,
    pub sizing: Option<f64>,
    /// Logical clock; strictly increasing along the log.
    pub timestamp: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Pointers {
    last_raiser: Option<usize>,
    last_opener: Option<usize>,
}

impl Pointers {
    fn project(entries: &[ActionEntry]) -> Self {
        let mut pointers = Pointers::default();
        for (i, entry) in entries.iter().enumerate() {
            if entry.action.is_raising() {
                pointers.last_raiser = Some(i);
                pointers.last_opener = None;
            } else if entry.action == Action::Limp && pointers.last_opener.is_none() {
                pointers.last_opener = Some(i);
            }
        }
        pointers
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ActionEntry>", into = "Vec<ActionEntry>")]
pub struct ActionContext {
    entries: Vec<ActionEntry>,
    pointers: Pointers,
}

impl ActionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a context, pointers included, from a sequence of entries.
    pub fn replay(entries: impl IntoIterator<Item = ActionEntry>) -> Self {
        let entries: Vec<ActionEntry> = entries.into_iter().collect();
        let pointers = Pointers::project(&entries);
        ActionContext { entries, pointers }
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent raising entry (open, raise, 3-bet or 4-bet).
    pub fn last_raiser(&self) -> Option<&ActionEntry> {
        self.pointers.last_raiser.map(|i| &self.entries[i])
    }

    /// Earliest limp not yet answered by a raise.
    pub fn last_opener(&self) -> Option<&ActionEntry> {
        self.pointers.last_opener.map(|i| &self.entries[i])
    }

    pub fn entry_for(&self, node: &NodeId) -> Option<&ActionEntry> {
        self.entries.iter().find(|e| &e.node == node)
    }

    /// Build the entry that appending `action` would produce, without
    /// appending it.
    pub fn next_entry(
        &self,
        node: NodeId,
        seat: Position,
        action: Action,
        sizing: Option<f64>,
    ) -> Result<ActionEntry> {
        let timestamp = match self.entries.last() {
            Some(last) => last.timestamp.checked_add(1).ok_or(EngineError::LogExhausted)?,
            None => 0,
        };
        Ok(ActionEntry { node, seat, action, sizing, timestamp })
    }

    pub fn push(&mut self, entry: ActionEntry) {
        self.entries.push(entry);
        self.refresh();
    }

    /// Drop the entry for `node` and everything logged after it. Returns the
    /// number of entries removed.
    pub fn truncate_from(&mut self, node: &NodeId) -> usize {
        let Some(cut) = self.entries.iter().position(|e| &e.node == node) else {
            return 0;
        };
        let removed = self.entries.len() - cut;
        self.entries.truncate(cut);
        self.refresh();
        removed
    }

    /// Drop only the entry for `node`, leaving later entries in place.
    pub fn remove(&mut self, node: &NodeId) -> Option<ActionEntry> {
        let index = self.entries.iter().position(|e| &e.node == node)?;
        let entry = self.entries.remove(index);
        self.refresh();
        Some(entry)
    }

    fn refresh(&mut self) {
        self.pointers = Pointers::project(&self.entries);
    }
}

impl From<Vec<ActionEntry>> for ActionContext {
    fn from(entries: Vec<ActionEntry>) -> Self {
        ActionContext::replay(entries)
    }
}

impl From<ActionContext> for Vec<ActionEntry> {
    fn from(context: ActionContext) -> Self {
        context.entries
    }
}
