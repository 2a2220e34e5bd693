//! Default raise sizes.
//!
//! The table is plain data keyed by (action, in position). Swapping it
//! changes the defaults without touching the engine.

use serde::{Deserialize, Serialize};

use crate::scenario_engine::{
    context::ActionContext,
    error::{EngineError, Result},
    models::{Action, Position, TableFormat},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingRow {
    pub action: Action,
    pub in_position: bool,
    pub size_bb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizingTable {
    rows: Vec<SizingRow>,
}

impl SizingTable {
    pub fn new(rows: Vec<SizingRow>) -> Self {
        SizingTable { rows }
    }

    pub fn rows(&self) -> &[SizingRow] {
        &self.rows
    }

    pub fn lookup(&self, action: Action, in_position: bool) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.action == action && r.in_position == in_position)
            .map(|r| r.size_bb)
    }

    /// Size for `action` when the caller gave none.
    pub fn default_size(&self, action: Action, in_position: bool) -> Result<f64> {
        self.lookup(action, in_position)
            .ok_or(EngineError::MissingSizing { action, in_position })
    }
}

impl Default for SizingTable {
    fn default() -> Self {
        let row = |action, in_position, size_bb| SizingRow { action, in_position, size_bb };
        SizingTable::new(vec![
            row(Action::Open,     false,  2.5),
            row(Action::Open,     true,   2.5),
            row(Action::Raise,    false,  5.0),
            row(Action::Raise,    true,   4.0),
            row(Action::ThreeBet, false, 10.0),
            row(Action::ThreeBet, true,   7.5),
            row(Action::FourBet,  false, 22.0),
            row(Action::FourBet,  true,  20.0),
        ])
    }
}

/// A seat is in position when it acts after the last raiser. With no raiser
/// yet it is out of position.
pub fn is_in_position(format: TableFormat, seat: Position, ctx: &ActionContext) -> Result<bool> {
    match ctx.last_raiser() {
        Some(raiser) => Ok(format.index_of(seat)? > format.index_of(raiser.seat)?),
        None => Ok(false),
    }
}
