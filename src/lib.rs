//! # preflop_scenario
//!
//! The action-sequencing core of a preflop scenario builder.
//!
//! A scenario is a multi-player decision tree describing how a hand plays out
//! before the flop: who opens, who calls, who re-raises and who folds. Each
//! decision point ("node") belongs to one seat, can be flagged as the
//! trainee's own seat, and can be linked to a range held elsewhere.
//!
//! ## How it works
//!
//! 1. Create a [`Scenario`] from a [`ScenarioRequest`] — every seat of the
//!    table format gets a first-round node and UTG becomes active.
//! 2. Call [`Scenario::apply_action`] for the active node. The engine logs the
//!    declaration, resolves a default raise size when none is given, and
//!    activates the next seat with its legal actions.
//! 3. When the big blind closes the first round, seats that only limped,
//!    called or opened before the last raise get a second-round node.
//! 4. [`Scenario::rewind`] undoes a past decision: everything after it for a
//!    first-round node, just that node for a second-round one.
//!
//! ## Key features
//!
//! - **Single active node**: exactly one node (or none once complete) is ever
//!   waiting on a declaration, and seats act in table order.
//! - **Replayable log**: the action log alone rebuilds the node store, which is
//!   also how stored snapshots are validated on load.
//! - **Swappable sizing**: default sizes come from a [`SizingTable`] that can
//!   be loaded from JSON via [`EngineConfig`].
//!
//! ## Quick start
//!
//! ```rust
//! use preflop_scenario::{Action, NodeId, Position, Round, Scenario, ScenarioRequest};
//!
//! let mut scenario = Scenario::new(ScenarioRequest::new("UTG open, CO 3-bet").with_seed(7));
//! let seat = |p| NodeId::new(&Round::Initial, p);
//!
//! scenario.apply_action(&seat(Position::UTG), Action::Open, None)?;
//! scenario.apply_action(&seat(Position::HJ), Action::Fold, None)?;
//! scenario.apply_action(&seat(Position::CO), Action::ThreeBet, Some(8.0))?;
//!
//! let active = scenario.active_node().expect("BTN is next");
//! assert_eq!(active.seat, Position::BTN);
//! println!("{}", scenario.action_line());
//! # Ok::<(), preflop_scenario::EngineError>(())
//! ```

pub mod scenario_engine;

// Convenience re-exports so callers can use `preflop_scenario::Scenario`
// directly without reaching into `scenario_engine::`.
pub use scenario_engine::{
    plan_action, to_ui_state, Action, ActionContext, ActionEntry, Activation, ConfigError,
    DecisionNode, EngineConfig, EngineError, InMemoryStore, JsonFileStore, LegalActions, NodeId,
    NodeMeta, NodeState, NodeStore, Position, RangeRef, Round, SaveIssue, Scenario, ScenarioRequest,
    ScenarioSnapshot, ScenarioStore, SizingRow, SizingTable, StoreError, TableFormat, Transition,
};
