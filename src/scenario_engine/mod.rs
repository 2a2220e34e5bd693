//! Preflop action-sequencing engine for scenario authoring.
//!
//! ## Module overview
//!
//! | Module       | Purpose |
//! |--------------|---------|
//! | `models`     | Seats, actions, node states, rounds and decision nodes |
//! | `topology`   | Seat order per table format, next-seat lookup |
//! | `nodes`      | Ordered decision-node store |
//! | `context`    | Append-only action log with last-raiser / last-opener projection |
//! | `legal`      | Legal actions for the next seat to act |
//! | `sizing`     | Default raise sizes keyed by action and position |
//! | `sequencing` | `apply_action`: plan a declaration, then commit it |
//! | `reopening`  | Second-round nodes after the big blind's decision |
//! | `history`    | First- and second-round rewinds, log replay |
//! | `scenario`   | The scenario aggregate, metadata, save checks, snapshots |
//! | `config`     | JSON engine configuration |
//! | `store`      | Persistence port with in-memory and JSON-file adapters |
//! | `view`       | JSON payload for the scenario-builder screen |
//! | `error`      | Error types |

pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod legal;
pub mod models;
pub mod nodes;
pub mod reopening;
pub mod scenario;
pub mod sequencing;
pub mod sizing;
pub mod store;
pub mod topology;
pub mod view;

// Re-export the public API surface so callers can use
// `scenario_engine::Scenario` without reaching into sub-modules.
pub use config::EngineConfig;
pub use context::{ActionContext, ActionEntry};
pub use error::{ConfigError, EngineError, Result, StoreError};
pub use models::{
    Action, DecisionNode, LegalActions, NodeId, NodeMeta, NodeState, Position, RangeRef, Round,
    TableFormat,
};
pub use nodes::NodeStore;
pub use scenario::{SaveIssue, Scenario, ScenarioRequest, ScenarioSnapshot};
pub use sequencing::{plan_action, Activation, Transition};
pub use sizing::{SizingRow, SizingTable};
pub use store::{InMemoryStore, JsonFileStore, ScenarioStore};
pub use view::to_ui_state;
