//! Reopened action after the big blind's decision.
//!
//! Seats that only limped, called or opened before the last raise in table
//! order never faced that raise, so each gets a second-round node.

use crate::scenario_engine::{
    error::Result,
    legal::reopened_actions,
    models::{DecisionNode, NodeState, Round, TableFormat},
    nodes::NodeStore,
};

/// Second-round nodes owed after the first round closes. The earliest seat's
/// node comes back active; the others wait their turn.
pub fn reopen(format: TableFormat, nodes: &NodeStore) -> Result<Vec<DecisionNode>> {
    let Some(raiser) = nodes.initial().filter(|n| n.state.is_raising()).last() else {
        return Ok(Vec::new());
    };
    let raiser_index = format.index_of(raiser.seat)?;

    let mut spawned = Vec::new();
    for node in nodes.initial() {
        if format.index_of(node.seat)? >= raiser_index {
            break;
        }
        if matches!(node.state, NodeState::Limped | NodeState::Opened) {
            let mut fresh = DecisionNode::new(node.seat, Round::Reopened { raiser: raiser.id.clone() });
            fresh.is_hero = node.is_hero;
            fresh.stack_override = node.stack_override;
            spawned.push(fresh);
        }
    }

    if let Some(first) = spawned.first_mut() {
        first.activate(reopened_actions());
    }
    Ok(spawned)
}
