//! JSON view of a scenario for the builder screen.

use serde_json::{json, Value};
use crate::scenario_engine::{
    models::{Action, DecisionNode, LegalActions},
    scenario::Scenario,
};

/// Stable wire name for an action, e.g. "ThreeBet".
fn action_name(action: Action) -> &'static str {
    match action {
        Action::Fold     => "Fold",
        Action::Limp     => "Limp",
        Action::Call     => "Call",
        Action::Open     => "Open",
        Action::Raise    => "Raise",
        Action::ThreeBet => "ThreeBet",
        Action::FourBet  => "FourBet",
    }
}

/// Legal actions as `{ "id": "ThreeBet", "label": "3-bet" }` buttons.
fn action_buttons(legal: &LegalActions) -> Value {
    Value::Array(
        legal
            .iter()
            .map(|&a| json!({ "id": action_name(a), "label": a.to_string() }))
            .collect(),
    )
}

/// One row of the node list.
fn node_row(scenario: &Scenario, node: &DecisionNode) -> Value {
    json!({
        "id": node.id.as_str(),
        "seat": node.seat.short(),
        "seat_name": node.seat.to_string(),
        "round": node.round.ordinal(),
        "state": node.state.to_string(),
        "action": node.action.map(action_name),
        "sizing_bb": node.sizing,
        "is_hero": node.is_hero,
        "range": node.range.as_ref().map(|r| r.0.as_str()),
        "stack_bb": node.stack_override.unwrap_or(scenario.default_stack_bb()),
        "actions": action_buttons(&node.legal_actions),
        "summary": node.to_string()
    })
}

/// Map a [`Scenario`] to the JSON payload the scenario-builder screen renders.
pub fn to_ui_state(scenario: &Scenario) -> Value {
    let nodes: Vec<Value> = scenario
        .nodes()
        .iter()
        .map(|n| node_row(scenario, n))
        .collect();
    let issues: Vec<String> = scenario.save_issues().iter().map(|i| i.to_string()).collect();

    json!({
        "scenario_id": scenario.id(),
        "title": scenario.title(),
        "description": scenario.description(),
        "format": scenario.format(),
        "default_stack_bb": scenario.default_stack_bb(),
        "active_node": scenario.active_node().map(|n| n.id.as_str()),
        "complete": scenario.is_complete(),
        "action_line": scenario.action_line(),
        "nodes": nodes,
        "can_save": issues.is_empty(),
        "save_issues": issues
    })
}
