//! Applying a declared action.
//!
//! [`plan_action`] is pure: it validates the declaration and works out
//! everything that follows from it as a [`Transition`]. [`Scenario::commit`]
//! writes a transition into the node store and the action log without making
//! any further decisions.

use crate::scenario_engine::{
    context::{ActionContext, ActionEntry},
    error::{EngineError, Result},
    legal::{legal_actions, reopened_actions},
    models::{Action, DecisionNode, LegalActions, NodeId, NodeState, Round},
    nodes::NodeStore,
    reopening::reopen,
    scenario::Scenario,
    sizing::is_in_position,
};

/// The node that becomes active once a declaration lands.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// An existing waiting node.
    Existing { id: NodeId, legal: LegalActions },
    /// A first-round node missing from the store, created already active.
    Created(DecisionNode),
}

/// Everything one declaration changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub entry: ActionEntry,
    pub next: Option<Activation>,
    /// Second-round nodes spawned by the big blind's decision. At most the
    /// first of them is active.
    pub reopened: Vec<DecisionNode>,
}

/// Work out what declaring `action` on node `id` would do.
pub fn plan_action(
    scenario: &Scenario,
    id: &NodeId,
    action: Action,
    sizing: Option<f64>,
) -> Result<Transition> {
    let node = scenario.node(id)?;
    if node.state != NodeState::Active {
        return Err(EngineError::NodeNotActive { id: id.clone(), state: node.state });
    }
    if !node.legal_actions.contains(&action) {
        return Err(EngineError::IllegalAction { id: id.clone(), action });
    }

    let sizing = resolve_sizing(scenario, node, action, sizing)?;
    let entry = scenario.context.next_entry(id.clone(), node.seat, action, sizing)?;

    let mut after = scenario.context.clone();
    after.push(entry.clone());

    let (next, reopened) = match &node.round {
        Round::Initial => {
            let next = next_initial(scenario, node, &after)?;
            let reopened = if triggers_reopening(scenario, node) {
                let mut preview = scenario.nodes.clone();
                if let Some(acted) = preview.get_mut(id) {
                    acted.declare(action, sizing);
                }
                reopen(scenario.format, &preview)?
            } else {
                Vec::new()
            };
            (next, reopened)
        }
        Round::Reopened { .. } => (next_reopened(&scenario.nodes, id), Vec::new()),
    };

    Ok(Transition { entry, next, reopened })
}

/// Explicit size, else the size already stored on the node, else the table
/// default. Non-raising actions carry no size.
fn resolve_sizing(
    scenario: &Scenario,
    node: &DecisionNode,
    action: Action,
    explicit: Option<f64>,
) -> Result<Option<f64>> {
    if !action.is_raising() {
        return Ok(None);
    }
    if let Some(size) = explicit.or(node.sizing) {
        return Ok(Some(size));
    }
    let in_position = is_in_position(scenario.format, node.seat, &scenario.context)?;
    scenario.sizing.default_size(action, in_position).map(Some)
}

/// Next first-round seat after `node` that has not acted yet.
fn next_initial(
    scenario: &Scenario,
    node: &DecisionNode,
    after: &ActionContext,
) -> Result<Option<Activation>> {
    let mut seat = node.seat;
    while let Some(next) = scenario.format.next_seat(seat)? {
        match scenario.nodes.initial_for(next) {
            Some(waiting) if waiting.state == NodeState::Waiting => {
                return Ok(Some(Activation::Existing {
                    id: waiting.id.clone(),
                    legal: legal_actions(after),
                }));
            }
            Some(_) => seat = next,
            None => {
                let mut created = DecisionNode::new(next, Round::Initial);
                created.activate(legal_actions(after));
                return Ok(Some(Activation::Created(created)));
            }
        }
    }
    Ok(None)
}

/// First waiting second-round node other than the one acting.
fn next_reopened(nodes: &NodeStore, acting: &NodeId) -> Option<Activation> {
    nodes
        .reopened()
        .find(|n| n.state == NodeState::Waiting && &n.id != acting)
        .map(|n| Activation::Existing { id: n.id.clone(), legal: reopened_actions() })
}

/// The big blind's first-round decision reopens the action, once per history.
fn triggers_reopening(scenario: &Scenario, node: &DecisionNode) -> bool {
    node.round.is_initial()
        && node.seat == scenario.format.last_seat()
        && scenario.nodes.reopened().next().is_none()
}

impl Scenario {
    /// Declare `action` for the active node `id`.
    ///
    /// Raising actions take `sizing` if given, otherwise keep whatever size
    /// the node already holds, otherwise fall back to the sizing table.
    pub fn apply_action(&mut self, id: &NodeId, action: Action, sizing: Option<f64>) -> Result<()> {
        let transition = plan_action(self, id, action, sizing)?;
        self.commit(transition)
    }

    /// Write a planned transition into the scenario.
    pub fn commit(&mut self, transition: Transition) -> Result<()> {
        let Transition { entry, next, reopened } = transition;
        log::debug!("{} declares {} (sizing {:?})", entry.node, entry.action, entry.sizing);

        self.node_mut(&entry.node)?.declare(entry.action, entry.sizing);
        self.context.push(entry);

        match next {
            Some(Activation::Existing { id, legal }) => {
                log::trace!("activating {}", id);
                self.node_mut(&id)?.activate(legal);
            }
            Some(Activation::Created(node)) => {
                log::trace!("activating new node {}", node.id);
                self.nodes.insert(node, self.format)?;
            }
            None => {}
        }

        if !reopened.is_empty() {
            let seats: Vec<&str> = reopened.iter().map(|n| n.seat.short()).collect();
            log::info!("action reopened for {}", seats.join(", "));
        }
        for mut node in reopened {
            if let Some(meta) = self.parked.remove(&node.id) {
                node.apply_meta(meta);
            }
            self.nodes.insert(node, self.format)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_engine::{
        models::Position,
        scenario::ScenarioRequest,
    };

    fn id(seat: Position) -> NodeId {
        NodeId::new(&Round::Initial, seat)
    }

    fn scenario() -> Scenario {
        Scenario::new(ScenarioRequest::new("sequencing").with_seed(11))
    }

    #[test]
    fn action_activates_the_next_seat() {
        let mut s = scenario();
        s.apply_action(&id(Position::UTG), Action::Fold, None).unwrap();

        assert_eq!(s.node(&id(Position::UTG)).unwrap().state, NodeState::Folded);
        assert!(s.node(&id(Position::UTG)).unwrap().legal_actions.is_empty());
        let active = s.active_node().unwrap();
        assert_eq!(active.seat, Position::HJ);
        assert!(active.legal_actions.contains(&Action::Open));
    }

    #[test]
    fn acting_out_of_turn_is_rejected() {
        let mut s = scenario();
        let err = s.apply_action(&id(Position::CO), Action::Fold, None).unwrap_err();
        assert!(matches!(err, EngineError::NodeNotActive { state: NodeState::Waiting, .. }));
        assert!(s.context().is_empty());
    }

    #[test]
    fn illegal_action_is_rejected() {
        let mut s = scenario();
        let err = s.apply_action(&id(Position::UTG), Action::FourBet, None).unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction { action: Action::FourBet, .. }));
    }

    #[test]
    fn unknown_node_is_rejected() {
        let mut s = scenario();
        let err = s.apply_action(&id(Position::UTG1), Action::Fold, None).unwrap_err();
        assert!(matches!(err, EngineError::UnknownNode(_)));
    }

    #[test]
    fn raising_actions_get_a_default_size() {
        let mut s = scenario();
        s.apply_action(&id(Position::UTG), Action::Open, None).unwrap();
        assert_eq!(s.node(&id(Position::UTG)).unwrap().sizing, Some(2.5));

        // HJ acts after the UTG raiser, so it is in position
        s.apply_action(&id(Position::HJ), Action::ThreeBet, None).unwrap();
        assert_eq!(s.node(&id(Position::HJ)).unwrap().sizing, Some(7.5));

        s.apply_action(&id(Position::CO), Action::Call, Some(9.0)).unwrap();
        assert_eq!(s.node(&id(Position::CO)).unwrap().sizing, None);
    }

    #[test]
    fn explicit_size_wins() {
        let mut s = scenario();
        s.apply_action(&id(Position::UTG), Action::Open, Some(3.0)).unwrap();
        assert_eq!(s.context().entries()[0].sizing, Some(3.0));
    }

    #[test]
    fn missing_default_is_a_configuration_error() {
        let mut request = ScenarioRequest::new("no sizes").with_seed(12);
        request.sizing = crate::scenario_engine::sizing::SizingTable::new(Vec::new());
        let mut s = Scenario::new(request);
        let err = s.apply_action(&id(Position::UTG), Action::Open, None).unwrap_err();
        assert!(matches!(err, EngineError::MissingSizing { action: Action::Open, in_position: false }));
        assert_eq!(s.active_node().unwrap().seat, Position::UTG);
    }

    #[test]
    fn planning_does_not_mutate() {
        let s = scenario();
        let before = s.clone();
        let transition = plan_action(&s, &id(Position::UTG), Action::Limp, None).unwrap();
        assert_eq!(s, before);
        assert_eq!(transition.entry.action, Action::Limp);
        assert!(matches!(
            transition.next,
            Some(Activation::Existing { ref id, .. }) if id.as_str() == "R1-HJ"
        ));
    }

    #[test]
    fn missing_first_round_node_is_created_when_reached() {
        let mut s = scenario();
        let mut rows = serde_json::to_value(&s.nodes).unwrap();
        rows.as_array_mut().unwrap().retain(|n| n["id"] != "R1-CO");
        s.nodes = serde_json::from_value(rows).unwrap();
        assert_eq!(s.nodes().len(), 5);

        s.apply_action(&id(Position::UTG), Action::Open, None).unwrap();
        s.apply_action(&id(Position::HJ), Action::Fold, None).unwrap();

        let co = s.active_node().unwrap();
        assert_eq!(co.id, id(Position::CO));
        assert!(co.legal_actions.contains(&Action::ThreeBet));
        let seats: Vec<Position> = s.nodes().iter().map(|n| n.seat).collect();
        assert_eq!(seats[2], Position::CO);
    }

    #[test]
    fn big_blind_closes_the_first_round() {
        let mut s = scenario();
        for seat in [Position::UTG, Position::HJ, Position::CO, Position::BTN, Position::SB] {
            s.apply_action(&id(seat), Action::Fold, None).unwrap();
        }
        s.apply_action(&id(Position::BB), Action::Limp, None).unwrap();
        assert!(s.is_complete());
        assert_eq!(s.nodes().active_count(), 0);
    }
}
