//! Rewinding and replaying declared actions.
//!
//! A first-round rewind truncates: the target and every decision logged after
//! it are undone, including any reopened nodes. Settings on those reopened
//! nodes are parked and come back if the same node is reopened. A second-round
//! rewind is
//! local: reopened nodes act independently, so only the target is undone.

use std::collections::BTreeMap;

use crate::scenario_engine::{
    context::ActionContext,
    error::{EngineError, Result},
    legal::{legal_actions, reopened_actions},
    models::{NodeId, NodeState, Round},
    scenario::{opening_nodes, Scenario},
};

impl Scenario {
    /// Rewind `id` with the strategy its round calls for.
    pub fn rewind(&mut self, id: &NodeId) -> Result<()> {
        let round = self.node(id)?.round.clone();
        match round {
            Round::Initial         => self.rewind_first_round(id),
            Round::Reopened { .. } => self.rewind_second_round(id),
        }
    }

    /// Undo a first-round decision and everything after it. The target comes
    /// back active and keeps its stored sizing; later first-round nodes go
    /// back to waiting with their sizing cleared.
    pub fn rewind_first_round(&mut self, id: &NodeId) -> Result<()> {
        let target = self.node(id)?;
        if !target.round.is_initial() {
            return Err(EngineError::WrongRound { id: id.clone(), round: target.round.clone() });
        }
        if target.state == NodeState::Waiting {
            return Err(EngineError::NodeNotReached(id.clone()));
        }
        let target_index = self.format.index_of(target.seat)?;

        let dropped = self.context.truncate_from(id);
        let removed = self.nodes.remove_reopened();
        log::debug!("rewound {}: dropped {} entries, {} reopened nodes", id, dropped, removed.len());
        for node in removed {
            self.parked.insert(node.id.clone(), node.meta());
        }

        let legal = legal_actions(&self.context);
        let format = self.format;
        for node in self.nodes.iter_mut() {
            if &node.id == id {
                node.reset(true);
                node.activate(legal.clone());
            } else if format.index_of(node.seat)? > target_index {
                node.reset(false);
            }
        }
        Ok(())
    }

    /// Undo a single second-round decision. Sibling reopened nodes keep their
    /// declarations; a sibling that was waiting to act goes back to waiting.
    pub fn rewind_second_round(&mut self, id: &NodeId) -> Result<()> {
        let target = self.node(id)?;
        if target.round.is_initial() {
            return Err(EngineError::WrongRound { id: id.clone(), round: target.round.clone() });
        }
        if target.state == NodeState::Waiting {
            return Err(EngineError::NodeNotReached(id.clone()));
        }

        self.context.remove(id);
        log::debug!("rewound reopened node {}", id);

        for node in self.nodes.iter_mut() {
            if &node.id == id {
                node.reset(true);
                node.activate(reopened_actions());
            } else if node.state == NodeState::Active {
                node.reset(true);
            }
        }
        Ok(())
    }

    /// The scenario produced by replaying this scenario's log from scratch.
    ///
    /// Node metadata (hero flags, linked ranges, stack overrides) is carried
    /// over by node id. A logged second-round decision whose node is still
    /// waiting in the replay takes the turn from whichever sibling is active,
    /// which is how such a log arises after a second-round rewind.
    pub fn replayed(&self) -> Result<Scenario> {
        let mut fresh = Scenario {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            format: self.format,
            default_stack_bb: self.default_stack_bb,
            sizing: self.sizing.clone(),
            nodes: opening_nodes(self.format),
            context: ActionContext::new(),
            parked: BTreeMap::new(),
        };

        for entry in self.context.entries() {
            let node = fresh.node(&entry.node)?;
            if node.state == NodeState::Waiting && !node.round.is_initial() {
                for sibling in fresh.nodes.iter_mut() {
                    if sibling.id == entry.node {
                        sibling.activate(reopened_actions());
                    } else if sibling.state == NodeState::Active {
                        sibling.reset(true);
                    }
                }
            }
            fresh.apply_action(&entry.node, entry.action, entry.sizing)?;
        }

        for node in fresh.nodes.iter_mut() {
            if let Some(original) = self.nodes.get(&node.id) {
                node.apply_meta(original.meta());
            }
        }
        fresh.parked = self.parked.clone();
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_engine::{
        models::{Action, Position, RangeRef},
        scenario::ScenarioRequest,
    };

    fn first(seat: Position) -> NodeId {
        NodeId::new(&Round::Initial, seat)
    }

    fn second(seat: Position) -> NodeId {
        let raiser = first(Position::BTN);
        NodeId::new(&Round::Reopened { raiser }, seat)
    }

    /// UTG limps, HJ calls, BTN isolates and the blinds let it through, so
    /// UTG and HJ both get reopened.
    fn limped_and_isolated() -> Scenario {
        let mut s = Scenario::new(ScenarioRequest::new("iso").with_seed(21));
        s.apply_action(&first(Position::UTG), Action::Limp, None).unwrap();
        s.apply_action(&first(Position::HJ), Action::Call, None).unwrap();
        s.apply_action(&first(Position::CO), Action::Fold, None).unwrap();
        s.apply_action(&first(Position::BTN), Action::Raise, Some(5.0)).unwrap();
        s.apply_action(&first(Position::SB), Action::Fold, None).unwrap();
        s.apply_action(&first(Position::BB), Action::Fold, None).unwrap();
        s
    }

    #[test]
    fn first_round_rewind_truncates_and_reactivates() {
        let mut s = Scenario::new(ScenarioRequest::new("rewind").with_seed(22));
        s.apply_action(&first(Position::UTG), Action::Open, Some(3.0)).unwrap();
        s.apply_action(&first(Position::HJ), Action::ThreeBet, Some(9.0)).unwrap();
        s.apply_action(&first(Position::CO), Action::FourBet, Some(24.0)).unwrap();

        s.rewind_first_round(&first(Position::HJ)).unwrap();

        assert_eq!(s.context().len(), 1);
        let hj = s.node(&first(Position::HJ)).unwrap();
        assert_eq!(hj.state, NodeState::Active);
        assert_eq!(hj.action, None);
        assert_eq!(hj.sizing, Some(9.0));
        assert!(hj.legal_actions.contains(&Action::ThreeBet));

        let co = s.node(&first(Position::CO)).unwrap();
        assert_eq!(co.state, NodeState::Waiting);
        assert_eq!(co.sizing, None);
        assert_eq!(s.nodes().active_count(), 1);
    }

    #[test]
    fn first_round_rewind_drops_reopened_nodes() {
        let mut s = limped_and_isolated();
        assert_eq!(s.nodes().reopened().count(), 2);

        s.rewind_first_round(&first(Position::BB)).unwrap();
        assert_eq!(s.nodes().reopened().count(), 0);
        assert_eq!(s.active_node().unwrap().seat, Position::BB);

        // folding again reopens again
        s.apply_action(&first(Position::BB), Action::Fold, None).unwrap();
        assert_eq!(s.nodes().reopened().count(), 2);
    }

    #[test]
    fn reopened_settings_survive_a_first_round_rewind() {
        let mut s = Scenario::new(ScenarioRequest::new("utg vs 3-bet").with_seed(24));
        s.apply_action(&first(Position::UTG), Action::Open, None).unwrap();
        s.apply_action(&first(Position::HJ), Action::Fold, None).unwrap();
        s.apply_action(&first(Position::CO), Action::ThreeBet, None).unwrap();
        s.apply_action(&first(Position::BTN), Action::Fold, None).unwrap();
        s.apply_action(&first(Position::SB), Action::Fold, None).unwrap();
        s.apply_action(&first(Position::BB), Action::Call, None).unwrap();

        let utg_again = NodeId::new(&Round::Reopened { raiser: first(Position::CO) }, Position::UTG);
        s.link_range(&utg_again, RangeRef("utg-vs-3bet".into())).unwrap();
        s.set_stack_override(&utg_again, Some(40.0)).unwrap();
        let before = s.clone();

        s.rewind_first_round(&first(Position::BB)).unwrap();
        assert!(s.node(&utg_again).is_err());
        assert!(!s.is_save_eligible());

        s.apply_action(&first(Position::BB), Action::Call, None).unwrap();
        let utg = s.node(&utg_again).unwrap();
        assert_eq!(utg.range, Some(RangeRef("utg-vs-3bet".into())));
        assert_eq!(utg.stack_override, Some(40.0));
        assert_eq!(s, before);
    }

    #[test]
    fn parked_settings_wait_for_the_same_node() {
        let mut s = limped_and_isolated();
        s.set_hero(&second(Position::HJ), true).unwrap();

        // nobody raises this time, so nothing reopens
        s.rewind_first_round(&first(Position::BTN)).unwrap();
        for seat in [Position::BTN, Position::SB, Position::BB] {
            s.apply_action(&first(seat), Action::Fold, None).unwrap();
        }
        assert_eq!(s.nodes().reopened().count(), 0);
        assert!(s.parked.contains_key(&second(Position::HJ)));

        s.reset();
        assert!(s.parked.is_empty());
    }

    #[test]
    fn second_round_rewind_leaves_siblings_alone() {
        let mut s = limped_and_isolated();
        s.apply_action(&second(Position::UTG), Action::Call, None).unwrap();
        s.apply_action(&second(Position::HJ), Action::Raise, Some(18.0)).unwrap();
        assert!(s.is_complete());

        s.rewind_second_round(&second(Position::UTG)).unwrap();

        let utg = s.node(&second(Position::UTG)).unwrap();
        assert_eq!(utg.state, NodeState::Active);
        assert_eq!(utg.legal_actions, reopened_actions());
        let hj = s.node(&second(Position::HJ)).unwrap();
        assert_eq!(hj.state, NodeState::Raised);
        assert_eq!(hj.sizing, Some(18.0));
        assert!(s.context().entry_for(&second(Position::HJ)).is_some());
        assert!(s.context().entry_for(&second(Position::UTG)).is_none());
    }

    #[test]
    fn second_round_rewind_keeps_a_single_active_node() {
        let mut s = limped_and_isolated();
        s.apply_action(&second(Position::UTG), Action::Fold, None).unwrap();
        assert_eq!(s.active_node().unwrap().id, second(Position::HJ));

        s.rewind_second_round(&second(Position::UTG)).unwrap();
        assert_eq!(s.nodes().active_count(), 1);
        assert_eq!(s.active_node().unwrap().id, second(Position::UTG));
        assert_eq!(s.node(&second(Position::HJ)).unwrap().state, NodeState::Waiting);

        // HJ gets its turn back once UTG decides again
        s.apply_action(&second(Position::UTG), Action::Call, None).unwrap();
        assert_eq!(s.active_node().unwrap().id, second(Position::HJ));
    }

    #[test]
    fn rewind_strategy_must_match_the_round() {
        let mut s = limped_and_isolated();
        assert!(matches!(
            s.rewind_second_round(&first(Position::UTG)),
            Err(EngineError::WrongRound { .. })
        ));
        assert!(matches!(
            s.rewind_first_round(&second(Position::UTG)),
            Err(EngineError::WrongRound { .. })
        ));
    }

    #[test]
    fn waiting_and_unknown_nodes_cannot_be_rewound() {
        let mut s = Scenario::new(ScenarioRequest::new("early").with_seed(23));
        assert!(matches!(
            s.rewind(&first(Position::CO)),
            Err(EngineError::NodeNotReached(_))
        ));
        assert!(matches!(
            s.rewind(&second(Position::UTG)),
            Err(EngineError::UnknownNode(_))
        ));
    }

    #[test]
    fn rewind_dispatches_on_round() {
        let mut s = limped_and_isolated();
        s.apply_action(&second(Position::UTG), Action::Fold, None).unwrap();
        s.rewind(&second(Position::UTG)).unwrap();
        assert_eq!(s.nodes().reopened().count(), 2);

        s.rewind(&first(Position::CO)).unwrap();
        assert_eq!(s.nodes().reopened().count(), 0);
        assert_eq!(s.active_node().unwrap().seat, Position::CO);
    }

    #[test]
    fn replay_after_second_round_rewind_matches_nodes() {
        let mut s = limped_and_isolated();
        s.set_hero(&first(Position::HJ), true).unwrap();
        s.apply_action(&second(Position::UTG), Action::Call, None).unwrap();
        s.apply_action(&second(Position::HJ), Action::Fold, None).unwrap();
        s.rewind_second_round(&second(Position::UTG)).unwrap();
        s.apply_action(&second(Position::UTG), Action::Raise, None).unwrap();

        let replayed = s.replayed().unwrap();
        assert_eq!(replayed.nodes(), s.nodes());
    }
}
