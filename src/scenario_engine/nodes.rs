use serde::{Deserialize, Serialize};

use crate::scenario_engine::{
    error::Result,
    models::{DecisionNode, NodeId, NodeState, Position, Round, TableFormat},
};

/// Ordered collection of decision nodes.
///
/// First-round nodes come first in table order, followed by any reopened
/// nodes, also in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeStore {
    nodes: Vec<DecisionNode>,
}

fn order_key(node: &DecisionNode, format: TableFormat) -> Result<(u8, usize)> {
    Ok((node.round.ordinal(), format.index_of(node.seat)?))
}

impl NodeStore {
    /// One waiting first-round node per seat.
    pub fn expand(format: TableFormat) -> Self {
        NodeStore {
            nodes: format
                .seats()
                .iter()
                .map(|&seat| DecisionNode::new(seat, Round::Initial))
                .collect(),
        }
    }

    pub fn get(&self, id: &NodeId) -> Option<&DecisionNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut DecisionNode> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecisionNode> {
        self.nodes.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut DecisionNode> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn active(&self) -> Option<&DecisionNode> {
        self.nodes.iter().find(|n| n.state == NodeState::Active)
    }

    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.state == NodeState::Active).count()
    }

    pub fn initial(&self) -> impl Iterator<Item = &DecisionNode> {
        self.nodes.iter().filter(|n| n.round.is_initial())
    }

    pub fn reopened(&self) -> impl Iterator<Item = &DecisionNode> {
        self.nodes.iter().filter(|n| !n.round.is_initial())
    }

    pub fn initial_for(&self, seat: Position) -> Option<&DecisionNode> {
        self.initial().find(|n| n.seat == seat)
    }

    /// Insert keeping first-round-then-reopened, table-order layout.
    pub fn insert(&mut self, node: DecisionNode, format: TableFormat) -> Result<()> {
        let key = order_key(&node, format)?;
        let mut at = self.nodes.len();
        for (i, existing) in self.nodes.iter().enumerate() {
            if order_key(existing, format)? > key {
                at = i;
                break;
            }
        }
        self.nodes.insert(at, node);
        Ok(())
    }

    /// Take every reopened node out of the store.
    pub fn remove_reopened(&mut self) -> Vec<DecisionNode> {
        let (initial, reopened): (Vec<_>, Vec<_>) = std::mem::take(&mut self.nodes)
            .into_iter()
            .partition(|n| n.round.is_initial());
        self.nodes = initial;
        reopened
    }
}
