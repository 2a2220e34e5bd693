//! The scenario aggregate and everything about it that does not sequence
//! actions: identity, titles, node metadata, save checks and snapshots.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::scenario_engine::{
    config::EngineConfig,
    context::ActionContext,
    error::{EngineError, Result},
    legal::legal_actions,
    models::{DecisionNode, NodeId, NodeMeta, RangeRef, TableFormat},
    nodes::NodeStore,
    sizing::SizingTable,
};

// ---------------------------------------------------------------------------
// Request / snapshot types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ScenarioRequest {
    pub title: String,
    pub format: TableFormat,
    pub default_stack_bb: f64,
    pub sizing: SizingTable,
    pub rng_seed: Option<u64>,
}

impl ScenarioRequest {
    /// Defaults: 6-max, 100bb, built-in sizing, entropy-seeded id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::from_config(title, &EngineConfig::default())
    }

    pub fn from_config(title: impl Into<String>, config: &EngineConfig) -> Self {
        ScenarioRequest {
            title: title.into(),
            format: config.format,
            default_stack_bb: config.default_stack_bb,
            sizing: config.sizing.clone(),
            rng_seed: None,
        }
    }

    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Everything the persistence layer stores for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSnapshot {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub format: TableFormat,
    pub default_stack_bb: f64,
    pub nodes: NodeStore,
    pub context: ActionContext,
    /// Settings of reopened nodes removed by a first-round rewind.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parked: BTreeMap<NodeId, NodeMeta>,
}

/// Why a scenario cannot be saved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIssue {
    MissingTitle,
    NoLinkedRange,
}

impl fmt::Display for SaveIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveIssue::MissingTitle  => write!(f, "Give the scenario a title before saving."),
            SaveIssue::NoLinkedRange => write!(f, "Link a range to at least one decision before saving."),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) format: TableFormat,
    pub(crate) default_stack_bb: f64,
    pub(crate) sizing: SizingTable,
    pub(crate) nodes: NodeStore,
    pub(crate) context: ActionContext,
    /// Settings of reopened nodes that a first-round rewind removed, handed
    /// back if a node with the same id is reopened again.
    pub(crate) parked: BTreeMap<NodeId, NodeMeta>,
}

/// Generate a scenario id from the request's RNG.
fn make_scenario_id(rng: &mut impl RngCore) -> String {
    format!("SC-{:08X}", rng.next_u32())
}

/// Fresh node store with the first seat to act already active.
pub(crate) fn opening_nodes(format: TableFormat) -> NodeStore {
    let mut nodes = NodeStore::expand(format);
    if let Some(first) = nodes.iter_mut().next() {
        first.activate(legal_actions(&ActionContext::new()));
    }
    nodes
}

impl Scenario {
    pub fn new(request: ScenarioRequest) -> Self {
        let mut rng: StdRng = match request.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let id = make_scenario_id(&mut rng);
        log::debug!("new {} scenario {}", request.format, id);

        Scenario {
            id,
            title: request.title,
            description: String::new(),
            format: request.format,
            default_stack_bb: request.default_stack_bb,
            sizing: request.sizing,
            nodes: opening_nodes(request.format),
            context: ActionContext::new(),
            parked: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn format(&self) -> TableFormat {
        self.format
    }

    pub fn default_stack_bb(&self) -> f64 {
        self.default_stack_bb
    }

    pub fn sizing(&self) -> &SizingTable {
        &self.sizing
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn context(&self) -> &ActionContext {
        &self.context
    }

    pub fn node(&self, id: &NodeId) -> Result<&DecisionNode> {
        self.nodes.get(id).ok_or_else(|| EngineError::UnknownNode(id.clone()))
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Result<&mut DecisionNode> {
        self.nodes.get_mut(id).ok_or_else(|| EngineError::UnknownNode(id.clone()))
    }

    pub fn active_node(&self) -> Option<&DecisionNode> {
        self.nodes.active()
    }

    /// No node left to act.
    pub fn is_complete(&self) -> bool {
        self.nodes.active().is_none()
    }

    /// Declared actions in log order, e.g. `UTG open 2.5bb, HJ fold`.
    pub fn action_line(&self) -> String {
        self.context
            .entries()
            .iter()
            .map(|e| match e.sizing {
                Some(size) => format!("{} {} {}bb", e.seat.short(), e.action, size),
                None       => format!("{} {}", e.seat.short(), e.action),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Back to the freshly created state. Id, title, description and format
    /// survive; every node and declared action is discarded.
    pub fn reset(&mut self) {
        log::debug!("reset scenario {}", self.id);
        self.nodes = opening_nodes(self.format);
        self.context = ActionContext::new();
        self.parked.clear();
    }

    // -----------------------------------------------------------------------
    // Node metadata (never affects sequencing)
    // -----------------------------------------------------------------------

    pub fn set_hero(&mut self, id: &NodeId, is_hero: bool) -> Result<()> {
        self.node_mut(id)?.is_hero = is_hero;
        Ok(())
    }

    pub fn link_range(&mut self, id: &NodeId, range: RangeRef) -> Result<()> {
        self.node_mut(id)?.range = Some(range);
        Ok(())
    }

    pub fn unlink_range(&mut self, id: &NodeId) -> Result<Option<RangeRef>> {
        Ok(self.node_mut(id)?.range.take())
    }

    pub fn set_stack_override(&mut self, id: &NodeId, stack_bb: Option<f64>) -> Result<()> {
        self.node_mut(id)?.stack_override = stack_bb;
        Ok(())
    }

    pub fn effective_stack(&self, id: &NodeId) -> Result<f64> {
        Ok(self.node(id)?.stack_override.unwrap_or(self.default_stack_bb))
    }

    // -----------------------------------------------------------------------
    // Save eligibility
    // -----------------------------------------------------------------------

    pub fn save_issues(&self) -> Vec<SaveIssue> {
        let mut issues = Vec::new();
        if self.title.trim().is_empty() {
            issues.push(SaveIssue::MissingTitle);
        }
        if !self.nodes.iter().any(|n| n.range.is_some()) {
            issues.push(SaveIssue::NoLinkedRange);
        }
        issues
    }

    pub fn is_save_eligible(&self) -> bool {
        self.save_issues().is_empty()
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> ScenarioSnapshot {
        ScenarioSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            format: self.format,
            default_stack_bb: self.default_stack_bb,
            nodes: self.nodes.clone(),
            context: self.context.clone(),
            parked: self.parked.clone(),
        }
    }

    /// Rebuild a scenario from a stored snapshot.
    ///
    /// The snapshot is rejected unless its nodes and its log are exactly what
    /// replaying that log produces.
    pub fn restore(snapshot: ScenarioSnapshot, sizing: SizingTable) -> Result<Self> {
        let scenario = Scenario {
            id: snapshot.id,
            title: snapshot.title,
            description: snapshot.description,
            format: snapshot.format,
            default_stack_bb: snapshot.default_stack_bb,
            sizing,
            nodes: snapshot.nodes,
            context: snapshot.context,
            parked: snapshot.parked,
        };
        if let Err(err) = scenario.check_consistency() {
            log::warn!("rejected snapshot {}: {}", scenario.id, err);
            return Err(err);
        }
        Ok(scenario)
    }

    fn check_consistency(&self) -> Result<()> {
        let invalid = |msg: String| EngineError::InvalidSnapshot(msg);

        let mut seen = HashSet::new();
        for node in self.nodes.iter() {
            if !self.format.contains(node.seat) {
                return Err(invalid(format!("{} is not a {} seat", node.seat, self.format)));
            }
            if node.id != NodeId::new(&node.round, node.seat) {
                return Err(invalid(format!("node {} does not match its seat and round", node.id)));
            }
            if !seen.insert(node.id.clone()) {
                return Err(invalid(format!("duplicate node {}", node.id)));
            }
        }
        if self.nodes.active_count() > 1 {
            return Err(invalid("more than one active node".to_string()));
        }
        if let Some(entry) = self.context.entries().iter().find(|e| self.nodes.get(&e.node).is_none()) {
            return Err(invalid(format!("log entry for missing node {}", entry.node)));
        }
        let entries = self.context.entries();
        if entries.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(invalid("log timestamps are not increasing".to_string()));
        }
        if entries.last().is_some_and(|e| e.timestamp == u32::MAX) {
            return Err(invalid("log timestamps are exhausted".to_string()));
        }
        if let Some(id) = self.parked.keys().find(|id| self.nodes.get(id).is_some()) {
            return Err(invalid(format!("parked settings for live node {id}")));
        }

        let replayed = self.replayed().map_err(|e| invalid(format!("log does not replay: {e}")))?;
        for node in self.nodes.iter() {
            let Some(expected) = replayed.nodes.get(&node.id) else {
                return Err(invalid(format!("node {} is not produced by the log", node.id)));
            };
            let sizing_matches = !node.state.is_terminal() || node.sizing == expected.sizing;
            if node.round != expected.round
                || node.state != expected.state
                || node.action != expected.action
                || node.legal_actions != expected.legal_actions
                || !sizing_matches
            {
                return Err(invalid(format!("node {} disagrees with the log", node.id)));
            }
        }
        if replayed.nodes.len() != self.nodes.len() {
            return Err(invalid("log produces nodes missing from the snapshot".to_string()));
        }
        for (stored, expected) in entries.iter().zip(replayed.context.entries()) {
            if stored.node != expected.node
                || stored.seat != expected.seat
                || stored.action != expected.action
                || stored.sizing != expected.sizing
            {
                return Err(invalid(format!("log entry for {} disagrees with its replay", stored.node)));
            }
        }
        Ok(())
    }
}
