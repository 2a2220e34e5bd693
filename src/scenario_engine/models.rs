use std::collections::BTreeSet;
use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Table metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    UTG,
    UTG1,
    UTG2,
    LJ,   // Lojack
    HJ,   // Hijack
    CO,   // Cutoff
    BTN,  // Button
    SB,   // Small Blind
    BB,   // Big Blind
}

impl Position {
    /// Short label used in node ids and action lines.
    pub fn short(self) -> &'static str {
        match self {
            Position::UTG  => "UTG",
            Position::UTG1 => "UTG1",
            Position::UTG2 => "UTG2",
            Position::LJ   => "LJ",
            Position::HJ   => "HJ",
            Position::CO   => "CO",
            Position::BTN  => "BTN",
            Position::SB   => "SB",
            Position::BB   => "BB",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::UTG  => "UTG",
            Position::UTG1 => "UTG+1",
            Position::UTG2 => "UTG+2",
            Position::LJ   => "Lojack",
            Position::HJ   => "Hijack",
            Position::CO   => "Cutoff",
            Position::BTN  => "Button",
            Position::SB   => "Small Blind",
            Position::BB   => "Big Blind",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableFormat {
    #[serde(rename = "6max")]
    SixMax,
    #[serde(rename = "9max")]
    NineMax,
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::SixMax  => write!(f, "6-max"),
            TableFormat::NineMax => write!(f, "9-max"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions and node states
// ---------------------------------------------------------------------------

/// What a seat declares at its decision node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Limp,
    Call,
    Open,
    Raise,
    ThreeBet,
    FourBet,
}

impl Action {
    /// True for actions that put in a raise and therefore carry a sizing.
    pub fn is_raising(self) -> bool {
        matches!(self, Action::Open | Action::Raise | Action::ThreeBet | Action::FourBet)
    }

    /// True for actions that commit chips without raising.
    pub fn is_passive(self) -> bool {
        matches!(self, Action::Limp | Action::Call)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Fold     => "fold",
            Action::Limp     => "limp",
            Action::Call     => "call",
            Action::Open     => "open",
            Action::Raise    => "raise",
            Action::ThreeBet => "3-bet",
            Action::FourBet  => "4-bet",
        };
        write!(f, "{}", s)
    }
}

pub type LegalActions = BTreeSet<Action>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Waiting,
    Active,
    Folded,
    Limped,
    Opened,
    Raised,
    ThreeBet,
    FourBet,
}

impl NodeState {
    /// The terminal state a node lands in after declaring `action`.
    pub fn after(action: Action) -> NodeState {
        match action {
            Action::Fold                => NodeState::Folded,
            Action::Limp | Action::Call => NodeState::Limped,
            Action::Open                => NodeState::Opened,
            Action::Raise               => NodeState::Raised,
            Action::ThreeBet            => NodeState::ThreeBet,
            Action::FourBet             => NodeState::FourBet,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, NodeState::Waiting | NodeState::Active)
    }

    pub fn is_raising(self) -> bool {
        matches!(
            self,
            NodeState::Opened | NodeState::Raised | NodeState::ThreeBet | NodeState::FourBet
        )
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeState::Waiting  => "waiting",
            NodeState::Active   => "active",
            NodeState::Folded   => "folded",
            NodeState::Limped   => "limped",
            NodeState::Opened   => "opened",
            NodeState::Raised   => "raised",
            NodeState::ThreeBet => "3-bet",
            NodeState::FourBet  => "4-bet",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Decision nodes
// ---------------------------------------------------------------------------

/// Which pass of the action a node belongs to.
///
/// Initial nodes come from expanding the table topology. Reopened nodes are
/// spawned after the big blind's decision for seats that entered passively
/// before a raise; `raiser` is the node whose raise reopened the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Round {
    Initial,
    Reopened { raiser: NodeId },
}

impl Round {
    pub fn is_initial(&self) -> bool {
        matches!(self, Round::Initial)
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            Round::Initial         => 1,
            Round::Reopened { .. } => 2,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::Initial         => write!(f, "first"),
            Round::Reopened { .. } => write!(f, "second"),
        }
    }
}

/// Opaque node identifier, e.g. `R1-UTG` or `R2-CO`.
///
/// A seat has at most one node per round, so the id is derived from both and
/// stays stable across replays and rewinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(round: &Round, seat: Position) -> Self {
        NodeId(format!("R{}-{}", round.ordinal(), seat.short()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to range content held by the range editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeRef(pub String);

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    pub id: NodeId,
    pub seat: Position,
    pub round: Round,
    pub state: NodeState,
    pub action: Option<Action>,
    /// Size in big blinds; meaningful only for raising actions.
    pub sizing: Option<f64>,
    pub is_hero: bool,
    pub range: Option<RangeRef>,
    pub legal_actions: LegalActions,
    pub stack_override: Option<f64>,
}

impl DecisionNode {
    pub fn new(seat: Position, round: Round) -> Self {
        DecisionNode {
            id: NodeId::new(&round, seat),
            seat,
            round,
            state: NodeState::Waiting,
            action: None,
            sizing: None,
            is_hero: false,
            range: None,
            legal_actions: LegalActions::new(),
            stack_override: None,
        }
    }

    pub fn activate(&mut self, legal: LegalActions) {
        self.state = NodeState::Active;
        self.legal_actions = legal;
    }

    /// Record a declared action and leave the node terminal.
    pub fn declare(&mut self, action: Action, sizing: Option<f64>) {
        self.state = NodeState::after(action);
        self.action = Some(action);
        self.sizing = sizing;
        self.legal_actions.clear();
    }

    /// Back to Waiting with the declared action gone. Sizing is kept only when
    /// `keep_sizing` is set.
    pub fn reset(&mut self, keep_sizing: bool) {
        self.state = NodeState::Waiting;
        self.action = None;
        self.legal_actions.clear();
        if !keep_sizing {
            self.sizing = None;
        }
    }

    pub fn meta(&self) -> NodeMeta {
        NodeMeta {
            is_hero: self.is_hero,
            range: self.range.clone(),
            stack_override: self.stack_override,
        }
    }

    pub fn apply_meta(&mut self, meta: NodeMeta) {
        self.is_hero = meta.is_hero;
        self.range = meta.range;
        self.stack_override = meta.stack_override;
    }
}

/// Builder-side settings on a node. None of them affect sequencing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub is_hero: bool,
    pub range: Option<RangeRef>,
    pub stack_override: Option<f64>,
}

impl fmt::Display for DecisionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.action, self.sizing) {
            (Some(action), Some(size)) if action.is_raising() => {
                write!(f, "{} {} {}bb", self.seat.short(), action, size)
            }
            (Some(action), _) => write!(f, "{} {}", self.seat.short(), action),
            (None, _) => write!(f, "{} {}", self.seat.short(), self.state),
        }
    }
}
