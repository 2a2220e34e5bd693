//! End-to-end walkthrough of the scenario engine.
//!
//! Run with: `RUST_LOG=debug cargo run --example walkthrough`
//!
//! 1. **Build a line** — UTG opens, CO 3-bets, the big blind calls, and the
//!    engine hands UTG a second decision against the 3-bet.
//! 2. **Rewind** — CO's 3-bet is turned into a flat call; the reopened node
//!    disappears and the line is rebuilt from CO onward.
//! 3. **Save** — the scenario is checked for save eligibility, snapshotted to
//!    a JSON file store, loaded back and validated against its own log.

use preflop_scenario::{
    to_ui_state, Action, EngineConfig, JsonFileStore, NodeId, Position, RangeRef, Round,
    Scenario, ScenarioRequest, ScenarioStore,
};

fn seat(p: Position) -> NodeId {
    NodeId::new(&Round::Initial, p)
}

/// Print every node with its state and, for the active one, its options.
fn print_nodes(scenario: &Scenario) {
    println!("  Line: {}", scenario.action_line());
    for node in scenario.nodes().iter() {
        let hero = if node.is_hero { "*" } else { " " };
        let options: Vec<String> = node.legal_actions.iter().map(|a| a.to_string()).collect();
        if options.is_empty() {
            println!("  {hero} {:<7} {}", node.id, node);
        } else {
            println!("  {hero} {:<7} {}  -> [{}]", node.id, node, options.join(", "));
        }
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = EngineConfig::from_json(r#"{ "format": "6max", "default_stack_bb": 100 }"#)?;
    let mut scenario = Scenario::new(
        ScenarioRequest::from_config("UTG open vs CO 3-bet", &config).with_seed(2024),
    );
    scenario.set_hero(&seat(Position::UTG), true)?;

    println!("━━ 1. Build a line ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    scenario.apply_action(&seat(Position::UTG), Action::Open, None)?;
    scenario.apply_action(&seat(Position::HJ), Action::Fold, None)?;
    scenario.apply_action(&seat(Position::CO), Action::ThreeBet, None)?;
    scenario.apply_action(&seat(Position::BTN), Action::Fold, None)?;
    scenario.apply_action(&seat(Position::SB), Action::Fold, None)?;
    scenario.apply_action(&seat(Position::BB), Action::Call, None)?;
    print_nodes(&scenario);

    println!("━━ 2. Rewind CO and flat instead ━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    scenario.rewind(&seat(Position::CO))?;
    scenario.apply_action(&seat(Position::CO), Action::Call, None)?;
    for p in [Position::BTN, Position::SB, Position::BB] {
        scenario.apply_action(&seat(p), Action::Fold, None)?;
    }
    print_nodes(&scenario);

    println!("━━ 3. Save and reload ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for issue in scenario.save_issues() {
        println!("  ! {issue}");
    }
    scenario.link_range(&seat(Position::UTG), RangeRef("utg-rfi-100bb".into()))?;
    println!("  save eligible: {}", scenario.is_save_eligible());

    let store = JsonFileStore::new(std::env::temp_dir().join("preflop_scenario_demo"));
    store.save(&scenario.snapshot())?;
    let loaded = Scenario::restore(store.load(scenario.id())?, config.sizing.clone())?;
    println!("  reloaded {} from {}", loaded.id(), store.dir().display());
    println!("{}", serde_json::to_string_pretty(&to_ui_state(&loaded))?);
    Ok(())
}
