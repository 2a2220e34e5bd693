use crate::scenario_engine::{
    context::ActionContext,
    models::{Action, LegalActions},
};

fn set(actions: &[Action]) -> LegalActions {
    actions.iter().copied().collect()
}

/// Actions open to the next seat in the first round, given what has been
/// declared so far.
pub fn legal_actions(ctx: &ActionContext) -> LegalActions {
    if let Some(raiser) = ctx.last_raiser() {
        return match raiser.action {
            Action::Open | Action::Raise => set(&[Action::Fold, Action::Call, Action::ThreeBet]),
            Action::ThreeBet             => set(&[Action::Fold, Action::Call, Action::FourBet]),
            Action::FourBet              => set(&[Action::Fold, Action::Call]),
            // last_raiser only ever points at a raising entry
            Action::Fold | Action::Limp | Action::Call => unopened(),
        };
    }
    match ctx.last_opener() {
        Some(opener) if opener.action == Action::Limp => {
            set(&[Action::Fold, Action::Call, Action::Raise])
        }
        _ => unopened(),
    }
}

/// Actions open to a seat whose earlier passive entry was reopened by a raise.
pub fn reopened_actions() -> LegalActions {
    set(&[Action::Fold, Action::Call, Action::Raise])
}

fn unopened() -> LegalActions {
    set(&[Action::Fold, Action::Limp, Action::Open])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_engine::models::{NodeId, Position, Round};

    fn ctx(line: &[(Position, Action)]) -> ActionContext {
        let mut ctx = ActionContext::new();
        for &(seat, action) in line {
            let entry = ctx.next_entry(NodeId::new(&Round::Initial, seat), seat, action, None).unwrap();
            ctx.push(entry);
        }
        ctx
    }

    #[test]
    fn empty_or_folded_to_allows_limp_or_open() {
        let expected = set(&[Action::Fold, Action::Limp, Action::Open]);
        assert_eq!(legal_actions(&ctx(&[])), expected);
        assert_eq!(
            legal_actions(&ctx(&[(Position::UTG, Action::Fold), (Position::HJ, Action::Fold)])),
            expected
        );
    }

    #[test]
    fn facing_a_limp_allows_a_raise() {
        let c = ctx(&[(Position::UTG, Action::Limp), (Position::HJ, Action::Call)]);
        assert_eq!(legal_actions(&c), set(&[Action::Fold, Action::Call, Action::Raise]));
    }

    #[test]
    fn each_raise_level_caps_the_next() {
        let open = ctx(&[(Position::UTG, Action::Open)]);
        assert_eq!(legal_actions(&open), set(&[Action::Fold, Action::Call, Action::ThreeBet]));

        let three = ctx(&[(Position::UTG, Action::Open), (Position::HJ, Action::ThreeBet)]);
        assert_eq!(legal_actions(&three), set(&[Action::Fold, Action::Call, Action::FourBet]));

        let four = ctx(&[
            (Position::UTG, Action::Open),
            (Position::HJ, Action::ThreeBet),
            (Position::CO, Action::FourBet),
        ]);
        assert_eq!(legal_actions(&four), set(&[Action::Fold, Action::Call]));
    }

    #[test]
    fn iso_raise_over_limp_is_answered_like_an_open() {
        let c = ctx(&[(Position::UTG, Action::Limp), (Position::HJ, Action::Raise)]);
        assert_eq!(legal_actions(&c), set(&[Action::Fold, Action::Call, Action::ThreeBet]));
    }
}
