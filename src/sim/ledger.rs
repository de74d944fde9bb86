//! Scoring rules: outcomes in, score/lives/counters and feedback out

use super::events::{Feedback, Outcome, OutcomeKind};
use super::state::{ObjectKind, ScoreState};
use crate::consts::{APPLE_POINTS, ROCK_PENALTY};

#[derive(Debug, Clone)]
pub struct ScoreLedger {
    initial_lives: i32,
    state: ScoreState,
}

impl ScoreLedger {
    pub fn new(initial_lives: i32) -> Self {
        Self {
            initial_lives,
            state: ScoreState::new(initial_lives),
        }
    }

    /// Fresh score, full lives
    pub fn reset(&mut self) {
        self.state = ScoreState::new(self.initial_lives);
    }

    pub fn set_initial_lives(&mut self, lives: i32) {
        self.initial_lives = lives;
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    /// Apply one outcome. Returns the cue to play, if any.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Feedback> {
        let s = &mut self.state;
        match (outcome.kind, outcome.object) {
            (OutcomeKind::Captured, ObjectKind::Apple) => {
                s.score += APPLE_POINTS;
                s.apples_caught += 1;
                Some(Feedback::CatchApple)
            }
            (OutcomeKind::Captured, ObjectKind::Rock) => {
                s.score -= ROCK_PENALTY;
                Some(Feedback::CatchRock)
            }
            (OutcomeKind::Captured, ObjectKind::Bomb) => {
                s.lives -= 1;
                Some(Feedback::CatchBomb)
            }
            (OutcomeKind::Exited, ObjectKind::Apple) => Some(Feedback::MissApple),
            (OutcomeKind::Exited, ObjectKind::Rock) => {
                s.rocks_avoided += 1;
                None
            }
            (OutcomeKind::Exited, ObjectKind::Bomb) => None,
        }
    }

    /// No lives left: the round should end
    pub fn lives_exhausted(&self) -> bool {
        self.state.lives <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::INITIAL_LIVES;
    use proptest::prelude::*;

    #[test]
    fn test_apple_then_rock() {
        let mut ledger = ScoreLedger::new(INITIAL_LIVES);
        assert_eq!(ledger.apply(Outcome::captured(ObjectKind::Apple)), Some(Feedback::CatchApple));
        assert_eq!(ledger.apply(Outcome::captured(ObjectKind::Rock)), Some(Feedback::CatchRock));
        assert_eq!(ledger.state().score, 5);
        assert_eq!(ledger.state().apples_caught, 1);
    }

    #[test]
    fn test_three_apples() {
        let mut ledger = ScoreLedger::new(INITIAL_LIVES);
        for _ in 0..3 {
            ledger.apply(Outcome::captured(ObjectKind::Apple));
        }
        assert_eq!(ledger.state().score, 30);
        assert_eq!(ledger.state().apples_caught, 3);
    }

    #[test]
    fn test_score_goes_negative() {
        let mut ledger = ScoreLedger::new(INITIAL_LIVES);
        ledger.apply(Outcome::captured(ObjectKind::Rock));
        ledger.apply(Outcome::captured(ObjectKind::Rock));
        assert_eq!(ledger.state().score, -10);
    }

    #[test]
    fn test_exits() {
        let mut ledger = ScoreLedger::new(INITIAL_LIVES);
        assert_eq!(ledger.apply(Outcome::exited(ObjectKind::Apple)), Some(Feedback::MissApple));
        assert_eq!(ledger.apply(Outcome::exited(ObjectKind::Rock)), None);
        assert_eq!(ledger.apply(Outcome::exited(ObjectKind::Bomb)), None);

        let s = ledger.state();
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, INITIAL_LIVES);
        assert_eq!(s.rocks_avoided, 1);
        assert_eq!(s.apples_caught, 0);
    }

    #[test]
    fn test_bombs_exhaust_lives() {
        let mut ledger = ScoreLedger::new(3);
        ledger.apply(Outcome::captured(ObjectKind::Bomb));
        ledger.apply(Outcome::captured(ObjectKind::Apple));
        ledger.apply(Outcome::captured(ObjectKind::Bomb));
        assert!(!ledger.lives_exhausted());
        assert_eq!(ledger.apply(Outcome::captured(ObjectKind::Bomb)), Some(Feedback::CatchBomb));
        assert!(ledger.lives_exhausted());

        // Further bombs are still well-defined
        ledger.apply(Outcome::captured(ObjectKind::Bomb));
        assert_eq!(ledger.state().lives, -1);
    }

    #[test]
    fn test_reset() {
        let mut ledger = ScoreLedger::new(2);
        ledger.apply(Outcome::captured(ObjectKind::Apple));
        ledger.apply(Outcome::captured(ObjectKind::Bomb));
        ledger.reset();
        assert_eq!(ledger.state(), ScoreState::new(2));
    }

    fn any_outcome() -> impl Strategy<Value = Outcome> {
        let kind = prop_oneof![Just(OutcomeKind::Captured), Just(OutcomeKind::Exited)];
        let object = prop_oneof![
            Just(ObjectKind::Apple),
            Just(ObjectKind::Rock),
            Just(ObjectKind::Bomb)
        ];
        (kind, object).prop_map(|(kind, object)| Outcome { kind, object })
    }

    proptest! {
        #[test]
        fn order_does_not_matter(outcomes in prop::collection::vec(any_outcome(), 0..40)) {
            let mut forward = ScoreLedger::new(INITIAL_LIVES);
            let mut backward = ScoreLedger::new(INITIAL_LIVES);
            for o in &outcomes {
                forward.apply(*o);
            }
            for o in outcomes.iter().rev() {
                backward.apply(*o);
            }
            prop_assert_eq!(forward.state(), backward.state());

            let apples = outcomes
                .iter()
                .filter(|o| **o == Outcome::captured(ObjectKind::Apple))
                .count() as i64;
            let rocks = outcomes
                .iter()
                .filter(|o| **o == Outcome::captured(ObjectKind::Rock))
                .count() as i64;
            prop_assert_eq!(forward.state().score, apples * 10 - rocks * 5);
        }
    }
}
