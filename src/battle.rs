//! Battle state machine between two co-located mobs.
//!
//! `ChoosingOrder` flips a coin for initiative, `Exchanging` alternates turns
//! (the second mob only answers while it is still alive), and `Resolved` holds
//! the result once either side has died. `World::battle` drives the machine.

use crate::entity::MobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    ChoosingOrder { a: MobId, b: MobId },
    Exchanging { first: MobId, second: MobId, swings: u32 },
    Resolved(BattleOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleOutcome {
    pub winner: MobId,
    pub loser: MobId,
    /// Mob that acted first
    pub first: MobId,
    /// Turns taken by both sides together
    pub swings: u32,
    /// Resources moved from loser to winner
    pub spoils: u32,
}

impl BattleState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, BattleState::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_resolved_state_is_resolved() {
        let (a, b) = (MobId(1), MobId(2));
        assert!(!BattleState::ChoosingOrder { a, b }.is_resolved());
        assert!(!BattleState::Exchanging {
            first: a,
            second: b,
            swings: 3
        }
        .is_resolved());
        let outcome = BattleOutcome {
            winner: a,
            loser: b,
            first: a,
            swings: 3,
            spoils: 5,
        };
        assert!(BattleState::Resolved(outcome).is_resolved());
    }
}
