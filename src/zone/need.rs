//! Per-zone reinforcement need

use serde::{Deserialize, Serialize};

use crate::force::GroupType;

/// Need slot; only the six assignable formation kinds are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedCategory {
    Carrier,
    BattleGroup,
    DestroyerSquadron,
    AttackSquadron,
    FighterSquadron,
    InterceptSquadron,
}

impl NeedCategory {
    pub const ALL: [NeedCategory; 6] = [
        NeedCategory::Carrier,
        NeedCategory::BattleGroup,
        NeedCategory::DestroyerSquadron,
        NeedCategory::AttackSquadron,
        NeedCategory::FighterSquadron,
        NeedCategory::InterceptSquadron,
    ];

    pub fn from_group_type(group_type: GroupType) -> Option<Self> {
        match group_type {
            GroupType::CarrierGroup => Some(Self::Carrier),
            GroupType::BattleGroup => Some(Self::BattleGroup),
            GroupType::DestroyerSquadron => Some(Self::DestroyerSquadron),
            GroupType::AttackSquadron => Some(Self::AttackSquadron),
            GroupType::FighterSquadron => Some(Self::FighterSquadron),
            GroupType::InterceptSquadron => Some(Self::InterceptSquadron),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Signed need accumulator; positive is a shortfall, negative an oversupply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedVector([i64; 6]);

impl NeedVector {
    pub fn get(&self, category: NeedCategory) -> i64 {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: NeedCategory, amount: i64) {
        self.0[category.index()] = amount;
    }

    pub fn add(&mut self, category: NeedCategory, amount: i64) {
        self.0[category.index()] += amount;
    }

    /// Need for a group type; types without a slot have none
    pub fn for_type(&self, group_type: GroupType) -> i64 {
        NeedCategory::from_group_type(group_type)
            .map(|c| self.get(c))
            .unwrap_or(0)
    }

    /// Add need for a group type; a no-op for types without a slot
    pub fn add_for_type(&mut self, group_type: GroupType, amount: i64) {
        if let Some(c) = NeedCategory::from_group_type(group_type) {
            self.add(c, amount);
        }
    }

    /// Combined need across several group types
    pub fn combined(&self, types: &[GroupType]) -> i64 {
        types.iter().map(|t| self.for_type(*t)).sum()
    }

    pub fn reset(&mut self) {
        self.0 = [0; 6];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need_for_unslotted_type_is_noop() {
        let mut need = NeedVector::default();
        need.add_for_type(GroupType::Starbase, 50);
        assert_eq!(need, NeedVector::default());
        assert_eq!(need.for_type(GroupType::Starbase), 0);
    }

    #[test]
    fn test_combined_need() {
        let mut need = NeedVector::default();
        need.add_for_type(GroupType::CarrierGroup, 4);
        need.add_for_type(GroupType::AttackSquadron, 3);
        need.add_for_type(GroupType::FighterSquadron, -10);
        need.add_for_type(GroupType::BattleGroup, 100);
        assert_eq!(
            need.combined(&[
                GroupType::CarrierGroup,
                GroupType::AttackSquadron,
                GroupType::FighterSquadron,
                GroupType::InterceptSquadron,
            ]),
            -3
        );
        need.reset();
        assert_eq!(need.get(NeedCategory::BattleGroup), 0);
    }
}
