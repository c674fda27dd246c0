//! One side of the conflict

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::{GroupId, Iff};
use crate::force::{ForceTree, GroupType};

/// Coarse targeting bucket used to weight raw group value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategicCategory {
    CapitalShips,
    Fighters,
    /// Batteries and missile sites
    Weapons,
    C3i,
    Logistics,
    Other,
}

impl StrategicCategory {
    pub fn of(group_type: GroupType) -> Self {
        use GroupType as G;

        match group_type {
            G::Fleet | G::CarrierGroup | G::BattleGroup | G::DestroyerSquadron => {
                Self::CapitalShips
            }
            G::Wing | G::AttackSquadron | G::InterceptSquadron | G::FighterSquadron => {
                Self::Fighters
            }
            G::Battery | G::Missile => Self::Weapons,
            G::Battalion
            | G::Starbase
            | G::C3i
            | G::CommRelay
            | G::EarlyWarning
            | G::FwdControlCtr
            | G::Ecm => Self::C3i,
            G::Support | G::Courier | G::Medical | G::Supply | G::Repair => Self::Logistics,
            _ => Self::Other,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub iff: Iff,
    pub score: i32,
    /// Root of this side's order of battle
    pub force: GroupId,
    /// Enemy groups worth attacking, rebuilt every strategic pass
    pub target_list: Vec<GroupId>,
    /// Own groups worth defending, rebuilt every strategic pass
    pub defend_list: Vec<GroupId>,
    /// Weight per [`StrategicCategory`]
    pub target_factor: [f64; 6],
}

impl Combatant {
    pub fn new(name: impl Into<String>, iff: Iff, force: GroupId) -> Self {
        Self {
            name: name.into(),
            iff,
            score: 0,
            force,
            target_list: Vec::new(),
            defend_list: Vec::new(),
            target_factor: config().default_target_factors,
        }
    }

    pub fn target_strat_factor(&self, group_type: GroupType) -> f64 {
        self.target_factor[StrategicCategory::of(group_type).index()]
    }

    pub fn set_target_strat_factor(&mut self, group_type: GroupType, factor: f64) {
        self.target_factor[StrategicCategory::of(group_type).index()] = factor;
    }

    /// Find a group within this side's order of battle
    pub fn find_group(&self, tree: &ForceTree, group_type: GroupType, number: i32) -> Option<GroupId> {
        tree.find_group(self.force, group_type, number)
    }
}
