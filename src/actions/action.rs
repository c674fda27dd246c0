//! Scripted campaign actions

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::actions::catalog::{ActionStatus, ActionType};
use crate::actions::requirement::Requirement;
use crate::core::types::{ActionId, Iff, SimTime};
use crate::force::{GroupType, MissionType};

/// Upper bound used when an action has no start deadline
pub const TIME_NEVER: SimTime = 1_000_000_000;

/// Rank gate bounds that disable the gate
pub const MIN_RANK: i32 = 0;
pub const MAX_RANK: i32 = 100;

/// An authored campaign action with its trigger conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub action_type: ActionType,
    /// Authored subtype code
    pub subtype: i32,
    pub iff: Iff,
    pub status: ActionStatus,

    // === TRIGGER ===
    /// Chance in percent that the action happens at all
    pub probability: i32,
    /// Probability roll (0..=99), made once on first evaluation
    pub roll: Option<i32>,
    pub min_rank: i32,
    pub max_rank: i32,
    /// Not available before this time
    pub start_after: SimTime,
    /// Fails once this time has passed
    pub start_before: SimTime,
    /// Once requirements are satisfied, wait this long before becoming available
    pub delay: SimTime,
    pub requirements: Vec<Requirement>,

    /// Remaining repeats before the action completes
    pub count: i32,
    /// When the action last fired or failed
    pub exec_time: SimTime,

    // === PAYLOAD ===
    /// Mission requested by a mission template
    pub mission: Option<MissionType>,
    pub asset_type: GroupType,
    pub asset_id: i32,
    pub target_type: GroupType,
    pub target_id: i32,
    pub target_iff: Iff,
    /// Expected enemy formation for mission templates
    pub opposing_type: Option<GroupType>,
    /// Region named by zone assignments
    pub region: String,
    /// Star system named by system assignments
    pub system: String,
    /// Mission script name
    pub script: String,
    pub text: String,
}

impl Action {
    pub fn new(id: ActionId, action_type: ActionType, subtype: i32, iff: Iff) -> Self {
        Self {
            id,
            action_type,
            subtype,
            iff,
            status: ActionStatus::Pending,
            probability: 100,
            roll: None,
            min_rank: MIN_RANK,
            max_rank: MAX_RANK,
            start_after: 0,
            start_before: TIME_NEVER,
            delay: 0,
            requirements: Vec::new(),
            count: 0,
            exec_time: 0,
            mission: None,
            asset_type: GroupType::None,
            asset_id: 0,
            target_type: GroupType::None,
            target_id: 0,
            target_iff: 0,
            opposing_type: None,
            region: String::new(),
            system: String::new(),
            script: String::new(),
            text: String::new(),
        }
    }

    pub fn add_requirement(&mut self, requirement: Requirement) {
        self.requirements.push(requirement);
    }

    /// Rank gate is in effect
    pub fn has_rank_gate(&self) -> bool {
        self.min_rank > MIN_RANK || self.max_rank < MAX_RANK
    }

    /// Move a pending action to Active; other states are left alone
    pub fn activate(&mut self) -> bool {
        if self.status != ActionStatus::Pending {
            return false;
        }
        self.status = ActionStatus::Active;
        true
    }

    /// Consume one repeat; the action completes when none remain
    pub fn fire_action(&mut self, now: SimTime) {
        if self.status.is_terminal() {
            return;
        }

        self.exec_time = now;
        if self.count >= 1 {
            self.count -= 1;
        }
        if self.count < 1 {
            self.status = ActionStatus::Complete;
            info!(action = self.id.0, "action complete");
        }
    }

    /// Fail unconditionally, discarding any remaining repeats
    pub fn fail_action(&mut self, now: SimTime) {
        self.exec_time = now;
        self.count = 0;
        if self.status != ActionStatus::Failed {
            self.status = ActionStatus::Failed;
            info!(action = self.id.0, "action failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        assert_eq!(action.probability, 100);
        assert_eq!(action.start_before, TIME_NEVER);
        assert!(!action.has_rank_gate());
        assert_eq!(action.status, ActionStatus::Pending);
    }

    #[test]
    fn test_fire_counts_down_repeats() {
        let mut action = Action::new(ActionId(1), ActionType::MissionTemplate, 0, 1);
        action.count = 2;

        action.fire_action(100);
        assert_eq!(action.status, ActionStatus::Pending);
        assert_eq!(action.exec_time, 100);

        action.fire_action(200);
        assert_eq!(action.status, ActionStatus::Complete);
        assert_eq!(action.count, 0);
    }

    #[test]
    fn test_fire_without_repeats_completes() {
        let mut action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        assert!(action.activate());
        action.fire_action(5);
        assert_eq!(action.status, ActionStatus::Complete);
        assert!(!action.activate());
    }

    #[test]
    fn test_fail_zeroes_count() {
        let mut action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        action.count = 4;
        action.fail_action(30);
        assert_eq!(action.count, 0);
        assert_eq!(action.status, ActionStatus::Failed);
        action.fire_action(40);
        assert_eq!(action.status, ActionStatus::Failed);
    }
}
