//! Action board: owns every scripted action and evaluates availability
//!
//! Availability is checked in a fixed order:
//!
//! 1. a one-time probability roll; a failed roll skips the action for good
//! 2. the action must still be pending
//! 3. the player rank gate
//! 4. the time window; passing the deadline fails the action for good
//! 5. every requirement, stopping at the first one not met
//!
//! As soon as one requirement is met and the action carries a delay, the
//! delay is converted into a later start time and the check runs once more.
//! Requirements after the first may still be unmet at that point. The second
//! check never defers again, since the delay has been consumed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actions::action::Action;
use crate::actions::catalog::{ActionStatus, ActionType};
use crate::actions::requirement::ActionContext;
use crate::core::error::{CampaignError, Result};
use crate::core::types::{ActionId, SimTime};

/// Outcome of one pass through the availability gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Open,
    Closed,
    /// A requirement was met while a delay is pending
    Deferred,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionBoard {
    actions: Vec<Action>,
}

impl ActionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action; ids must be unique
    pub fn add(&mut self, action: Action) -> Result<()> {
        if self.get(action.id).is_some() {
            return Err(CampaignError::DuplicateAction(action.id));
        }
        self.actions.push(action);
        Ok(())
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn status_of(&self, id: ActionId) -> Option<ActionStatus> {
        self.get(id).map(|a| a.status)
    }

    /// Evaluate the availability gates for one action
    ///
    /// May permanently change the action's state: a failed probability roll
    /// marks it Skipped, a passed deadline marks it Failed, and a satisfied
    /// delay moves its start time.
    pub fn is_available(&mut self, id: ActionId, ctx: &ActionContext<'_>, rng: &mut impl Rng) -> bool {
        match self.check_gates(id, ctx, rng) {
            Gate::Open => true,
            Gate::Closed => false,
            Gate::Deferred => {
                if let Some(action) = self.get_mut(id) {
                    action.start_after = ctx.now + action.delay;
                    action.delay = 0;
                    debug!(action = id.0, start_after = action.start_after, "action deferred");
                }
                self.check_gates(id, ctx, rng) == Gate::Open
            }
        }
    }

    /// Ids of available actions of a type, in authored order
    pub fn available_actions(
        &mut self,
        action_type: ActionType,
        ctx: &ActionContext<'_>,
        rng: &mut impl Rng,
    ) -> Vec<ActionId> {
        let candidates: Vec<ActionId> = self
            .actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .map(|a| a.id)
            .collect();

        candidates
            .into_iter()
            .filter(|id| self.is_available(*id, ctx, rng))
            .collect()
    }

    pub fn activate(&mut self, id: ActionId) -> Result<bool> {
        let action = self.get_mut(id).ok_or(CampaignError::ActionNotFound(id))?;
        Ok(action.activate())
    }

    pub fn fire_action(&mut self, id: ActionId, now: SimTime) -> Result<()> {
        let action = self.get_mut(id).ok_or(CampaignError::ActionNotFound(id))?;
        action.fire_action(now);
        Ok(())
    }

    pub fn fail_action(&mut self, id: ActionId, now: SimTime) -> Result<()> {
        let action = self.get_mut(id).ok_or(CampaignError::ActionNotFound(id))?;
        action.fail_action(now);
        Ok(())
    }

    fn check_gates(&mut self, id: ActionId, ctx: &ActionContext<'_>, rng: &mut impl Rng) -> Gate {
        let Some(action) = self.get_mut(id) else {
            return Gate::Closed;
        };

        if action.roll.is_none() {
            let roll = rng.gen_range(0..100);
            action.roll = Some(roll);
            if roll > action.probability {
                action.status = ActionStatus::Skipped;
                info!(action = id.0, roll, probability = action.probability, "action skipped");
            }
        }

        if action.status != ActionStatus::Pending {
            return Gate::Closed;
        }

        if action.has_rank_gate() {
            match ctx.player_rank {
                Some(rank) if (action.min_rank..=action.max_rank).contains(&rank) => {}
                _ => return Gate::Closed,
            }
        }

        if ctx.now < action.start_after {
            return Gate::Closed;
        }
        if ctx.now > action.start_before {
            action.fail_action(ctx.now);
            return Gate::Closed;
        }

        let delay = action.delay;
        let requirements = action.requirements.clone();

        for requirement in &requirements {
            if !requirement.is_met(ctx, |other| self.status_of(other)) {
                return Gate::Closed;
            }
            // The first met requirement starts the delay clock
            if delay > 0 {
                return Gate::Deferred;
            }
        }

        Gate::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::requirement::Requirement;
    use crate::campaign::Combatant;
    use crate::force::ForceTree;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx_at<'a>(now: SimTime, tree: &'a ForceTree, sides: &'a [Combatant]) -> ActionContext<'a> {
        ActionContext {
            now,
            player_rank: Some(3),
            forces: tree,
            combatants: sides,
        }
    }

    #[test]
    fn test_failed_roll_is_skipped_forever() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        let mut action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        action.probability = -1;
        board.add(action).unwrap();

        let ctx = ctx_at(0, &tree, &[]);
        assert!(!board.is_available(ActionId(1), &ctx, &mut rng));
        assert_eq!(board.status_of(ActionId(1)), Some(ActionStatus::Skipped));

        board.get_mut(ActionId(1)).unwrap().probability = 100;
        assert!(!board.is_available(ActionId(1), &ctx, &mut rng));
    }

    #[test]
    fn test_deadline_fails_once() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        let mut action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        action.start_before = 100;
        board.add(action).unwrap();

        assert!(board.is_available(ActionId(1), &ctx_at(50, &tree, &[]), &mut rng));
        assert!(!board.is_available(ActionId(1), &ctx_at(101, &tree, &[]), &mut rng));
        assert_eq!(board.status_of(ActionId(1)), Some(ActionStatus::Failed));
        assert_eq!(board.get(ActionId(1)).unwrap().exec_time, 101);

        assert!(!board.is_available(ActionId(1), &ctx_at(50, &tree, &[]), &mut rng));
        assert_eq!(board.get(ActionId(1)).unwrap().exec_time, 101);
    }

    #[test]
    fn test_rank_gate() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        let mut action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        action.min_rank = 5;
        board.add(action).unwrap();

        let mut ctx = ctx_at(0, &tree, &[]);
        assert!(!board.is_available(ActionId(1), &ctx, &mut rng));
        ctx.player_rank = None;
        assert!(!board.is_available(ActionId(1), &ctx, &mut rng));
        ctx.player_rank = Some(6);
        assert!(board.is_available(ActionId(1), &ctx, &mut rng));
    }

    #[test]
    fn test_start_after_window() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        let mut action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        action.start_after = 60;
        board.add(action).unwrap();

        assert!(!board.is_available(ActionId(1), &ctx_at(59, &tree, &[]), &mut rng));
        assert!(board.is_available(ActionId(1), &ctx_at(60, &tree, &[]), &mut rng));
        assert_eq!(board.status_of(ActionId(1)), Some(ActionStatus::Pending));
    }

    #[test]
    fn test_delay_defers_exactly_once() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        board
            .add(Action::new(ActionId(1), ActionType::NoAction, 0, 1))
            .unwrap();
        let mut dependent = Action::new(ActionId(2), ActionType::CombatEvent, 0, 1);
        dependent.delay = 600;
        dependent.add_requirement(Requirement::action(ActionId(1), ActionStatus::Complete, false));
        board.add(dependent).unwrap();

        board.fire_action(ActionId(1), 0).unwrap();

        assert!(!board.is_available(ActionId(2), &ctx_at(1000, &tree, &[]), &mut rng));
        let deferred = board.get(ActionId(2)).unwrap();
        assert_eq!(deferred.start_after, 1600);
        assert_eq!(deferred.delay, 0);

        assert!(!board.is_available(ActionId(2), &ctx_at(1599, &tree, &[]), &mut rng));
        assert!(board.is_available(ActionId(2), &ctx_at(1600, &tree, &[]), &mut rng));
        assert_eq!(board.get(ActionId(2)).unwrap().start_after, 1600);
    }

    #[test]
    fn test_delay_starts_at_first_met_requirement() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        board
            .add(Action::new(ActionId(1), ActionType::NoAction, 0, 1))
            .unwrap();
        board
            .add(Action::new(ActionId(2), ActionType::NoAction, 0, 1))
            .unwrap();
        let mut dependent = Action::new(ActionId(3), ActionType::CombatEvent, 0, 1);
        dependent.delay = 600;
        dependent.add_requirement(Requirement::action(ActionId(1), ActionStatus::Complete, false));
        dependent.add_requirement(Requirement::action(ActionId(2), ActionStatus::Complete, false));
        board.add(dependent).unwrap();

        board.fire_action(ActionId(1), 1000).unwrap();
        assert!(!board.is_available(ActionId(3), &ctx_at(1000, &tree, &[]), &mut rng));
        let deferred = board.get(ActionId(3)).unwrap();
        assert_eq!(deferred.start_after, 1600);
        assert_eq!(deferred.delay, 0);

        board.fire_action(ActionId(2), 1500).unwrap();
        assert!(!board.is_available(ActionId(3), &ctx_at(1599, &tree, &[]), &mut rng));
        assert!(board.is_available(ActionId(3), &ctx_at(1600, &tree, &[]), &mut rng));
        assert_eq!(board.get(ActionId(3)).unwrap().start_after, 1600);
    }

    #[test]
    fn test_delay_without_requirements_is_ignored() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        let mut action = Action::new(ActionId(1), ActionType::CombatEvent, 0, 1);
        action.delay = 600;
        board.add(action).unwrap();

        assert!(board.is_available(ActionId(1), &ctx_at(0, &tree, &[]), &mut rng));
    }

    #[test]
    fn test_available_actions_filters_by_type() {
        let tree = ForceTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = ActionBoard::new();
        board
            .add(Action::new(ActionId(1), ActionType::MissionTemplate, 0, 1))
            .unwrap();
        board
            .add(Action::new(ActionId(2), ActionType::CombatEvent, 0, 1))
            .unwrap();
        board
            .add(Action::new(ActionId(3), ActionType::MissionTemplate, 0, 1))
            .unwrap();
        board.activate(ActionId(3)).unwrap();

        let ctx = ctx_at(0, &tree, &[]);
        assert_eq!(
            board.available_actions(ActionType::MissionTemplate, &ctx, &mut rng),
            vec![ActionId(1)]
        );
        assert!(board.add(Action::new(ActionId(2), ActionType::NoAction, 0, 1)).is_err());
        assert!(board.fire_action(ActionId(42), 0).is_err());
    }
}
