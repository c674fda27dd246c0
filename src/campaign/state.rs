//! Campaign state shared by every planner

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::actions::{ActionBoard, ActionContext};
use crate::campaign::combatant::Combatant;
use crate::campaign::mission::{MissionFactory, MissionInfo, MissionRequest};
use crate::core::error::{CampaignError, Result};
use crate::core::types::{ActionId, GroupId, Iff, SimTime, ZoneId};
use crate::force::{ForceTree, GroupType, OrderOfBattle};
use crate::zone::ZoneRegistry;

/// Everything the planners read and mutate during a tick
///
/// Fields are public so a planner can borrow the force tree, the zones and
/// the random source independently.
#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    pub name: String,
    /// Simulated seconds since the campaign began
    pub time: SimTime,
    pub forces: ForceTree,
    pub zones: ZoneRegistry,
    pub combatants: Vec<Combatant>,
    pub actions: ActionBoard,
    /// Missions queued for the player
    pub missions: Vec<MissionInfo>,
    pub player_group: Option<GroupId>,
    pub player_rank: Option<i32>,
    #[serde(skip)]
    pub rng: ChaCha8Rng,
}

impl Campaign {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            time: 0,
            forces: ForceTree::new(),
            zones: ZoneRegistry::new(),
            combatants: Vec::new(),
            actions: ActionBoard::new(),
            missions: Vec::new(),
            player_group: None,
            player_rank: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    // === COMBATANTS ===

    /// Register a side owning the tree rooted at `force`
    pub fn add_combatant(&mut self, name: impl Into<String>, iff: Iff, force: GroupId) -> Result<()> {
        if self.forces.group(force).is_none() {
            return Err(CampaignError::GroupNotFound(force));
        }
        for g in self.forces.preorder(force) {
            if let Some(group) = self.forces.group_mut(g) {
                group.combatant = Some(iff);
            }
        }

        let combatant = Combatant::new(name, iff, force);
        info!(name = %combatant.name, iff, "combatant added");
        self.combatants.push(combatant);
        Ok(())
    }

    /// Build a side from an order of battle; its root names the side
    pub fn add_order_of_battle(&mut self, oob: &OrderOfBattle) -> Result<Iff> {
        let root = self.forces.apply_order_of_battle(oob)?;
        let (name, iff) = self
            .forces
            .group(root)
            .map(|g| (g.name.clone(), g.iff))
            .ok_or(CampaignError::GroupNotFound(root))?;
        self.add_combatant(name, iff, root)?;
        Ok(iff)
    }

    pub fn combatant_by_iff(&self, iff: Iff) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.iff == iff)
    }

    pub fn combatant_by_iff_mut(&mut self, iff: Iff) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.iff == iff)
    }

    /// Find a group of a side by type and authored number
    pub fn find_group(&self, iff: Iff, group_type: GroupType, number: i32) -> Option<GroupId> {
        self.combatant_by_iff(iff)?
            .find_group(&self.forces, group_type, number)
    }

    // === PLAYER ===

    pub fn set_player_group(&mut self, group: GroupId) -> Result<()> {
        if self.forces.group(group).is_none() {
            return Err(CampaignError::GroupNotFound(group));
        }
        self.player_group = Some(group);
        Ok(())
    }

    pub fn player_iff(&self) -> Option<Iff> {
        self.player_group
            .and_then(|g| self.forces.group(g))
            .map(|g| g.iff)
    }

    // === CLOCK ===

    /// Move the campaign clock forward; it never runs backwards
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.time {
            self.time = time;
        }
    }

    pub fn zone_for_region(&self, region: &str) -> Option<ZoneId> {
        self.zones.zone_for_region(region)
    }

    /// Evaluate one action against the current campaign state
    pub fn is_action_available(&mut self, id: ActionId) -> bool {
        let ctx = ActionContext {
            now: self.time,
            player_rank: self.player_rank,
            forces: &self.forces,
            combatants: &self.combatants,
        };
        self.actions.is_available(id, &ctx, &mut self.rng)
    }

    // === MISSIONS ===

    /// Hand a request to the factory and queue the result
    pub fn queue_mission(
        &mut self,
        factory: &mut impl MissionFactory,
        request: &MissionRequest,
    ) -> Option<u32> {
        let info = factory.create_mission(request)?;
        let id = info.id;
        self.missions.push(info);
        Some(id)
    }

    /// Drop missions whose start time has passed
    pub fn retire_missions(&mut self) -> usize {
        let now = self.time;
        let before = self.missions.len();
        self.missions.retain(|m| m.start > now);
        let retired = before - self.missions.len();
        if retired > 0 {
            debug!(retired, now, "missions retired");
        }
        retired
    }

    /// JSON snapshot of the campaign, without the random source
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::mission::QueueMissionFactory;
    use crate::force::{MissionType, UnitClass};

    fn two_sides() -> Campaign {
        let mut campaign = Campaign::new("Test", 7);
        let a = campaign.forces.add_group(GroupType::Force, 1, "Alliance", 1);
        let fleet = campaign.forces.add_group(GroupType::Fleet, 2, "", 1);
        campaign.forces.add_component(a, fleet).unwrap();
        let ds = campaign.forces.add_group(GroupType::DestroyerSquadron, 5, "", 1);
        campaign.forces.add_component(fleet, ds).unwrap();
        campaign.forces.add_unit(ds, "Thor", UnitClass::Destroyer, 1).unwrap();
        let h = campaign.forces.add_group(GroupType::Force, 1, "Hegemony", 2);

        campaign.add_combatant("Alliance", 1, a).unwrap();
        campaign.add_combatant("Hegemony", 2, h).unwrap();
        campaign
    }

    #[test]
    fn test_add_combatant_marks_whole_tree() {
        let campaign = two_sides();
        for g in campaign.forces.preorder(campaign.combatants[0].force) {
            assert_eq!(campaign.forces.group(g).unwrap().combatant, Some(1));
        }
    }

    #[test]
    fn test_find_group_is_scoped_to_side() {
        let campaign = two_sides();
        assert!(campaign.find_group(1, GroupType::DestroyerSquadron, 5).is_some());
        assert!(campaign.find_group(2, GroupType::DestroyerSquadron, 5).is_none());
        assert!(campaign.find_group(3, GroupType::Force, -1).is_none());
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut campaign = two_sides();
        campaign.advance_to(600);
        campaign.advance_to(300);
        assert_eq!(campaign.time, 600);
    }

    #[test]
    fn test_queue_and_retire_missions() {
        let mut campaign = two_sides();
        let mut factory = QueueMissionFactory::new();
        let group = campaign.combatants[0].force;

        let request = MissionRequest::new(MissionType::Patrol, 1800, group);
        assert_eq!(campaign.queue_mission(&mut factory, &request), Some(1));
        campaign.advance_to(1800);
        assert_eq!(campaign.retire_missions(), 1);
        assert!(campaign.missions.is_empty());
    }

    #[test]
    fn test_snapshot_is_json() {
        let campaign = two_sides();
        let json = campaign.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Test");
        assert!(value.get("rng").is_none());
    }
}
