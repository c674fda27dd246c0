//! Assignment planner: pairs zone targets and defensibles with available assets

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::campaign::Campaign;
use crate::core::config::PlannerConfig;
use crate::core::types::{GroupId, Iff, SimTime, ZoneId};
use crate::force::{Assignment, ForceTree, GroupType, MissionType};

#[derive(Debug, Clone)]
pub struct AssignmentPlanner {
    interval: SimTime,
    last_run: Option<SimTime>,
}

impl AssignmentPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            interval: config.assignment_interval,
            last_run: None,
        }
    }

    fn should_run(&self, now: SimTime) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now >= last + self.interval,
        }
    }

    /// Rebuild every combatant's assignments if a pass is due
    pub fn exec_frame(&mut self, campaign: &mut Campaign) -> bool {
        if !self.should_run(campaign.time) {
            return false;
        }
        self.last_run = Some(campaign.time);

        let sides: Vec<Iff> = campaign.combatants.iter().map(|c| c.iff).collect();
        let mut total = 0;
        for iff in sides {
            total += process_combatant(campaign, iff);
        }

        debug!(time = campaign.time, assignments = total, "assignment pass complete");
        true
    }
}

/// Clear and rebuild one combatant's assignments; returns how many were made
pub fn process_combatant(campaign: &mut Campaign, iff: Iff) -> usize {
    let Some(root) = campaign.combatant_by_iff(iff).map(|c| c.force) else {
        return 0;
    };
    campaign.forces.calc_value(root);
    campaign.forces.clear_assignments(root);

    let mut made = 0;
    for zone in campaign.zones.zone_ids() {
        made += process_zone(campaign, iff, root, zone);
    }

    for g in campaign.forces.preorder(root) {
        sort_assignments(&mut campaign.forces, g);
    }
    made
}

/// Groups of a tree assigned to `zone`, in preorder
fn zone_groups(forces: &ForceTree, root: GroupId, zone: ZoneId) -> Vec<GroupId> {
    forces
        .preorder(root)
        .into_iter()
        .filter(|g| forces.group(*g).is_some_and(|g| g.assigned_zone == Some(zone)))
        .collect()
}

/// Assets of the preferred types that still have live units, in preference order
fn preferred_assets(forces: &ForceTree, preferred: &[GroupType], groups: &[GroupId]) -> Vec<GroupId> {
    preferred
        .iter()
        .flat_map(|t| {
            groups.iter().copied().filter(move |g| {
                forces.group(*g).is_some_and(|g| g.group_type == *t) && forces.count_units(*g) > 0
            })
        })
        .collect()
}

/// Mission flown against a target, decided by what the target is
pub fn attack_mission(forces: &ForceTree, target: GroupId) -> MissionType {
    if forces.is_strike_target(target) {
        MissionType::Strike
    } else if forces.is_fighter_group(target) {
        MissionType::Sweep
    } else if forces.group(target).is_some_and(|g| g.group_type == GroupType::LcaSquadron) {
        MissionType::Intercept
    } else {
        MissionType::Assault
    }
}

fn process_zone(campaign: &mut Campaign, iff: Iff, root: GroupId, zone: ZoneId) -> usize {
    let groups = zone_groups(&campaign.forces, root, zone);
    let Some(force) = campaign.zones.zone_mut(zone).map(|z| z.find_force(iff).clone()) else {
        return 0;
    };

    let mut made = Vec::new();

    for objective in &force.defend_list {
        let Some(kind) = campaign.forces.group(*objective).map(|g| g.group_type) else {
            continue;
        };
        for asset in preferred_assets(&campaign.forces, kind.preferred_defenders(), &groups) {
            made.push(Assignment::new(MissionType::Defend, Some(*objective), asset));
        }
    }

    for target in &force.target_list {
        let Some(kind) = campaign.forces.group(*target).map(|g| g.group_type) else {
            continue;
        };
        let mission = attack_mission(&campaign.forces, *target);
        for asset in preferred_assets(&campaign.forces, kind.preferred_attackers(), &groups) {
            made.push(Assignment::new(mission, Some(*target), asset));
        }
    }

    trace!(iff, zone = ?zone, assignments = made.len(), "zone assignments");
    let count = made.len();
    for assignment in made {
        if let Some(group) = campaign.forces.group_mut(assignment.resource) {
            group.assignments.push(assignment);
        }
    }
    count
}

/// Order a group's assignments by objective plan value, highest first
///
/// Assignments without an objective go last.
pub fn sort_assignments(forces: &mut ForceTree, id: GroupId) {
    let Some(group) = forces.group(id) else {
        return;
    };
    if group.assignments.len() < 2 {
        return;
    }

    let mut assignments = group.assignments.clone();
    assignments.sort_by_key(|a| {
        let plan = a
            .objective
            .and_then(|o| forces.group(o))
            .map(|o| o.plan_value);
        (plan.is_none(), Reverse(OrderedFloat(plan.unwrap_or(0.0))))
    });

    if let Some(group) = forces.group_mut(id) {
        group.assignments = assignments;
    }
}
