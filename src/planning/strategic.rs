//! Strategic planner: zone placement, target scoring and zone assignment
//!
//! Every pass, for each combatant in turn:
//!
//! 1. place every group of its tree into the zone holding its region
//! 2. rebuild the target and defend lists
//! 3. zero the zone needs
//! 4. assign squadrons, carriers and surface groups to zones
//! 5. move groups whose assigned zone no longer holds their region
//!
//! Needs start every pass at zero and are driven negative as groups are
//! assigned, so each assignment discourages the next group of the same kind
//! from piling into the same zone.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::campaign::Campaign;
use crate::core::config::PlannerConfig;
use crate::core::types::{GroupId, Iff, SimTime, ZoneId};
use crate::force::{ForceTree, GroupType, Intel};

/// Need categories a carrier group can satisfy
const CARRIER_NEEDS: [GroupType; 4] = [
    GroupType::CarrierGroup,
    GroupType::AttackSquadron,
    GroupType::FighterSquadron,
    GroupType::InterceptSquadron,
];

/// Battle groups and destroyer squadrons substitute for each other
const SURFACE_NEEDS: [GroupType; 2] = [GroupType::BattleGroup, GroupType::DestroyerSquadron];

#[derive(Debug, Clone)]
pub struct StrategicPlanner {
    interval: SimTime,
    last_run: Option<SimTime>,
}

impl StrategicPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            interval: config.strategic_interval,
            last_run: None,
        }
    }

    fn should_run(&self, now: SimTime) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now >= last + self.interval,
        }
    }

    /// Run a planning pass if one is due; returns whether it ran
    pub fn exec_frame(&mut self, campaign: &mut Campaign) -> bool {
        if !self.should_run(campaign.time) {
            return false;
        }
        self.last_run = Some(campaign.time);

        if campaign.zones.is_empty() {
            warn!("no zones defined, strategic planning has nothing to allocate");
        }
        campaign.zones.clear_all(&mut campaign.forces);

        let sides: Vec<(Iff, GroupId)> = campaign
            .combatants
            .iter()
            .map(|c| (c.iff, c.force))
            .collect();

        for (iff, root) in sides {
            campaign.forces.calc_value(root);
            place_group(campaign, root);
            score_combatant(campaign, iff);
            reset_needs(campaign, iff);
            campaign.forces.clear_unlocked_zones(root);
            assign_zones(campaign, iff);
            resolve_zone_movement(campaign, root);
        }

        debug!(
            time = campaign.time,
            combatants = campaign.combatants.len(),
            zones = campaign.zones.len(),
            "strategic pass complete"
        );
        true
    }
}

// === PLACEMENT ===

/// Register a group and its subtree in the zones holding their regions
///
/// A movable group whose region belongs to no zone is sent to a random
/// zone and takes that zone's first region.
pub fn place_group(campaign: &mut Campaign, id: GroupId) {
    let Some(group) = campaign.forces.group(id) else {
        return;
    };
    let iff = group.iff;
    let movable = group.group_type.is_movable();
    let components = group.components.clone();
    let mut zone = campaign.zones.zone_for_region(&group.region);

    if zone.is_none() && movable && !campaign.zones.is_empty() {
        let ids = campaign.zones.zone_ids();
        let pick = ids[campaign.rng.gen_range(0..ids.len())];
        let first = campaign
            .zones
            .zone(pick)
            .and_then(|z| z.regions.first())
            .cloned();
        if let Some(region) = first {
            campaign.forces.assign_region(id, &region);
        }
        debug!(group = ?id, zone = ?pick, "group without a zone placed at random");
        zone = Some(pick);
    }

    if let Some(z) = zone {
        let present = campaign.zones.zone(z).is_some_and(|zone| zone.has_group(iff, id));
        if !present {
            campaign.zones.add_group(&mut campaign.forces, z, id);
        }
    }

    for c in components {
        place_group(campaign, c);
    }
}

// === SCORING ===

/// Rebuild a combatant's defend and target lists and mirror them into zones
pub fn score_combatant(campaign: &mut Campaign, iff: Iff) {
    let Some(side) = campaign.combatant_by_iff(iff) else {
        return;
    };
    let root = side.force;
    let scorer = side.clone();

    let mut defend = Vec::new();
    for g in campaign.forces.preorder(root) {
        if campaign.forces.is_reserve(g) || !campaign.forces.is_defensible(g) {
            continue;
        }
        let plan = campaign.forces.computed_value(g) as f64;
        defend.push((g, plan));
    }

    let enemies: Vec<GroupId> = campaign
        .combatants
        .iter()
        .filter(|c| c.iff > 0 && c.iff != iff)
        .map(|c| c.force)
        .collect();

    let mut targets = Vec::new();
    for enemy in enemies {
        for g in campaign.forces.preorder(enemy) {
            let Some(group) = campaign.forces.group(g) else {
                continue;
            };
            if group.intel <= Intel::Secret || !campaign.forces.is_targetable(g) {
                continue;
            }
            let plan =
                campaign.forces.computed_value(g) as f64 * scorer.target_strat_factor(group.group_type);
            targets.push((g, plan));
        }
    }

    sort_by_plan(&mut defend);
    sort_by_plan(&mut targets);

    for (g, plan) in defend.iter().chain(targets.iter()) {
        if let Some(group) = campaign.forces.group_mut(*g) {
            group.plan_value = *plan;
        }
    }

    for (g, _) in &defend {
        if let Some(zone) = zone_of(campaign, *g).and_then(|z| campaign.zones.zone_mut(z)) {
            zone.find_force(iff).defend_list.push(*g);
        }
    }
    for (g, _) in &targets {
        if let Some(zone) = zone_of(campaign, *g).and_then(|z| campaign.zones.zone_mut(z)) {
            zone.find_force(iff).target_list.push(*g);
        }
    }

    trace!(iff, defend = defend.len(), targets = targets.len(), "scored combatant");

    if let Some(side) = campaign.combatant_by_iff_mut(iff) {
        side.defend_list = defend.into_iter().map(|(g, _)| g).collect();
        side.target_list = targets.into_iter().map(|(g, _)| g).collect();
    }
}

/// Stable sort, highest plan value first; ties keep discovery order
fn sort_by_plan(list: &mut [(GroupId, f64)]) {
    list.sort_by_key(|(_, plan)| Reverse(OrderedFloat(*plan)));
}

fn zone_of(campaign: &Campaign, g: GroupId) -> Option<ZoneId> {
    let group = campaign.forces.group(g)?;
    campaign.zones.zone_for_region(&group.region)
}

/// Zero every need of a combatant, creating its zone rosters as needed
pub fn reset_needs(campaign: &mut Campaign, iff: Iff) {
    for id in campaign.zones.zone_ids() {
        if let Some(zone) = campaign.zones.zone_mut(id) {
            zone.find_force(iff).need.reset();
        }
    }
}

// === ASSIGNMENT ===

/// Non-reserve assignable groups of a tree, highest cached value first
pub fn assignable_groups(forces: &ForceTree, root: GroupId) -> Vec<GroupId> {
    let mut groups: Vec<GroupId> = forces
        .preorder(root)
        .into_iter()
        .filter(|g| !forces.is_reserve(*g) && forces.is_assignable(*g))
        .collect();
    groups.sort_by_key(|g| Reverse(forces.group(*g).map(|g| g.value).unwrap_or(0)));
    groups
}

/// Assign a combatant's groups to zones against the current needs
pub fn assign_zones(campaign: &mut Campaign, iff: Iff) {
    let Some(root) = campaign.combatant_by_iff(iff).map(|c| c.force) else {
        return;
    };
    let groups = assignable_groups(&campaign.forces, root);

    for &g in &groups {
        assign_fixed_squadron(campaign, g);
    }
    for &g in &groups {
        if group_type(campaign, g) == Some(GroupType::CarrierGroup) {
            assign_carrier(campaign, g);
        }
    }
    for &g in &groups {
        if matches!(
            group_type(campaign, g),
            Some(GroupType::BattleGroup | GroupType::DestroyerSquadron)
        ) {
            assign_surface_group(campaign, g);
        }
    }
}

fn group_type(campaign: &Campaign, g: GroupId) -> Option<GroupType> {
    campaign.forces.group(g).map(|g| g.group_type)
}

fn subtract_need(campaign: &mut Campaign, zone: ZoneId, g: GroupId) {
    let Some(group) = campaign.forces.group(g) else {
        return;
    };
    let (iff, group_type, value) = (group.iff, group.group_type, group.value);
    if let Some(z) = campaign.zones.zone_mut(zone) {
        z.find_force(iff).add_need(group_type, -value);
    }
}

/// Squadrons based on a station or starbase stay in its zone
fn assign_fixed_squadron(campaign: &mut Campaign, g: GroupId) {
    let forces = &campaign.forces;
    let Some(group) = forces.group(g) else {
        return;
    };
    if !matches!(
        group.group_type,
        GroupType::AttackSquadron | GroupType::FighterSquadron | GroupType::InterceptSquadron
    ) {
        return;
    }

    let mut parent = group.parent.and_then(|p| forces.group(p));
    if parent.is_some_and(|p| p.group_type == GroupType::Wing) {
        parent = parent.and_then(|p| p.parent).and_then(|p| forces.group(p));
    }
    let Some(base) = parent else {
        return;
    };
    if base.group_type == GroupType::CarrierGroup {
        return;
    }
    let Some(zone) = campaign.zones.zone_for_region(&base.region) else {
        return;
    };

    campaign.forces.set_assigned_zone(g, Some(zone));
    subtract_need(campaign, zone, g);
    trace!(group = ?g, zone = ?zone, "squadron held at its base");
}

/// Pick a zone for a carrier or surface group
///
/// A zone-locked group keeps its zone. Otherwise the group moves only when
/// some zone's combined need strictly exceeds that of the zone it is in;
/// with no zone at all it goes to a random eligible zone.
fn select_zone(campaign: &mut Campaign, g: GroupId, needs: &[GroupType]) -> Option<ZoneId> {
    let group = campaign.forces.group(g)?;
    let iff = group.iff;

    let mut possible = Vec::new();
    let mut current = None;
    let mut current_need = 0;
    let mut highest = None;
    let mut highest_need = 0;

    if group.is_zone_locked() {
        current = group.assigned_zone;
    } else {
        for zone in campaign.zones.zones() {
            let need = zone.force(iff).map(|f| f.need.combined(needs)).unwrap_or(0);
            if group.is_system_locked() && group.assigned_system.as_deref() != Some(zone.system.as_str()) {
                continue;
            }
            possible.push(zone.id);

            if zone.has_region(&group.region) {
                current = Some(zone.id);
                current_need = need;
            }
            if need > highest_need {
                highest = Some(zone.id);
                highest_need = need;
            }
        }
    }

    if highest_need > current_need {
        return highest;
    }
    if current.is_some() {
        return current;
    }

    if possible.is_empty() {
        possible = campaign.zones.zone_ids();
    }
    if possible.is_empty() {
        return None;
    }
    let pick = possible[campaign.rng.gen_range(0..possible.len())];
    debug!(group = ?g, zone = ?pick, "no zone in need, picked at random");
    Some(pick)
}

/// Give a group the first region of its zone when its region is unzoned
fn settle_region(campaign: &mut Campaign, g: GroupId, zone: ZoneId) {
    let Some(group) = campaign.forces.group(g) else {
        return;
    };
    if campaign.zones.zone_for_region(&group.region).is_some() {
        return;
    }
    let first = campaign.zones.zone(zone).and_then(|z| z.regions.first()).cloned();
    if let Some(region) = first {
        campaign.forces.assign_region(g, &region);
    }
}

fn assign_carrier(campaign: &mut Campaign, g: GroupId) {
    let Some(zone) = select_zone(campaign, g, &CARRIER_NEEDS) else {
        return;
    };
    settle_region(campaign, g, zone);
    campaign.forces.set_assigned_zone(g, Some(zone));
    subtract_need(campaign, zone, g);

    let components = campaign.forces.group(g).map(|g| g.components.clone()).unwrap_or_default();
    for c in components {
        subtract_need(campaign, zone, c);
        if group_type(campaign, c) == Some(GroupType::Wing) {
            let squadrons = campaign.forces.group(c).map(|g| g.components.clone()).unwrap_or_default();
            for s in squadrons {
                subtract_need(campaign, zone, s);
            }
        }
    }

    debug!(group = ?g, zone = ?zone, "carrier group assigned");
}

fn assign_surface_group(campaign: &mut Campaign, g: GroupId) {
    let Some(zone) = select_zone(campaign, g, &SURFACE_NEEDS) else {
        return;
    };
    settle_region(campaign, g, zone);
    campaign.forces.set_assigned_zone(g, Some(zone));
    subtract_need(campaign, zone, g);

    debug!(group = ?g, zone = ?zone, "surface group assigned");
}

// === MOVEMENT BETWEEN ZONES ===

/// Move groups whose assigned zone does not hold their region
///
/// Children resolve first; a moved group takes its new zone's first region
/// only after its whole subtree has been handled.
pub fn resolve_zone_movement(campaign: &mut Campaign, g: GroupId) {
    let Some(group) = campaign.forces.group(g) else {
        return;
    };
    let components = group.components.clone();
    let old_zone = group.current_zone;
    let target = group.assigned_zone.filter(|z| {
        !campaign
            .zones
            .zone(*z)
            .is_some_and(|zone| zone.has_region(&group.region))
    });

    if let Some(zone) = target {
        if let Some(old) = old_zone {
            campaign.zones.remove_group(&mut campaign.forces, old, g);
        }
        campaign.zones.add_group(&mut campaign.forces, zone, g);
        debug!(group = ?g, from = ?old_zone, to = ?zone, "group changes zone");
    }

    for c in components {
        resolve_zone_movement(campaign, c);
    }

    if let Some(zone) = target {
        let first = campaign.zones.zone(zone).and_then(|z| z.regions.first()).cloned();
        if let Some(region) = first {
            campaign.forces.assign_region(g, &region);
        }
    }
}
