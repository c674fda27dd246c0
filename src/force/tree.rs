//! Arena-backed force hierarchy
//!
//! Every group and unit of a campaign lives in one [`ForceTree`], addressed
//! by [`GroupId`] and [`UnitId`]. Parent, carrier and zone links are ids, so
//! cloning a subtree is a plain value copy and nothing dangles when a branch
//! is destroyed.
//!
//! Cached values are never invalidated automatically: call
//! [`ForceTree::calc_value`] after changing unit counts.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::error::{CampaignError, Result};
use crate::core::types::{GroupId, Iff, UnitId, ZoneId};
use crate::force::group::Group;
use crate::force::group_type::GroupType;
use crate::force::intel::Intel;
use crate::force::unit::{Unit, UnitClass};

/// Attempts made by [`ForceTree::random_unit`] to avoid capital ships
const RANDOM_UNIT_TRIES: usize = 5;

/// Arena owning every group and unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForceTree {
    groups: Vec<Group>,
    units: Vec<Unit>,
}

impl ForceTree {
    pub fn new() -> Self {
        Self::default()
    }

    // === ARENA ===

    /// Create a detached group
    pub fn add_group(
        &mut self,
        group_type: GroupType,
        number: i32,
        name: impl Into<String>,
        iff: Iff,
    ) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups
            .push(Group::new(id, group_type, number, name, iff));
        id
    }

    /// Attach `child` under `parent`, detaching it from any previous parent
    pub fn add_component(&mut self, parent: GroupId, child: GroupId) -> Result<()> {
        self.require_group(parent)?;
        self.require_group(child)?;

        if parent == child || self.is_ancestor(child, parent) {
            return Err(CampaignError::InvalidHierarchy(format!(
                "attaching {:?} under {:?} would create a cycle",
                child, parent
            )));
        }

        if let Some(old) = self.groups[child.index()].parent {
            self.groups[old.index()].components.retain(|c| *c != child);
        }

        let combatant = self.groups[parent.index()].combatant;
        let child_group = &mut self.groups[child.index()];
        child_group.parent = Some(parent);
        if child_group.combatant.is_none() {
            child_group.combatant = combatant;
        }
        self.groups[parent.index()].components.push(child);
        Ok(())
    }

    /// Create a unit inside `group`, inheriting its faction, region and location
    pub fn add_unit(
        &mut self,
        group: GroupId,
        name: impl Into<String>,
        class: UnitClass,
        count: i32,
    ) -> Result<UnitId> {
        let unit = Unit::new(UnitId(0), name, class, count);
        self.attach_unit(group, unit)
    }

    /// Move a prepared unit into the arena under `group`; a fresh id is assigned
    pub fn attach_unit(&mut self, group: GroupId, mut unit: Unit) -> Result<UnitId> {
        let owner = self.require_group(group)?;
        let id = UnitId(self.units.len() as u32);

        unit.id = id;
        unit.group = Some(group);
        unit.iff = owner.iff;
        if unit.region.is_empty() {
            unit.region = owner.region.clone();
            unit.location = owner.location;
        }

        self.units.push(unit);
        self.groups[group.index()].units.push(id);
        Ok(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.index())
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.index())
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index())
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn require_group(&self, id: GroupId) -> Result<&Group> {
        self.group(id).ok_or(CampaignError::GroupNotFound(id))
    }

    // === TRAVERSAL ===

    /// Depth-first preorder listing of a subtree, `root` first
    pub fn preorder(&self, root: GroupId) -> Vec<GroupId> {
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(group) = self.group(id) else {
                continue;
            };
            order.push(id);
            stack.extend(group.components.iter().rev().copied());
        }

        order
    }

    /// True when `ancestor` appears on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: GroupId, id: GroupId) -> bool {
        let mut current = self.group(id).and_then(|g| g.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.group(p).and_then(|g| g.parent);
        }
        false
    }

    /// Find a group of `group_type` by authored number within a subtree
    ///
    /// Depth-first preorder; a negative `number` matches any group of the type.
    pub fn find_group(&self, root: GroupId, group_type: GroupType, number: i32) -> Option<GroupId> {
        self.preorder(root).into_iter().find(|id| {
            let g = &self.groups[id.index()];
            g.group_type == group_type && (number < 0 || g.number == number)
        })
    }

    // === VALUE ===

    /// Value of a subtree computed from current unit counts, without caching
    pub fn computed_value(&self, id: GroupId) -> i64 {
        let Some(group) = self.group(id) else {
            return 0;
        };

        let own: i64 = group
            .units
            .iter()
            .filter_map(|u| self.unit(*u))
            .map(Unit::value)
            .sum();

        own + group
            .components
            .iter()
            .map(|c| self.computed_value(*c))
            .sum::<i64>()
    }

    /// Recompute and cache the value of every group in a subtree
    ///
    /// Postorder: children are cached before their parent sums them.
    pub fn calc_value(&mut self, id: GroupId) -> i64 {
        let Some(group) = self.group(id) else {
            return 0;
        };
        let components = group.components.clone();

        let own: i64 = group
            .units
            .iter()
            .filter_map(|u| self.unit(*u))
            .map(Unit::value)
            .sum();

        let mut total = own;
        for c in components {
            total += self.calc_value(c);
        }

        self.groups[id.index()].value = total;
        total
    }

    // === CLASSIFICATION ===

    /// Movable naval or flight formation with live value
    pub fn is_assignable(&self, id: GroupId) -> bool {
        self.group(id)
            .is_some_and(|g| g.group_type.is_assignable() && self.computed_value(id) > 0)
    }

    /// Strategic target for an opposing combatant
    ///
    /// Requires a combatant faction in `1..100`, a non-protected type, units
    /// of its own and live value.
    pub fn is_targetable(&self, id: GroupId) -> bool {
        let Some(g) = self.group(id) else {
            return false;
        };

        if !(1..100).contains(&g.iff) {
            return false;
        }
        if g.group_type.is_protected_civilian() {
            return false;
        }
        if g.units.is_empty() {
            return false;
        }

        self.computed_value(id) > 0
    }

    pub fn is_defensible(&self, id: GroupId) -> bool {
        self.group(id)
            .is_some_and(|g| g.group_type.is_defensible_type() && self.computed_value(id) > 0)
    }

    pub fn is_strike_target(&self, id: GroupId) -> bool {
        self.group(id)
            .is_some_and(|g| g.group_type.is_strike_type() && self.computed_value(id) > 0)
    }

    pub fn is_movable(&self, id: GroupId) -> bool {
        self.group(id).is_some_and(|g| g.group_type.is_movable())
    }

    pub fn is_fighter_group(&self, id: GroupId) -> bool {
        self.group(id).is_some_and(|g| g.group_type.is_fighter_group())
    }

    pub fn is_starship_group(&self, id: GroupId) -> bool {
        self.group(id).is_some_and(|g| g.group_type.is_starship_group())
    }

    /// Held in reserve: own intel at or below `Reserve`, or any ancestor reserve
    ///
    /// Evaluated against the live parent chain on every call.
    pub fn is_reserve(&self, id: GroupId) -> bool {
        let mut current = Some(id);
        while let Some(gid) = current {
            let Some(g) = self.group(gid) else {
                return false;
            };
            if g.intel <= Intel::Reserve {
                return true;
            }
            current = g.parent;
        }
        false
    }

    // === INTEL ===

    /// Set a group's intel level, clamped to the legal range
    ///
    /// Once a group is known to the enemy (above `Secret`), every ancestor is
    /// raised to at least `Known`. Ancestors are never lowered.
    pub fn set_intel_level(&mut self, id: GroupId, intel: Intel) {
        let level = intel.clamp_legal();
        let Some(group) = self.group_mut(id) else {
            return;
        };
        group.intel = level;

        if level > Intel::Secret {
            let mut current = group.parent;
            while let Some(p) = current {
                let parent = &mut self.groups[p.index()];
                if parent.intel < Intel::Known {
                    parent.intel = Intel::Known;
                }
                current = parent.parent;
            }
        }
    }

    // === UNITS ===

    fn live_units(&self, id: GroupId) -> Vec<UnitId> {
        self.group(id)
            .map(|g| {
                g.units
                    .iter()
                    .copied()
                    .filter(|u| self.unit(*u).is_some_and(|unit| unit.live_count() > 0))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Live units of this group plus those of its non-reserve components
    pub fn count_units(&self, id: GroupId) -> i32 {
        let Some(group) = self.group(id) else {
            return 0;
        };

        let own: i32 = group
            .units
            .iter()
            .filter_map(|u| self.unit(*u))
            .map(Unit::live_count)
            .sum();

        own + group
            .components
            .iter()
            .filter(|c| !self.is_reserve(**c))
            .map(|c| self.count_units(*c))
            .sum::<i32>()
    }

    /// Non-reserve components that still have live units
    pub fn live_components(&self, id: GroupId) -> Vec<GroupId> {
        self.group(id)
            .map(|g| {
                g.components
                    .iter()
                    .copied()
                    .filter(|c| !self.is_reserve(*c) && self.count_units(*c) > 0)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First live unit, descending into the first component when the group has none
    pub fn first_unit(&self, id: GroupId) -> Option<UnitId> {
        let group = self.group(id)?;
        if let Some(first) = self.live_units(id).first() {
            return Some(*first);
        }
        group.components.first().and_then(|c| self.first_unit(*c))
    }

    /// Round-robin over live units
    ///
    /// A group without live units of its own delegates to one of its
    /// components, chosen by the same cursor.
    pub fn next_unit(&mut self, id: GroupId) -> Option<UnitId> {
        let live = self.live_units(id);
        let group = self.group_mut(id)?;

        if !live.is_empty() {
            let pick = live[group.unit_index % live.len()];
            group.unit_index += 1;
            return Some(pick);
        }

        if group.components.is_empty() {
            return None;
        }
        let component = group.components[group.unit_index % group.components.len()];
        self.next_unit(component)
    }

    /// Random live unit, avoiding capital ships when possible
    pub fn random_unit(&self, id: GroupId, rng: &mut impl Rng) -> Option<UnitId> {
        let live = self.live_units(id);

        if !live.is_empty() {
            for _ in 0..RANDOM_UNIT_TRIES {
                let pick = live[rng.gen_range(0..live.len())];
                if self.unit(pick).is_some_and(|u| !u.class.is_capital()) {
                    return Some(pick);
                }
            }
        }

        let components = self.group(id)?.components.clone();
        components
            .into_iter()
            .find_map(|c| self.random_unit(c, rng))
    }

    /// Unit with the given name, if it still has live members
    pub fn find_unit(&self, id: GroupId, name: &str) -> Option<UnitId> {
        let group = self.group(id)?;
        let unit = group
            .units
            .iter()
            .filter_map(|u| self.unit(*u))
            .find(|u| u.name == name)?;

        (unit.live_count() > 0).then_some(unit.id)
    }

    /// Nearest ancestor able to carry this group (carrier group, station or starbase)
    pub fn find_carrier(&self, id: GroupId) -> Option<GroupId> {
        let mut current = self.group(id)?.parent;
        while let Some(p) = current {
            let parent = self.group(p)?;
            if matches!(
                parent.group_type,
                GroupType::CarrierGroup | GroupType::Station | GroupType::Starbase
            ) {
                return (!parent.units.is_empty()).then_some(p);
            }
            current = parent.parent;
        }
        None
    }

    /// Every unit in a subtree, in preorder of their groups
    pub fn subtree_units(&self, root: GroupId) -> Vec<UnitId> {
        self.preorder(root)
            .into_iter()
            .flat_map(|g| self.groups[g.index()].units.clone())
            .collect()
    }

    /// Record up to `n` losses on a unit and return the value destroyed
    ///
    /// Losing a carrier, station or starbase destroys everything its group
    /// carries: every unit in the group's components is killed too.
    pub fn kill_units(&mut self, id: UnitId, n: i32) -> i64 {
        let Some(unit) = self.unit_mut(id) else {
            return 0;
        };

        let before = unit.live_count();
        let mut value_killed = unit.record_losses(n);
        let killed = before - unit.live_count();

        if killed > 0 && unit.class.is_host() {
            if let Some(group) = unit.group {
                let components = self.groups[group.index()].components.clone();
                for c in components {
                    value_killed += self.kill_group(c);
                }
            }
        }

        trace!(unit = ?id, killed, value_killed, "recorded losses");
        value_killed
    }

    fn kill_group(&mut self, id: GroupId) -> i64 {
        let Some(group) = self.group(id) else {
            return 0;
        };
        let units = group.units.clone();
        let components = group.components.clone();

        let mut value_killed = 0;
        for u in units {
            let live = self.unit(u).map(Unit::live_count).unwrap_or(0);
            value_killed += self.kill_units(u, live);
        }
        for c in components {
            value_killed += self.kill_group(c);
        }
        value_killed
    }

    /// Relocate a unit; carried units stay with their carrier
    pub fn move_unit(&mut self, id: UnitId, location: DVec3) {
        let carrier_location = self
            .unit(id)
            .and_then(|u| u.carrier)
            .and_then(|c| self.unit(c))
            .map(|c| c.location);

        if let Some(unit) = self.unit_mut(id) {
            unit.location = carrier_location.unwrap_or(location);
        }
    }

    // === REGIONS AND ZONES ===

    /// Rewrite the region of a group, its components and all their units
    pub fn assign_region(&mut self, id: GroupId, region: &str) {
        for gid in self.preorder(id) {
            let units = {
                let group = &mut self.groups[gid.index()];
                group.region = region.to_string();
                group.units.clone()
            };
            for u in units {
                self.units[u.index()].region = region.to_string();
            }
        }
    }

    /// Restrict a subtree to a star system; clears zone assignments and locks
    pub fn set_assigned_system(&mut self, id: GroupId, system: Option<&str>) {
        for gid in self.preorder(id) {
            let group = &mut self.groups[gid.index()];
            group.assigned_system = system.map(str::to_string);
            group.assigned_zone = None;
            group.zone_lock = false;
        }
    }

    /// Assign a subtree to a zone; clearing the assignment also clears the lock
    pub fn set_assigned_zone(&mut self, id: GroupId, zone: Option<ZoneId>) {
        for gid in self.preorder(id) {
            let group = &mut self.groups[gid.index()];
            group.assigned_zone = zone;
            if zone.is_none() {
                group.zone_lock = false;
            }
        }
    }

    /// Drop zone assignments that are not locked
    pub fn clear_unlocked_zones(&mut self, id: GroupId) {
        for gid in self.preorder(id) {
            let group = &mut self.groups[gid.index()];
            if !group.zone_lock {
                group.assigned_zone = None;
            }
        }
    }

    pub fn clear_current_zones(&mut self) {
        for group in &mut self.groups {
            group.current_zone = None;
        }
    }

    /// Lock or unlock a subtree to its assigned zones
    ///
    /// A group without an assigned zone cannot be locked. Locking clears the
    /// system restriction.
    pub fn set_zone_lock(&mut self, id: GroupId, lock: bool) {
        for gid in self.preorder(id) {
            let group = &mut self.groups[gid.index()];
            group.zone_lock = group.assigned_zone.is_some() && lock;
            if group.zone_lock {
                group.assigned_system = None;
            }
        }
    }

    pub fn is_zone_locked(&self, id: GroupId) -> bool {
        self.group(id).is_some_and(Group::is_zone_locked)
    }

    pub fn is_system_locked(&self, id: GroupId) -> bool {
        self.group(id).is_some_and(Group::is_system_locked)
    }

    /// Drop every strategic assignment in a subtree
    pub fn clear_assignments(&mut self, id: GroupId) {
        for gid in self.preorder(id) {
            self.groups[gid.index()].assignments.clear();
        }
    }

    // === CLONING ===

    /// Copy a group (and with `deep`, its whole subtree) into fresh ids
    ///
    /// Squadrons cloned under a group with units are parked on its first unit:
    /// their units take it as carrier and adopt its region.
    pub fn clone_subtree(&mut self, id: GroupId, deep: bool) -> Result<GroupId> {
        let source = self.require_group(id)?.clone();

        let clone_id = self.add_group(source.group_type, source.number, source.name.clone(), source.iff);
        {
            let clone = &mut self.groups[clone_id.index()];
            clone.intel = source.intel;
            clone.combatant = source.combatant;
            clone.region = source.region.clone();
            clone.location = source.location;
            clone.value = source.value;
        }

        for u in &source.units {
            let copy = self.units[u.index()].clone();
            self.attach_unit(clone_id, copy)?;
        }

        if deep {
            for component in &source.components {
                let child = self.clone_subtree(*component, true)?;
                self.add_component(clone_id, child)?;

                let child_type = self.groups[child.index()].group_type;
                if !child_type.is_squadron() {
                    continue;
                }

                let carrier = self.groups[clone_id.index()].units.first().copied();
                if let Some(carrier) = carrier {
                    let region = self.units[carrier.index()].region.clone();
                    let units = self.groups[child.index()].units.clone();
                    for u in units {
                        let unit = &mut self.units[u.index()];
                        unit.carrier = Some(carrier);
                        unit.region = region.clone();
                    }
                }
            }
        }

        Ok(clone_id)
    }

    // === DESCRIPTIONS ===

    /// Long human-readable description ("3rd Carrier Group \"Valiant\"")
    pub fn description(&self, id: GroupId) -> String {
        let Some(g) = self.group(id) else {
            return String::new();
        };

        let name_desc = if g.name.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", g.name)
        };

        use GroupType::*;
        match g.group_type {
            Force => g.name.clone(),
            Station => format!("{} {}", g.group_type.display_name(), g.name),
            Starbase => format!("{} {}{}", g.group_type.display_name(), g.number, name_desc),
            Fleet | CarrierGroup | BattleGroup | DestroyerSquadron | Wing | AttackSquadron
            | FighterSquadron | InterceptSquadron | LcaSquadron | Battalion | Minefield
            | Battery | Missile | C3i | CommRelay | EarlyWarning | FwdControlCtr | Ecm
            | Support | Courier | Supply | Repair | Medical => {
                format!("{} {}{}", g.ordinal(), g.group_type.display_name(), name_desc)
            }
            Civilian | WarProduction | Factory | Refinery | Resource | Infrastructure
            | Transport | Network | Habitat | Storage | Freight | Passenger | Private => {
                g.name.clone()
            }
            None | NonCom | Unknown => format!("{}{}", g.group_type.display_name(), name_desc),
        }
    }

    /// Abbreviated description ("3rd CVBG")
    pub fn short_description(&self, id: GroupId) -> String {
        let Some(g) = self.group(id) else {
            return String::new();
        };

        use GroupType::*;
        match g.group_type {
            Force => g.name.clone(),
            Fleet | CarrierGroup | BattleGroup | DestroyerSquadron | Wing | AttackSquadron
            | FighterSquadron | InterceptSquadron | LcaSquadron | Battalion | Station
            | Starbase | Minefield | Battery | Missile | C3i | CommRelay | EarlyWarning
            | FwdControlCtr | Ecm | Support | Courier | Medical | Supply | Repair => {
                format!("{} {}", g.ordinal(), g.group_type.abbreviation())
            }
            Civilian | WarProduction | Factory | Refinery | Resource | Infrastructure
            | Transport | Network | Habitat | Storage | Freight | Passenger | Private => {
                g.name.clone()
            }
            None | NonCom | Unknown => g.group_type.abbreviation().to_string(),
        }
    }
}
