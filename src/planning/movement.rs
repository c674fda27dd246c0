//! Background drift of starships between missions
//!
//! Every pass each mobile starship is repaired a little, drifts according
//! to its distance from the system origin, and is pushed away from the
//! closest ship of another group when the two are too close.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;
use tracing::{debug, trace};

use crate::campaign::Campaign;
use crate::core::config::PlannerConfig;
use crate::core::types::{SimTime, UnitId};
use crate::force::{ForceTree, GroupType, Intel};

/// Initial search radius when looking for the closest other ship
const CLOSEST_SEARCH: f64 = 1e6;

#[derive(Debug, Clone)]
pub struct MovementPlanner {
    config: PlannerConfig,
    last_run: Option<SimTime>,
}

impl MovementPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            config: config.clone(),
            last_run: None,
        }
    }

    fn should_run(&self, now: SimTime) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now >= last + self.config.movement_interval,
        }
    }

    /// Move every mobile starship if a pass is due
    pub fn exec_frame(&mut self, campaign: &mut Campaign) -> bool {
        if !self.should_run(campaign.time) {
            return false;
        }
        self.last_run = Some(campaign.time);

        let movers: Vec<UnitId> = campaign
            .forces
            .units()
            .filter(|u| u.is_starship() && !u.is_static())
            .map(|u| u.id)
            .collect();

        for id in &movers {
            self.move_unit(&mut campaign.forces, *id, &mut campaign.rng);
        }

        debug!(time = campaign.time, moved = movers.len(), "movement pass complete");
        true
    }

    /// Repair, drift and separate one unit
    pub fn move_unit(&self, forces: &mut ForceTree, id: UnitId, rng: &mut impl Rng) {
        let cfg = &self.config;
        let Some(unit) = forces.unit_mut(id) else {
            return;
        };

        if unit.damage_percent() > cfg.heal_threshold_percent {
            unit.sustained_damage *= cfg.heal_factor;
        }

        let mut loc = self.drift(unit.location, rng);
        self.damp_vertical(&mut loc);
        place(forces, id, loc);

        let Some((closest, distance)) = closest_other(forces, id) else {
            return;
        };
        if distance >= cfg.separation_distance {
            return;
        }

        let away = (loc - closest).normalize_or_zero();
        loc += away * (cfg.separation_factor * (cfg.separation_distance - distance));
        self.damp_vertical(&mut loc);
        place(forces, id, loc);
        trace!(unit = ?id, distance, "pushed apart from nearby ship");
    }

    /// Next location before separation
    ///
    /// Inside the home radius units drift outward, slowing near the edge.
    /// Outside it the same scale turns negative and pulls them back in.
    pub fn drift(&self, loc: DVec3, rng: &mut impl Rng) -> DVec3 {
        let cfg = &self.config;
        let dist = loc.length();
        let dir = loc.normalize_or_zero();
        let scale = 1.0 - dist / cfg.home_radius;

        // Everything from the home radius outward takes the far profile; there is no loiter band
        let (min, max, jitter) = if dist < cfg.home_radius {
            (cfg.near_drift_min, cfg.near_drift_max, cfg.near_jitter)
        } else {
            (cfg.far_drift_min, cfg.far_drift_max, cfg.far_jitter)
        };

        let magnitude = rng.gen_range(min..=max) * scale;
        loc + dir * magnitude + random_direction(rng) * jitter
    }

    fn damp_vertical(&self, loc: &mut DVec3) {
        if loc.z.abs() > self.config.vertical_band {
            loc.z *= self.config.vertical_damping;
        }
    }
}

/// Uniformly distributed unit vector
pub fn random_direction(rng: &mut impl Rng) -> DVec3 {
    let z: f64 = rng.gen_range(-1.0..=1.0);
    let theta: f64 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).sqrt();
    DVec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Move a unit; a group led by it follows and loses precise tracking
fn place(forces: &mut ForceTree, id: UnitId, loc: DVec3) {
    forces.move_unit(id, loc);

    let Some(group) = forces.unit(id).and_then(|u| u.group) else {
        return;
    };
    let leads = forces
        .group(group)
        .is_some_and(|g| g.group_type > GroupType::Fleet)
        && forces.first_unit(group) == Some(id);
    if !leads {
        return;
    }

    let intel = forces.group(group).map(|g| g.intel);
    if let Some(g) = forces.group_mut(group) {
        g.location = loc;
    }
    if intel.is_some_and(|i| i > Intel::Known) {
        forces.set_intel_level(group, Intel::Known);
    }
}

/// Closest non-dropship of another group in the same region
fn closest_other(forces: &ForceTree, id: UnitId) -> Option<(DVec3, f64)> {
    let unit = forces.unit(id)?;
    let mut closest = None;
    let mut closest_dist = CLOSEST_SEARCH;

    for other in forces.units() {
        if other.group == unit.group || other.region != unit.region || other.is_dropship() {
            continue;
        }
        let d = unit.location.distance(other.location);
        if d < closest_dist {
            closest = Some(other.location);
            closest_dist = d;
        }
    }

    closest.map(|loc| (loc, closest_dist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::UnitClass;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn planner() -> MovementPlanner {
        MovementPlanner::new(&PlannerConfig::default())
    }

    #[test]
    fn test_far_units_drift_inward() {
        let planner = planner();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let start = DVec3::new(340e3, 0.0, 0.0);

        for _ in 0..50 {
            let next = planner.drift(start, &mut rng);
            // Far drift is 80-120 km scaled by -0.0625, plus 3 km jitter
            let moved = start.x - next.x;
            assert!(moved >= 80e3 * 0.0625 - 3e3, "moved {}", moved);
            assert!(moved <= 120e3 * 0.0625 + 3e3, "moved {}", moved);
        }
    }

    #[test]
    fn test_home_radius_edge_only_jitters() {
        let planner = planner();
        let mut rng = ChaCha8Rng::seed_from_u64(320);
        let start = DVec3::new(0.0, 0.0, 320e3);

        for _ in 0..50 {
            let next = planner.drift(start, &mut rng);
            // Zero scale at the edge leaves only the 3 km far jitter
            assert!((next - start).length() <= 3e3 + 1.0);
        }
    }

    #[test]
    fn test_near_units_drift_outward() {
        let planner = planner();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let start = DVec3::new(160e3, 0.0, 0.0);

        for _ in 0..50 {
            let next = planner.drift(start, &mut rng);
            let moved = next.x - start.x;
            assert!(moved >= 30e3 * 0.5 - 10e3);
            assert!(moved <= 90e3 * 0.5 + 10e3);
        }
    }

    #[test]
    fn test_random_direction_is_unit_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            assert!((random_direction(&mut rng).length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_heal_and_vertical_damping() {
        let planner = planner();
        let mut forces = ForceTree::new();
        let bg = forces.add_group(GroupType::BattleGroup, 1, "", 1);
        let ship = forces.add_unit(bg, "Tiger", UnitClass::Cruiser, 1).unwrap();
        {
            let unit = forces.unit_mut(ship).unwrap();
            unit.sustained_damage = 600.0;
            unit.location = DVec3::new(0.0, 0.0, 200e3);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        planner.move_unit(&mut forces, ship, &mut rng);

        let unit = forces.unit(ship).unwrap();
        assert!((unit.sustained_damage - 540.0).abs() < 1e-9);
        assert!(unit.location.z.abs() < 200e3);
    }

    #[test]
    fn test_lead_ship_moves_group_and_drops_tracking() {
        let planner = planner();
        let mut forces = ForceTree::new();
        let bg = forces.add_group(GroupType::BattleGroup, 1, "", 1);
        let ship = forces.add_unit(bg, "Tiger", UnitClass::Cruiser, 1).unwrap();
        forces.group_mut(bg).unwrap().intel = Intel::Tracked;
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        planner.move_unit(&mut forces, ship, &mut rng);

        let group = forces.group(bg).unwrap();
        assert_eq!(group.location, forces.unit(ship).unwrap().location);
        assert_eq!(group.intel, Intel::Known);
    }

    #[test]
    fn test_close_ships_are_pushed_apart() {
        let planner = planner();
        let mut forces = ForceTree::new();
        let a = forces.add_group(GroupType::BattleGroup, 1, "", 1);
        let b = forces.add_group(GroupType::BattleGroup, 2, "", 1);
        forces.assign_region(a, "Janus");
        forces.assign_region(b, "Janus");
        let mover = forces.add_unit(a, "Tiger", UnitClass::Cruiser, 1).unwrap();
        let other = forces.add_unit(b, "Lion", UnitClass::Cruiser, 1).unwrap();
        forces.unit_mut(mover).unwrap().location = DVec3::new(100e3, 0.0, 0.0);
        forces.unit_mut(other).unwrap().location = DVec3::new(100e3, 0.0, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        planner.move_unit(&mut forces, mover, &mut rng);

        let gap = forces
            .unit(mover)
            .unwrap()
            .location
            .distance(forces.unit(other).unwrap().location);
        assert!(gap > 100e3, "gap {}", gap);
    }

    #[test]
    fn test_exec_frame_moves_only_mobile_starships() {
        let mut campaign = Campaign::new("Test", 1);
        let base = campaign.forces.add_group(GroupType::Starbase, 1, "", 1);
        let station = campaign.forces.add_unit(base, "Port", UnitClass::Starbase, 1).unwrap();
        let sq = campaign.forces.add_group(GroupType::FighterSquadron, 2, "", 1);
        let fighters = campaign.forces.add_unit(sq, "Talon", UnitClass::Fighter, 4).unwrap();
        let mut planner = planner();

        assert!(planner.exec_frame(&mut campaign));
        assert_eq!(campaign.forces.unit(station).unwrap().location, DVec3::ZERO);
        assert_eq!(campaign.forces.unit(fighters).unwrap().location, DVec3::ZERO);

        campaign.advance_to(7199);
        assert!(!planner.exec_frame(&mut campaign));
    }
}
