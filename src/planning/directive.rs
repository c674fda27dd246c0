//! Authored zone and system assignments
//!
//! A zone assignment pins a group to the zone holding the action's region;
//! a system assignment restricts a group to a star system. Each fires once
//! per repeat when it becomes available.

use tracing::{info, warn};

use crate::actions::ActionType;
use crate::campaign::Campaign;
use crate::core::types::ActionId;

/// Apply every available assignment action; returns how many fired
pub fn apply_directives(campaign: &mut Campaign) -> usize {
    let candidates: Vec<ActionId> = campaign
        .actions
        .iter()
        .filter(|a| {
            matches!(
                a.action_type,
                ActionType::ZoneAssignment | ActionType::SystemAssignment
            )
        })
        .map(|a| a.id)
        .collect();

    let mut fired = 0;
    for id in candidates {
        if !campaign.is_action_available(id) {
            continue;
        }
        let Some(action) = campaign.actions.get(id) else {
            continue;
        };
        let Some(group) = campaign.find_group(action.iff, action.asset_type, action.asset_id) else {
            continue;
        };

        match action.action_type {
            ActionType::ZoneAssignment => {
                let Some(zone) = campaign.zones.zone_for_region(&action.region) else {
                    warn!(action = id.0, region = %action.region, "zone assignment names no known zone");
                    continue;
                };
                campaign.forces.set_assigned_zone(group, Some(zone));
                campaign.forces.set_zone_lock(group, true);
                info!(action = id.0, group = ?group, zone = ?zone, "group locked to zone");
            }
            ActionType::SystemAssignment => {
                let system = action.system.clone();
                campaign.forces.set_assigned_system(group, Some(&system));
                info!(action = id.0, group = ?group, system = %system, "group restricted to system");
            }
            _ => continue,
        }

        let now = campaign.time;
        if campaign.actions.fire_action(id, now).is_ok() {
            fired += 1;
        }
    }
    fired
}
