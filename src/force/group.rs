//! Force tree nodes

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::core::types::{GroupId, Iff, UnitId, ZoneId};
use crate::force::assignment::Assignment;
use crate::force::group_type::GroupType;
use crate::force::intel::Intel;

/// One node of a force tree
///
/// Relationships are ids into the owning [`ForceTree`](crate::force::ForceTree).
/// `parent`, `assigned_zone`, `current_zone` and `combatant` are
/// observation-only back-references; the tree owns every node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub group_type: GroupType,
    /// Authored number, unique among groups of the same type
    pub number: i32,
    pub name: String,
    pub iff: Iff,
    pub intel: Intel,

    /// Cached value; only valid after `ForceTree::calc_value`
    pub value: i64,
    /// Planning priority; scratch space for the strategic planner
    pub plan_value: f64,

    pub parent: Option<GroupId>,
    pub components: Vec<GroupId>,
    pub units: Vec<UnitId>,

    pub region: String,
    pub location: DVec3,

    pub assigned_zone: Option<ZoneId>,
    /// Zone roster the group is currently registered in
    pub current_zone: Option<ZoneId>,
    pub zone_lock: bool,
    pub assigned_system: Option<String>,

    /// Faction of the combatant owning this tree
    pub combatant: Option<Iff>,

    pub assignments: Vec<Assignment>,

    /// Round-robin cursor for `ForceTree::next_unit`
    pub unit_index: usize,
}

impl Group {
    pub fn new(id: GroupId, group_type: GroupType, number: i32, name: impl Into<String>, iff: Iff) -> Self {
        Self {
            id,
            group_type,
            number,
            name: name.into(),
            iff,
            intel: Intel::Known,
            value: 0,
            plan_value: 0.0,
            parent: None,
            components: Vec::new(),
            units: Vec::new(),
            region: String::new(),
            location: DVec3::ZERO,
            assigned_zone: None,
            current_zone: None,
            zone_lock: false,
            assigned_system: None,
            combatant: None,
            assignments: Vec::new(),
            unit_index: 0,
        }
    }

    /// Locked to its assigned zone
    pub fn is_zone_locked(&self) -> bool {
        self.assigned_zone.is_some() && self.zone_lock
    }

    /// Restricted to a star system
    pub fn is_system_locked(&self) -> bool {
        self.assigned_system.is_some()
    }

    /// Authored number with an English ordinal suffix ("1st", "12th", "23rd")
    pub fn ordinal(&self) -> String {
        ordinal(self.number)
    }
}

/// Format a number with its English ordinal suffix
pub fn ordinal(n: i32) -> String {
    let last_two = n.rem_euclid(100);
    let suffix = if (11..20).contains(&last_two) {
        "th"
    } else {
        match last_two % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}
