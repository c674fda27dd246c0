//! One faction's presence in a zone

use serde::{Deserialize, Serialize};

use crate::core::types::{GroupId, Iff};
use crate::force::GroupType;
use crate::zone::need::NeedVector;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneForce {
    pub iff: Iff,
    /// Groups registered in the zone
    pub groups: Vec<GroupId>,
    /// Enemy groups in the zone worth attacking, highest priority first
    pub target_list: Vec<GroupId>,
    /// Own groups in the zone worth defending, highest priority first
    pub defend_list: Vec<GroupId>,
    pub need: NeedVector,
}

impl ZoneForce {
    pub fn new(iff: Iff) -> Self {
        Self {
            iff,
            groups: Vec::new(),
            target_list: Vec::new(),
            defend_list: Vec::new(),
            need: NeedVector::default(),
        }
    }

    pub fn add_group(&mut self, group: GroupId) {
        self.groups.push(group);
    }

    /// Remove one registration of `group`
    pub fn remove_group(&mut self, group: GroupId) {
        if let Some(pos) = self.groups.iter().position(|g| *g == group) {
            self.groups.remove(pos);
        }
    }

    pub fn has_group(&self, group: GroupId) -> bool {
        self.groups.contains(&group)
    }

    pub fn get_need(&self, group_type: GroupType) -> i64 {
        self.need.for_type(group_type)
    }

    pub fn add_need(&mut self, group_type: GroupType, amount: i64) {
        self.need.add_for_type(group_type, amount);
    }
}
