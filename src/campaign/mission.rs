//! Mission requests and the factory seam that turns them into queued missions

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{GroupId, SimTime};
use crate::force::{GroupType, MissionType};

/// A mission the planner wants flown by the player's group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRequest {
    pub mission: MissionType,
    /// Scheduled start, quantized to the mission delay
    pub start: SimTime,
    /// Group flying the mission
    pub primary: GroupId,
    pub objective: Option<GroupId>,
    /// Expected enemy formation
    pub opposing_type: Option<GroupType>,
    /// Authored script for template missions
    pub script: String,
}

impl MissionRequest {
    pub fn new(mission: MissionType, start: SimTime, primary: GroupId) -> Self {
        Self {
            mission,
            start,
            primary,
            objective: None,
            opposing_type: None,
            script: String::new(),
        }
    }

    pub fn with_objective(mut self, objective: Option<GroupId>) -> Self {
        self.objective = objective;
        self
    }
}

/// A queued mission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionInfo {
    pub id: u32,
    pub mission: MissionType,
    pub start: SimTime,
    pub primary: GroupId,
    pub objective: Option<GroupId>,
    pub opposing_type: Option<GroupType>,
    pub script: String,
}

/// Builds concrete missions from planner requests
///
/// Returning `None` rejects the request; the planner then tries its next
/// source on a later pass.
pub trait MissionFactory {
    fn create_mission(&mut self, request: &MissionRequest) -> Option<MissionInfo>;
}

/// Factory that accepts every request as-is
#[derive(Debug, Clone, Default)]
pub struct QueueMissionFactory {
    next_id: u32,
}

impl QueueMissionFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MissionFactory for QueueMissionFactory {
    fn create_mission(&mut self, request: &MissionRequest) -> Option<MissionInfo> {
        self.next_id += 1;
        debug!(
            id = self.next_id,
            mission = request.mission.name(),
            start = request.start,
            "mission created"
        );

        Some(MissionInfo {
            id: self.next_id,
            mission: request.mission,
            start: request.start,
            primary: request.primary,
            objective: request.objective,
            opposing_type: request.opposing_type,
            script: request.script.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_factory_numbers_missions() {
        let mut factory = QueueMissionFactory::new();
        let request = MissionRequest::new(MissionType::Patrol, 3600, GroupId(2))
            .with_objective(Some(GroupId(9)));

        let first = factory.create_mission(&request).unwrap();
        let second = factory.create_mission(&request).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.objective, Some(GroupId(9)));
        assert_eq!(first.start, 3600);
    }
}
