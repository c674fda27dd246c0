//! Campaign planners and the fixed order they run in

pub mod assignment;
pub mod directive;
pub mod mission;
pub mod movement;
pub mod strategic;

pub use assignment::AssignmentPlanner;
pub use directive::apply_directives;
pub use mission::MissionPlanner;
pub use movement::MovementPlanner;
pub use strategic::StrategicPlanner;

use crate::campaign::{Campaign, MissionFactory};
use crate::core::config::PlannerConfig;

/// What ran during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub directives: usize,
    pub strategic: bool,
    pub assignment: bool,
    pub mission: Option<u32>,
    pub movement: bool,
}

/// Runs every planner against a campaign, each on its own cadence
///
/// Order is fixed: directives, strategic, assignment, mission, movement.
#[derive(Debug, Clone)]
pub struct CampaignPlanner {
    pub strategic: StrategicPlanner,
    pub assignment: AssignmentPlanner,
    pub mission: MissionPlanner,
    pub movement: MovementPlanner,
}

impl CampaignPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            strategic: StrategicPlanner::new(config),
            assignment: AssignmentPlanner::new(config),
            mission: MissionPlanner::new(config),
            movement: MovementPlanner::new(config),
        }
    }

    pub fn tick(&mut self, campaign: &mut Campaign, factory: &mut impl MissionFactory) -> TickReport {
        TickReport {
            directives: apply_directives(campaign),
            strategic: self.strategic.exec_frame(campaign),
            assignment: self.assignment.exec_frame(campaign),
            mission: self.mission.exec_frame(campaign, factory),
            movement: self.movement.exec_frame(campaign),
        }
    }
}
