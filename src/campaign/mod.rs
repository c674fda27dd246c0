pub mod combatant;
pub mod mission;
pub mod state;

pub use combatant::{Combatant, StrategicCategory};
pub use mission::{MissionFactory, MissionInfo, MissionRequest, QueueMissionFactory};
pub use state::Campaign;
