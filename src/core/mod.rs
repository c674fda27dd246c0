pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, PlannerConfig};
pub use error::{CampaignError, Result};
pub use types::{ActionId, GroupId, Iff, SimTime, UnitId, ZoneId};
