//! Zone partitioning, per-faction rosters and need vectors

pub mod force;
pub mod need;
pub mod registry;

pub use force::ZoneForce;
pub use need::{NeedCategory, NeedVector};
pub use registry::{RegionKind, Zone, ZoneLayout, ZoneRegistry};
