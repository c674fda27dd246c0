//! Hierarchical force model
//!
//! Groups and units for every combatant, held in one arena.

pub mod assignment;
pub mod group;
pub mod group_type;
pub mod intel;
pub mod order_of_battle;
pub mod tree;
pub mod unit;

pub use assignment::{Assignment, MissionType};
pub use group::Group;
pub use group_type::{GroupType, DEFENSIBLE_THRESHOLD, STRIKE_TARGET_THRESHOLD};
pub use intel::Intel;
pub use order_of_battle::OrderOfBattle;
pub use tree::ForceTree;
pub use unit::{Unit, UnitClass};
