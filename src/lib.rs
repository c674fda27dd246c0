//! Dynamic Campaign - strategic planner for a persistent space campaign
//!
//! Force trees of groups and units, zones that collect needs and targets,
//! scripted actions, and the planners that place forces, assign missions
//! and drift ships between sorties.

pub mod actions;
pub mod campaign;
pub mod core;
pub mod force;
pub mod planning;
pub mod zone;
