//! Scripted campaign actions and their trigger conditions

pub mod action;
pub mod board;
pub mod catalog;
pub mod requirement;

pub use action::{Action, TIME_NEVER};
pub use board::ActionBoard;
pub use catalog::{ActionStatus, ActionType};
pub use requirement::{ActionContext, Comparison, Requirement};
