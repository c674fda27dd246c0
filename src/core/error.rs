use thiserror::Error;

use crate::core::types::{ActionId, GroupId, Iff, UnitId, ZoneId};

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Group not found: {0:?}")]
    GroupNotFound(GroupId),

    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Zone not found: {0:?}")]
    ZoneNotFound(ZoneId),

    #[error("Combatant not found for iff {0}")]
    CombatantNotFound(Iff),

    #[error("Action not found: {0:?}")]
    ActionNotFound(ActionId),

    #[error("Duplicate action id: {0:?}")]
    DuplicateAction(ActionId),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("Unknown name: {0}")]
    UnknownName(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CampaignError>;
