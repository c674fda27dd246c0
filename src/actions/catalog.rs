//! Action types and lifecycle states

use serde::{Deserialize, Serialize};

use crate::core::error::{CampaignError, Result};

/// What a scripted campaign action does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActionType {
    /// Placeholder used only as a dependency marker
    #[default]
    NoAction,
    StrategicDirective,
    ZoneAssignment,
    SystemAssignment,
    MissionTemplate,
    CombatEvent,
    IntelEvent,
    CampaignSituation,
    CampaignOrders,
}

impl ActionType {
    /// Parse a type keyword or its short alias (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let action_type = match upper.as_str() {
            "NO_ACTION" | "MARKER" => Self::NoAction,
            "STRATEGIC_DIRECTIVE" | "STRATEGIC" => Self::StrategicDirective,
            "ZONE_ASSIGNMENT" | "ZONE" => Self::ZoneAssignment,
            "SYSTEM_ASSIGNMENT" | "SYSTEM" => Self::SystemAssignment,
            "MISSION_TEMPLATE" | "MISSION" => Self::MissionTemplate,
            "COMBAT_EVENT" | "EVENT" => Self::CombatEvent,
            "INTEL_EVENT" | "INTEL" => Self::IntelEvent,
            "CAMPAIGN_SITUATION" | "SITREP" => Self::CampaignSituation,
            "CAMPAIGN_ORDERS" | "ORDERS" => Self::CampaignOrders,
            _ => {
                return Err(CampaignError::UnknownName(format!(
                    "action type '{}'",
                    name
                )))
            }
        };
        Ok(action_type)
    }
}

/// Lifecycle of an action
///
/// `Pending` may move to `Skipped` (failed probability roll), `Failed`
/// (window closed, or failed explicitly), `Active`, or straight to
/// `Complete` once every repeat has fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActionStatus {
    #[default]
    Pending,
    Active,
    Skipped,
    Failed,
    Complete,
}

impl ActionStatus {
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            "SKIPPED" => Ok(Self::Skipped),
            "FAILED" => Ok(Self::Failed),
            "COMPLETE" => Ok(Self::Complete),
            _ => Err(CampaignError::UnknownName(format!(
                "action status '{}'",
                name
            ))),
        }
    }

    /// No further transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Skipped | Self::Failed | Self::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_aliases() {
        let pairs = [
            ("NO_ACTION", "MARKER"),
            ("STRATEGIC_DIRECTIVE", "STRATEGIC"),
            ("ZONE_ASSIGNMENT", "ZONE"),
            ("SYSTEM_ASSIGNMENT", "SYSTEM"),
            ("MISSION_TEMPLATE", "MISSION"),
            ("COMBAT_EVENT", "EVENT"),
            ("INTEL_EVENT", "INTEL"),
            ("CAMPAIGN_SITUATION", "SITREP"),
            ("CAMPAIGN_ORDERS", "ORDERS"),
        ];
        for (long, short) in pairs {
            assert_eq!(
                ActionType::from_name(long).unwrap(),
                ActionType::from_name(short).unwrap()
            );
        }
        assert_eq!(ActionType::from_name("mission").unwrap(), ActionType::MissionTemplate);
        assert!(ActionType::from_name("BRUNCH").is_err());
    }

    #[test]
    fn test_status_names() {
        assert_eq!(ActionStatus::from_name("complete").unwrap(), ActionStatus::Complete);
        assert!(ActionStatus::from_name("").is_err());
        assert!(ActionStatus::Failed.is_terminal());
        assert!(!ActionStatus::Active.is_terminal());
    }
}
