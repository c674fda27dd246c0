//! Mission types and strategic assignments

use serde::{Deserialize, Serialize};

use crate::core::error::{CampaignError, Result};
use crate::core::types::GroupId;

/// Mission categories the planners can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MissionType {
    Patrol,
    Sweep,
    Intercept,
    AirPatrol,
    AirSweep,
    AirIntercept,
    Strike,
    Assault,
    Defend,
    Escort,
    EscortFreight,
    EscortShuttle,
    EscortStrike,
    Intel,
    Scout,
    Recon,
    Blockade,
    Fleet,
    Bombardment,
    FlightOps,
    Transport,
    Cargo,
    Training,
    Other,
}

impl MissionType {
    const ALL: [MissionType; 24] = [
        MissionType::Patrol,
        MissionType::Sweep,
        MissionType::Intercept,
        MissionType::AirPatrol,
        MissionType::AirSweep,
        MissionType::AirIntercept,
        MissionType::Strike,
        MissionType::Assault,
        MissionType::Defend,
        MissionType::Escort,
        MissionType::EscortFreight,
        MissionType::EscortShuttle,
        MissionType::EscortStrike,
        MissionType::Intel,
        MissionType::Scout,
        MissionType::Recon,
        MissionType::Blockade,
        MissionType::Fleet,
        MissionType::Bombardment,
        MissionType::FlightOps,
        MissionType::Transport,
        MissionType::Cargo,
        MissionType::Training,
        MissionType::Other,
    ];

    /// Missions flown inside an atmosphere
    pub fn is_air(self) -> bool {
        matches!(self, Self::AirPatrol | Self::AirSweep | Self::AirIntercept)
    }

    /// Space equivalent of an air mission
    pub fn space_equivalent(self) -> MissionType {
        match self {
            Self::AirIntercept => Self::Intercept,
            Self::AirSweep => Self::Sweep,
            Self::AirPatrol => Self::Patrol,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Patrol => "Patrol",
            Self::Sweep => "Sweep",
            Self::Intercept => "Intercept",
            Self::AirPatrol => "Airborne Patrol",
            Self::AirSweep => "Airborne Sweep",
            Self::AirIntercept => "Airborne Intercept",
            Self::Strike => "Strike",
            Self::Assault => "Assault",
            Self::Defend => "Defend",
            Self::Escort => "Escort",
            Self::EscortFreight => "Escort Freight",
            Self::EscortShuttle => "Escort Shuttle",
            Self::EscortStrike => "Escort Strike",
            Self::Intel => "Intel",
            Self::Scout => "Scout",
            Self::Recon => "Recon",
            Self::Blockade => "Blockade",
            Self::Fleet => "Fleet",
            Self::Bombardment => "Attack",
            Self::FlightOps => "Flight Ops",
            Self::Transport => "Transport",
            Self::Cargo => "Cargo",
            Self::Training => "Training",
            Self::Other => "Misc",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| {
                m.name().eq_ignore_ascii_case(name)
                    || format!("{:?}", m).eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| CampaignError::UnknownName(format!("mission type '{}'", name)))
    }
}

/// A strategic pairing of a resource group with an objective group
///
/// Stored on the resource group. Priority comes from the objective's plan
/// value at sort time; an assignment without an objective sorts last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub mission: MissionType,
    pub objective: Option<GroupId>,
    pub resource: GroupId,
}

impl Assignment {
    pub fn new(mission: MissionType, objective: Option<GroupId>, resource: GroupId) -> Self {
        Self {
            mission,
            objective,
            resource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_downgrades() {
        assert_eq!(MissionType::AirIntercept.space_equivalent(), MissionType::Intercept);
        assert_eq!(MissionType::AirSweep.space_equivalent(), MissionType::Sweep);
        assert_eq!(MissionType::AirPatrol.space_equivalent(), MissionType::Patrol);
        assert_eq!(MissionType::Strike.space_equivalent(), MissionType::Strike);
        assert!(MissionType::AirSweep.is_air());
        assert!(!MissionType::Sweep.is_air());
    }

    #[test]
    fn test_from_name_accepts_labels_and_variants() {
        assert_eq!(
            MissionType::from_name("escort freight").unwrap(),
            MissionType::EscortFreight
        );
        assert_eq!(
            MissionType::from_name("EscortFreight").unwrap(),
            MissionType::EscortFreight
        );
        assert!(MissionType::from_name("picnic").is_err());
    }
}
