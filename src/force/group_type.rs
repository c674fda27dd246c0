//! Group type catalog
//!
//! The declaration order of [`GroupType`] is significant: two classification
//! rules compare types by ordinal (see [`STRIKE_TARGET_THRESHOLD`] and
//! [`DEFENSIBLE_THRESHOLD`]). Military formations come first, then fixed
//! installations, command and support elements, and finally civilian
//! categories. Inserting a variant in the middle changes which types are
//! strike targets or defensible; the tests at the bottom pin the order.

use serde::{Deserialize, Serialize};

use crate::core::error::{CampaignError, Result};

/// Kind of node in a force tree
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum GroupType {
    #[default]
    None,
    /// Commander in chief; root of an order of battle
    Force,
    Wing,
    InterceptSquadron,
    FighterSquadron,
    AttackSquadron,
    LcaSquadron,
    Fleet,
    DestroyerSquadron,
    BattleGroup,
    CarrierGroup,
    Battalion,
    Minefield,
    Battery,
    Missile,
    /// Orbital station
    Station,
    /// Planet-side base
    Starbase,
    C3i,
    CommRelay,
    EarlyWarning,
    FwdControlCtr,
    Ecm,
    Support,
    Courier,
    Medical,
    Supply,
    Repair,
    /// Root for civilian groups
    Civilian,
    WarProduction,
    Factory,
    Refinery,
    Resource,
    Infrastructure,
    Transport,
    Network,
    Habitat,
    Storage,
    NonCom,
    Freight,
    Passenger,
    Private,
    Unknown,
}

/// Types at or beyond this ordinal may be strike targets
pub const STRIKE_TARGET_THRESHOLD: GroupType = GroupType::Battalion;

/// Types at or beyond this ordinal are defensible
pub const DEFENSIBLE_THRESHOLD: GroupType = GroupType::Support;

/// Movement simulation only re-derives positions for groups above this type
pub const POSITIONED_GROUP_THRESHOLD: GroupType = GroupType::Fleet;

impl GroupType {
    /// Every variant in declaration order
    pub const ALL: [GroupType; 42] = [
        GroupType::None,
        GroupType::Force,
        GroupType::Wing,
        GroupType::InterceptSquadron,
        GroupType::FighterSquadron,
        GroupType::AttackSquadron,
        GroupType::LcaSquadron,
        GroupType::Fleet,
        GroupType::DestroyerSquadron,
        GroupType::BattleGroup,
        GroupType::CarrierGroup,
        GroupType::Battalion,
        GroupType::Minefield,
        GroupType::Battery,
        GroupType::Missile,
        GroupType::Station,
        GroupType::Starbase,
        GroupType::C3i,
        GroupType::CommRelay,
        GroupType::EarlyWarning,
        GroupType::FwdControlCtr,
        GroupType::Ecm,
        GroupType::Support,
        GroupType::Courier,
        GroupType::Medical,
        GroupType::Supply,
        GroupType::Repair,
        GroupType::Civilian,
        GroupType::WarProduction,
        GroupType::Factory,
        GroupType::Refinery,
        GroupType::Resource,
        GroupType::Infrastructure,
        GroupType::Transport,
        GroupType::Network,
        GroupType::Habitat,
        GroupType::Storage,
        GroupType::NonCom,
        GroupType::Freight,
        GroupType::Passenger,
        GroupType::Private,
        GroupType::Unknown,
    ];

    /// Position in declaration order
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Order-of-battle keyword for this type
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Force => "force",
            Self::Wing => "wing",
            Self::InterceptSquadron => "intercept_squadron",
            Self::FighterSquadron => "fighter_squadron",
            Self::AttackSquadron => "attack_squadron",
            Self::LcaSquadron => "lca_squadron",
            Self::Fleet => "fleet",
            Self::DestroyerSquadron => "destroyer_squadron",
            Self::BattleGroup => "battle_group",
            Self::CarrierGroup => "carrier_group",
            Self::Battalion => "battalion",
            Self::Minefield => "minefield",
            Self::Battery => "battery",
            Self::Missile => "missile",
            Self::Station => "station",
            Self::Starbase => "starbase",
            Self::C3i => "c3i",
            Self::CommRelay => "comm_relay",
            Self::EarlyWarning => "early_warning",
            Self::FwdControlCtr => "fwd_control_ctr",
            Self::Ecm => "ecm",
            Self::Support => "support",
            Self::Courier => "courier",
            Self::Medical => "medical",
            Self::Supply => "supply",
            Self::Repair => "repair",
            Self::Civilian => "civilian",
            Self::WarProduction => "war_production",
            Self::Factory => "factory",
            Self::Refinery => "refinery",
            Self::Resource => "resource",
            Self::Infrastructure => "infrastructure",
            Self::Transport => "transport",
            Self::Network => "network",
            Self::Habitat => "habitat",
            Self::Storage => "storage",
            Self::NonCom => "non_com",
            Self::Freight => "freight",
            Self::Passenger => "passenger",
            Self::Private => "private",
            Self::Unknown => "unknown",
        }
    }

    /// Parse an order-of-battle keyword (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CampaignError::UnknownName("empty group type".into()));
        }

        Self::ALL
            .iter()
            .copied()
            .filter(|t| *t != Self::None)
            .find(|t| t.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CampaignError::UnknownName(format!("group type '{}'", name)))
    }

    /// Long display name used in descriptions
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Force => "Force",
            Self::Wing => "Tactical Fighter Wing",
            Self::InterceptSquadron => "Intercept Squadron",
            Self::FighterSquadron => "Fighter Squadron",
            Self::AttackSquadron => "Attack Squadron",
            Self::LcaSquadron => "LCA Squadron",
            Self::Fleet => "Fleet",
            Self::DestroyerSquadron => "Destroyer Squadron",
            Self::BattleGroup => "Battle Group",
            Self::CarrierGroup => "Carrier Group",
            Self::Battalion => "Battalion",
            Self::Minefield => "Minefield",
            Self::Battery => "Battery",
            Self::Missile => "Missile Battery",
            Self::Station => "Station",
            Self::Starbase => "Starbase",
            Self::C3i => "C3I",
            Self::CommRelay => "Comm Relay",
            Self::EarlyWarning => "Early Warning",
            Self::FwdControlCtr => "Forward Control Center",
            Self::Ecm => "ECM",
            Self::Support => "Support",
            Self::Courier => "Courier",
            Self::Medical => "Medical",
            Self::Supply => "Supply",
            Self::Repair => "Repair",
            Self::Civilian => "Civilian",
            Self::WarProduction => "War Production",
            Self::Factory => "Factory",
            Self::Refinery => "Refinery",
            Self::Resource => "Resource",
            Self::Infrastructure => "Infrastructure",
            Self::Transport => "Transport",
            Self::Network => "Network",
            Self::Habitat => "Habitat",
            Self::Storage => "Storage",
            Self::NonCom => "Non-Com",
            Self::Freight => "Freight",
            Self::Passenger => "Passenger",
            Self::Private => "Private",
            Self::None | Self::Unknown => "Combat Group",
        }
    }

    /// Abbreviation used in short descriptions
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Fleet => "Flt",
            Self::CarrierGroup => "CVBG",
            Self::BattleGroup => "BG",
            Self::DestroyerSquadron => "DESRON",
            Self::Wing => "Wg",
            Self::AttackSquadron => "AS",
            Self::FighterSquadron => "FS",
            Self::InterceptSquadron => "IS",
            Self::LcaSquadron => "LCA",
            Self::Battalion => "Bn",
            Self::Station => "Stn",
            Self::Starbase => "SB",
            Self::Minefield => "MF",
            Self::Battery => "Bty",
            Self::Missile => "Msl",
            Self::C3i => "C3I",
            Self::CommRelay => "CR",
            Self::EarlyWarning => "EW",
            Self::FwdControlCtr => "FCC",
            Self::Ecm => "ECM",
            Self::Support => "Spt",
            Self::Courier => "Cour",
            Self::Medical => "Med",
            Self::Supply => "Sup",
            Self::Repair => "Rep",
            _ => "Grp",
        }
    }

    /// Formations the strategic planner moves between zones
    pub fn is_assignable(self) -> bool {
        matches!(
            self,
            Self::CarrierGroup
                | Self::BattleGroup
                | Self::DestroyerSquadron
                | Self::AttackSquadron
                | Self::FighterSquadron
                | Self::InterceptSquadron
                | Self::LcaSquadron
        )
    }

    /// Types that may change region at all
    pub fn is_movable(self) -> bool {
        matches!(
            self,
            Self::CarrierGroup
                | Self::BattleGroup
                | Self::DestroyerSquadron
                | Self::AttackSquadron
                | Self::FighterSquadron
                | Self::InterceptSquadron
                | Self::LcaSquadron
                | Self::Courier
                | Self::Medical
                | Self::Supply
                | Self::Repair
                | Self::Freight
                | Self::Passenger
                | Self::Private
        )
    }

    pub fn is_fighter_group(self) -> bool {
        matches!(
            self,
            Self::Wing | Self::InterceptSquadron | Self::FighterSquadron | Self::AttackSquadron
        )
    }

    pub fn is_starship_group(self) -> bool {
        matches!(
            self,
            Self::DestroyerSquadron | Self::BattleGroup | Self::CarrierGroup
        )
    }

    /// Squadrons that fly off a carrier or fixed base
    pub fn is_squadron(self) -> bool {
        matches!(
            self,
            Self::InterceptSquadron
                | Self::FighterSquadron
                | Self::AttackSquadron
                | Self::LcaSquadron
        )
    }

    /// Non-combatant civilian categories never chosen as strategic targets
    pub fn is_protected_civilian(self) -> bool {
        matches!(
            self,
            Self::Passenger | Self::Private | Self::Medical | Self::Habitat
        )
    }

    /// Ordinal rule for strike targets (type only; value is checked by the tree)
    pub fn is_strike_type(self) -> bool {
        self >= STRIKE_TARGET_THRESHOLD
            && self != Self::Minefield
            && !self.is_protected_civilian()
    }

    /// Ordinal rule for defensible groups (type only; value is checked by the tree)
    pub fn is_defensible_type(self) -> bool {
        self >= DEFENSIBLE_THRESHOLD
    }

    /// Preferred attacking asset types in priority order
    pub fn preferred_attackers(self) -> &'static [GroupType] {
        use GroupType::*;

        match self {
            DestroyerSquadron => &[DestroyerSquadron, BattleGroup, CarrierGroup, AttackSquadron],
            BattleGroup => &[BattleGroup, DestroyerSquadron, CarrierGroup, AttackSquadron],
            CarrierGroup => &[AttackSquadron, BattleGroup, DestroyerSquadron, CarrierGroup],
            LcaSquadron | AttackSquadron | InterceptSquadron | FighterSquadron => {
                &[InterceptSquadron, FighterSquadron]
            }
            Station => &[BattleGroup, CarrierGroup],
            Starbase | Battery | Missile => &[AttackSquadron, FighterSquadron],
            Minefield | CommRelay | EarlyWarning | FwdControlCtr | Ecm => {
                &[AttackSquadron, FighterSquadron, DestroyerSquadron]
            }
            Courier | Medical | Supply | Repair => {
                &[DestroyerSquadron, BattleGroup, AttackSquadron]
            }
            Factory | Refinery | Resource => &[AttackSquadron, FighterSquadron],
            Transport | Network | Habitat | Storage => &[AttackSquadron, FighterSquadron],
            Freight | Passenger | Private => &[DestroyerSquadron, AttackSquadron],
            None | Force | Wing | Fleet | Battalion | C3i | Support | Civilian
            | WarProduction | Infrastructure | NonCom | Unknown => &[],
        }
    }

    /// Preferred defending asset types in priority order
    pub fn preferred_defenders(self) -> &'static [GroupType] {
        use GroupType::*;

        match self {
            Station => &[BattleGroup, CarrierGroup, DestroyerSquadron],
            Starbase | Minefield | Battery | Missile => &[FighterSquadron, InterceptSquadron],
            CommRelay | EarlyWarning | FwdControlCtr | Ecm => {
                &[FighterSquadron, InterceptSquadron]
            }
            Courier | Medical | Supply | Repair => {
                &[DestroyerSquadron, BattleGroup, AttackSquadron]
            }
            Factory | Refinery | Resource => &[FighterSquadron, InterceptSquadron],
            Transport | Network | Habitat | Storage => &[FighterSquadron, InterceptSquadron],
            Freight | Passenger | Private => &[DestroyerSquadron, BattleGroup],
            None | Force | Wing | InterceptSquadron | FighterSquadron | AttackSquadron
            | LcaSquadron | Fleet | DestroyerSquadron | BattleGroup | CarrierGroup
            | Battalion | C3i | Support | Civilian | WarProduction | Infrastructure | NonCom
            | Unknown => &[],
        }
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
