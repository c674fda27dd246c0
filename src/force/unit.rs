//! Leaf assets of a force tree
//!
//! A unit is one or more identical ships or installations. Its value is the
//! class value times the number still alive.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::core::error::{CampaignError, Result};
use crate::core::types::{GroupId, Iff, UnitId};

/// Design class of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitClass {
    // Dropships
    Drone,
    Fighter,
    Attack,
    Lca,
    // Starships
    Courier,
    Cargo,
    Corvette,
    Freighter,
    Frigate,
    Destroyer,
    Cruiser,
    Battleship,
    Carrier,
    Dreadnaught,
    // Static
    Station,
    Farcaster,
    Mine,
    Comsat,
    Defsat,
    Swacs,
    Building,
    Factory,
    Sam,
    Ewr,
    C3i,
    Starbase,
}

impl UnitClass {
    const ALL: [UnitClass; 26] = [
        UnitClass::Drone,
        UnitClass::Fighter,
        UnitClass::Attack,
        UnitClass::Lca,
        UnitClass::Courier,
        UnitClass::Cargo,
        UnitClass::Corvette,
        UnitClass::Freighter,
        UnitClass::Frigate,
        UnitClass::Destroyer,
        UnitClass::Cruiser,
        UnitClass::Battleship,
        UnitClass::Carrier,
        UnitClass::Dreadnaught,
        UnitClass::Station,
        UnitClass::Farcaster,
        UnitClass::Mine,
        UnitClass::Comsat,
        UnitClass::Defsat,
        UnitClass::Swacs,
        UnitClass::Building,
        UnitClass::Factory,
        UnitClass::Sam,
        UnitClass::Ewr,
        UnitClass::C3i,
        UnitClass::Starbase,
    ];

    /// Strategic value of a single ship or installation of this class
    pub fn value(self) -> i64 {
        match self {
            Self::Drone => 10,
            Self::Fighter => 20,
            Self::Attack => 40,
            Self::Lca => 50,
            Self::Courier | Self::Cargo | Self::Corvette => 100,
            Self::Freighter => 250,
            Self::Frigate => 200,
            Self::Destroyer => 500,
            Self::Cruiser => 800,
            Self::Battleship => 1000,
            Self::Carrier | Self::Dreadnaught => 1500,
            Self::Station => 2500,
            Self::Farcaster => 5000,
            Self::Mine => 20,
            Self::Comsat => 200,
            Self::Defsat => 300,
            Self::Swacs => 500,
            Self::Building => 100,
            Self::Factory => 250,
            Self::Sam => 100,
            Self::Ewr => 200,
            Self::C3i => 500,
            Self::Starbase => 2000,
        }
    }

    /// Small craft carried and launched by larger ships
    pub fn is_dropship(self) -> bool {
        self <= Self::Lca
    }

    pub fn is_starship(self) -> bool {
        (Self::Courier..=Self::Farcaster).contains(&self)
    }

    /// Fixed installations that never move
    pub fn is_static(self) -> bool {
        self >= Self::Station
    }

    /// Heavy ships the planner avoids sending on routine missions
    pub fn is_capital(self) -> bool {
        (Self::Cruiser..=Self::Farcaster).contains(&self)
    }

    /// Can support child groups (losses cascade to them)
    pub fn is_host(self) -> bool {
        matches!(self, Self::Carrier | Self::Station | Self::Starbase)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Drone => "drone",
            Self::Fighter => "fighter",
            Self::Attack => "attack",
            Self::Lca => "lca",
            Self::Courier => "courier",
            Self::Cargo => "cargo",
            Self::Corvette => "corvette",
            Self::Freighter => "freighter",
            Self::Frigate => "frigate",
            Self::Destroyer => "destroyer",
            Self::Cruiser => "cruiser",
            Self::Battleship => "battleship",
            Self::Carrier => "carrier",
            Self::Dreadnaught => "dreadnaught",
            Self::Station => "station",
            Self::Farcaster => "farcaster",
            Self::Mine => "mine",
            Self::Comsat => "comsat",
            Self::Defsat => "defsat",
            Self::Swacs => "swacs",
            Self::Building => "building",
            Self::Factory => "factory",
            Self::Sam => "sam",
            Self::Ewr => "ewr",
            Self::C3i => "c3i",
            Self::Starbase => "starbase",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CampaignError::UnknownName(format!("unit class '{}'", name)))
    }

    /// Short hull prefix used in descriptions
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Drone => "DR",
            Self::Fighter => "F",
            Self::Attack => "A",
            Self::Lca => "LCA",
            Self::Courier => "CR",
            Self::Cargo => "CG",
            Self::Corvette => "CV",
            Self::Freighter => "FR",
            Self::Frigate => "FF",
            Self::Destroyer => "DD",
            Self::Cruiser => "CA",
            Self::Battleship => "BB",
            Self::Carrier => "CV",
            Self::Dreadnaught => "DN",
            Self::Station => "STN",
            Self::Farcaster => "FC",
            Self::Mine => "MN",
            Self::Comsat => "CS",
            Self::Defsat => "DS",
            Self::Swacs => "SW",
            Self::Building => "BLD",
            Self::Factory => "FAC",
            Self::Sam => "SAM",
            Self::Ewr => "EWR",
            Self::C3i => "C3I",
            Self::Starbase => "SB",
        }
    }
}

fn default_count() -> i32 {
    1
}

fn default_integrity() -> f64 {
    1000.0
}

/// A ship, squadron of identical craft, or installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    #[serde(default)]
    pub registry: String,
    pub class: UnitClass,
    #[serde(default)]
    pub iff: Iff,
    #[serde(default = "default_count")]
    pub count: i32,
    #[serde(default)]
    pub dead_count: i32,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub location: DVec3,
    /// Maximum hull integrity
    #[serde(default = "default_integrity")]
    pub integrity: f64,
    #[serde(default)]
    pub sustained_damage: f64,
    /// Carrier this unit launches from (observation only)
    #[serde(default)]
    pub carrier: Option<UnitId>,
    /// Owning group (observation only)
    #[serde(default)]
    pub group: Option<GroupId>,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, class: UnitClass, count: i32) -> Self {
        Self {
            id,
            name: name.into(),
            registry: String::new(),
            class,
            iff: 0,
            count,
            dead_count: 0,
            region: String::new(),
            location: DVec3::ZERO,
            integrity: default_integrity(),
            sustained_damage: 0.0,
            carrier: None,
            group: None,
        }
    }

    pub fn live_count(&self) -> i32 {
        (self.count - self.dead_count).max(0)
    }

    pub fn single_value(&self) -> i64 {
        self.class.value()
    }

    pub fn value(&self) -> i64 {
        self.single_value() * self.live_count() as i64
    }

    pub fn is_dropship(&self) -> bool {
        self.class.is_dropship()
    }

    pub fn is_starship(&self) -> bool {
        self.class.is_starship()
    }

    pub fn is_static(&self) -> bool {
        self.class.is_static()
    }

    /// Sustained damage as a percentage of integrity
    pub fn damage_percent(&self) -> f64 {
        if self.integrity <= 0.0 {
            return 0.0;
        }
        100.0 * self.sustained_damage / self.integrity
    }

    /// Record up to `n` losses and return the value destroyed
    ///
    /// Cascading losses to carried groups is handled by
    /// [`ForceTree::kill_units`](crate::force::ForceTree::kill_units).
    pub fn record_losses(&mut self, n: i32) -> i64 {
        let killed = n.clamp(0, self.live_count());
        self.dead_count += killed;
        killed as i64 * self.single_value()
    }

    pub fn description(&self) -> String {
        if self.count > 1 {
            format!(
                "{}x {} {}",
                self.live_count(),
                self.class.abbreviation(),
                self.name
            )
        } else {
            let mut desc = if self.registry.is_empty() {
                format!("{} {}", self.class.abbreviation(), self.name)
            } else {
                format!("{}-{} {}", self.class.abbreviation(), self.registry, self.name)
            };
            if self.dead_count > 0 {
                desc.push_str(" (killed in action)");
            }
            desc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_counts_only_live() {
        let mut unit = Unit::new(UnitId(1), "Vipers", UnitClass::Fighter, 6);
        assert_eq!(unit.value(), 120);
        unit.dead_count = 2;
        assert_eq!(unit.value(), 80);
    }

    #[test]
    fn test_record_losses_caps_at_live_count() {
        let mut unit = Unit::new(UnitId(1), "Vipers", UnitClass::Fighter, 4);
        assert_eq!(unit.record_losses(10), 80);
        assert_eq!(unit.live_count(), 0);
        assert_eq!(unit.record_losses(1), 0);
    }

    #[test]
    fn test_class_ranges() {
        assert!(UnitClass::Lca.is_dropship());
        assert!(!UnitClass::Courier.is_dropship());
        assert!(UnitClass::Courier.is_starship());
        assert!(UnitClass::Farcaster.is_starship());
        assert!(UnitClass::Station.is_static());
        assert!(!UnitClass::Dreadnaught.is_static());
        assert!(UnitClass::Battleship.is_capital());
        assert!(!UnitClass::Destroyer.is_capital());
    }

    #[test]
    fn test_description() {
        let mut unit = Unit::new(UnitId(1), "Devastator", UnitClass::Destroyer, 1);
        unit.registry = "201".into();
        assert_eq!(unit.description(), "DD-201 Devastator");
        unit.record_losses(1);
        assert!(unit.description().ends_with("(killed in action)"));

        let squadron = Unit::new(UnitId(2), "Falcon", UnitClass::Fighter, 12);
        assert_eq!(squadron.description(), "12x F Falcon");
    }

    #[test]
    fn test_damage_percent() {
        let mut unit = Unit::new(UnitId(1), "Hauler", UnitClass::Freighter, 1);
        unit.integrity = 200.0;
        unit.sustained_damage = 120.0;
        assert!((unit.damage_percent() - 60.0).abs() < 1e-9);
    }
}
