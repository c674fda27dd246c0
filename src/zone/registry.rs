//! Zones and the registry that owns them
//!
//! A zone groups one or more regions for force allocation. Each zone keeps
//! one [`ZoneForce`] per faction, created on first lookup.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{GroupId, Iff, ZoneId};
use crate::force::ForceTree;
use crate::zone::force::ZoneForce;

/// Physical character of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Open space around a body
    Orbital,
    /// Surface region with an atmosphere
    Terrain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    /// Defaults to the first region added
    pub name: String,
    pub system: String,
    pub regions: Vec<String>,
    pub forces: Vec<ZoneForce>,
}

impl Zone {
    pub fn new(id: ZoneId, system: impl Into<String>) -> Self {
        Self {
            id,
            name: String::new(),
            system: system.into(),
            regions: Vec::new(),
            forces: Vec::new(),
        }
    }

    pub fn add_region(&mut self, region: impl Into<String>) {
        let region = region.into();
        if region.is_empty() {
            return;
        }
        if self.name.is_empty() {
            self.name = region.clone();
        }
        self.regions.push(region);
    }

    /// Case-insensitive region membership
    pub fn has_region(&self, region: &str) -> bool {
        !region.is_empty() && self.regions.iter().any(|r| r.eq_ignore_ascii_case(region))
    }

    /// Force for a faction, created on first lookup
    pub fn find_force(&mut self, iff: Iff) -> &mut ZoneForce {
        let index = match self.forces.iter().position(|f| f.iff == iff) {
            Some(index) => index,
            None => {
                self.forces.push(ZoneForce::new(iff));
                self.forces.len() - 1
            }
        };
        &mut self.forces[index]
    }

    /// Force for a faction without creating one
    pub fn force(&self, iff: Iff) -> Option<&ZoneForce> {
        self.forces.iter().find(|f| f.iff == iff)
    }

    pub fn has_group(&self, iff: Iff, group: GroupId) -> bool {
        self.force(iff).is_some_and(|f| f.has_group(group))
    }

    /// Drop every faction roster
    pub fn clear(&mut self) {
        self.forces.clear();
    }
}

/// Owns every zone of the campaign
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    /// Lowercased region name -> kind
    region_kinds: AHashMap<String, RegionKind>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_zone(&mut self, system: impl Into<String>, regions: &[&str]) -> ZoneId {
        let id = ZoneId(self.zones.len() as u32);
        let mut zone = Zone::new(id, system);
        for r in regions {
            zone.add_region(*r);
        }
        self.zones.push(zone);
        id
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.index())
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(id.index())
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_ids(&self) -> Vec<ZoneId> {
        self.zones.iter().map(|z| z.id).collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// First zone containing `region`
    pub fn zone_for_region(&self, region: &str) -> Option<ZoneId> {
        self.zones.iter().find(|z| z.has_region(region)).map(|z| z.id)
    }

    /// Register a group in a zone and record the zone on the group
    pub fn add_group(&mut self, tree: &mut ForceTree, zone: ZoneId, group: GroupId) {
        let (Some(z), Some(g)) = (self.zones.get_mut(zone.index()), tree.group_mut(group)) else {
            return;
        };
        z.find_force(g.iff).add_group(group);
        g.current_zone = Some(zone);
    }

    /// Remove a group from a zone and clear its zone back-reference
    pub fn remove_group(&mut self, tree: &mut ForceTree, zone: ZoneId, group: GroupId) {
        let (Some(z), Some(g)) = (self.zones.get_mut(zone.index()), tree.group_mut(group)) else {
            return;
        };
        z.find_force(g.iff).remove_group(group);
        g.current_zone = None;
    }

    /// Drop every roster in every zone along with the groups' back-references
    pub fn clear_all(&mut self, tree: &mut ForceTree) {
        for zone in &mut self.zones {
            zone.clear();
        }
        tree.clear_current_zones();
    }

    pub fn set_region_kind(&mut self, region: &str, kind: RegionKind) {
        self.region_kinds.insert(region.to_ascii_lowercase(), kind);
    }

    pub fn region_kind(&self, region: &str) -> Option<RegionKind> {
        self.region_kinds.get(&region.to_ascii_lowercase()).copied()
    }

    /// Region is confirmed to be an atmospheric surface region
    pub fn is_terrain(&self, region: &str) -> bool {
        self.region_kind(region) == Some(RegionKind::Terrain)
    }

    /// Build a registry from a zone layout description
    pub fn from_layout(layout: &ZoneLayout) -> Self {
        let mut registry = Self::new();
        for z in &layout.zones {
            let regions: Vec<&str> = z.regions.iter().map(String::as_str).collect();
            let id = registry.add_zone(z.system.clone(), &regions);
            if let (Some(name), Some(zone)) = (&z.name, registry.zone_mut(id)) {
                zone.name = name.clone();
            }
        }
        for r in &layout.regions {
            registry.set_region_kind(&r.name, r.kind);
        }
        registry
    }
}

/// Zone layout loaded alongside an order of battle
///
/// ```toml
/// [[zone]]
/// system = "Janus"
/// regions = ["Janus", "Haiche"]
///
/// [[region]]
/// name = "Haiche"
/// kind = "Terrain"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneLayout {
    #[serde(default, rename = "zone")]
    pub zones: Vec<ZoneSpec>,
    #[serde(default, rename = "region")]
    pub regions: Vec<RegionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub system: String,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub kind: RegionKind,
}

impl ZoneLayout {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
