//! Order-of-battle descriptions
//!
//! An order of battle is a flat list of groups, each naming its parent by
//! type and number, loaded from TOML. The first entry is the root.
//!
//! ```toml
//! [[group]]
//! type = "force"
//! id = 1
//! name = "Alliance Forces"
//! iff = 1
//!
//! [[group]]
//! type = "carrier_group"
//! id = 3
//! name = "Valiant"
//! parent_type = "force"
//! parent_id = 1
//! region = "Janus"
//!
//! [[group.unit]]
//! name = "Valiant"
//! class = "carrier"
//! ```

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{CampaignError, Result};
use crate::core::types::{GroupId, Iff, UnitId};
use crate::force::group_type::GroupType;
use crate::force::intel::Intel;
use crate::force::tree::ForceTree;
use crate::force::unit::{Unit, UnitClass};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderOfBattle {
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    #[serde(rename = "type")]
    pub group_type: String,
    pub id: i32,
    #[serde(default)]
    pub name: String,
    /// Defaults to the root's faction
    #[serde(default)]
    pub iff: Option<Iff>,
    #[serde(default)]
    pub intel: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub loc: Option<[f64; 3]>,
    #[serde(default)]
    pub parent_type: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i32>,
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub regnum: String,
    #[serde(default = "one")]
    pub count: i32,
    #[serde(default)]
    pub dead_count: i32,
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub loc: Option<[f64; 3]>,
    #[serde(default)]
    pub region: String,
}

fn one() -> i32 {
    1
}

impl OrderOfBattle {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl ForceTree {
    /// Build a subtree from an order of battle and return its root
    ///
    /// Groups whose parent cannot be found are attached to the root.
    pub fn apply_order_of_battle(&mut self, oob: &OrderOfBattle) -> Result<GroupId> {
        let mut specs = oob.groups.iter();
        let root_spec = specs
            .next()
            .ok_or_else(|| CampaignError::InvalidHierarchy("order of battle is empty".into()))?;

        let root_iff = root_spec.iff.unwrap_or(0);
        let root = self.build_group(root_spec, root_iff)?;
        if let Some(g) = self.group_mut(root) {
            g.combatant = Some(root_iff);
        }

        for spec in specs {
            let group = self.build_group(spec, root_iff)?;

            let parent = match (&spec.parent_type, spec.parent_id) {
                (Some(t), id) => {
                    let parent_type = GroupType::from_name(t)?;
                    self.find_group(root, parent_type, id.unwrap_or(-1))
                }
                (None, _) => None,
            };

            let parent = parent.unwrap_or_else(|| {
                warn!(
                    group = %spec.group_type,
                    id = spec.id,
                    "parent not found in order of battle, attaching to root"
                );
                root
            });
            self.add_component(parent, group)?;
        }

        debug!(
            root = ?root,
            groups = self.preorder(root).len(),
            value = self.computed_value(root),
            "applied order of battle"
        );
        Ok(root)
    }

    fn build_group(&mut self, spec: &GroupSpec, default_iff: Iff) -> Result<GroupId> {
        let group_type = GroupType::from_name(&spec.group_type)?;
        let intel = spec
            .intel
            .as_deref()
            .map(Intel::from_name)
            .transpose()?
            .unwrap_or(Intel::Known);

        let id = self.add_group(
            group_type,
            spec.id,
            spec.name.clone(),
            spec.iff.unwrap_or(default_iff),
        );

        if let Some(group) = self.group_mut(id) {
            group.intel = intel.clamp_legal();
            group.region = spec.region.clone();
            group.assigned_system = spec.system.clone();
            if let Some(loc) = spec.loc {
                group.location = DVec3::from_array(loc);
            }
        }

        for u in &spec.units {
            let mut unit = Unit::new(
                UnitId(0),
                u.name.clone(),
                UnitClass::from_name(&u.class)?,
                u.count,
            );
            unit.registry = u.regnum.clone();
            unit.dead_count = u.dead_count;
            unit.sustained_damage = u.damage;
            unit.region = if u.region.is_empty() {
                spec.region.clone()
            } else {
                u.region.clone()
            };
            unit.location = u
                .loc
                .or(spec.loc)
                .map(DVec3::from_array)
                .unwrap_or(DVec3::ZERO);
            self.attach_unit(id, unit)?;
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OOB: &str = r#"
[[group]]
type = "force"
id = 1
name = "Alliance"
iff = 1

[[group]]
type = "carrier_group"
id = 3
name = "Valiant"
parent_type = "force"
parent_id = 1
region = "Janus"
intel = "located"

[[group.unit]]
name = "Valiant"
class = "carrier"
regnum = "CV-3"

[[group]]
type = "fighter_squadron"
id = 12
parent_type = "carrier_group"
parent_id = 3
region = "Janus"

[[group.unit]]
name = "Talon"
class = "fighter"
count = 12
dead_count = 2

[[group]]
type = "battle_group"
id = 7
parent_type = "fleet"
parent_id = 9
"#;

    #[test]
    fn test_apply_order_of_battle() {
        let oob = OrderOfBattle::from_toml_str(OOB).unwrap();
        let mut tree = ForceTree::new();
        let root = tree.apply_order_of_battle(&oob).unwrap();

        let cvbg = tree.find_group(root, GroupType::CarrierGroup, 3).unwrap();
        let squadron = tree.find_group(root, GroupType::FighterSquadron, 12).unwrap();
        assert_eq!(tree.group(squadron).unwrap().parent, Some(cvbg));
        assert_eq!(tree.group(cvbg).unwrap().intel, Intel::Located);
        assert_eq!(tree.group(squadron).unwrap().iff, 1);
        assert_eq!(tree.group(squadron).unwrap().combatant, Some(1));
        assert_eq!(tree.calc_value(root), 1500 + 10 * 20);

        let talon = tree.group(squadron).unwrap().units[0];
        assert_eq!(tree.unit(talon).unwrap().region, "Janus");
    }

    #[test]
    fn test_orphans_attach_to_root() {
        let oob = OrderOfBattle::from_toml_str(OOB).unwrap();
        let mut tree = ForceTree::new();
        let root = tree.apply_order_of_battle(&oob).unwrap();

        let bg = tree.find_group(root, GroupType::BattleGroup, 7).unwrap();
        assert_eq!(tree.group(bg).unwrap().parent, Some(root));
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let oob = OrderOfBattle::from_toml_str(
            "[[group]]\ntype = \"armada\"\nid = 1\n",
        )
        .unwrap();
        let mut tree = ForceTree::new();
        assert!(matches!(
            tree.apply_order_of_battle(&oob),
            Err(CampaignError::UnknownName(_))
        ));

        assert!(ForceTree::new()
            .apply_order_of_battle(&OrderOfBattle::default())
            .is_err());
    }
}
