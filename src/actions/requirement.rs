//! Preconditions gating scripted actions
//!
//! A requirement that references something missing (an unknown action, a
//! destroyed group, an absent combatant) is simply not met.

use serde::{Deserialize, Serialize};

use crate::actions::catalog::ActionStatus;
use crate::campaign::Combatant;
use crate::core::error::{CampaignError, Result};
use crate::core::types::{ActionId, Iff, SimTime};
use crate::force::{ForceTree, GroupType, Intel};

/// Comparison operator; `R*` forms compare a score difference between two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    RLt,
    RLe,
    RGt,
    RGe,
    REq,
    RNe,
}

impl Comparison {
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let comparison = match upper.as_str() {
            "LT" => Self::Lt,
            "LE" => Self::Le,
            "GT" => Self::Gt,
            "GE" => Self::Ge,
            "EQ" => Self::Eq,
            "NE" => Self::Ne,
            "RLT" => Self::RLt,
            "RLE" => Self::RLe,
            "RGT" => Self::RGt,
            "RGE" => Self::RGe,
            "REQ" => Self::REq,
            "RNE" => Self::RNe,
            _ => {
                return Err(CampaignError::UnknownName(format!(
                    "comparison '{}'",
                    name
                )))
            }
        };
        Ok(comparison)
    }

    pub fn is_relative(self) -> bool {
        matches!(
            self,
            Self::RLt | Self::RLe | Self::RGt | Self::RGe | Self::REq | Self::RNe
        )
    }

    /// Apply the operator, ignoring whether it is relative
    pub fn test(self, value: i64, threshold: i64) -> bool {
        match self {
            Self::Lt | Self::RLt => value < threshold,
            Self::Le | Self::RLe => value <= threshold,
            Self::Gt | Self::RGt => value > threshold,
            Self::Ge | Self::RGe => value >= threshold,
            Self::Eq | Self::REq => value == threshold,
            Self::Ne | Self::RNe => value != threshold,
        }
    }
}

/// Read-only campaign state consulted while evaluating actions
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub now: SimTime,
    /// Rank of the current player, if there is one
    pub player_rank: Option<i32>,
    pub forces: &'a ForceTree,
    pub combatants: &'a [Combatant],
}

impl<'a> ActionContext<'a> {
    pub fn combatant(&self, iff: Iff) -> Option<&'a Combatant> {
        self.combatants.iter().find(|c| c.iff == iff)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Requirement {
    /// Another action must (or, negated, must not) be in `status`
    Action {
        action: ActionId,
        status: ActionStatus,
        negate: bool,
    },
    /// A group's intel level or value compared against a threshold
    ///
    /// With `intel` set, the group's intel level is compared against it;
    /// otherwise the group's value is compared against `threshold`.
    Group {
        combatant: Iff,
        group_type: GroupType,
        group_id: i32,
        comparison: Comparison,
        threshold: i64,
        intel: Option<Intel>,
    },
    /// A side's score, or its lead over another side
    Score {
        combatant: Iff,
        other: Option<Iff>,
        comparison: Comparison,
        threshold: i64,
    },
}

impl Requirement {
    pub fn action(action: ActionId, status: ActionStatus, negate: bool) -> Self {
        Self::Action {
            action,
            status,
            negate,
        }
    }

    pub fn score(combatant: Iff, comparison: Comparison, threshold: i64) -> Self {
        Self::Score {
            combatant,
            other: None,
            comparison,
            threshold,
        }
    }

    pub fn relative_score(combatant: Iff, other: Iff, comparison: Comparison, threshold: i64) -> Self {
        Self::Score {
            combatant,
            other: Some(other),
            comparison,
            threshold,
        }
    }

    /// Evaluate against the campaign; `status_of` resolves other actions
    pub fn is_met(
        &self,
        ctx: &ActionContext<'_>,
        status_of: impl Fn(ActionId) -> Option<ActionStatus>,
    ) -> bool {
        match self {
            Self::Action {
                action,
                status,
                negate,
            } => match status_of(*action) {
                Some(current) => (current == *status) != *negate,
                None => false,
            },

            Self::Group {
                combatant,
                group_type,
                group_id,
                comparison,
                threshold,
                intel,
            } => {
                if comparison.is_relative() {
                    return false;
                }
                let Some(side) = ctx.combatant(*combatant) else {
                    return false;
                };
                let Some(group) = side
                    .find_group(ctx.forces, *group_type, *group_id)
                    .and_then(|g| ctx.forces.group(g))
                else {
                    return false;
                };

                match intel {
                    Some(level) => comparison.test(group.intel as i64, *level as i64),
                    None => comparison.test(ctx.forces.computed_value(group.id), *threshold),
                }
            }

            Self::Score {
                combatant,
                other,
                comparison,
                threshold,
            } => {
                let Some(side) = ctx.combatant(*combatant) else {
                    return false;
                };

                if comparison.is_relative() {
                    let Some(rival) = other.and_then(|o| ctx.combatant(o)) else {
                        return false;
                    };
                    let lead = side.score as i64 - rival.score as i64;
                    comparison.test(lead, *threshold)
                } else {
                    comparison.test(side.score as i64, *threshold)
                }
            }
        }
    }
}
