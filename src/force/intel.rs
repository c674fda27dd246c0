//! Intelligence levels
//!
//! How much the opposing side knows about a group. Ordered from least to
//! most known; comparisons rely on the derived `Ord`.

use serde::{Deserialize, Serialize};

use crate::core::error::{CampaignError, Result};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Intel {
    Unknown,
    /// Held back from planning entirely
    #[default]
    Reserve,
    /// Exists but the enemy does not know about it
    Secret,
    /// Existence is known
    Known,
    /// Location is known
    Located,
    /// Location is continuously tracked
    Tracked,
}

impl Intel {
    /// Lowest level a group may be set to
    pub const MIN: Intel = Intel::Reserve;
    /// Highest level a group may be set to
    pub const MAX: Intel = Intel::Tracked;

    /// Clamp into the settable range
    pub fn clamp_legal(self) -> Intel {
        self.clamp(Self::MIN, Self::MAX)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Reserve => "reserve",
            Self::Secret => "secret",
            Self::Known => "known",
            Self::Located => "located",
            Self::Tracked => "tracked",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        [
            Self::Unknown,
            Self::Reserve,
            Self::Secret,
            Self::Known,
            Self::Located,
            Self::Tracked,
        ]
        .into_iter()
        .find(|i| i.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| CampaignError::UnknownName(format!("intel level '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intel_ordering() {
        assert!(Intel::Unknown < Intel::Reserve);
        assert!(Intel::Reserve < Intel::Secret);
        assert!(Intel::Secret < Intel::Known);
        assert!(Intel::Known < Intel::Located);
        assert!(Intel::Located < Intel::Tracked);
    }

    #[test]
    fn test_clamp_legal() {
        assert_eq!(Intel::Unknown.clamp_legal(), Intel::Reserve);
        assert_eq!(Intel::Tracked.clamp_legal(), Intel::Tracked);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Intel::from_name("LOCATED").unwrap(), Intel::Located);
        assert!(Intel::from_name("rumored").is_err());
    }
}
