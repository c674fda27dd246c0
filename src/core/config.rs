//! Planner configuration with documented constants
//!
//! All cadences, distances and weights used by the planners are collected
//! here. Values are in simulated seconds and meters.

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::error::{CampaignError, Result};
use crate::core::types::SimTime;

/// Configuration for the campaign planners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    // === CADENCE ===
    /// Seconds between strategic planning passes
    pub strategic_interval: SimTime,

    /// Seconds between assignment planning passes
    pub assignment_interval: SimTime,

    /// Seconds between movement simulation passes
    ///
    /// Two simulated hours; units drift slowly between missions.
    pub movement_interval: SimTime,

    // === MISSIONS ===
    /// Minimum seconds before a mission-template action may fire again
    pub template_refire_interval: SimTime,

    /// Mission start times are quantized to this many seconds
    pub mission_delay: SimTime,

    /// Maximum queued missions for a fighter group
    pub fighter_mission_limit: usize,

    /// Maximum queued missions for a starship group
    pub starship_mission_limit: usize,

    /// Seconds between fighter replans while missions are queued
    pub fighter_replan_interval: SimTime,

    // === MOVEMENT ===
    /// Radius of the home volume around the system origin
    pub home_radius: f64,

    /// Near profile: outward drift range (scaled by distance to the boundary)
    pub near_drift_min: f64,
    pub near_drift_max: f64,
    /// Near profile: random jitter magnitude
    pub near_jitter: f64,

    /// Far profile: inward drift range (scaled by distance past the boundary)
    pub far_drift_min: f64,
    pub far_drift_max: f64,
    /// Far profile: random jitter magnitude
    pub far_jitter: f64,

    /// Units from other groups closer than this are pushed apart
    pub separation_distance: f64,

    /// Separation push as a multiple of the distance deficit
    pub separation_factor: f64,

    /// Vertical offset beyond which the z coordinate is damped
    pub vertical_band: f64,

    /// Multiplier applied to z when outside the vertical band
    pub vertical_damping: f64,

    /// Sustained damage (percent of integrity) above which repair happens
    pub heal_threshold_percent: f64,

    /// Sustained damage is multiplied by this on repair
    pub heal_factor: f64,

    // === STRATEGY ===
    /// Default per-category strategic target weights
    ///
    /// Order: capital ships, fighters, weapons platforms, C3I,
    /// logistics, everything else. Weapons platforms are weighted heavily
    /// so batteries and missile sites dominate the target list once known.
    pub default_target_factors: [f64; 6],
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategic_interval: 300,
            assignment_interval: 300,
            movement_interval: 7200,

            template_refire_interval: 7200,
            mission_delay: 1800,
            fighter_mission_limit: 5,
            starship_mission_limit: 1,
            fighter_replan_interval: 1,

            home_radius: 320e3,
            near_drift_min: 30e3,
            near_drift_max: 90e3,
            near_jitter: 10e3,
            far_drift_min: 80e3,
            far_drift_max: 120e3,
            far_jitter: 3e3,
            separation_distance: 150e3,
            separation_factor: 1.1,
            vertical_band: 20e3,
            vertical_damping: 0.1,
            heal_threshold_percent: 50.0,
            heal_factor: 0.9,

            default_target_factors: [1.0, 1.0, 1000.0, 1.0, 1.0, 1.0],
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.strategic_interval <= 0
            || self.assignment_interval <= 0
            || self.movement_interval <= 0
        {
            return Err(CampaignError::InvalidConfig(
                "planner intervals must be positive".into(),
            ));
        }

        if self.mission_delay <= 0 {
            return Err(CampaignError::InvalidConfig(format!(
                "mission_delay ({}) must be positive",
                self.mission_delay
            )));
        }

        if self.near_drift_min > self.near_drift_max || self.far_drift_min > self.far_drift_max {
            return Err(CampaignError::InvalidConfig(
                "drift ranges must have min <= max".into(),
            ));
        }

        if self.home_radius <= 0.0 || self.separation_distance <= 0.0 {
            return Err(CampaignError::InvalidConfig(
                "home_radius and separation_distance must be positive".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.heal_factor) {
            return Err(CampaignError::InvalidConfig(format!(
                "heal_factor ({}) must be within 0..=1",
                self.heal_factor
            )));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

static CONFIG: OnceLock<PlannerConfig> = OnceLock::new();

/// Get the global planner config (initializes with defaults if not set)
pub fn config() -> &'static PlannerConfig {
    CONFIG.get_or_init(PlannerConfig::default)
}

/// Set the global planner config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: PlannerConfig) -> std::result::Result<(), PlannerConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlannerConfig::from_toml_str("strategic_interval = 600\n").unwrap();
        assert_eq!(config.strategic_interval, 600);
        assert_eq!(config.movement_interval, 7200);
        assert_eq!(config.default_target_factors[2], 1000.0);
    }

    #[test]
    fn test_invalid_drift_range_rejected() {
        let result = PlannerConfig::from_toml_str("far_drift_min = 200000.0\nfar_drift_max = 1.0\n");
        assert!(matches!(result, Err(CampaignError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = PlannerConfig::from_toml_str("strategic_interval = \"soon\"");
        assert!(matches!(result, Err(CampaignError::Toml(_))));
    }
}
