//! Pod configuration and validation.
//!
//! Every tunable of the pod lives in [`PodConfig`]. Configs deserialize with
//! defaults for missing fields, so a partial JSON document is enough:
//!
//! ```
//! use cryopod_logic::config::{validate_config, PodConfig};
//!
//! let config: PodConfig =
//!     serde_json::from_str(r#"{ "dosing": { "cooldown_period": 5.0 } }"#).unwrap();
//! assert_eq!(config.dosing.cooldown_period, 5.0);
//! assert_eq!(config.dosing.units_per_dose, 1.0);
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dosing::DosingSettings;
use crate::eject_policy::EjectPolicy;
use crate::occupant::{DamageKind, OccupantLimits};
use crate::thermostat::ThermostatSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodConfig {
    pub thermostat: ThermostatSettings,
    pub occupant: OccupantLimits,
    pub dosing: DosingSettings,
    /// Auto-eject flags the pod starts with.
    pub policy: EjectPolicy,
}

/// A single problem found by [`validate_config`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be a finite temperature, got {1}")]
    NonFiniteTemperature(&'static str, f32),
    #[error("{0} must not be negative, got {1}")]
    NegativeRate(&'static str, f32),
    #[error("max health must be positive, got {0}")]
    NonPositiveMaxHealth(f32),
    #[error("death floor must be at or below zero, got {0}")]
    DeathFloorAboveZero(f32),
    #[error("unconscious threshold {0} must lie in [0, max health)")]
    InvalidUnconsciousThreshold(f32),
    #[error("healthy tolerance must not be negative, got {0}")]
    NegativeTolerance(f32),
    #[error("cooldown period must be positive, got {0}")]
    NonPositiveCooldown(f32),
    #[error("units per dose must be positive, got {0}")]
    NonPositiveDoseUnits(f32),
    #[error("dose effect for {0:?} must not be negative, got {1}")]
    NegativeDoseEffect(DamageKind, f32),
}

/// Validate a config. Returns every problem found; empty means valid.
pub fn validate_config(config: &PodConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let t = &config.thermostat;
    for (name, value) in [
        ("target temperature", t.target_temperature),
        ("ambient temperature", t.ambient_temperature),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::NonFiniteTemperature(name, value));
        }
    }
    for (name, value) in [
        ("cooling rate", t.cooling_rate),
        ("drift rate", t.drift_rate),
        ("optimal band", t.optimal_band),
        ("body exchange rate", t.body_exchange_rate),
    ] {
        // NaN fails the comparison, so test for the valid range
        if !(value >= 0.0) {
            errors.push(ConfigError::NegativeRate(name, value));
        }
    }

    let o = &config.occupant;
    if !(o.max_health > 0.0) {
        errors.push(ConfigError::NonPositiveMaxHealth(o.max_health));
    }
    if !(o.death_floor <= 0.0) {
        errors.push(ConfigError::DeathFloorAboveZero(o.death_floor));
    }
    if !(o.unconscious_threshold >= 0.0 && o.unconscious_threshold < o.max_health) {
        errors.push(ConfigError::InvalidUnconsciousThreshold(
            o.unconscious_threshold,
        ));
    }
    if !(o.healthy_tolerance >= 0.0) {
        errors.push(ConfigError::NegativeTolerance(o.healthy_tolerance));
    }

    let d = &config.dosing;
    if !(d.cooldown_period > 0.0) {
        errors.push(ConfigError::NonPositiveCooldown(d.cooldown_period));
    }
    if !(d.units_per_dose > 0.0) {
        errors.push(ConfigError::NonPositiveDoseUnits(d.units_per_dose));
    }
    for kind in DamageKind::ALL {
        let heal = d.dose_effect.get(kind);
        if !(heal >= 0.0) {
            errors.push(ConfigError::NegativeDoseEffect(kind, heal));
        }
    }

    errors
}
