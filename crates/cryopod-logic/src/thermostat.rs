//! Cell temperature regulation.
//!
//! While the pod is powered the cell is driven toward the target temperature
//! with an exponential approach. Unpowered, it drifts back toward ambient at
//! a slower rate. The occupant's body temperature relaxes toward the cell in
//! the same step.

use serde::{Deserialize, Serialize};

/// Tunables for the cell refrigeration loop. Temperatures are Kelvin, rates
/// are per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatSettings {
    /// Setpoint while operating.
    pub target_temperature: f32,
    /// Temperature the cell drifts to when switched off.
    pub ambient_temperature: f32,
    /// Exponential approach rate toward the target while operating.
    pub cooling_rate: f32,
    /// Exponential drift rate toward ambient while switched off.
    pub drift_rate: f32,
    /// Half-width of the band around the target reported as optimal.
    pub optimal_band: f32,
    /// Rate at which an occupant's body temperature follows the cell.
    pub body_exchange_rate: f32,
}

impl Default for ThermostatSettings {
    fn default() -> Self {
        Self {
            target_temperature: 73.15,
            ambient_temperature: 293.15,
            cooling_rate: 0.1,
            drift_rate: 0.02,
            optimal_band: 5.0,
            body_exchange_rate: 0.05,
        }
    }
}

/// Qualitative cell temperature, relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureStatus {
    /// Within the optimal band.
    Optimal,
    /// Above the band.
    Warm,
    /// Below the band.
    Cold,
}

impl TemperatureStatus {
    /// Band a temperature relative to `target` with half-width `band`.
    pub fn classify(temperature: f32, target: f32, band: f32) -> Self {
        let deviation = temperature - target;
        if deviation > band {
            Self::Warm
        } else if deviation < -band {
            Self::Cold
        } else {
            Self::Optimal
        }
    }
}

/// Move `current` toward `target` by the fraction `1 - e^(-rate*dt)`.
///
/// The result always lies between `current` and `target`, so repeated
/// calls approach monotonically and never overshoot.
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return current;
    }
    let fraction = 1.0 - (-rate * dt).exp();
    if fraction >= 1.0 {
        return target;
    }
    let next = current + (target - current) * fraction;
    next.clamp(current.min(target), current.max(target))
}

/// Cell temperature state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thermostat {
    settings: ThermostatSettings,
    cell_temperature: f32,
}

impl Thermostat {
    /// A cell at ambient temperature.
    pub fn new(settings: ThermostatSettings) -> Self {
        Self {
            settings,
            cell_temperature: settings.ambient_temperature,
        }
    }

    pub fn settings(&self) -> &ThermostatSettings {
        &self.settings
    }

    pub fn cell_temperature(&self) -> f32 {
        self.cell_temperature
    }

    pub fn target_temperature(&self) -> f32 {
        self.settings.target_temperature
    }

    /// Current status, recomputed from the cell temperature on every call.
    pub fn status(&self) -> TemperatureStatus {
        TemperatureStatus::classify(
            self.cell_temperature,
            self.settings.target_temperature,
            self.settings.optimal_band,
        )
    }

    /// Advance the cell by `dt` seconds.
    pub fn tick(&mut self, operating: bool, dt: f32) {
        let (goal, rate) = if operating {
            (self.settings.target_temperature, self.settings.cooling_rate)
        } else {
            (self.settings.ambient_temperature, self.settings.drift_rate)
        };
        self.cell_temperature = approach(self.cell_temperature, goal, rate, dt);
    }

    /// Relax a body temperature toward the cell for `dt` seconds.
    pub fn exchange_body_heat(&self, body_temperature: f32, dt: f32) -> f32 {
        approach(
            body_temperature,
            self.cell_temperature,
            self.settings.body_exchange_rate,
            dt,
        )
    }
}
