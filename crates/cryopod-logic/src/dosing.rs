//! Periodic dosing from the beaker.
//!
//! The cycle accumulates time only while every precondition holds (pod
//! powered, occupant present, beaker loaded). Any unmet precondition resets
//! the accumulated time, so a freshly reloaded beaker never doses at once.
//! When the cooldown completes, one dose is drawn from the beaker and the
//! cycle restarts whether or not the draw succeeded.

use serde::{Deserialize, Serialize};

use crate::occupant::{DamageKind, Occupant};
use crate::reservoir::Reservoir;

/// Damage healed per unit of chemical consumed, by subtype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoseEffect {
    pub oxy: f32,
    pub tox: f32,
    pub brute: f32,
    pub fire: f32,
}

impl Default for DoseEffect {
    fn default() -> Self {
        Self {
            oxy: 5.0,
            tox: 5.0,
            brute: 5.0,
            fire: 5.0,
        }
    }
}

impl DoseEffect {
    pub fn get(&self, kind: DamageKind) -> f32 {
        match kind {
            DamageKind::Oxy => self.oxy,
            DamageKind::Tox => self.tox,
            DamageKind::Brute => self.brute,
            DamageKind::Fire => self.fire,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosingSettings {
    /// Seconds between doses.
    pub cooldown_period: f32,
    /// Units drawn from the beaker per dose.
    pub units_per_dose: f32,
    pub dose_effect: DoseEffect,
}

impl Default for DosingSettings {
    fn default() -> Self {
        Self {
            cooldown_period: 10.0,
            units_per_dose: 1.0,
            dose_effect: DoseEffect::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DosingState {
    /// A precondition is unmet; no progress accumulates.
    Idle,
    /// Cooldown accumulating.
    Running,
}

/// Result of a completed cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DoseOutcome {
    /// Units were drawn and the occupant treated.
    Administered { units: f32 },
    /// The beaker could not cover a dose; nothing was applied.
    BeakerEmpty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosingCycle {
    settings: DosingSettings,
    elapsed: f32,
    state: DosingState,
}

impl DosingCycle {
    pub fn new(settings: DosingSettings) -> Self {
        Self {
            settings,
            elapsed: 0.0,
            state: DosingState::Idle,
        }
    }

    pub fn settings(&self) -> &DosingSettings {
        &self.settings
    }

    pub fn state(&self) -> DosingState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Cooldown progress as a percentage in `[0, 100]`.
    pub fn progress(&self) -> f32 {
        if self.settings.cooldown_period <= 0.0 {
            return 0.0;
        }
        (100.0 * self.elapsed / self.settings.cooldown_period).clamp(0.0, 100.0)
    }

    /// Drop accumulated progress and go idle.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.state = DosingState::Idle;
    }

    /// Advance the cycle by `dt` seconds. Returns an outcome only on the tick
    /// the cooldown completes.
    pub fn tick(
        &mut self,
        dt: f32,
        operating: bool,
        occupant: Option<&mut Occupant>,
        beaker: Option<&mut Reservoir>,
    ) -> Option<DoseOutcome> {
        let (occupant, beaker) = match (operating, occupant, beaker) {
            (true, Some(o), Some(b)) => (o, b),
            _ => {
                self.reset();
                return None;
            }
        };

        self.state = DosingState::Running;
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.settings.cooldown_period {
            return None;
        }

        self.elapsed = 0.0;
        match beaker.consume_unit(self.settings.units_per_dose) {
            Ok(units) => {
                self.administer(occupant, units);
                Some(DoseOutcome::Administered { units })
            }
            Err(_) => Some(DoseOutcome::BeakerEmpty),
        }
    }

    fn administer(&self, occupant: &mut Occupant, units: f32) {
        let effect = &self.settings.dose_effect;
        for kind in DamageKind::ALL {
            occupant.apply_damage(kind, -effect.get(kind) * units);
        }
    }
}
