//! Occupant physiology: damage subtypes, aggregate health and consciousness.
//!
//! Health is never stored. It is recomputed from the four damage subtypes as
//! `max_health - total_damage`, clamped to `[death_floor, max_health]`, and
//! the consciousness status is banded from that value.

use serde::{Deserialize, Serialize};

/// Default body temperature of a newly inserted occupant, in Kelvin.
pub const NORMAL_BODY_TEMPERATURE: f32 = 310.15;

/// Damage values above this are shown as this value on the display.
pub const DISPLAY_DAMAGE_CAP: f32 = 100.0;

/// The four tracked damage subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageKind {
    /// Suffocation.
    Oxy,
    /// Poisoning.
    Tox,
    /// Physical trauma.
    Brute,
    /// Burns.
    Fire,
}

impl DamageKind {
    pub const ALL: [DamageKind; 4] = [Self::Oxy, Self::Tox, Self::Brute, Self::Fire];
}

/// Consciousness, derived from health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsciousnessStatus {
    Conscious,
    Unconscious,
    Dead,
}

impl ConsciousnessStatus {
    /// Band a health value. `health <= 0` is dead regardless of the floor.
    pub fn from_health(health: f32, unconscious_threshold: f32) -> Self {
        if health <= 0.0 {
            Self::Dead
        } else if health <= unconscious_threshold {
            Self::Unconscious
        } else {
            Self::Conscious
        }
    }

    /// Numeric status code used by the display (0, 1, 2).
    pub fn stat_code(self) -> u8 {
        match self {
            Self::Conscious => 0,
            Self::Unconscious => 1,
            Self::Dead => 2,
        }
    }
}

/// Physiological limits shared by every occupant of a pod.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupantLimits {
    pub max_health: f32,
    /// Lowest value health is clamped to.
    pub death_floor: f32,
    /// Health at or below this (but above zero) is unconscious.
    pub unconscious_threshold: f32,
    /// Subtypes at or below this count as healed.
    pub healthy_tolerance: f32,
}

impl Default for OccupantLimits {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            death_floor: -100.0,
            unconscious_threshold: 20.0,
            healthy_tolerance: 0.5,
        }
    }
}

/// Accumulated damage per subtype. Each value is non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    pub oxy: f32,
    pub tox: f32,
    pub brute: f32,
    pub fire: f32,
}

impl Damage {
    pub fn get(&self, kind: DamageKind) -> f32 {
        match kind {
            DamageKind::Oxy => self.oxy,
            DamageKind::Tox => self.tox,
            DamageKind::Brute => self.brute,
            DamageKind::Fire => self.fire,
        }
    }

    fn slot_mut(&mut self, kind: DamageKind) -> &mut f32 {
        match kind {
            DamageKind::Oxy => &mut self.oxy,
            DamageKind::Tox => &mut self.tox,
            DamageKind::Brute => &mut self.brute,
            DamageKind::Fire => &mut self.fire,
        }
    }

    pub fn total(&self) -> f32 {
        self.oxy + self.tox + self.brute + self.fire
    }
}

/// The entity inside the pod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    name: Option<String>,
    limits: OccupantLimits,
    damage: Damage,
    body_temperature: f32,
}

impl Occupant {
    /// An undamaged occupant at normal body temperature.
    pub fn new(name: Option<String>, limits: OccupantLimits) -> Self {
        Self {
            name: name.filter(|n| !n.trim().is_empty()),
            limits,
            damage: Damage::default(),
            body_temperature: NORMAL_BODY_TEMPERATURE,
        }
    }

    /// An occupant arriving with existing injuries.
    pub fn with_damage(name: Option<String>, limits: OccupantLimits, damage: Damage) -> Self {
        let mut occupant = Self::new(name, limits);
        for kind in DamageKind::ALL {
            occupant.apply_damage(kind, damage.get(kind));
        }
        occupant
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn limits(&self) -> &OccupantLimits {
        &self.limits
    }

    /// Adopt the limits of the pod the occupant is placed in.
    pub(crate) fn rebind_limits(&mut self, limits: OccupantLimits) {
        self.limits = limits;
    }

    pub fn damage(&self) -> &Damage {
        &self.damage
    }

    pub fn max_health(&self) -> f32 {
        self.limits.max_health
    }

    pub fn body_temperature(&self) -> f32 {
        self.body_temperature
    }

    pub fn set_body_temperature(&mut self, kelvin: f32) {
        if kelvin.is_finite() {
            self.body_temperature = kelvin.max(0.0);
        }
    }

    /// Aggregate health, clamped to `[death_floor, max_health]`.
    ///
    /// The ceiling wins if the limits are inverted.
    pub fn health(&self) -> f32 {
        (self.limits.max_health - self.damage.total())
            .max(self.limits.death_floor)
            .min(self.limits.max_health)
    }

    pub fn status(&self) -> ConsciousnessStatus {
        ConsciousnessStatus::from_health(self.health(), self.limits.unconscious_threshold)
    }

    /// Add `delta` to one subtype. Negative deltas heal; the subtype never
    /// drops below zero. Non-finite deltas are ignored.
    pub fn apply_damage(&mut self, kind: DamageKind, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let slot = self.damage.slot_mut(kind);
        *slot = (*slot + delta).max(0.0);
    }

    /// Every subtype healed and the occupant awake.
    pub fn is_healthy(&self) -> bool {
        DamageKind::ALL
            .iter()
            .all(|&k| self.damage.get(k) <= self.limits.healthy_tolerance)
            && self.status() == ConsciousnessStatus::Conscious
    }

    pub fn is_dead(&self) -> bool {
        self.status() == ConsciousnessStatus::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupant() -> Occupant {
        Occupant::new(Some("Test Subject".into()), OccupantLimits::default())
    }

    #[test]
    fn new_occupant_is_healthy() {
        let o = occupant();
        assert_eq!(o.health(), 100.0);
        assert_eq!(o.status(), ConsciousnessStatus::Conscious);
        assert!(o.is_healthy());
        assert!(!o.is_dead());
        assert_eq!(o.body_temperature(), NORMAL_BODY_TEMPERATURE);
    }

    #[test]
    fn blank_name_is_unnamed() {
        let o = Occupant::new(Some("   ".into()), OccupantLimits::default());
        assert_eq!(o.name(), None);
    }

    #[test]
    fn damage_reduces_health() {
        let mut o = occupant();
        o.apply_damage(DamageKind::Brute, 30.0);
        o.apply_damage(DamageKind::Fire, 10.0);
        assert_eq!(o.health(), 60.0);
        assert!(!o.is_healthy());
    }

    #[test]
    fn healing_never_goes_below_zero() {
        let mut o = occupant();
        o.apply_damage(DamageKind::Tox, 5.0);
        o.apply_damage(DamageKind::Tox, -50.0);
        assert_eq!(o.damage().tox, 0.0);
        assert_eq!(o.health(), 100.0);
    }

    #[test]
    fn status_bands() {
        let mut o = occupant();
        o.apply_damage(DamageKind::Oxy, 80.0);
        assert_eq!(o.health(), 20.0);
        assert_eq!(o.status(), ConsciousnessStatus::Unconscious);

        o.apply_damage(DamageKind::Oxy, 20.0);
        assert_eq!(o.health(), 0.0);
        assert_eq!(o.status(), ConsciousnessStatus::Dead);
        assert!(o.is_dead());
    }

    #[test]
    fn health_clamped_to_death_floor() {
        let mut o = occupant();
        o.apply_damage(DamageKind::Brute, 500.0);
        assert_eq!(o.health(), -100.0);
        // Internal damage is not capped
        assert_eq!(o.damage().brute, 500.0);
    }

    #[test]
    fn revived_by_healing() {
        let mut o = occupant();
        o.apply_damage(DamageKind::Fire, 150.0);
        assert!(o.is_dead());
        o.apply_damage(DamageKind::Fire, -120.0);
        assert_eq!(o.health(), 70.0);
        assert_eq!(o.status(), ConsciousnessStatus::Conscious);
    }

    #[test]
    fn tolerance_counts_as_healed() {
        let mut o = occupant();
        o.apply_damage(DamageKind::Brute, 0.4);
        assert!(o.is_healthy());
        o.apply_damage(DamageKind::Brute, 0.2);
        assert!(!o.is_healthy());
    }

    #[test]
    fn unconscious_occupant_is_not_healthy() {
        let limits = OccupantLimits {
            unconscious_threshold: 99.8,
            ..Default::default()
        };
        let mut o = Occupant::new(None, limits);
        o.apply_damage(DamageKind::Oxy, 0.3);
        assert_eq!(o.status(), ConsciousnessStatus::Unconscious);
        assert!(!o.is_healthy());
    }

    #[test]
    fn with_damage_sets_subtypes() {
        let o = Occupant::with_damage(
            None,
            OccupantLimits::default(),
            Damage {
                oxy: 10.0,
                tox: -3.0,
                brute: 5.0,
                fire: 0.0,
            },
        );
        assert_eq!(o.damage().oxy, 10.0);
        assert_eq!(o.damage().tox, 0.0);
        assert_eq!(o.health(), 85.0);
    }

    #[test]
    fn non_finite_delta_ignored() {
        let mut o = occupant();
        o.apply_damage(DamageKind::Oxy, f32::NAN);
        o.apply_damage(DamageKind::Oxy, f32::INFINITY);
        assert_eq!(o.health(), 100.0);
    }

    #[test]
    fn inverted_limits_do_not_panic() {
        let limits = OccupantLimits {
            max_health: 5.0,
            death_floor: 10.0,
            ..Default::default()
        };
        let o = Occupant::new(None, limits);
        assert_eq!(o.health(), 5.0);
    }

    #[test]
    fn stat_codes_match_display_order() {
        assert_eq!(ConsciousnessStatus::Conscious.stat_code(), 0);
        assert_eq!(ConsciousnessStatus::Unconscious.stat_code(), 1);
        assert_eq!(ConsciousnessStatus::Dead.stat_code(), 2);
    }
}
