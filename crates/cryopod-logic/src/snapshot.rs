//! Point-in-time copies of pod state for the display.
//!
//! Snapshots own all their data. Field names serialize in camelCase.

use serde::{Deserialize, Serialize};

use crate::occupant::{Occupant, DISPLAY_DAMAGE_CAP};
use crate::thermostat::TemperatureStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupantSnapshot {
    pub name: Option<String>,
    pub health: f32,
    pub max_health: f32,
    /// 0 = conscious, 1 = unconscious, 2 = dead.
    pub stat: u8,
    pub body_temperature: f32,
    pub oxy_loss: f32,
    pub tox_loss: f32,
    pub brute_loss: f32,
    pub fire_loss: f32,
}

impl From<&Occupant> for OccupantSnapshot {
    fn from(occupant: &Occupant) -> Self {
        let damage = occupant.damage();
        let cap = |v: f32| v.min(DISPLAY_DAMAGE_CAP);
        Self {
            name: occupant.name().map(str::to_owned),
            health: occupant.health(),
            max_health: occupant.max_health(),
            stat: occupant.status().stat_code(),
            body_temperature: occupant.body_temperature(),
            oxy_loss: cap(damage.oxy),
            tox_loss: cap(damage.tox),
            brute_loss: cap(damage.brute),
            fire_loss: cap(damage.fire),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSnapshot {
    pub is_operating: bool,
    pub has_occupant: bool,
    pub occupant: Option<OccupantSnapshot>,
    pub cell_temperature: f32,
    pub cell_temperature_status: TemperatureStatus,
    pub is_beaker_loaded: bool,
    /// `None` when no beaker is loaded or the beaker is unlabeled.
    pub beaker_label: Option<String>,
    /// Zero when no beaker is loaded.
    pub beaker_volume: f32,
    pub cooldown_progress: f32,
    pub auto_eject_healthy: bool,
    pub auto_eject_dead: bool,
}
