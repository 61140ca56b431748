//! Automatic ejection rules.

use serde::{Deserialize, Serialize};

use crate::occupant::Occupant;

/// Why an occupant was ejected automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EjectReason {
    Healthy,
    Dead,
}

/// Operator-controlled auto-eject flags. Both may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EjectPolicy {
    pub auto_eject_healthy: bool,
    pub auto_eject_dead: bool,
}

impl EjectPolicy {
    /// Decide whether `occupant` should leave the pod. At most one reason is
    /// returned; death is checked first.
    pub fn evaluate(&self, occupant: &Occupant) -> Option<EjectReason> {
        if self.auto_eject_dead && occupant.is_dead() {
            Some(EjectReason::Dead)
        } else if self.auto_eject_healthy && occupant.is_healthy() {
            Some(EjectReason::Healthy)
        } else {
            None
        }
    }
}
