//! The chemical beaker feeding the dosing cycle.
//!
//! A loaded beaker with zero volume is a valid state, distinct from having
//! no beaker at all: consuming from it fails instead of silently doing
//! nothing.

use serde::{Deserialize, Serialize};

use crate::error::PodError;

/// A labeled chemical container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservoir {
    label: Option<String>,
    volume: f32,
}

impl Reservoir {
    /// Build a beaker. Blank labels are stored as unlabeled.
    pub fn new(label: Option<String>, volume: f32) -> Result<Self, PodError> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(PodError::InvalidVolume(volume));
        }
        Ok(Self {
            label: label.filter(|l| !l.trim().is_empty()),
            volume,
        })
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_empty(&self) -> bool {
        self.volume <= 0.0
    }

    /// Remove `amount` units and return how much was taken. The amount must
    /// be positive and finite.
    pub fn consume_unit(&mut self, amount: f32) -> Result<f32, PodError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PodError::InvalidVolume(amount));
        }
        if self.volume < amount {
            return Err(PodError::InsufficientVolume {
                requested: amount,
                available: self.volume,
            });
        }
        self.volume = (self.volume - amount).max(0.0);
        Ok(amount)
    }
}

/// The pod's single beaker slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeakerSlot {
    beaker: Option<Reservoir>,
}

impl BeakerSlot {
    pub fn load(&mut self, beaker: Reservoir) -> Result<(), PodError> {
        if self.beaker.is_some() {
            return Err(PodError::AlreadyLoaded);
        }
        self.beaker = Some(beaker);
        Ok(())
    }

    pub fn eject(&mut self) -> Result<Reservoir, PodError> {
        self.beaker.take().ok_or(PodError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.beaker.is_some()
    }

    pub fn get(&self) -> Option<&Reservoir> {
        self.beaker.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Reservoir> {
        self.beaker.as_mut()
    }
}
