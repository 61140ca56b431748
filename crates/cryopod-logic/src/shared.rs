//! Thread-safe pod handle.
//!
//! Every call takes the lock exactly once, so a tick never interleaves with
//! a command and a snapshot always sees a settled pod.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::command::{CommandOutcome, PodCommand};
use crate::error::PodError;
use crate::occupant::{DamageKind, Occupant};
use crate::pod::{AutoEjection, CryoPod, TickReport};
use crate::snapshot::PodSnapshot;

/// Cloneable handle to one pod shared between a control loop and readers.
#[derive(Debug, Clone, Default)]
pub struct SharedPod {
    inner: Arc<Mutex<CryoPod>>,
}

impl SharedPod {
    pub fn new(pod: CryoPod) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pod)),
        }
    }

    // Mutations complete or return before changing state, so a poisoned
    // lock still guards a consistent pod.
    fn lock(&self) -> MutexGuard<'_, CryoPod> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tick(&self, dt: f32) -> TickReport {
        self.lock().tick(dt)
    }

    pub fn dispatch(&self, command: PodCommand) -> Result<CommandOutcome, PodError> {
        self.lock().dispatch(command)
    }

    pub fn insert_occupant(&self, occupant: Occupant) -> Result<(), PodError> {
        self.lock().insert_occupant(occupant)
    }

    pub fn apply_damage(
        &self,
        kind: DamageKind,
        delta: f32,
    ) -> Result<Option<AutoEjection>, PodError> {
        self.lock().apply_damage(kind, delta)
    }

    pub fn snapshot(&self) -> PodSnapshot {
        self.lock().snapshot()
    }

    /// Run several operations under one lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut CryoPod) -> R) -> R {
        f(&mut self.lock())
    }
}
