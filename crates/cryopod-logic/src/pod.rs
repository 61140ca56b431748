//! The cryo pod controller.
//!
//! Owns every piece of device state and is the only thing that mutates it.
//! A tick runs in a fixed order: thermostat, dosing cycle, eject policy.
//! Commands apply immediately or fail without touching state.

use crate::command::{CommandOutcome, PodCommand};
use crate::config::{validate_config, ConfigError, PodConfig};
use crate::dosing::{DoseOutcome, DosingCycle, DosingState};
use crate::eject_policy::{EjectPolicy, EjectReason};
use crate::error::PodError;
use crate::occupant::{DamageKind, Occupant};
use crate::reservoir::{BeakerSlot, Reservoir};
use crate::snapshot::{OccupantSnapshot, PodSnapshot};
use crate::thermostat::{TemperatureStatus, Thermostat};

/// An occupant removed by the eject policy.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoEjection {
    pub reason: EjectReason,
    pub occupant: Occupant,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Set on the tick a dosing cooldown completed.
    pub dose: Option<DoseOutcome>,
    pub ejected: Option<AutoEjection>,
}

#[derive(Debug, Clone)]
pub struct CryoPod {
    config: PodConfig,
    is_operating: bool,
    thermostat: Thermostat,
    occupant: Option<Occupant>,
    beaker: BeakerSlot,
    dosing: DosingCycle,
    policy: EjectPolicy,
}

impl Default for CryoPod {
    fn default() -> Self {
        Self::build(PodConfig::default())
    }
}

impl CryoPod {
    /// A switched-off, empty pod with its cell at ambient temperature.
    pub fn new(config: PodConfig) -> Result<Self, Vec<ConfigError>> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self::build(config))
    }

    fn build(config: PodConfig) -> Self {
        Self {
            thermostat: Thermostat::new(config.thermostat),
            dosing: DosingCycle::new(config.dosing),
            policy: config.policy,
            is_operating: false,
            occupant: None,
            beaker: BeakerSlot::default(),
            config,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn config(&self) -> &PodConfig {
        &self.config
    }

    pub fn is_operating(&self) -> bool {
        self.is_operating
    }

    pub fn occupant(&self) -> Option<&Occupant> {
        self.occupant.as_ref()
    }

    pub fn beaker(&self) -> Option<&Reservoir> {
        self.beaker.get()
    }

    pub fn policy(&self) -> EjectPolicy {
        self.policy
    }

    pub fn cell_temperature(&self) -> f32 {
        self.thermostat.cell_temperature()
    }

    pub fn temperature_status(&self) -> TemperatureStatus {
        self.thermostat.status()
    }

    pub fn dosing_state(&self) -> DosingState {
        self.dosing.state()
    }

    pub fn cooldown_progress(&self) -> f32 {
        self.dosing.progress()
    }

    // ── Control loop ───────────────────────────────────────────────────

    /// Advance the pod by `dt` seconds. Negative or non-finite steps are
    /// treated as zero.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.thermostat.tick(self.is_operating, dt);
        if let Some(occupant) = self.occupant.as_mut() {
            let body = self
                .thermostat
                .exchange_body_heat(occupant.body_temperature(), dt);
            occupant.set_body_temperature(body);
        }

        let dose = self.dosing.tick(
            dt,
            self.is_operating,
            self.occupant.as_mut(),
            self.beaker.get_mut(),
        );
        match dose {
            Some(DoseOutcome::Administered { units }) => {
                log::debug!(
                    "Dose administered: {} units, {:.1} remaining",
                    units,
                    self.beaker.get().map_or(0.0, Reservoir::volume)
                );
            }
            Some(DoseOutcome::BeakerEmpty) => {
                log::warn!("Dosing skipped: beaker is empty");
            }
            None => {}
        }

        let ejected = self.enforce_policy();
        TickReport { dose, ejected }
    }

    /// Run the eject policy against the current occupant.
    fn enforce_policy(&mut self) -> Option<AutoEjection> {
        let reason = self.policy.evaluate(self.occupant.as_ref()?)?;
        let occupant = self.take_occupant()?;
        log::info!(
            "Auto-ejected {} ({:?})",
            occupant.name().unwrap_or("unknown occupant"),
            reason
        );
        Some(AutoEjection { reason, occupant })
    }

    fn take_occupant(&mut self) -> Option<Occupant> {
        let occupant = self.occupant.take();
        if occupant.is_some() {
            self.dosing.reset();
        }
        occupant
    }

    // ── Commands ───────────────────────────────────────────────────────

    pub fn switch_on(&mut self) {
        if !self.is_operating {
            self.is_operating = true;
            log::info!("Cryo pod switched on");
        }
    }

    pub fn switch_off(&mut self) {
        if self.is_operating {
            self.is_operating = false;
            self.dosing.reset();
            log::info!("Cryo pod switched off");
        }
    }

    pub fn set_auto_eject_healthy(&mut self, enabled: bool) {
        self.policy.auto_eject_healthy = enabled;
    }

    pub fn set_auto_eject_dead(&mut self, enabled: bool) {
        self.policy.auto_eject_dead = enabled;
    }

    /// Place an occupant in the pod. The occupant takes on the pod's
    /// configured limits, whatever it was built with.
    pub fn insert_occupant(&mut self, mut occupant: Occupant) -> Result<(), PodError> {
        if self.occupant.is_some() {
            return Err(PodError::AlreadyOccupied);
        }
        occupant.rebind_limits(self.config.occupant);
        log::info!(
            "Occupant inserted: {}",
            occupant.name().unwrap_or("unknown occupant")
        );
        self.occupant = Some(occupant);
        Ok(())
    }

    pub fn eject_occupant(&mut self) -> Result<Occupant, PodError> {
        let occupant = self.take_occupant().ok_or(PodError::NoOccupant)?;
        log::info!(
            "Occupant ejected: {}",
            occupant.name().unwrap_or("unknown occupant")
        );
        Ok(occupant)
    }

    pub fn load_beaker(&mut self, label: Option<String>, volume: f32) -> Result<(), PodError> {
        if self.beaker.is_loaded() {
            return Err(PodError::AlreadyLoaded);
        }
        let beaker = Reservoir::new(label, volume)?;
        log::info!(
            "Beaker loaded: {} ({} units)",
            beaker.label().unwrap_or("unlabeled"),
            beaker.volume()
        );
        self.beaker.load(beaker)
    }

    pub fn eject_beaker(&mut self) -> Result<Reservoir, PodError> {
        let beaker = self.beaker.eject()?;
        self.dosing.reset();
        log::info!(
            "Beaker ejected: {} ({} units)",
            beaker.label().unwrap_or("unlabeled"),
            beaker.volume()
        );
        Ok(beaker)
    }

    /// Apply a damage delta to the occupant, then re-check the eject policy
    /// at once instead of waiting for the next tick.
    pub fn apply_damage(
        &mut self,
        kind: DamageKind,
        delta: f32,
    ) -> Result<Option<AutoEjection>, PodError> {
        let occupant = self.occupant.as_mut().ok_or(PodError::NoOccupant)?;
        occupant.apply_damage(kind, delta);
        Ok(self.enforce_policy())
    }

    /// Single entry point for operator commands.
    pub fn dispatch(&mut self, command: PodCommand) -> Result<CommandOutcome, PodError> {
        log::debug!("Dispatching {}", command.action());
        let outcome = match command {
            PodCommand::SwitchOn => {
                self.switch_on();
                CommandOutcome::Applied
            }
            PodCommand::SwitchOff => {
                self.switch_off();
                CommandOutcome::Applied
            }
            PodCommand::EjectOccupant => CommandOutcome::OccupantEjected(self.eject_occupant()?),
            PodCommand::EjectBeaker => CommandOutcome::BeakerEjected(self.eject_beaker()?),
            PodCommand::SetAutoEjectHealthy { enabled } => {
                self.set_auto_eject_healthy(enabled);
                CommandOutcome::Applied
            }
            PodCommand::SetAutoEjectDead { enabled } => {
                self.set_auto_eject_dead(enabled);
                CommandOutcome::Applied
            }
            PodCommand::LoadBeaker { label, volume } => {
                self.load_beaker(label, volume)?;
                CommandOutcome::Applied
            }
        };
        Ok(outcome)
    }

    /// Owned copy of everything the display shows.
    pub fn snapshot(&self) -> PodSnapshot {
        let beaker = self.beaker.get();
        PodSnapshot {
            is_operating: self.is_operating,
            has_occupant: self.occupant.is_some(),
            occupant: self.occupant.as_ref().map(OccupantSnapshot::from),
            cell_temperature: self.thermostat.cell_temperature(),
            cell_temperature_status: self.thermostat.status(),
            is_beaker_loaded: beaker.is_some(),
            beaker_label: beaker.and_then(Reservoir::label).map(str::to_owned),
            beaker_volume: beaker.map_or(0.0, Reservoir::volume),
            cooldown_progress: self.dosing.progress(),
            auto_eject_healthy: self.policy.auto_eject_healthy,
            auto_eject_dead: self.policy.auto_eject_dead,
        }
    }
}
