//! Device logic for a cryo stasis pod.
//!
//! This crate contains the controller that sits behind the pod's display:
//! cell refrigeration, a chemical beaker, occupant vitals, periodic dosing,
//! and automatic ejection. It does no I/O and never blocks; ticks are driven
//! by the caller's loop and the display reads owned snapshots.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`command`] | Operator commands, action-name parsing, command outcomes |
//! | [`config`] | Pod tunables and validation |
//! | [`dosing`] | Cooldown-driven dosing cycle and per-unit healing |
//! | [`eject_policy`] | Auto-eject rules for healthy and dead occupants |
//! | [`error`] | Command and reservoir failures |
//! | [`occupant`] | Damage subtypes, derived health and consciousness |
//! | [`pod`] | The controller: tick order, commands, snapshots |
//! | [`reservoir`] | Beaker volume, labels, and the single beaker slot |
//! | [`shared`] | Mutex-serialized handle for multi-threaded hosts |
//! | [`snapshot`] | Display-facing copies of pod state |
//! | [`thermostat`] | Cell temperature approach and status banding |
//!
//! ```
//! use cryopod_logic::occupant::{DamageKind, Occupant};
//! use cryopod_logic::pod::CryoPod;
//!
//! let mut pod = CryoPod::default();
//! let limits = pod.config().occupant;
//! pod.insert_occupant(Occupant::new(Some("Ripley".into()), limits)).unwrap();
//! pod.apply_damage(DamageKind::Fire, 20.0).unwrap();
//! pod.load_beaker(Some("cryoxadone".into()), 5.0).unwrap();
//! pod.switch_on();
//!
//! pod.tick(10.0);
//! let snap = pod.snapshot();
//! assert_eq!(snap.beaker_volume, 4.0);
//! assert_eq!(snap.occupant.unwrap().fire_loss, 15.0);
//! ```

pub mod command;
pub mod config;
pub mod dosing;
pub mod eject_policy;
pub mod error;
pub mod occupant;
pub mod pod;
pub mod reservoir;
pub mod shared;
pub mod snapshot;
pub mod thermostat;

