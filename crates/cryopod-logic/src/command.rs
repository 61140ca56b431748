//! Operator commands.
//!
//! Commands arrive either as bare action names from the display
//! (`"switchOn"`, `"auto_eject_dead_off"`, ...) or as JSON objects tagged by
//! `action`, which is the only way to express commands with arguments:
//!
//! ```
//! use cryopod_logic::command::PodCommand;
//!
//! let cmd: PodCommand = "auto_eject_healthy_on".parse().unwrap();
//! assert_eq!(cmd, PodCommand::SetAutoEjectHealthy { enabled: true });
//!
//! let cmd: PodCommand =
//!     serde_json::from_str(r#"{"action":"loadBeaker","label":"cryoxadone","volume":50}"#)
//!         .unwrap();
//! assert_eq!(
//!     cmd,
//!     PodCommand::LoadBeaker { label: Some("cryoxadone".into()), volume: 50.0 }
//! );
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PodError;
use crate::occupant::Occupant;
use crate::reservoir::Reservoir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PodCommand {
    SwitchOn,
    SwitchOff,
    EjectOccupant,
    EjectBeaker,
    SetAutoEjectHealthy { enabled: bool },
    SetAutoEjectDead { enabled: bool },
    LoadBeaker { label: Option<String>, volume: f32 },
}

impl PodCommand {
    /// Action name as sent by the display.
    pub fn action(&self) -> &'static str {
        match self {
            Self::SwitchOn => "switchOn",
            Self::SwitchOff => "switchOff",
            Self::EjectOccupant => "ejectOccupant",
            Self::EjectBeaker => "ejectBeaker",
            Self::SetAutoEjectHealthy { .. } => "setAutoEjectHealthy",
            Self::SetAutoEjectDead { .. } => "setAutoEjectDead",
            Self::LoadBeaker { .. } => "loadBeaker",
        }
    }
}

impl FromStr for PodCommand {
    type Err = PodError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        let cmd = match action.trim() {
            "switchOn" => Self::SwitchOn,
            "switchOff" => Self::SwitchOff,
            "ejectOccupant" => Self::EjectOccupant,
            "ejectBeaker" => Self::EjectBeaker,
            "auto_eject_healthy_on" => Self::SetAutoEjectHealthy { enabled: true },
            "auto_eject_healthy_off" => Self::SetAutoEjectHealthy { enabled: false },
            "auto_eject_dead_on" => Self::SetAutoEjectDead { enabled: true },
            "auto_eject_dead_off" => Self::SetAutoEjectDead { enabled: false },
            other => return Err(PodError::UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }
}

/// What a successfully dispatched command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// State changed (or was already as requested).
    Applied,
    OccupantEjected(Occupant),
    BeakerEjected(Reservoir),
}
