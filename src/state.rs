//! State-name vocabulary published by the print engine.
//!
//! The names are part of the wire contract: UI and network consumers match on
//! the exact strings, so `as_str` and `FromStr` must stay in lockstep.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateParseError {
    #[error("unknown printer state: {0:?}")]
    UnknownState(String),
}

/// Print engine state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrinterState {
    PrinterOn,
    DoorClosed,
    Initializing,
    DoorOpen,
    Homing,
    Home,
    Idle,
    PrintSetup,
    MovingToStartPosition,
    Exposing,
    Printing,
    Paused,
    Separating,
    EndingPrint,
}

impl PrinterState {
    pub const ALL: [PrinterState; 14] = [
        PrinterState::PrinterOn,
        PrinterState::DoorClosed,
        PrinterState::Initializing,
        PrinterState::DoorOpen,
        PrinterState::Homing,
        PrinterState::Home,
        PrinterState::Idle,
        PrinterState::PrintSetup,
        PrinterState::MovingToStartPosition,
        PrinterState::Exposing,
        PrinterState::Printing,
        PrinterState::Paused,
        PrinterState::Separating,
        PrinterState::EndingPrint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrinterState::PrinterOn => "PrinterOn",
            PrinterState::DoorClosed => "DoorClosed",
            PrinterState::Initializing => "Initializing",
            PrinterState::DoorOpen => "DoorOpen",
            PrinterState::Homing => "Homing",
            PrinterState::Home => "Home",
            PrinterState::Idle => "Idle",
            PrinterState::PrintSetup => "PrintSetup",
            PrinterState::MovingToStartPosition => "MovingToStartPosition",
            PrinterState::Exposing => "Exposing",
            PrinterState::Printing => "Printing",
            PrinterState::Paused => "Paused",
            PrinterState::Separating => "Separating",
            PrinterState::EndingPrint => "EndingPrint",
        }
    }

    /// States in which layer progress fields are expected to be populated.
    pub fn is_printing(self) -> bool {
        matches!(
            self,
            PrinterState::PrintSetup
                | PrinterState::MovingToStartPosition
                | PrinterState::Exposing
                | PrinterState::Printing
                | PrinterState::Paused
                | PrinterState::Separating
                | PrinterState::EndingPrint
        )
    }
}

impl fmt::Display for PrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrinterState {
    type Err = StateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrinterState::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| StateParseError::UnknownState(s.to_string()))
    }
}

impl Serialize for PrinterState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PrinterState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<PrinterState>` where `None` travels as the empty label.
pub(crate) mod state_label {
    use super::PrinterState;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        state: &Option<PrinterState>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(state.map(PrinterState::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PrinterState>, D::Error> {
        let label = String::deserialize(deserializer)?;
        if label.is_empty() {
            return Ok(None);
        }
        label.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// Whether a reported state is steady or part of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StateChange {
    #[default]
    NoChange,
    Entering,
    Leaving,
}

impl StateChange {
    pub fn as_str(self) -> &'static str {
        match self {
            StateChange::NoChange => "NoChange",
            StateChange::Entering => "Entering",
            StateChange::Leaving => "Leaving",
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const UISUBSTATE_DOWNLOADING: &str = "Downloading";

/// Auxiliary UI hint. Labels this crate does not know yet are carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum UiSubState {
    #[default]
    None,
    Downloading,
    Other(String),
}

impl UiSubState {
    pub fn as_str(&self) -> &str {
        match self {
            UiSubState::None => "",
            UiSubState::Downloading => UISUBSTATE_DOWNLOADING,
            UiSubState::Other(label) => label,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, UiSubState::None)
    }
}

impl From<&str> for UiSubState {
    fn from(label: &str) -> Self {
        match label {
            "" => UiSubState::None,
            UISUBSTATE_DOWNLOADING => UiSubState::Downloading,
            other => UiSubState::Other(other.to_string()),
        }
    }
}

impl From<String> for UiSubState {
    fn from(label: String) -> Self {
        match label.as_str() {
            "" => UiSubState::None,
            UISUBSTATE_DOWNLOADING => UiSubState::Downloading,
            _ => UiSubState::Other(label),
        }
    }
}

impl fmt::Display for UiSubState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UiSubState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UiSubState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(UiSubState::from(String::deserialize(deserializer)?))
    }
}
