//! Point-in-time printer status snapshot.

use crate::state::{PrinterState, StateChange, UiSubState, state_label};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatusError {
    #[error("Layer {current} is beyond the job's {total} layers")]
    LayerOutOfRange { current: u32, total: u32 },
    #[error("Temperature is not a finite number: {0}")]
    NonFiniteTemperature(f32),
    #[error("Error details set without an active error (code {code}, message {message:?})")]
    StrayErrorDetails { code: i32, message: String },
}

/// One status report from the print engine.
///
/// A snapshot is built, handed to consumers, and never changed afterwards;
/// the next report is a new value. A `Leaving` snapshot names the state being
/// departed and an `Entering` snapshot names the state being entered, so a
/// transition is reported as `Leaving(old)` followed by `Entering(new)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterStatus {
    /// `None` is the empty label of a snapshot that has not been assigned a state.
    #[serde(rename = "State", with = "state_label")]
    pub state: Option<PrinterState>,
    #[serde(rename = "Change")]
    pub change: StateChange,
    #[serde(rename = "IsError")]
    pub is_error: bool,
    /// Only meaningful while `is_error` is set.
    #[serde(rename = "ErrorCode")]
    pub error_code: i32,
    #[serde(rename = "Error")]
    pub error_message: String,
    #[serde(rename = "TotalLayers")]
    pub num_layers: u32,
    #[serde(rename = "Layer")]
    pub current_layer: u32,
    #[serde(rename = "SecondsLeft")]
    pub estimated_seconds_remaining: u32,
    #[serde(rename = "JobName")]
    pub job_name: String,
    #[serde(rename = "Temperature")]
    pub temperature: f32,
    #[serde(rename = "UISubState")]
    pub ui_sub_state: UiSubState,
}

impl PrinterStatus {
    pub fn steady(state: PrinterState) -> Self {
        Self::with_change(state, StateChange::NoChange)
    }

    pub fn entering(state: PrinterState) -> Self {
        Self::with_change(state, StateChange::Entering)
    }

    pub fn leaving(state: PrinterState) -> Self {
        Self::with_change(state, StateChange::Leaving)
    }

    fn with_change(state: PrinterState, change: StateChange) -> Self {
        Self {
            state: Some(state),
            change,
            ..Default::default()
        }
    }

    pub fn with_error(mut self, code: i32, message: impl Into<String>) -> Self {
        self.is_error = true;
        self.error_code = code;
        self.error_message = message.into();
        self
    }

    pub fn with_progress(mut self, current_layer: u32, num_layers: u32) -> Self {
        self.current_layer = current_layer;
        self.num_layers = num_layers;
        self
    }

    pub fn with_seconds_remaining(mut self, seconds: u32) -> Self {
        self.estimated_seconds_remaining = seconds;
        self
    }

    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = job_name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_ui_sub_state(mut self, ui_sub_state: impl Into<UiSubState>) -> Self {
        self.ui_sub_state = ui_sub_state.into();
        self
    }

    pub fn is_transition(&self) -> bool {
        self.change != StateChange::NoChange
    }

    /// Label of `state`, empty when unset.
    pub fn state_label(&self) -> &'static str {
        self.state.map(PrinterState::as_str).unwrap_or("")
    }

    /// Checks the conventions producers must follow before publishing.
    /// Error details without an active error are logged, not rejected.
    pub fn validate(&self) -> Result<(), StatusError> {
        self.check_values()?;
        if let Err(e) = self.check_error_details() {
            tracing::warn!(state = self.state_label(), "{}", e);
        }
        Ok(())
    }

    /// Like `validate`, but error details without an active error are rejected.
    pub fn validate_strict(&self) -> Result<(), StatusError> {
        self.check_values()?;
        self.check_error_details()
    }

    fn check_values(&self) -> Result<(), StatusError> {
        if self.num_layers > 0 && self.current_layer > self.num_layers {
            return Err(StatusError::LayerOutOfRange {
                current: self.current_layer,
                total: self.num_layers,
            });
        }
        if !self.temperature.is_finite() {
            return Err(StatusError::NonFiniteTemperature(self.temperature));
        }
        Ok(())
    }

    fn check_error_details(&self) -> Result<(), StatusError> {
        if !self.is_error && (self.error_code != 0 || !self.error_message.is_empty()) {
            return Err(StatusError::StrayErrorDetails {
                code: self.error_code,
                message: self.error_message.clone(),
            });
        }
        Ok(())
    }
}
