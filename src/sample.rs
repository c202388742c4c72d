//! Scripted status feed for a complete print, from power-on back to idle.
//!
//! Used to drive consumers (UI, network bridge) without printer hardware. The
//! order of states is fixed; nothing here decides transitions at runtime.

use crate::state::{PrinterState, UiSubState};
use crate::status::PrinterStatus;

#[derive(Debug, Clone)]
pub struct SampleJob {
    pub job_name: String,
    pub layers: u32,
    pub seconds_per_layer: u32,
    pub temperature: f32,
}

impl SampleJob {
    pub fn new(job_name: impl Into<String>, layers: u32) -> Self {
        Self {
            job_name: job_name.into(),
            layers,
            seconds_per_layer: 10,
            temperature: 25.0,
        }
    }

    fn progress(&self, state: PrinterStatus, layer: u32) -> PrinterStatus {
        let layers_left = self.layers.saturating_sub(layer);
        state
            .with_job_name(self.job_name.clone())
            .with_progress(layer, self.layers)
            .with_seconds_remaining(layers_left.saturating_mul(self.seconds_per_layer))
            .with_temperature(self.temperature)
    }
}

struct Feed<'a> {
    job: &'a SampleJob,
    current: Option<PrinterState>,
    layer: u32,
    out: Vec<PrinterStatus>,
}

impl Feed<'_> {
    fn stamp(&self, status: PrinterStatus) -> PrinterStatus {
        let printing = self.current.is_some_and(PrinterState::is_printing)
            || status.state.is_some_and(PrinterState::is_printing);
        if printing {
            self.job.progress(status, self.layer)
        } else {
            status.with_temperature(self.job.temperature)
        }
    }

    fn go(&mut self, next: PrinterState) {
        if let Some(current) = self.current {
            let leaving = self.stamp(PrinterStatus::leaving(current));
            self.out.push(leaving);
        }
        self.current = Some(next);
        let entering = self.stamp(PrinterStatus::entering(next));
        self.out.push(entering);
    }

    fn steady(&mut self, ui_sub_state: UiSubState) {
        if let Some(current) = self.current {
            let status = self.stamp(PrinterStatus::steady(current)).with_ui_sub_state(ui_sub_state);
            self.out.push(status);
        }
    }
}

pub fn print_job_feed(job: &SampleJob) -> Vec<PrinterStatus> {
    let mut feed = Feed {
        job,
        current: None,
        layer: 0,
        out: Vec::new(),
    };
    for state in [
        PrinterState::PrinterOn,
        PrinterState::Initializing,
        PrinterState::DoorClosed,
        PrinterState::Homing,
        PrinterState::Home,
        PrinterState::Idle,
    ] {
        feed.go(state);
    }
    feed.steady(UiSubState::Downloading);
    feed.steady(UiSubState::None);
    feed.go(PrinterState::PrintSetup);
    feed.go(PrinterState::MovingToStartPosition);
    feed.go(PrinterState::Printing);
    for layer in 1..=job.layers {
        feed.layer = layer;
        feed.go(PrinterState::Exposing);
        feed.go(PrinterState::Separating);
    }
    feed.go(PrinterState::EndingPrint);
    feed.go(PrinterState::Homing);
    feed.layer = 0;
    feed.go(PrinterState::Home);
    feed.go(PrinterState::Idle);
    feed.steady(UiSubState::None);
    feed.out
}
