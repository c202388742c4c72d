// ember_status: status vocabulary and snapshots published by the print engine

pub mod codec;
pub mod config;
pub mod keys;
pub mod publisher;
pub mod sample;
pub mod state;
pub mod status;

pub use codec::CodecError;
pub use publisher::{JsonLineSink, PublishError, StatusPublisher, StatusSink};
pub use state::{PrinterState, StateChange, UiSubState};
pub use status::{PrinterStatus, StatusError};
