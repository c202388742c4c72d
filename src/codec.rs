//! JSON wire format for status snapshots.
//!
//! Each snapshot travels wrapped in a single-key envelope:
//!
//! ```json
//! {"PrinterStatus":{"State":"Printing","Change":"NoChange","IsError":false,"ErrorCode":0,"Error":"","TotalLayers":100,"Layer":37,"SecondsLeft":1800,"JobName":"part_A","Temperature":92.5,"UISubState":""}}
//! ```
//!
//! On a pipe or socket, snapshots are framed one per line.

use crate::status::{PrinterStatus, StatusError};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing \"PrinterStatus\" envelope")]
    MissingEnvelope,
    #[error("Invalid status: {0}")]
    Invalid(#[from] StatusError),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    #[serde(rename = "PrinterStatus")]
    status: &'a PrinterStatus,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "PrinterStatus")]
    status: Option<PrinterStatus>,
}

/// JSON has no NaN or infinity, so a snapshot carrying one is refused here
/// rather than written as `null`.
pub fn encode(status: &PrinterStatus) -> Result<String, CodecError> {
    if !status.temperature.is_finite() {
        return Err(StatusError::NonFiniteTemperature(status.temperature).into());
    }
    Ok(serde_json::to_string(&EnvelopeRef { status })?)
}

pub fn encode_line(status: &PrinterStatus) -> Result<String, CodecError> {
    let mut line = encode(status)?;
    line.push('\n');
    Ok(line)
}

pub fn decode(input: &str) -> Result<PrinterStatus, CodecError> {
    let envelope: Envelope = serde_json::from_str(input)?;
    envelope.status.ok_or(CodecError::MissingEnvelope)
}

/// Decodes and validates one snapshot.
pub fn decode_valid(input: &str) -> Result<PrinterStatus, CodecError> {
    let status = decode(input)?;
    status.validate()?;
    Ok(status)
}

/// Reads newline-framed snapshots, one result per non-blank line.
pub fn decode_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<PrinterStatus, CodecError>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(decode(&line)),
        Err(e) => Some(Err(CodecError::Io(e))),
    })
}
