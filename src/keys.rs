//! Key names used when a `PrinterStatus` is encoded.

pub const PRINTER_STATUS_KEY: &str = "PrinterStatus";
pub const STATE_PS_KEY: &str = "State";
pub const CHANGE_PS_KEY: &str = "Change";
pub const IS_ERROR_PS_KEY: &str = "IsError";
pub const ERROR_CODE_PS_KEY: &str = "ErrorCode";
pub const ERROR_PS_KEY: &str = "Error";
pub const LAYER_PS_KEY: &str = "Layer";
pub const TOTAL_LAYERS_PS_KEY: &str = "TotalLayers";
pub const SECONDS_LEFT_PS_KEY: &str = "SecondsLeft";
pub const JOB_NAME_PS_KEY: &str = "JobName";
pub const TEMPERATURE_PS_KEY: &str = "Temperature";
pub const UISUBSTATE_PS_KEY: &str = "UISubState";

/// Field keys inside the `PrinterStatus` object, in encoding order.
pub const ALL_FIELD_KEYS: [&str; 11] = [
    STATE_PS_KEY,
    CHANGE_PS_KEY,
    IS_ERROR_PS_KEY,
    ERROR_CODE_PS_KEY,
    ERROR_PS_KEY,
    TOTAL_LAYERS_PS_KEY,
    LAYER_PS_KEY,
    SECONDS_LEFT_PS_KEY,
    JOB_NAME_PS_KEY,
    TEMPERATURE_PS_KEY,
    UISUBSTATE_PS_KEY,
];
