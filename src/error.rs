//! Error types shared across the crate
//!
//! Every failure here is a deterministic input problem (bad patch, bad
//! config, missing port), so nothing is retried automatically.

use std::fmt;

use crate::validate::ValidationResult;

/// Crate-wide error type
#[derive(Debug)]
pub enum Error {
    /// Patch failed schema validation; carries every collected violation
    Invalid(ValidationResult),
    /// Macro map references a parameter path absent from the document
    MissingParameter(String),
    /// No MIDI output port matches the requested name
    PortNotFound(String),
    /// Malformed generator or macro map configuration
    Config(String),
    /// MIDI backend failure (init, connect, send)
    Midi(String),
    /// IO error
    Io(std::io::Error),
    /// JSON parse or serialize error
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Invalid(result) => {
                writeln!(f, "patch failed validation:")?;
                for violation in &result.violations {
                    writeln!(f, "  {}: {}", violation.path, violation.reason)?;
                }
                Ok(())
            }
            Error::MissingParameter(msg) => write!(f, "missing parameter: {}", msg),
            Error::PortNotFound(name) => write!(f, "MIDI output port not found: {}", name),
            Error::Config(msg) => write!(f, "config error: {}", msg),
            Error::Midi(msg) => write!(f, "MIDI error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
