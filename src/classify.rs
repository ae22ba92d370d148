//! Response decoding and error classification.
//!
//! The Quantum API reports failures inside ordinary JSON bodies, so a body
//! is only data once it has been checked for the known error shapes.

use serde_json::{Map, Number, Value};

use crate::envelope::Envelope;
use crate::error::{QuantumError, Result};

const AUTHENTICATION_CODE: &str = "authentication";
const HANDLER_NOT_FOUND: &str = "Handler not found";
const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// How numeric literals in response bodies are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberMode {
    /// Keep every number exactly as written (currency, percentages).
    #[default]
    Decimal,
    /// Convert fractional numbers to the nearest `f64`; integers are kept.
    Float,
}

/// Turns raw response bytes into an [`Envelope`] or a typed error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseClassifier {
    number_mode: NumberMode,
}

impl ResponseClassifier {
    /// Create a classifier decoding numbers with the given mode.
    #[must_use]
    pub fn new(number_mode: NumberMode) -> Self {
        Self { number_mode }
    }

    /// The configured number mode.
    pub fn number_mode(&self) -> NumberMode {
        self.number_mode
    }

    /// Decode and classify a response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not UTF-8 JSON, or if it carries one
    /// of the API's error markers.
    pub fn classify(&self, body: &[u8]) -> Result<Envelope> {
        let text = std::str::from_utf8(body)?;
        let mut value: Value = serde_json::from_str(text)?;

        if self.number_mode == NumberMode::Float {
            to_floats(&mut value);
        }

        if let Value::Object(map) = &value {
            check_error_markers(map)?;
        }

        Ok(Envelope::new(value))
    }
}

fn check_error_markers(map: &Map<String, Value>) -> Result<()> {
    let message = || {
        map.get("message")
            .map(|m| m.as_str().map_or_else(|| m.to_string(), str::to_string))
            .unwrap_or_default()
    };

    // A `code` field takes precedence; the message markers are only
    // consulted on bodies without one.
    if let Some(code) = map.get("code") {
        if code.as_str() == Some(AUTHENTICATION_CODE) {
            return Err(QuantumError::Authentication(message()));
        }
        return Ok(());
    }

    if let Some(text) = map.get("message").and_then(Value::as_str) {
        if text.contains(HANDLER_NOT_FOUND) {
            return Err(QuantumError::HandlerNotFound(text.to_string()));
        }
        if text.contains(INTERNAL_SERVER_ERROR) {
            return Err(QuantumError::InternalServer(text.to_string()));
        }
    }

    Ok(())
}

fn to_floats(value: &mut Value) {
    match value {
        // Integers stay integers.
        Value::Number(n) if n.is_i64() || n.is_u64() => {}
        Value::Number(n) => {
            if let Some(float) = n.as_f64().and_then(Number::from_f64) {
                *n = float;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(to_floats),
        Value::Object(map) => map.values_mut().for_each(to_floats),
        _ => {}
    }
}
