//! Inbound frame decoding.
//!
//! Decoding distinguishes two failure modes the manager treats very
//! differently:
//!
//! - malformed JSON is a decode error, surfaced as `Err` and logged;
//! - valid JSON that is not a recognized message shape yields `Ok(None)`
//!   and is dropped silently.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Inbound
// ============================================================================

/// A recognized inbound frame from the counter service.
///
/// # Format
///
/// ```json
/// {"type": "update", "value": 123}
/// ```
///
/// This is the only recognized inbound shape. `value` must be a
/// non-negative integer; anything else (wrong `type`, missing field,
/// fractional or negative number) counts as a shape mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// New authoritative counter value.
    Update {
        /// The counter value observed from the service.
        value: u64,
    },
}

impl Inbound {
    /// Decodes one inbound text frame.
    ///
    /// Returns `Ok(Some(_))` for a recognized frame, `Ok(None)` for valid
    /// JSON of an unrecognized shape, and `Err` for malformed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the payload is not
    /// valid JSON.
    pub fn decode(text: &str) -> Result<Option<Self>> {
        let payload: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&payload))
    }

    /// Matches a parsed payload against the recognized shapes.
    fn from_value(payload: &Value) -> Option<Self> {
        match payload.get("type").and_then(Value::as_str)? {
            "update" => payload
                .get("value")
                .and_then(Value::as_u64)
                .map(|value| Self::Update { value }),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
