//! Outbound command frames.
//!
//! Commands are constructed fresh per send and never queued or retried.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::error::Result;

// ============================================================================
// Command
// ============================================================================

/// A command frame from the client to the counter service.
///
/// # Format
///
/// ```json
/// {"action": "increment"}
/// ```
///
/// No response is awaited; the service broadcasts the resulting counter
/// value as a separate update frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Command {
    /// Ask the service to increment the shared counter by one.
    Increment,
}

impl Command {
    /// Serializes the command to its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_wire_form() {
        let json = Command::Increment.encode().expect("serialize");
        assert_eq!(json, r#"{"action":"increment"}"#);
    }
}
