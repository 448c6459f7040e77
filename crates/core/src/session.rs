//! Session lifecycle states, close reasons and client id validation.

use crate::error::CoreError;

/// A session stream is finalized after this many seconds even if nobody
/// closes it.
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 180;

/// Maximum length of a caller-supplied client id.
pub const MAX_CLIENT_ID_LEN: usize = 128;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Lifecycle state of a streaming session.
///
/// Transitions only move forward: `Open -> Closing -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl SessionState {
    /// Decode the value stored in an atomic. Unknown values read as `Closed`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Open,
            1 => Self::Closing,
            _ => Self::Closed,
        }
    }

    pub fn is_live(self) -> bool {
        self == Self::Open
    }
}

/// Why a session was closed. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// `DELETE /close/{clientId}`.
    Explicit,
    /// The session outlived its timeout.
    Timeout,
    /// A write to the stream failed.
    StreamError,
    /// The client went away and the stream was dropped.
    Disconnected,
    /// A newer session was opened for the same client id.
    Replaced,
    /// Server shutdown.
    Shutdown,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Timeout => "timeout",
            Self::StreamError => "stream_error",
            Self::Disconnected => "disconnected",
            Self::Replaced => "replaced",
            Self::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a caller-supplied client id.
///
/// Rules:
/// - Must not be blank.
/// - Must not exceed `MAX_CLIENT_ID_LEN` characters.
pub fn validate_client_id(client_id: &str) -> Result<(), CoreError> {
    if client_id.trim().is_empty() {
        return Err(CoreError::Validation("Client id must not be empty".into()));
    }
    if client_id.chars().count() > MAX_CLIENT_ID_LEN {
        return Err(CoreError::Validation(format!(
            "Client id must not exceed {MAX_CLIENT_ID_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn state_round_trips_through_u8() {
        for state in [SessionState::Open, SessionState::Closing, SessionState::Closed] {
            assert_eq!(SessionState::from_u8(state as u8), state);
        }
        assert_eq!(SessionState::from_u8(42), SessionState::Closed);
    }

    #[test]
    fn only_open_is_live() {
        assert!(SessionState::Open.is_live());
        assert!(!SessionState::Closing.is_live());
        assert!(!SessionState::Closed.is_live());
    }

    #[test]
    fn close_reasons_have_log_names() {
        let names: Vec<_> = [
            CloseReason::Explicit,
            CloseReason::Timeout,
            CloseReason::StreamError,
            CloseReason::Disconnected,
            CloseReason::Replaced,
            CloseReason::Shutdown,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(
            names,
            ["explicit", "timeout", "stream_error", "disconnected", "replaced", "shutdown"]
        );
    }

    #[test]
    fn valid_client_ids_pass() {
        assert!(validate_client_id("client-1").is_ok());
        assert!(validate_client_id(&"a".repeat(MAX_CLIENT_ID_LEN)).is_ok());
    }

    #[test]
    fn blank_client_id_rejected() {
        assert_matches!(validate_client_id("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn overlong_client_id_rejected() {
        let id = "x".repeat(MAX_CLIENT_ID_LEN + 1);
        assert_matches!(validate_client_id(&id), Err(CoreError::Validation(_)));
    }
}
