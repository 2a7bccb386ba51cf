//! Error taxonomy for provider calls.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the bong.tv client.
///
/// HTTP status codes map onto dedicated variants so that callers can react
/// to the kind of failure: `Authentication` asks for fresh credentials,
/// `Recording` means the provider refused to schedule, `NotFound` is benign
/// for recording deletion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network failure without a usable HTTP status. Never retried.
    #[error("transport error: {source}")]
    Transport {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The per-call timeout elapsed before the provider answered.
    #[error("request timed out: {source}")]
    Timeout {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 3xx. The provider API is not expected to redirect.
    #[error("unsupported HTTP redirect {status}")]
    Redirect {
        /// Status code received.
        status: u16,
    },

    /// HTTP 401. The held session cookie was rejected or the password is
    /// wrong; the session has been reset and the next call logs in again.
    #[error("not authorized (wrong password or expired session)")]
    Authentication,

    /// HTTP 404.
    #[error("resource not found")]
    NotFound,

    /// HTTP 422 when scheduling a recording (conflict, broadcast already
    /// over, out of space).
    #[error("recording cannot be scheduled")]
    Recording,

    /// Any other HTTP 4xx.
    #[error("unexpected client HTTP error {status}")]
    Client {
        /// Status code received.
        status: u16,
    },

    /// HTTP 5xx.
    #[error("unexpected server HTTP error {status}")]
    Server {
        /// Status code received.
        status: u16,
    },

    /// Malformed response body or a missing expected JSON field.
    #[error("failed to decode response: {message}")]
    Decode {
        /// What could not be decoded.
        message: String,
    },

    /// Successful login answer without a `Set-Cookie` header.
    #[error("login response carries no session cookie")]
    MissingSessionCookie,

    /// A finalized recording offers no playable URL for the requested
    /// qualities.
    #[error("no playable url found for recording {recording_id}")]
    MissingRecordingUrl {
        /// Recording the lookup ran against.
        recording_id: u64,
    },

    /// Reading or writing the session-cookie cache file failed.
    #[error("cookie cache error at {path}: {source}")]
    CookieCache {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Client construction or misuse.
    #[error("configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
    },
}

/// Classifies an HTTP status code, exactly once per call.
///
/// 1xx/2xx pass; everything else maps to the taxonomy above.
///
/// # Errors
///
/// Returns the error variant matching the status range or specific code.
pub(crate) fn check_status(status: u16) -> Result<()> {
    match status {
        100..=299 => Ok(()),
        300..=399 => Err(Error::Redirect { status }),
        401 => Err(Error::Authentication),
        404 => Err(Error::NotFound),
        422 => Err(Error::Recording),
        400..=499 => Err(Error::Client { status }),
        _ => Err(Error::Server { status }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range_passes() {
        // Arrange & Act & Assert
        assert!(check_status(200).is_ok());
        assert!(check_status(201).is_ok());
        assert!(check_status(204).is_ok());
    }

    #[test]
    fn test_redirect_is_fatal() {
        // Arrange & Act
        let result = check_status(302);

        // Assert
        assert!(matches!(result, Err(Error::Redirect { status: 302 })));
    }

    #[test]
    fn test_specific_client_codes() {
        // Arrange & Act & Assert
        assert!(matches!(check_status(401), Err(Error::Authentication)));
        assert!(matches!(check_status(404), Err(Error::NotFound)));
        assert!(matches!(check_status(422), Err(Error::Recording)));
    }

    #[test]
    fn test_generic_client_and_server_ranges() {
        // Arrange & Act & Assert
        assert!(matches!(
            check_status(400),
            Err(Error::Client { status: 400 })
        ));
        assert!(matches!(
            check_status(502),
            Err(Error::Server { status: 502 })
        ));
    }
}
