//! iRail client error types.

use std::fmt;

/// Errors from the iRail HTTP client.
#[derive(Debug)]
pub enum IrailError {
    /// No response arrived within the per-request bound.
    Timeout,

    /// The upstream answered with a non-2xx status.
    HttpStatus(u16),

    /// The response body was not the expected JSON.
    Parse { message: String },

    /// Transport-level failure that is neither a timeout nor a status.
    Http(reqwest::Error),
}

impl IrailError {
    /// Whether this is an upstream 404, which the liveboard endpoint uses
    /// for unknown stations and the vehicle endpoint for unknown ids.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IrailError::HttpStatus(404))
    }

    /// Whether this is an upstream 400, which the liveboard endpoint
    /// commonly answers for a time slice with no data.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, IrailError::HttpStatus(400))
    }
}

impl fmt::Display for IrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrailError::Timeout => write!(f, "request timed out"),
            IrailError::HttpStatus(status) => write!(f, "HTTP {status}"),
            IrailError::Parse { message } => write!(f, "JSON parse error: {message}"),
            IrailError::Http(e) => write!(f, "HTTP error: {e}"),
        }
    }
}

impl std::error::Error for IrailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IrailError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for IrailError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IrailError::Timeout
        } else if let Some(status) = err.status() {
            IrailError::HttpStatus(status.as_u16())
        } else {
            IrailError::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(IrailError::Timeout.to_string(), "request timed out");
        assert_eq!(IrailError::HttpStatus(404).to_string(), "HTTP 404");

        let err = IrailError::Parse {
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn status_helpers() {
        assert!(IrailError::HttpStatus(404).is_not_found());
        assert!(!IrailError::HttpStatus(404).is_bad_request());
        assert!(IrailError::HttpStatus(400).is_bad_request());
        assert!(!IrailError::Timeout.is_not_found());
        assert!(!IrailError::Timeout.is_bad_request());
    }
}
