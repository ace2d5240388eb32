//! Resolver error types.

use crate::irail::IrailError;

/// Errors from train resolution.
///
/// `NoMatch` is a clean outcome, not a transport failure; callers must
/// present it distinctly from `Upstream` errors.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The query contained no digits to search for.
    #[error("no digits in train number query")]
    EmptyQuery,

    /// Every candidate on every probed day came back without stops.
    #[error("no train matches the requested number")]
    NoMatch,

    /// The upstream failed in a way the resolver does not retry.
    #[error("upstream error: {0}")]
    Upstream(#[from] IrailError),
}

impl ResolveError {
    /// Whether this is an upstream "station not found" answer.
    pub fn is_station_not_found(&self) -> bool {
        matches!(self, ResolveError::Upstream(err) if err.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            ResolveError::NoMatch.to_string(),
            "no train matches the requested number"
        );
        assert!(
            ResolveError::Upstream(IrailError::Timeout)
                .to_string()
                .contains("timed out")
        );
    }

    #[test]
    fn station_not_found_detection() {
        assert!(ResolveError::Upstream(IrailError::HttpStatus(404)).is_station_not_found());
        assert!(!ResolveError::Upstream(IrailError::HttpStatus(500)).is_station_not_found());
        assert!(!ResolveError::NoMatch.is_station_not_found());
    }
}
