//! Error types for the blackvol library.
//!
//! All fallible operations return `Result<T, VolError>` rather than
//! panicking. The two domain errors mirror the no-arbitrage price bounds;
//! everything else the algorithm encounters (underflow, bracket collapse,
//! oscillation) is recovered internally and is not an error.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, VolError>;

/// Errors that can occur during implied volatility extraction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VolError {
    /// The quoted price is strictly below the option's intrinsic value.
    ///
    /// No non-negative volatility can reproduce such a price; it signals an
    /// arbitrage violation or bad input and is never retried.
    #[error("option price is below intrinsic value")]
    BelowIntrinsic,

    /// The quoted price is at or above the asymptotic upper bound
    /// (the forward for calls, the strike for puts).
    #[error("option price is at or above the maximum attainable value")]
    AboveMaximum,

    /// Input data is invalid (e.g., NaN, infinite, or non-positive where a
    /// positive quantity is required).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert!(format!("{}", VolError::BelowIntrinsic).contains("below intrinsic"));
        assert!(format!("{}", VolError::AboveMaximum).contains("maximum"));
        let err = VolError::InvalidInput {
            message: "strike must be positive".into(),
        };
        assert!(format!("{err}").contains("strike must be positive"));
    }

    #[test]
    fn domain_errors_are_comparable() {
        assert_eq!(VolError::BelowIntrinsic, VolError::BelowIntrinsic);
        assert_ne!(VolError::BelowIntrinsic, VolError::AboveMaximum);
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VolError>();
    }
}
