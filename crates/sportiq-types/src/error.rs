//! Unified error interface for the SPORTIQ runtime.
//!
//! Every error enum in the workspace implements [`ErrorCode`], giving each
//! failure a stable machine-readable code plus recoverability information
//! for retry decisions and logging.
//!
//! # Code Format
//!
//! - **UPPER_SNAKE_CASE**: e.g. `"MANIFEST_DUPLICATE_ID"`, `"LOAD_TIMEOUT"`
//! - **Prefixed by subsystem**: `MANIFEST_`, `LOAD_`, `MANAGER_`, `GRAPH_`,
//!   `CONFIG_`, `LAYER_`, `EVENT_`
//! - **Stable**: codes are an API contract and never change once defined
//!
//! # Example
//!
//! ```
//! use sportiq_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     NotFound(String),
//!     Timeout,
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound(_) => "FETCH_NOT_FOUND",
//!             Self::Timeout => "FETCH_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(FetchError::Timeout.code(), "FETCH_TIMEOUT");
//! assert!(FetchError::Timeout.is_recoverable());
//! ```

/// Unified error code interface.
///
/// # Recoverability
///
/// An error is recoverable when retrying may succeed or the user can take
/// corrective action (timeouts, transient I/O). Non-recoverable errors are
/// structural: malformed input, duplicate ids, unknown layers.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the workspace conventions.
///
/// # Panics
///
/// Panics with a descriptive message if the code is empty, lacks the
/// expected prefix, or is not UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use sportiq_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "LOAD_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "LOAD_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates multiple error codes at once.
///
/// Use this to verify all variants of an error enum in one test.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
