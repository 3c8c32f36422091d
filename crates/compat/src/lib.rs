//! # compat
//!
//! Operating system compatibility gate.
//!
//! Before any resource is converged, the host's [`Facts`] are checked against
//! a [`SupportMatrix`]. The matrix is data supplied by the caller; this crate
//! hardcodes no platform list.
//!
//! ## Example
//!
//! ```
//! use compat::{check_supported, Facts, FamilySupport, SupportMatrix};
//!
//! let matrix = SupportMatrix::new()
//!     .with_family("Debian", FamilySupport::names(["Debian", "Ubuntu"]))
//!     .with_family("Solaris", FamilySupport::any().excluding("Nexenta"));
//!
//! assert!(check_supported(&Facts::new("Debian", "Ubuntu"), &matrix).is_ok());
//!
//! let err = check_supported(&Facts::new("Solaris", "Nexenta"), &matrix).unwrap_err();
//! assert!(err.to_string().contains("Nexenta not supported"));
//! ```

pub mod error;
pub mod facts;
pub mod matrix;

pub use error::{UnsupportedPlatformError, UnsupportedReason};
pub use facts::Facts;
pub use matrix::{FamilySupport, SupportMatrix};

/// Check the host facts against the support matrix.
///
/// Pure validation with no side effects. Callers must run this before
/// building or applying a plan.
///
/// # Errors
///
/// Returns [`UnsupportedPlatformError`] when the platform is not supported.
pub fn check_supported(facts: &Facts, matrix: &SupportMatrix) -> Result<(), UnsupportedPlatformError> {
    matrix.check(facts)
}
