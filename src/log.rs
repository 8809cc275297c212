//! Conditional logging macros.
//!
//! When the `tracing` feature is enabled, these re-export `tracing` macros.
//! When disabled, they expand to no-ops for zero runtime overhead.
//!
//! Non-fatal [`Warning`]s go through [`report`], which logs them and also
//! keeps them in a per-thread list until [`take_reported`] drains it, so no
//! warning is lost in a build without `tracing`. A canvas drains the list
//! after each of its passes.

use std::cell::RefCell;

use crate::errors::Warning;

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};

thread_local! {
    /// Distinct warnings reported on this thread since the last drain.
    static REPORTED: RefCell<Vec<Warning>> = const { RefCell::new(Vec::new()) };
}

/// Record a non-fatal warning and log it with its diagnostic code.
pub fn report(warning: &Warning) {
    #[cfg(feature = "tracing")]
    {
        use miette::Diagnostic;
        let code = warning.code().map(|c| c.to_string()).unwrap_or_default();
        warn!(%code, "{}", warning);
    }
    REPORTED.with_borrow_mut(|reported| {
        if !reported.contains(warning) {
            reported.push(warning.clone());
        }
    });
}

/// Warnings reported on this thread since the last call, oldest first.
pub fn take_reported() -> Vec<Warning> {
    REPORTED.take()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_warnings_are_kept_once_until_drained() {
        take_reported();
        let warning = Warning::DegenerateGeometry { operation: "normalize" };
        report(&warning);
        report(&warning);
        report(&Warning::ImaginaryResidue { count: 3 });
        assert_eq!(
            take_reported(),
            vec![warning, Warning::ImaginaryResidue { count: 3 }]
        );
        assert!(take_reported().is_empty());
    }
}
