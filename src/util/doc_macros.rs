//! Macros for reducing doc comment boilerplate.

/// Default explanation for [`roots::Error::NoConverge`](crate::roots::Error::NoConverge) errors.
macro_rules! errors_no_converge {
    () => {
        r"- `NoConverge`: the root finder did not converge within the given constraints. The best guess so far is returned with the error.
"
    };
}
pub(crate) use errors_no_converge;

/// Documents the degenerate (all-zero) polynomial error.
macro_rules! errors_degenerate {
    () => {
        r"- `Degenerate`: every coefficient of the polynomial is zero, so it has no well defined roots.
"
    };
}
pub(crate) use errors_degenerate;

/// Documents that sampling functions skip samples instead of failing.
macro_rules! soft_failure {
    () => {
        r"Samples that cannot be computed (near-zero divisors, non-finite values) are skipped rather than aborting the whole analysis. The number of skipped samples is logged.
"
    };
}
pub(crate) use soft_failure;
