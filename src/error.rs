use thiserror::Error;

use crate::roots;

/// The top-level error type for this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Polynomial or complex-point text that could not be parsed
    #[error("invalid expression {input:?} at position {position}: {reason}")]
    InvalidExpression {
        input: String,
        position: usize,
        reason: String,
    },

    /// All-zero polynomials, or a system for which the locus is ill-posed
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A pointwise evaluation hit a divisor too close to zero
    #[error("division by near-zero value ({magnitude:e}) while {context}")]
    NumericDivision { context: String, magnitude: f64 },

    #[error("root finder did not converge within {max_iter} iterations")]
    NoConverge { max_iter: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_expression(
        input: &str,
        position: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidExpression {
            input: input.to_owned(),
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput(reason.into())
    }

    pub(crate) fn numeric_division(context: impl Into<String>, magnitude: f64) -> Self {
        Self::NumericDivision {
            context: context.into(),
            magnitude,
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

impl<T> From<roots::Error<T>> for Error {
    fn from(value: roots::Error<T>) -> Self {
        match value {
            roots::Error::NoConverge { max_iter, .. } => Self::NoConverge { max_iter },
            roots::Error::Degenerate => {
                Self::degenerate("cannot find the roots of the zero polynomial")
            }
            roots::Error::Other(o) => Self::Other(o),
        }
    }
}
