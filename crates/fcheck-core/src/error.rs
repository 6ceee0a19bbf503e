//! Error taxonomy for contract verification.
//!
//! Four classes with different propagation rules:
//! - [`ContractError::Usage`] — invalid arguments to the checker itself,
//!   independent of the subject; fails fast, never aggregated.
//! - [`ContractError::Violation`] — a single contract breach raised from
//!   the direct verify form.
//! - [`ContractError::Aggregate`] — several independent breaches merged
//!   under one heading, first primary, rest secondary context.
//! - [`ContractError::Harness`] — concurrency-harness infrastructure
//!   failure, distinct from anything the subject did.
//!
//! The unrecoverable signal (see [`crate::guard::Unrecoverable`]) is not
//! part of this enum: it propagates as a panic at every layer and is
//! never converted into an error value.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::outcome::Violation;

pub type Result<T> = std::result::Result<T, ContractError>;

/// One composite failure bundling every violation from an aggregated run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateFailure {
    pub heading: String,
    /// Never empty; the first entry is the primary failure.
    pub violations: Vec<Violation>,
}

impl AggregateFailure {
    #[must_use]
    pub fn primary(&self) -> Option<&Violation> {
        self.violations.first()
    }

    #[must_use]
    pub fn secondary(&self) -> &[Violation] {
        self.violations.get(1..).unwrap_or_default()
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} violations", self.heading, self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid usage: {0}")]
    Usage(String),
    #[error("contract violated: {0}")]
    Violation(Violation),
    #[error("{0}")]
    Aggregate(AggregateFailure),
    #[error("harness failure: {0}")]
    Harness(String),
}

impl ContractError {
    /// All violations carried by this error, in primary-first order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Usage(_) | Self::Harness(_) => &[],
            Self::Violation(violation) => std::slice::from_ref(violation),
            Self::Aggregate(failure) => &failure.violations,
        }
    }
}
