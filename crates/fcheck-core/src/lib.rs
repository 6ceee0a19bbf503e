//! Contract-verification engine.
//!
//! Confirms that a subject's caller-supplied equality, hashing, rendering,
//! and comparison accessors obey the base-type contracts: reflexive and
//! symmetric equality, hash stability, the total-order axioms, and
//! identifier- or attribute-based equivalence semantics.
//!
//! Design rules the whole crate follows:
//! - Misbehaving accessors are isolated. A panic inside a caller-supplied
//!   accessor fails that specific sub-check with the panic text captured;
//!   it never tears down the run. The designated [`guard::Unrecoverable`]
//!   payload is the single exception and re-raises at every layer.
//! - Independent failures aggregate. The executor in [`aggregate`] runs
//!   every check and merges all violations into one composite error.
//! - Per-check control flow is value-based ([`CheckOutcome`]); raised
//!   errors are reserved for the outward-facing `check_*`/`verify` entry
//!   points and the unrecoverable signal.
//!
//! Two calling conventions with equivalent verdicts: composable
//! [`Check`] values (combine with [`all_of`] or feed [`run_checks`]) and
//! the direct raise-on-failure `check_*` functions in each checker
//! module.

pub mod aggregate;
pub mod check;
pub mod equivalence;
pub mod error;
pub mod guard;
pub mod identity;
pub mod ops;
pub mod ordering;
pub mod outcome;

pub use aggregate::{RunReport, run_checks, run_checks_report};
pub use check::{Check, Probe, all_of};
pub use error::{AggregateFailure, ContractError, Result};
pub use guard::{
    InvalidComparison, Unrecoverable, guarded, invalid_comparison, raise_unrecoverable,
    safe_render,
};
pub use ops::ContractOps;
pub use outcome::{CheckOutcome, Violation};
