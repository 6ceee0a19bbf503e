//! Identity contract checker.
//!
//! Single subject: rendering does not panic, hashing does not panic, the
//! subject equals itself and never equals nothing. Pair: equality is
//! symmetric, and equal subjects must share one hash (the converse is not
//! required). Any accessor panic fails that specific sub-check rather
//! than being silently treated as "not equal".

use crate::aggregate::run_checks;
use crate::check::Check;
use crate::error::Result;
use crate::guard::{guarded, safe_render};
use crate::ops::ContractOps;
use crate::outcome::{CheckOutcome, Violation};

const CONTRACT: &str = "identity";

fn subject_text<T>(ops: &ContractOps<'_, T>, subject: &T) -> String {
    safe_render(|subject| ops.rendered(subject), subject)
}

/// Composable single-subject identity checks.
#[must_use]
pub fn identity_checks<'a, T>(ops: &'a ContractOps<'a, T>, subject: &'a T) -> Vec<Check<'a>> {
    vec![
        Check::new("render does not panic", move || {
            CheckOutcome::from_probe(guarded(CONTRACT, "render accessor", || {
                ops.rendered(subject)
            }))
        }),
        Check::new("hash does not panic", move || {
            CheckOutcome::from_probe(guarded(CONTRACT, "hash accessor", || ops.hash_of(subject)))
        }),
        Check::unary(
            "equal to itself",
            subject,
            move |a, b| guarded(CONTRACT, "equality accessor", || ops.are_equal(a, Some(b))),
            move |a| {
                Violation::new(
                    CONTRACT,
                    format!("{} must equal itself", subject_text(ops, a)),
                )
            },
        ),
        Check::unary(
            "never equal to nothing",
            subject,
            move |a, _| {
                guarded(CONTRACT, "equality accessor", || ops.are_equal(a, None))
                    .map(|equal| !equal)
            },
            move |a| {
                Violation::new(
                    CONTRACT,
                    format!(
                        "{} must not equal the absent operand",
                        subject_text(ops, a)
                    ),
                )
            },
        ),
    ]
}

/// Composable pair identity checks: symmetry and hash consistency.
#[must_use]
pub fn identity_pair_checks<'a, T>(
    ops: &'a ContractOps<'a, T>,
    subject: &'a T,
    other: &'a T,
) -> Vec<Check<'a>> {
    vec![
        Check::binary(
            "symmetric equality",
            subject,
            other,
            move |a, b| {
                let forward = guarded(CONTRACT, "equality accessor", || {
                    ops.are_equal(a, Some(b))
                })?;
                let backward = guarded(CONTRACT, "equality accessor", || {
                    ops.are_equal(b, Some(a))
                })?;
                Ok(forward == backward)
            },
            move |a, b| {
                Violation::new(
                    CONTRACT,
                    format!(
                        "equality must be symmetric between {} and {}",
                        subject_text(ops, a),
                        subject_text(ops, b)
                    ),
                )
            },
        ),
        Check::binary(
            "equal implies matching hashes",
            subject,
            other,
            move |a, b| {
                let equal = guarded(CONTRACT, "equality accessor", || {
                    ops.are_equal(a, Some(b))
                })?;
                if !equal {
                    // Unequal subjects may hash however they like.
                    return Ok(true);
                }
                let subject_hash = guarded(CONTRACT, "hash accessor", || ops.hash_of(a))?;
                let other_hash = guarded(CONTRACT, "hash accessor", || ops.hash_of(b))?;
                Ok(subject_hash == other_hash)
            },
            move |a, b| {
                Violation::new(
                    CONTRACT,
                    format!(
                        "equal subjects {} and {} must share one hash",
                        subject_text(ops, a),
                        subject_text(ops, b)
                    ),
                )
            },
        ),
    ]
}

/// Aggregate-and-raise form of the single-subject identity contract.
pub fn check_identity<T>(ops: &ContractOps<'_, T>, subject: &T) -> Result<()> {
    run_checks("identity contract", identity_checks(ops, subject))
}

/// Aggregate-and-raise form of the pair identity contract.
pub fn check_identity_pair<T>(ops: &ContractOps<'_, T>, subject: &T, other: &T) -> Result<()> {
    run_checks(
        "identity contract (pair)",
        identity_pair_checks(ops, subject, other),
    )
}
