//! Ordering contract checker.
//!
//! Single subject: comparing with nothing must raise the designated
//! invalid-comparison signal, and self-comparison must not panic. Pair:
//! antisymmetry on the comparison sign, with consistency-with-equality as
//! an opt-in policy. Triple: transitivity on strict greater-than. Only
//! the sign of a comparison is meaningful; magnitude never is.
//!
//! A missing comparison accessor is a usage error, detected before any
//! subject is probed and never aggregated.

use std::cmp::Ordering;

use crate::aggregate::run_checks;
use crate::check::Check;
use crate::error::{ContractError, Result};
use crate::guard::{self, InvalidComparison, accessor_fault, guarded, safe_render};
use crate::ops::ContractOps;
use crate::outcome::{CheckOutcome, Violation};

const CONTRACT: &str = "ordering";

/// Whether the pair checks also require the natural order to align with
/// equality. Natural order need not always align, so this is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Only the comparison axioms themselves.
    #[default]
    SignOnly,
    /// Additionally require `compare(a, b) == Equal ⇔ equals(a, b)`.
    ConsistentWithEq,
}

type CmpRef<'a, T> = &'a (dyn Fn(&T, Option<&T>) -> Ordering + 'a);

fn require_cmp<'a, T>(ops: &'a ContractOps<'a, T>) -> Result<CmpRef<'a, T>> {
    ops.cmp_accessor().ok_or_else(|| {
        ContractError::Usage("ordering checks require a comparison accessor".to_owned())
    })
}

fn subject_text<T>(ops: &ContractOps<'_, T>, subject: &T) -> String {
    safe_render(|subject| ops.rendered(subject), subject)
}

/// Composable single-subject ordering checks.
pub fn ordering_self_checks<'a, T>(
    ops: &'a ContractOps<'a, T>,
    subject: &'a T,
) -> Result<Vec<Check<'a>>> {
    let cmp = require_cmp(ops)?;
    Ok(vec![
        Check::new("comparing with nothing raises invalid-comparison", move || {
            match guard::catch(|| cmp(subject, None)) {
                Ok(_) => CheckOutcome::fail(
                    CONTRACT,
                    format!(
                        "comparing {} with the absent operand must raise the \
                         invalid-comparison signal, not return an ordering",
                        subject_text(ops, subject)
                    ),
                ),
                Err(payload) if payload.is::<InvalidComparison>() => CheckOutcome::Pass,
                Err(payload) => {
                    CheckOutcome::Fail(accessor_fault(CONTRACT, "comparison accessor", &payload))
                }
            }
        }),
        Check::new("self-comparison does not panic", move || {
            CheckOutcome::from_probe(guarded(CONTRACT, "comparison accessor", || {
                cmp(subject, Some(subject))
            }))
        }),
    ])
}

/// `sign(compare(a, b))` must be the negation of `sign(compare(b, a))`.
pub fn antisymmetry_check<'a, T>(
    ops: &'a ContractOps<'a, T>,
    subject: &'a T,
    other: &'a T,
) -> Result<Check<'a>> {
    let cmp = require_cmp(ops)?;
    Ok(Check::binary(
        "antisymmetric comparison",
        subject,
        other,
        move |a, b| {
            let forward = guarded(CONTRACT, "comparison accessor", || cmp(a, Some(b)))?;
            let backward = guarded(CONTRACT, "comparison accessor", || cmp(b, Some(a)))?;
            Ok(forward == backward.reverse())
        },
        move |a, b| {
            Violation::new(
                CONTRACT,
                format!(
                    "comparison between {} and {} must reverse its sign when the \
                     operands swap",
                    subject_text(ops, a),
                    subject_text(ops, b)
                ),
            )
        },
    ))
}

/// Opt-in: `compare(a, b) == Equal` exactly when `equals(a, b)`.
pub fn consistency_check<'a, T>(
    ops: &'a ContractOps<'a, T>,
    subject: &'a T,
    other: &'a T,
) -> Result<Check<'a>> {
    let cmp = require_cmp(ops)?;
    Ok(Check::binary(
        "ordering consistent with equality",
        subject,
        other,
        move |a, b| {
            let ordering = guarded(CONTRACT, "comparison accessor", || cmp(a, Some(b)))?;
            let equal = guarded(CONTRACT, "equality accessor", || ops.are_equal(a, Some(b)))?;
            Ok((ordering == Ordering::Equal) == equal)
        },
        move |a, b| {
            Violation::new(
                CONTRACT,
                format!(
                    "{} and {} must compare as Equal exactly when they are equal",
                    subject_text(ops, a),
                    subject_text(ops, b)
                ),
            )
        },
    ))
}

/// `compare(a, b) > 0 ∧ compare(b, c) > 0 ⇒ compare(a, c) > 0`.
///
/// If any of the three comparisons cannot be computed, the whole check
/// fails for that reason; it never silently passes.
pub fn transitivity_check<'a, T>(
    ops: &'a ContractOps<'a, T>,
    subject: &'a T,
    other: &'a T,
    third: &'a T,
) -> Result<Check<'a>> {
    let cmp = require_cmp(ops)?;
    Ok(Check::ternary(
        "transitive comparison",
        subject,
        other,
        third,
        move |a, b, c| {
            // All three comparisons are computed up front: an accessor
            // fault on any leg fails the check even when the premise
            // below turns out false.
            let first = guarded(CONTRACT, "comparison accessor", || cmp(a, Some(b)))?;
            let second = guarded(CONTRACT, "comparison accessor", || cmp(b, Some(c)))?;
            let third_leg = guarded(CONTRACT, "comparison accessor", || cmp(a, Some(c)))?;
            if first != Ordering::Greater || second != Ordering::Greater {
                return Ok(true);
            }
            Ok(third_leg == Ordering::Greater)
        },
        move |a, b, c| {
            Violation::new(
                CONTRACT,
                format!(
                    "{} > {} and {} > {} must imply {} > {}",
                    subject_text(ops, a),
                    subject_text(ops, b),
                    subject_text(ops, b),
                    subject_text(ops, c),
                    subject_text(ops, a),
                    subject_text(ops, c)
                ),
            )
        },
    ))
}

/// Aggregate-and-raise form of the single-subject ordering contract.
pub fn check_ordering<T>(ops: &ContractOps<'_, T>, subject: &T) -> Result<()> {
    run_checks("ordering contract", ordering_self_checks(ops, subject)?)
}

/// Aggregate-and-raise form of the pair ordering contract.
pub fn check_ordering_pair<T>(
    ops: &ContractOps<'_, T>,
    subject: &T,
    other: &T,
    policy: OrderingPolicy,
) -> Result<()> {
    let mut checks = vec![antisymmetry_check(ops, subject, other)?];
    if policy == OrderingPolicy::ConsistentWithEq {
        checks.push(consistency_check(ops, subject, other)?);
    }
    run_checks("ordering contract (pair)", checks)
}

/// Aggregate-and-raise form of the triple ordering contract.
pub fn check_ordering_triple<T>(
    ops: &ContractOps<'_, T>,
    subject: &T,
    other: &T,
    third: &T,
) -> Result<()> {
    run_checks(
        "ordering contract (triple)",
        vec![transitivity_check(ops, subject, other, third)?],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::invalid_comparison;

    #[test]
    fn standard_ordered_value_passes_self_checks() {
        let ops = ContractOps::<u32>::standard_ordered();
        assert!(check_ordering(&ops, &5).is_ok());
    }

    #[test]
    fn standard_ordered_pairs_are_antisymmetric() {
        let ops = ContractOps::<i64>::standard_ordered();
        assert!(check_ordering_pair(&ops, &-3, &9, OrderingPolicy::SignOnly).is_ok());
        assert!(check_ordering_pair(&ops, &9, &9, OrderingPolicy::ConsistentWithEq).is_ok());
    }

    #[test]
    fn standard_ordered_triples_are_transitive() {
        let ops = ContractOps::<u32>::standard_ordered();
        assert!(check_ordering_triple(&ops, &9, &5, &1).is_ok());
        assert!(check_ordering_triple(&ops, &1, &5, &9).is_ok());
    }

    #[test]
    fn missing_comparison_accessor_is_a_usage_error() {
        let ops = ContractOps::<u32>::standard();
        let error = check_ordering(&ops, &1).expect_err("no cmp bound");
        assert!(matches!(error, ContractError::Usage(_)));
        assert!(error.violations().is_empty(), "usage errors never aggregate");
    }

    #[test]
    fn returning_an_ordering_for_nothing_fails() {
        // Sentinel-returning comparison: treats the absent operand as Less.
        let ops = ContractOps::<u32>::standard()
            .with_cmp(|subject, other| other.map_or(Ordering::Greater, |other| subject.cmp(other)));
        let error = check_ordering(&ops, &1).expect_err("sentinel ordering must fail");
        let violations = error.violations();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].detail.contains("invalid-comparison signal"));
    }

    #[test]
    fn wrong_panic_payload_for_nothing_is_an_accessor_fault() {
        let ops = ContractOps::<u32>::standard().with_cmp(|subject, other| match other {
            Some(other) => subject.cmp(other),
            None => panic!("plain panic, not the designated signal"),
        });
        let error = check_ordering(&ops, &1).expect_err("wrong payload must fail");
        let violations = error.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].cause.as_deref(),
            Some("plain panic, not the designated signal")
        );
    }

    #[test]
    fn panicking_self_comparison_fails() {
        let ops = ContractOps::<u32>::standard().with_cmp(|_, other| match other {
            Some(_) => panic!("cmp exploded"),
            None => invalid_comparison("absent operand"),
        });
        let error = check_ordering(&ops, &1).expect_err("panicking cmp must fail");
        let violations = error.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].cause.as_deref(), Some("cmp exploded"));
    }

    #[test]
    fn sign_ignoring_comparison_fails_antisymmetry() {
        // Always claims Greater, whichever way the operands point.
        let ops = ContractOps::<u32>::standard().with_cmp(|_, other| match other {
            Some(_) => Ordering::Greater,
            None => invalid_comparison("absent operand"),
        });
        let error = check_ordering_pair(&ops, &1, &2, OrderingPolicy::SignOnly)
            .expect_err("constant ordering must fail");
        assert!(error.violations()[0].detail.contains("reverse its sign"));
    }

    #[test]
    fn consistency_is_not_checked_under_sign_only_policy() {
        // Orders by magnitude but claims nothing is ever equal.
        let ops = ContractOps::<u32>::standard()
            .with_eq(|_, _| false)
            .with_cmp(|subject, other| match other {
                Some(other) => subject.cmp(other),
                None => invalid_comparison("absent operand"),
            });
        assert!(check_ordering_pair(&ops, &4, &4, OrderingPolicy::SignOnly).is_ok());
        assert!(
            check_ordering_pair(&ops, &4, &4, OrderingPolicy::ConsistentWithEq).is_err(),
            "the same pair must fail once consistency is requested"
        );
    }

    #[test]
    fn intransitive_comparison_fails_the_triple() {
        // Rock-paper-scissors ordering over 0, 1, 2.
        let beats = |a: &u32, b: &u32| (a + 1) % 3 == *b;
        let ops = ContractOps::<u32>::standard().with_cmp(move |subject, other| match other {
            Some(other) if subject == other => Ordering::Equal,
            Some(other) if beats(subject, other) => Ordering::Greater,
            Some(_) => Ordering::Less,
            None => invalid_comparison("absent operand"),
        });
        // 2 beats 0, 0 beats 1, but 2 loses to 1.
        let error = check_ordering_triple(&ops, &2, &0, &1).expect_err("cycle must fail");
        assert!(error.violations()[0].detail.contains("must imply"));
    }

    #[test]
    fn faulting_third_comparison_fails_the_triple() {
        let ops = ContractOps::<u32>::standard().with_cmp(|subject, other| match other {
            Some(other) if *subject == 9 && *other == 1 => panic!("third leg exploded"),
            Some(other) => subject.cmp(other),
            None => invalid_comparison("absent operand"),
        });
        let error = check_ordering_triple(&ops, &9, &5, &1).expect_err("fault must fail");
        assert_eq!(
            error.violations()[0].cause.as_deref(),
            Some("third leg exploded")
        );
    }

    #[test]
    fn faulting_comparison_fails_the_triple_even_with_a_false_premise() {
        // The premise 1 > 5 is false, but an uncomputable comparison
        // must still fail the check rather than vacuously pass.
        let ops = ContractOps::<u32>::standard().with_cmp(|subject, other| match other {
            Some(other) if *subject == 1 && *other == 9 => panic!("third leg exploded"),
            Some(other) => subject.cmp(other),
            None => invalid_comparison("absent operand"),
        });
        let error = check_ordering_triple(&ops, &1, &5, &9).expect_err("fault must fail");
        assert_eq!(
            error.violations()[0].cause.as_deref(),
            Some("third leg exploded")
        );
    }
}
