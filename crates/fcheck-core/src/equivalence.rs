//! Equivalence-semantics checker.
//!
//! Entity semantics: equality is determined solely by a designated
//! identifier attribute, which must be present on both subjects. Value
//! semantics: equality implies agreement on a named value attribute (the
//! converse is not required). Value failures name the offending attribute
//! so several attribute checks on one pair stay distinguishable after
//! aggregation.

use crate::check::Check;
use crate::error::{ContractError, Result};
use crate::guard::{guarded, safe_render};
use crate::ops::ContractOps;
use crate::outcome::Violation;

const CONTRACT: &str = "equivalence";

fn subject_text<T>(ops: &ContractOps<'_, T>, subject: &T) -> String {
    safe_render(|subject| ops.rendered(subject), subject)
}

/// Composable entity-semantics check: both identifiers present, and
/// `equals(a, b) ⇔ identifier(a) == identifier(b)`.
///
/// An absent identifier is an invariant violation of the subject, not a
/// usage error: the subject claims entity semantics yet lacks the
/// identity it is supposed to be equal by.
pub fn entity_semantics_check<'a, T, K>(
    ops: &'a ContractOps<'a, T>,
    subject: &'a T,
    other: &'a T,
    identifier: impl Fn(&T) -> Option<K> + 'a,
) -> Check<'a>
where
    K: PartialEq,
{
    Check::binary(
        "entity semantics",
        subject,
        other,
        move |a, b| {
            let subject_id = guarded(CONTRACT, "identifier accessor", || identifier(a))?;
            let other_id = guarded(CONTRACT, "identifier accessor", || identifier(b))?;
            let (Some(subject_id), Some(other_id)) = (subject_id, other_id) else {
                return Err(Violation::new(
                    CONTRACT,
                    format!(
                        "entity identifiers must be present on both {} and {}",
                        subject_text(ops, a),
                        subject_text(ops, b)
                    ),
                ));
            };
            let equal = guarded(CONTRACT, "equality accessor", || ops.are_equal(a, Some(b)))?;
            Ok(equal == (subject_id == other_id))
        },
        move |a, b| {
            Violation::new(
                CONTRACT,
                format!(
                    "{} and {} must be equal exactly when their identifiers are equal",
                    subject_text(ops, a),
                    subject_text(ops, b)
                ),
            )
        },
    )
}

/// Composable value-semantics check: `equals(a, b) ⇒ attribute(a) ==
/// attribute(b)`. An empty attribute name is a usage error.
pub fn value_semantics_check<'a, T, V>(
    ops: &'a ContractOps<'a, T>,
    subject: &'a T,
    other: &'a T,
    attribute: &str,
    accessor: impl Fn(&T) -> V + 'a,
) -> Result<Check<'a>>
where
    V: PartialEq,
{
    if attribute.trim().is_empty() {
        return Err(ContractError::Usage(
            "value-semantics checks require a non-empty attribute name".to_owned(),
        ));
    }
    let attribute = attribute.to_owned();
    let described_attribute = attribute.clone();
    Ok(Check::binary(
        format!("value semantics for `{attribute}`"),
        subject,
        other,
        move |a, b| {
            let equal = guarded(CONTRACT, "equality accessor", || ops.are_equal(a, Some(b)))?;
            if !equal {
                // Unequal subjects may differ in any attribute.
                return Ok(true);
            }
            let accessor_label = format!("`{attribute}` accessor");
            let subject_value = guarded(CONTRACT, &accessor_label, || accessor(a))?;
            let other_value = guarded(CONTRACT, &accessor_label, || accessor(b))?;
            Ok(subject_value == other_value)
        },
        move |a, b| {
            Violation::new(
                CONTRACT,
                format!(
                    "equal subjects {} and {} must agree on attribute `{described_attribute}`",
                    subject_text(ops, a),
                    subject_text(ops, b)
                ),
            )
        },
    ))
}

/// Raise-on-failure form of the entity-semantics check.
pub fn check_entity_semantics<T, K>(
    ops: &ContractOps<'_, T>,
    subject: &T,
    other: &T,
    identifier: impl Fn(&T) -> Option<K>,
) -> Result<()>
where
    K: PartialEq,
{
    entity_semantics_check(ops, subject, other, identifier).verify()
}

/// Raise-on-failure form of the value-semantics check.
pub fn check_value_semantics<T, V>(
    ops: &ContractOps<'_, T>,
    subject: &T,
    other: &T,
    attribute: &str,
    accessor: impl Fn(&T) -> V,
) -> Result<()>
where
    V: PartialEq,
{
    value_semantics_check(ops, subject, other, attribute, accessor)?.verify()
}
