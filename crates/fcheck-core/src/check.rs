//! Relation check bases.
//!
//! A [`Check`] is a named, single-shot verdict: a tagged value carrying a
//! predicate closure and building its failure description lazily, only on
//! mismatch. The three relation arities bind their operands at
//! construction: unary binds none (the predicate sees the subject twice),
//! binary binds one other, ternary binds two.
//!
//! Two calling conventions with equivalent verdicts: [`Check::run`] for
//! the composable outcome form (see also [`all_of`]) and [`Check::verify`]
//! for the direct raise-on-failure form.

use crate::error::{ContractError, Result};
use crate::guard;
use crate::outcome::{CheckOutcome, Violation};

/// Predicate result inside a relation check: `Ok(bool)` is the relation
/// verdict, `Err` is an accessor fault already converted by the guard.
pub type Probe = std::result::Result<bool, Violation>;

/// A named, single-shot contract check with lazily built failure text.
pub struct Check<'a> {
    name: String,
    run: Box<dyn FnOnce() -> CheckOutcome + 'a>,
}

impl<'a> Check<'a> {
    pub fn new(name: impl Into<String>, run: impl FnOnce() -> CheckOutcome + 'a) -> Self {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Predicate applied to (subject, subject); no external operand.
    pub fn unary<T>(
        name: impl Into<String>,
        subject: &'a T,
        predicate: impl FnOnce(&T, &T) -> Probe + 'a,
        describe: impl FnOnce(&T) -> Violation + 'a,
    ) -> Self {
        Self::new(name, move || match predicate(subject, subject) {
            Ok(true) => CheckOutcome::Pass,
            Ok(false) => CheckOutcome::Fail(describe(subject)),
            Err(violation) => CheckOutcome::Fail(violation),
        })
    }

    /// Predicate applied to (subject, bound other).
    pub fn binary<T>(
        name: impl Into<String>,
        subject: &'a T,
        other: &'a T,
        predicate: impl FnOnce(&T, &T) -> Probe + 'a,
        describe: impl FnOnce(&T, &T) -> Violation + 'a,
    ) -> Self {
        Self::new(name, move || match predicate(subject, other) {
            Ok(true) => CheckOutcome::Pass,
            Ok(false) => CheckOutcome::Fail(describe(subject, other)),
            Err(violation) => CheckOutcome::Fail(violation),
        })
    }

    /// Predicate applied to (subject, bound other, second bound other).
    pub fn ternary<T>(
        name: impl Into<String>,
        subject: &'a T,
        other: &'a T,
        third: &'a T,
        predicate: impl FnOnce(&T, &T, &T) -> Probe + 'a,
        describe: impl FnOnce(&T, &T, &T) -> Violation + 'a,
    ) -> Self {
        Self::new(name, move || match predicate(subject, other, third) {
            Ok(true) => CheckOutcome::Pass,
            Ok(false) => CheckOutcome::Fail(describe(subject, other, third)),
            Err(violation) => CheckOutcome::Fail(violation),
        })
    }

    /// Run the check once. A panic inside the check body is itself
    /// converted into a failure; the unrecoverable signal re-raises.
    #[must_use]
    pub fn run(self) -> CheckOutcome {
        let name = self.name;
        match guard::catch(self.run) {
            Ok(outcome) => outcome,
            Err(payload) => {
                CheckOutcome::Fail(guard::accessor_fault(&name, "check body", &payload))
            }
        }
    }

    /// Direct raise-on-failure form; verdict equivalent to [`Self::run`].
    pub fn verify(self) -> Result<()> {
        match self.run() {
            CheckOutcome::Pass => Ok(()),
            CheckOutcome::Fail(violation) => Err(ContractError::Violation(violation)),
        }
    }
}

impl std::fmt::Debug for Check<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

/// Fold several checks into one with AND semantics.
///
/// Every component runs regardless of earlier failures; component
/// violations merge into one violation listing each of them, first
/// primary.
#[must_use]
pub fn all_of<'a>(name: impl Into<String>, checks: Vec<Check<'a>>) -> Check<'a> {
    let name = name.into();
    let total = checks.len();
    let contract = name.clone();
    Check::new(name, move || {
        let mut violations = Vec::new();
        for check in checks {
            if let CheckOutcome::Fail(violation) = check.run() {
                violations.push(violation);
            }
        }
        if violations.is_empty() {
            return CheckOutcome::Pass;
        }
        let listed = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        CheckOutcome::Fail(Violation::new(
            contract,
            format!(
                "{} of {total} component checks failed: {listed}",
                violations.len()
            ),
        ))
    })
}
