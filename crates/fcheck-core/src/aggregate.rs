//! Aggregating executor.
//!
//! Runs an ordered sequence of checks to completion, never stopping at
//! the first failure, and merges every collected violation into one
//! composite [`AggregateFailure`]. The unrecoverable signal is the single
//! exception: it aborts the remaining sequence immediately and propagates
//! unwrapped, because it means the checking process itself is
//! compromised, not the subject.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::check::Check;
use crate::error::{AggregateFailure, ContractError, Result};
use crate::outcome::{CheckOutcome, Violation};

/// Serializable record of one aggregated run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub heading: String,
    /// How many checks were attempted; always the full sequence unless
    /// the unrecoverable signal aborted it.
    pub attempted: usize,
    pub violations: Vec<Violation>,
}

impl RunReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// One-line triage rendering.
    #[must_use]
    pub fn summary_line(&self) -> String {
        match self.violations.first() {
            None => format!(
                "PASS: {}: {} checks, 0 violations",
                self.heading, self.attempted
            ),
            Some(primary) => format!(
                "FAIL: {}: {} checks, {} violations; primary: {primary}",
                self.heading,
                self.attempted,
                self.violations.len()
            ),
        }
    }

    /// Machine-readable rendering for evidence artifacts.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run every check under `heading`; zero violations returns normally,
/// one or more raise a single composite failure with the first violation
/// primary and all of them attached.
pub fn run_checks(heading: &str, checks: Vec<Check<'_>>) -> Result<()> {
    let report = run_checks_report(heading, checks);
    if report.passed() {
        return Ok(());
    }
    Err(ContractError::Aggregate(AggregateFailure {
        heading: report.heading,
        violations: report.violations,
    }))
}

/// Same execution as [`run_checks`], returning the full report for
/// structured consumers.
#[must_use]
pub fn run_checks_report(heading: &str, checks: Vec<Check<'_>>) -> RunReport {
    let attempted = checks.len();
    let mut violations = Vec::new();
    for check in checks {
        debug!(heading, check = check.name(), "running contract check");
        // An unrecoverable payload re-raises out of `run`, aborting the
        // remainder of the sequence.
        match check.run() {
            CheckOutcome::Pass => {}
            CheckOutcome::Fail(violation) => {
                warn!(heading, %violation, "contract check failed");
                violations.push(violation);
            }
        }
    }
    RunReport {
        heading: heading.to_owned(),
        attempted,
        violations,
    }
}

#[cfg(test)]
mod tests {
    use std::panic;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::guard::{Unrecoverable, raise_unrecoverable};

    fn passing(name: &str) -> Check<'_> {
        Check::new(name, || CheckOutcome::Pass)
    }

    fn failing(name: &'static str, detail: &'static str) -> Check<'static> {
        Check::new(name, move || CheckOutcome::fail("identity", detail))
    }

    #[test]
    fn zero_failures_return_normally() {
        let checks = vec![passing("first"), passing("second")];
        assert!(run_checks("identity contract", checks).is_ok());
    }

    #[test]
    fn every_check_is_attempted_and_failures_merge() {
        let attempted = AtomicUsize::new(0);
        let mut checks = Vec::new();
        for index in 0..5 {
            let attempted = &attempted;
            checks.push(Check::new(format!("check {index}"), move || {
                attempted.fetch_add(1, Ordering::SeqCst);
                if index % 2 == 0 {
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::fail("identity", format!("check {index} broke"))
                }
            }));
        }

        let error = run_checks("identity contract", checks).expect_err("two checks fail");
        assert_eq!(attempted.load(Ordering::SeqCst), 5, "no short-circuit");
        let ContractError::Aggregate(failure) = error else {
            panic!("expected aggregate failure, got {error}");
        };
        assert_eq!(failure.violations.len(), 2);
        assert_eq!(
            failure.primary().map(|violation| violation.detail.as_str()),
            Some("check 1 broke")
        );
        assert_eq!(failure.secondary().len(), 1);
    }

    #[test]
    fn report_counts_attempted_checks() {
        let checks = vec![
            passing("first"),
            failing("second", "broken"),
            passing("third"),
        ];
        let report = run_checks_report("identity contract", checks);
        assert_eq!(report.attempted, 3);
        assert_eq!(report.violations.len(), 1);
        assert!(!report.passed());
    }

    #[test]
    fn unrecoverable_aborts_remaining_sequence() {
        let attempted = AtomicUsize::new(0);
        let caught = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            let attempted = &attempted;
            let checks = vec![
                Check::new("first", move || {
                    attempted.fetch_add(1, Ordering::SeqCst);
                    CheckOutcome::Pass
                }),
                Check::new("second", || raise_unrecoverable("process compromised")),
                Check::new("third", move || {
                    attempted.fetch_add(1, Ordering::SeqCst);
                    CheckOutcome::Pass
                }),
            ];
            run_checks("identity contract", checks)
        }))
        .expect_err("unrecoverable must escape the executor");

        assert!(caught.is::<Unrecoverable>());
        assert_eq!(
            attempted.load(Ordering::SeqCst),
            1,
            "third check must not run after the unrecoverable signal"
        );
    }

    #[test]
    fn summary_line_marks_pass_and_fail() {
        let pass = run_checks_report("identity contract", vec![passing("only")]);
        assert!(pass.summary_line().starts_with("PASS: identity contract"));

        let fail = run_checks_report("identity contract", vec![failing("only", "broken")]);
        let line = fail.summary_line();
        assert!(line.starts_with("FAIL: identity contract"));
        assert!(line.contains("primary: [identity] broken"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = run_checks_report("identity contract", vec![failing("only", "broken")]);
        let encoded = report.to_json().expect("report should serialize");
        let decoded: RunReport = serde_json::from_str(&encoded).expect("round trip");
        assert_eq!(decoded, report);
    }
}
