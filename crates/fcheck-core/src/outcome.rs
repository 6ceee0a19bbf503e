//! Per-invocation check verdicts.
//!
//! Every probe of a subject produces a fresh [`CheckOutcome`]; nothing in
//! the engine holds verdict state across calls. A failed outcome carries a
//! [`Violation`] with a readable explanation and, for accessor faults, the
//! captured panic text as the cause.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single observed contract breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Which contract was breached (`identity`, `ordering`, ...).
    pub contract: String,
    /// Human-readable explanation of the breach.
    pub detail: String,
    /// Captured panic text when an accessor fault caused the failure.
    pub cause: Option<String>,
}

impl Violation {
    #[must_use]
    pub fn new(contract: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            detail: detail.into(),
            cause: None,
        }
    }

    /// Attach the captured cause text.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.contract, self.detail)?;
        if let Some(cause) = &self.cause {
            write!(f, " (cause: {cause})")?;
        }
        Ok(())
    }
}

/// Verdict of one check invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail(Violation),
}

impl CheckOutcome {
    /// Shorthand for a failed outcome without a cause.
    #[must_use]
    pub fn fail(contract: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Fail(Violation::new(contract, detail))
    }

    /// Pass exactly when a guarded probe returned at all; the probe's
    /// value is irrelevant.
    #[must_use]
    pub fn from_probe<R>(probe: Result<R, Violation>) -> Self {
        match probe {
            Ok(_) => Self::Pass,
            Err(violation) => Self::Fail(violation),
        }
    }

    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    #[must_use]
    pub fn into_violation(self) -> Option<Violation> {
        match self {
            Self::Pass => None,
            Self::Fail(violation) => Some(violation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_contract_and_detail() {
        let violation = Violation::new("identity", "subject must equal itself");
        assert_eq!(
            violation.to_string(),
            "[identity] subject must equal itself"
        );
    }

    #[test]
    fn display_appends_cause_when_present() {
        let violation = Violation::new("ordering", "comparison accessor fault")
            .with_cause("index out of bounds");
        assert!(violation.to_string().ends_with("(cause: index out of bounds)"));
    }

    #[test]
    fn from_probe_passes_through_ok() {
        assert!(CheckOutcome::from_probe(Ok(42_u64)).is_pass());
    }

    #[test]
    fn from_probe_fails_on_violation() {
        let probe: Result<(), Violation> = Err(Violation::new("identity", "hash accessor fault"));
        let outcome = CheckOutcome::from_probe(probe);
        assert!(!outcome.is_pass());
        assert_eq!(
            outcome.into_violation().map(|violation| violation.contract),
            Some("identity".to_owned())
        );
    }

    #[test]
    fn violation_round_trips_through_json() {
        let violation = Violation::new("equivalence", "identifiers must match").with_cause("boom");
        let encoded = serde_json::to_string(&violation).expect("violation should serialize");
        let decoded: Violation =
            serde_json::from_str(&encoded).expect("violation should deserialize");
        assert_eq!(decoded, violation);
    }
}
