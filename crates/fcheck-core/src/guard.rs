//! Panic isolation for caller-supplied accessors.
//!
//! Every probe of a subject goes through [`guarded`]: a well-behaved
//! accessor's return value passes straight through, while a panicking one
//! becomes a diagnosable [`Violation`] naming the faulting accessor
//! instead of tearing down the checker. The only exception is the
//! designated [`Unrecoverable`] payload, which re-raises unchanged from
//! every layer, including nested checking logic.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::outcome::Violation;

/// Designated unrecoverable signal.
///
/// Raised when the checking process itself is compromised (resource
/// exhaustion and the like). Never caught, converted, or aggregated.
#[derive(Debug)]
pub struct Unrecoverable(pub String);

/// Designated signal for a comparison handed an absent operand.
///
/// Ordering contracts require `compare(x, nothing)` to raise this signal
/// rather than return an arbitrary ordering.
#[derive(Debug)]
pub struct InvalidComparison(pub String);

/// Raise the unrecoverable signal.
pub fn raise_unrecoverable(message: impl Into<String>) -> ! {
    panic::panic_any(Unrecoverable(message.into()))
}

/// Raise the invalid-comparison signal.
pub fn invalid_comparison(message: impl Into<String>) -> ! {
    panic::panic_any(InvalidComparison(message.into()))
}

/// Captured panic payload.
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Run `op` exactly once, capturing panics but re-raising [`Unrecoverable`].
///
/// Checks are pure functions of their explicit inputs, so no broken state
/// survives an unwind (`AssertUnwindSafe`).
pub fn catch<R>(op: impl FnOnce() -> R) -> Result<R, PanicPayload> {
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(value) => Ok(value),
        Err(payload) => {
            if payload.is::<Unrecoverable>() {
                panic::resume_unwind(payload);
            }
            Err(payload)
        }
    }
}

/// Invoke a caller-supplied accessor exactly once under isolation.
pub fn guarded<R>(
    contract: &str,
    accessor: &str,
    op: impl FnOnce() -> R,
) -> Result<R, Violation> {
    catch(op).map_err(|payload| accessor_fault(contract, accessor, &payload))
}

/// Convert a captured panic into an accessor-fault violation.
#[must_use]
pub fn accessor_fault(contract: &str, accessor: &str, payload: &PanicPayload) -> Violation {
    Violation::new(
        contract,
        format!("{accessor} must not panic for well-formed input"),
    )
    .with_cause(panic_text(payload))
}

/// Best-effort text of a panic payload.
#[must_use]
pub fn panic_text(payload: &PanicPayload) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(signal) = payload.downcast_ref::<InvalidComparison>() {
        format!("invalid comparison: {}", signal.0)
    } else {
        "<non-string panic payload>".to_owned()
    }
}

/// Render a subject through its display accessor without ever panicking.
///
/// Failure descriptions must identify the offending subject even when its
/// own stringification is broken; a panicking renderer yields a
/// placeholder instead.
pub fn safe_render<T>(render: impl Fn(&T) -> String, subject: &T) -> String {
    catch(|| render(subject))
        .unwrap_or_else(|payload| format!("<render panicked: {}>", panic_text(&payload)))
}
