//! Concurrency coordination harness for contention checks.
//!
//! Spawns one dedicated thread per worker (no pooling; callers request
//! small counts appropriate to a test), parks every worker on a shared
//! [`StartGate`], and releases them as simultaneously as the scheduler
//! allows to maximize interleaving exposure on the shared subject under
//! test. Each worker runs a caller-supplied zero-argument operation; a
//! panicking worker is captured at the thread boundary, never silently
//! lost.
//!
//! Collection joins workers strictly in submission order, not completion
//! order; total latency equals the slowest worker either way. Failures
//! merge with the aggregating executor's primary/secondary policy. The
//! unrecoverable signal re-raises unchanged from the collecting thread.
//!
//! The harness holds no shared mutable state beyond the gate and each
//! worker's single-writer/single-reader outcome (the thread's return
//! value). There is no cancellation or timeout: once released, a worker
//! runs to completion or failure, and bounding duration is the caller
//! operation's own responsibility.

mod gate;

use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use fcheck_core::{AggregateFailure, CheckOutcome, ContractError, Result, Violation};
use fcheck_core::guard::{Unrecoverable, panic_text};

pub use gate::StartGate;

const CONTRACT: &str = "concurrency";

/// Observable lifecycle stage of one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerStage {
    /// Submitted, thread not yet parked on the gate.
    Created = 0,
    /// Parked on the shared start gate.
    Blocked = 1,
    /// Released and executing the caller operation.
    Running = 2,
    /// Operation finished, outcome recorded.
    Completed = 3,
}

impl WorkerStage {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Created,
            1 => Self::Blocked,
            2 => Self::Running,
            _ => Self::Completed,
        }
    }
}

/// Read-only probe of one worker's lifecycle stage.
#[derive(Debug, Clone)]
pub struct StageProbe(Arc<AtomicU8>);

impl StageProbe {
    #[must_use]
    pub fn stage(&self) -> WorkerStage {
        WorkerStage::from_raw(self.0.load(Ordering::Acquire))
    }
}

struct Worker {
    name: String,
    stage: Arc<AtomicU8>,
    handle: JoinHandle<CheckOutcome>,
}

/// Coordinates N worker threads released simultaneously through a shared
/// gate, collecting every outcome in submission order.
pub struct ConcurrencyHarness {
    gate: Arc<StartGate>,
    workers: Vec<Worker>,
}

impl Default for ConcurrencyHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConcurrencyHarness {
    /// Workers parked on the gate must not leak when the harness is
    /// dropped without running (including a failed mid-loop `spawn`).
    /// The gate is one-shot, so a second release after `run` is a
    /// no-op.
    fn drop(&mut self) {
        self.gate.release();
    }
}

impl ConcurrencyHarness {
    #[must_use]
    pub fn new() -> Self {
        Self {
            gate: Arc::new(StartGate::new()),
            workers: Vec::new(),
        }
    }

    /// Number of submitted workers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Submit a worker: spawn its dedicated thread, which parks on the
    /// shared gate until [`Self::run`] releases it, then invokes `op`
    /// once. Returns a probe for the worker's lifecycle stage.
    ///
    /// # Errors
    ///
    /// [`ContractError::Harness`] when the thread cannot be spawned; the
    /// subject under test is not implicated.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        op: impl FnOnce() -> CheckOutcome + Send + 'static,
    ) -> Result<StageProbe> {
        let name = name.into();
        let gate = Arc::clone(&self.gate);
        let stage = Arc::new(AtomicU8::new(WorkerStage::Created as u8));
        let worker_stage = Arc::clone(&stage);

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                worker_stage.store(WorkerStage::Blocked as u8, Ordering::Release);
                gate.wait();
                worker_stage.store(WorkerStage::Running as u8, Ordering::Release);
                // Capture ordinary panics so the Completed stage is still
                // recorded; the join below receives the payload either
                // way. Unrecoverable re-raises immediately.
                let result = fcheck_core::guard::catch(op);
                worker_stage.store(WorkerStage::Completed as u8, Ordering::Release);
                match result {
                    Ok(outcome) => outcome,
                    Err(payload) => panic::resume_unwind(payload),
                }
            })
            .map_err(|err| {
                ContractError::Harness(format!("failed to spawn worker `{name}`: {err}"))
            })?;

        debug!(worker = %name, "worker submitted");
        let probe = StageProbe(Arc::clone(&stage));
        self.workers.push(Worker {
            name,
            stage,
            handle,
        });
        Ok(probe)
    }

    /// Release the gate and collect every outcome in submission order,
    /// never stopping at the first failure.
    ///
    /// # Errors
    ///
    /// [`ContractError::Usage`] when no workers were submitted;
    /// [`ContractError::Aggregate`] merging every worker failure, first
    /// primary. An unrecoverable payload captured from a worker re-raises
    /// unchanged instead.
    pub fn run(mut self, heading: &str) -> Result<()> {
        if self.workers.is_empty() {
            return Err(ContractError::Usage(
                "concurrency harness requires at least one worker".to_owned(),
            ));
        }

        info!(heading, workers = self.workers.len(), "releasing start gate");
        self.gate.release();

        let mut violations = Vec::new();
        for worker in std::mem::take(&mut self.workers) {
            if let CheckOutcome::Fail(violation) = collect_worker(worker) {
                violations.push(violation);
            }
        }

        if violations.is_empty() {
            return Ok(());
        }
        Err(ContractError::Aggregate(AggregateFailure {
            heading: heading.to_owned(),
            violations,
        }))
    }
}

fn collect_worker(worker: Worker) -> CheckOutcome {
    let stage = WorkerStage::from_raw(worker.stage.load(Ordering::Acquire));
    debug!(worker = %worker.name, ?stage, "collecting worker outcome");
    match worker.handle.join() {
        Ok(outcome) => outcome,
        Err(payload) => {
            if payload.is::<Unrecoverable>() {
                panic::resume_unwind(payload);
            }
            CheckOutcome::Fail(
                Violation::new(
                    CONTRACT,
                    format!("worker `{}` panicked mid-run", worker.name),
                )
                .with_cause(panic_text(&payload)),
            )
        }
    }
}

/// Spawn `count` workers sharing one operation and run them to
/// completion under `heading`.
///
/// # Errors
///
/// As [`ConcurrencyHarness::run`], plus [`ContractError::Usage`] for a
/// zero worker count.
pub fn run_concurrent<F>(count: usize, heading: &str, op: F) -> Result<()>
where
    F: Fn() -> CheckOutcome + Send + Sync + 'static,
{
    if count == 0 {
        return Err(ContractError::Usage(
            "concurrent run requires at least one worker".to_owned(),
        ));
    }
    let op = Arc::new(op);
    let mut harness = ConcurrencyHarness::new();
    for index in 0..count {
        let op = Arc::clone(&op);
        harness.spawn(format!("worker-{index}"), move || op())?;
    }
    harness.run(heading)
}
