//! One-shot start gate.

use parking_lot::{Condvar, Mutex};

/// A latch that starts closed; [`StartGate::release`] opens it exactly
/// once and wakes every thread blocked in [`StartGate::wait`]. Late
/// arrivals pass straight through. The gate never closes again.
#[derive(Debug, Default)]
pub struct StartGate {
    released: Mutex<bool>,
    condvar: Condvar,
}

impl StartGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Block the calling thread until the gate is released.
    pub fn wait(&self) {
        let mut released = self.released.lock();
        while !*released {
            self.condvar.wait(&mut released);
        }
    }

    /// Open the gate, releasing all current and future waiters.
    pub fn release(&self) {
        let mut released = self.released.lock();
        *released = true;
        self.condvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn waiters_block_until_release() {
        let gate = Arc::new(StartGate::new());
        let passed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let gate = Arc::clone(&gate);
            let passed = Arc::clone(&passed);
            handles.push(thread::spawn(move || {
                gate.wait();
                passed.fetch_add(1, Ordering::SeqCst);
            }));
        }

        thread::sleep(Duration::from_millis(50));
        assert_eq!(passed.load(Ordering::SeqCst), 0, "gate must hold workers");

        gate.release();
        for handle in handles {
            handle.join().expect("waiter should finish");
        }
        assert_eq!(passed.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn late_arrivals_pass_straight_through() {
        let gate = StartGate::new();
        gate.release();
        gate.wait();
    }
}
