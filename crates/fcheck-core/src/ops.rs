//! Caller-supplied accessor bundles.
//!
//! A [`ContractOps`] describes how to probe one subject type: equality
//! against an optional other (where `None` is the "nothing" sentinel),
//! hashing, rendering, and optionally comparison. No behavior is derived
//! structurally; the bundle is the explicit opt-in, and every accessor is
//! treated as possibly panicking by the layers above.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use crate::guard::invalid_comparison;

type EqFn<'a, T> = Box<dyn Fn(&T, Option<&T>) -> bool + 'a>;
type HashFn<'a, T> = Box<dyn Fn(&T) -> u64 + 'a>;
type RenderFn<'a, T> = Box<dyn Fn(&T) -> String + 'a>;
type CmpFn<'a, T> = Box<dyn Fn(&T, Option<&T>) -> Ordering + 'a>;

/// Accessor bundle for probing subjects of type `T`.
pub struct ContractOps<'a, T> {
    eq: EqFn<'a, T>,
    hash: HashFn<'a, T>,
    render: RenderFn<'a, T>,
    cmp: Option<CmpFn<'a, T>>,
}

impl<'a, T> ContractOps<'a, T> {
    /// Bundle explicit accessors. A comparison accessor starts absent;
    /// attach one with [`Self::with_cmp`].
    pub fn new(
        eq: impl Fn(&T, Option<&T>) -> bool + 'a,
        hash: impl Fn(&T) -> u64 + 'a,
        render: impl Fn(&T) -> String + 'a,
    ) -> Self {
        Self {
            eq: Box::new(eq),
            hash: Box::new(hash),
            render: Box::new(render),
            cmp: None,
        }
    }

    /// Replace the equality accessor.
    #[must_use]
    pub fn with_eq(mut self, eq: impl Fn(&T, Option<&T>) -> bool + 'a) -> Self {
        self.eq = Box::new(eq);
        self
    }

    /// Replace the hash accessor.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Fn(&T) -> u64 + 'a) -> Self {
        self.hash = Box::new(hash);
        self
    }

    /// Replace the render accessor.
    #[must_use]
    pub fn with_render(mut self, render: impl Fn(&T) -> String + 'a) -> Self {
        self.render = Box::new(render);
        self
    }

    /// Attach a comparison accessor.
    #[must_use]
    pub fn with_cmp(mut self, cmp: impl Fn(&T, Option<&T>) -> Ordering + 'a) -> Self {
        self.cmp = Some(Box::new(cmp));
        self
    }

    #[must_use]
    pub fn are_equal(&self, subject: &T, other: Option<&T>) -> bool {
        (self.eq)(subject, other)
    }

    #[must_use]
    pub fn hash_of(&self, subject: &T) -> u64 {
        (self.hash)(subject)
    }

    #[must_use]
    pub fn rendered(&self, subject: &T) -> String {
        (self.render)(subject)
    }

    /// The bound comparison accessor, if any. Ordering checks treat an
    /// absent accessor as a usage error, not a subject failure.
    #[must_use]
    pub fn cmp_accessor(&self) -> Option<&(dyn Fn(&T, Option<&T>) -> Ordering + 'a)> {
        self.cmp.as_deref()
    }
}

impl<'a, T: PartialEq + Hash + Debug> ContractOps<'a, T> {
    /// Wire the subject's `PartialEq`, `Hash`, and `Debug` implementations.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            |subject, other| other.is_some_and(|other| subject == other),
            |subject| {
                let mut hasher = DefaultHasher::new();
                subject.hash(&mut hasher);
                hasher.finish()
            },
            |subject| format!("{subject:?}"),
        )
    }
}

impl<'a, T: Ord + Hash + Debug> ContractOps<'a, T> {
    /// [`Self::standard`] plus the subject's `Ord` implementation.
    /// Comparing against the absent operand raises the designated
    /// invalid-comparison signal, as the ordering contract requires.
    #[must_use]
    pub fn standard_ordered() -> Self {
        Self::standard().with_cmp(|subject: &T, other: Option<&T>| match other {
            Some(other) => subject.cmp(other),
            None => invalid_comparison("compare invoked with the absent operand"),
        })
    }
}
