//! Properties of a game session that every committed claim must preserve.
//!
//! Each property is a zero-sized type implementing [`Invariant`]. Tuples of
//! them form an [`InvariantSet`], which the lifecycle checks in debug builds
//! after each claim and which tests can run against hand-built states.

use derive_more::Display;

/// A property of `S` that is either satisfied or not.
pub trait Invariant<S> {
    /// Returns true if `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// Short statement of the property, used in violation reports.
    fn description() -> &'static str;
}

/// A property that failed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Invariant violated: {}", description)]
pub struct InvariantViolation {
    /// Statement of the failed property.
    pub description: &'static str,
}

impl InvariantViolation {
    /// Records a failure of the property described by `description`.
    pub fn new(description: &'static str) -> Self {
        Self { description }
    }

    fn of<S, I: Invariant<S>>(state: &S) -> Option<Self> {
        (!I::holds(state)).then(|| Self::new(I::description()))
    }
}

/// Several invariants checked as one.
pub trait InvariantSet<S> {
    /// Runs every member and reports all failures together.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($member:ident),+) => {
        impl<S, $($member: Invariant<S>),+> InvariantSet<S> for ($($member,)+) {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let failed: Vec<InvariantViolation> =
                    [$(InvariantViolation::of::<S, $member>(state)),+]
                        .into_iter()
                        .flatten()
                        .collect();
                if failed.is_empty() {
                    Ok(())
                } else {
                    Err(failed)
                }
            }
        }
    };
}

impl_invariant_set!(A);
impl_invariant_set!(A, B);
impl_invariant_set!(A, B, C);

mod history_consistent;
mod monotonic_board;
mod terminal_status;

pub use history_consistent::HistoryConsistentInvariant;
pub use monotonic_board::MonotonicBoardInvariant;
pub use terminal_status::TerminalStatusInvariant;

/// Everything the lifecycle checks after a claim.
pub type LifecycleInvariants = (
    MonotonicBoardInvariant,
    HistoryConsistentInvariant,
    TerminalStatusInvariant,
);
