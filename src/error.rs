use core::fmt;

/// Failures reported by task construction and invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The callable, together with any bound arguments, does not fit in the
    /// inline space of the task.
    #[error(
        "callable of {size} bytes (align {align}) does not fit into {capacity} bytes of inline space (align {capacity_align})"
    )]
    CapacityExceeded {
        /// Size of the rejected occupant in bytes.
        size: usize,
        /// Alignment of the rejected occupant.
        align: usize,
        /// Capacity of the task in bytes.
        capacity: usize,
        /// Alignment of the task's storage.
        capacity_align: usize,
    },
    /// An empty task was invoked.
    #[error("attempted to invoke an empty task")]
    EmptyInvocation,
}

/// A callable rejected for not fitting in a task's inline space.
///
/// The callable is handed back untouched, see [`CapacityError::into_inner`].
#[derive(thiserror::Error)]
#[error("{kind}")]
pub struct CapacityError<F> {
    callable: F,
    kind: Error,
}

impl<F> CapacityError<F> {
    pub(crate) fn new(
        callable: F,
        size: usize,
        align: usize,
        capacity: usize,
        capacity_align: usize,
    ) -> Self {
        CapacityError {
            callable,
            kind: Error::CapacityExceeded {
                size,
                align,
                capacity,
                capacity_align,
            },
        }
    }

    pub(crate) fn map<G>(self, f: impl FnOnce(F) -> G) -> CapacityError<G> {
        CapacityError {
            callable: f(self.callable),
            kind: self.kind,
        }
    }

    /// Returns the [`Error::CapacityExceeded`] describing the rejection.
    pub fn error(&self) -> Error {
        self.kind
    }

    /// Gives back the rejected callable.
    pub fn into_inner(self) -> F {
        self.callable
    }
}

impl<F> fmt::Debug for CapacityError<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityError")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<F> From<CapacityError<F>> for Error {
    fn from(err: CapacityError<F>) -> Self {
        err.kind
    }
}
