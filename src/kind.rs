//! Thread-mobility kinds of a task.
//!
//! A [`Task`](crate::Task) of kind [`Sendable`] only admits `Send` occupants and
//! can itself be sent to another thread. A [`LocalTask`](crate::LocalTask) of
//! kind [`Local`] admits any occupant and stays on its thread.

use core::cell::Cell;

mod sealed {
    pub trait Sealed {}
}

/// A thread-mobility kind. Sealed.
pub trait Kind: sealed::Sealed {
    /// Zero-sized marker carrying the auto traits of tasks of this kind.
    #[doc(hidden)]
    type Marker;
    /// Name used by `Debug`.
    #[doc(hidden)]
    const NAME: &'static str;
}

/// Kinds that accept values of type `T` as (part of) an occupant.
pub trait Admits<T>: Kind {}

/// Kind of tasks that can be sent between threads.
#[derive(Debug, Clone, Copy)]
pub struct Sendable;

/// Kind of tasks bound to the thread that created them.
#[derive(Debug, Clone, Copy)]
pub struct Local;

impl sealed::Sealed for Sendable {}
impl sealed::Sealed for Local {}

// `Send`, never `Sync`: sharing a task would let two threads clone the
// occupant at once.
impl Kind for Sendable {
    type Marker = Cell<()>;
    const NAME: &'static str = "Task";
}

impl Kind for Local {
    type Marker = *mut ();
    const NAME: &'static str = "LocalTask";
}

impl<T: Send> Admits<T> for Sendable {}
impl<T> Admits<T> for Local {}
