//! # Inline Task: Copyable Callables Without the Heap
//!
//! [`Task`] holds any `FnMut() + Clone` closure inside a fixed-size inline
//! buffer and exposes it through one uniform call interface. It behaves like
//! an ordinary value: it can be cloned, moved, replaced and dropped, and the
//! right clone and destructor of the erased closure run every time. A task
//! never allocates; a closure that does not fit is rejected, never promoted
//! to the heap.
//!
//! ## Core Concept
//!
//! Erasure works without a vtable or a boxed trait object. When a closure is
//! stored, two plain function pointers are bound to its concrete type: a
//! *manager* that clones or destroys it and an *invoker* that calls it. The
//! task's own type only names its space.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use inline_task::Task;
//! use inline_task::space::S4;
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&hits);
//!
//! let mut task: Task<S4> = Task::new(move || {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//! task.call().unwrap();
//!
//! // Moving out leaves the source empty.
//! let mut moved = task.take();
//! assert!(task.is_empty());
//! assert!(task.call().is_err());
//!
//! moved.call().unwrap();
//! assert_eq!(hits.load(Ordering::Relaxed), 2);
//! ```
//!
//! ## Configuration
//!
//! ### Space
//!
//! The capacity and alignment of a task are its `Space` type parameter:
//! `size_of::<Space>()` bytes aligned to `align_of::<Space>()`. The
//! [`space`] module provides word-sized spaces (`S1` to `S64`) and byte
//! spaces with explicit alignment ([`space::Aligned`]). Without a space,
//! a task uses [`space::DefaultSpace`], 32 bytes aligned to 16.
//!
//! ```rust
//! use inline_task::Task;
//! use inline_task::space::{Aligned, A64};
//!
//! type CacheLineTask = Task<Aligned<A64, 64>>;
//!
//! let task = CacheLineTask::new(|| {});
//! assert_eq!(CacheLineTask::CAPACITY, 64);
//! # drop(task);
//! ```
//!
//! Two tasks with different spaces are different types;
//! [`Task::resize`] moves an occupant between them.
//!
//! ### Thread Mobility
//!
//! [`Task`] admits only `Send` closures and is itself `Send`, which makes it
//! fit for a work queue. [`LocalTask`] accepts any closure and stays on its
//! thread. Neither is `Sync`.
//!
//! ### Feature Flags
//!
//! - **`std`** (enabled by default)
//!   - Links to the standard library
//!   - Disable for `#![no_std]` environments: `default-features = false`
//!
//! - **`tracing`** (optional)
//!   - Logs rejected constructions and empty invocations through `tracing`
//!
//! ## Capacity Checks
//!
//! [`Task::new`] refuses an oversized closure at compile time.
//! [`Task::try_new`] checks at runtime and hands the closure back inside a
//! [`CapacityError`]:
//!
//! ```rust
//! use inline_task::{Error, Task};
//! use inline_task::space::S1;
//!
//! let wide = [0u64; 4];
//! let err = Task::<S1>::try_new(move || assert_eq!(wide[0], 0)).err().unwrap();
//! assert!(matches!(err.error(), Error::CapacityExceeded { size: 32, .. }));
//! ```
//!
//! ## Bound Arguments
//!
//! [`Task::bind`] stores a callable together with its arguments. Each call
//! receives fresh clones of them:
//!
//! ```rust
//! use std::sync::mpsc;
//!
//! use inline_task::Task;
//! use inline_task::space::S8;
//!
//! let (tx, rx) = mpsc::channel();
//! let mut task: Task<S8> = Task::bind(
//!     |tx: mpsc::Sender<u32>, a: u32, b: u32| tx.send(a * b).unwrap(),
//!     (tx, 6, 7),
//! );
//! task.call().unwrap();
//! task.call().unwrap();
//! assert_eq!(rx.try_iter().collect::<Vec<_>>(), [42, 42]);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]
#![deny(clippy::as_conversions)]
#![warn(unsafe_op_in_unsafe_fn)]

mod bind;
mod dispatch;
mod error;
pub mod kind;
mod raw;
pub mod space;
mod task;

pub use crate::bind::Apply;
pub use crate::error::{CapacityError, Error};
pub use crate::task::{LocalTask, Task};
