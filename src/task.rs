use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;

use crate::bind::{Apply, Bound};
use crate::dispatch::Plain;
use crate::error::{CapacityError, Error};
use crate::kind::{Admits, Kind, Local, Sendable};
use crate::raw::RawTask;
use crate::space::DefaultSpace;

/// A copyable callable stored inline in `Space`, never on the heap.
///
/// The task owns at most one occupant: a `FnMut() + Clone` closure, possibly
/// with bound arguments. Its concrete type is erased; the task only keeps the
/// two functions that know how to call, clone and destroy it.
///
/// The occupant must fit into `Space` by both size and alignment. [`Task::new`]
/// checks that at compile time, [`Task::try_new`] at runtime.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// use inline_task::Task;
/// use inline_task::space::S4;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
///
/// let mut task: Task<S4> = Task::new(move || {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
/// let mut copy = task.clone();
///
/// task.call().unwrap();
/// copy.call().unwrap();
/// assert_eq!(hits.load(Ordering::Relaxed), 2);
/// ```
pub struct Task<Space = DefaultSpace, K: Kind = Sendable> {
    raw: RawTask<Space>,
    _kind: PhantomData<(K, K::Marker)>,
}

/// A [`Task`] whose occupant need not be `Send`; the task stays on its thread.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use inline_task::LocalTask;
/// use inline_task::space::S2;
///
/// let seen = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&seen);
///
/// let mut task: LocalTask<S2> = LocalTask::new(move || sink.set(sink.get() + 1));
/// task.call().unwrap();
/// assert_eq!(seen.get(), 1);
/// ```
pub type LocalTask<Space = DefaultSpace> = Task<Space, Local>;

impl<Space, K: Kind> Task<Space, K> {
    /// Capacity of the inline space in bytes.
    pub const CAPACITY: usize = RawTask::<Space>::CAPACITY;

    /// Alignment of the inline space.
    pub const ALIGNMENT: usize = RawTask::<Space>::ALIGNMENT;

    fn from_raw(raw: RawTask<Space>) -> Self {
        Task {
            raw,
            _kind: PhantomData,
        }
    }

    /// Creates a task with no occupant.
    pub const fn empty() -> Self {
        Task {
            raw: RawTask::empty(),
            _kind: PhantomData,
        }
    }

    /// Stores `f` in a new task.
    ///
    /// The fit of `f` is checked at compile time:
    ///
    /// ```compile_fail
    /// use inline_task::Task;
    /// use inline_task::space::S1;
    ///
    /// let wide = [0usize; 2];
    /// let task: Task<S1> = Task::new(move || {
    ///     let _ = &wide;
    /// });
    /// ```
    ///
    /// A [`Task`] only admits `Send` callables; use [`LocalTask`] for others:
    ///
    /// ```compile_fail
    /// use std::rc::Rc;
    ///
    /// use inline_task::Task;
    /// use inline_task::space::S2;
    ///
    /// let rc = Rc::new(1);
    /// let task = Task::<S2>::new(move || drop(Rc::clone(&rc)));
    /// ```
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + Clone + 'static,
        K: Admits<F>,
    {
        Self::from_raw(RawTask::new(Plain(f)))
    }

    /// Stores `f` in a new task, or gives it back if it does not fit.
    ///
    /// # Example
    ///
    /// ```
    /// use inline_task::Task;
    /// use inline_task::space::S1;
    ///
    /// let narrow = 1usize;
    /// assert!(Task::<S1>::try_new(move || assert_eq!(narrow, 1)).is_ok());
    ///
    /// let wide = [0usize; 2];
    /// let err = Task::<S1>::try_new(move || assert_eq!(wide.len(), 2)).err().unwrap();
    /// let _closure = err.into_inner();
    /// ```
    pub fn try_new<F>(f: F) -> Result<Self, CapacityError<F>>
    where
        F: FnMut() + Clone + 'static,
        K: Admits<F>,
    {
        RawTask::try_new(Plain(f))
            .map(Self::from_raw)
            .map_err(|err| err.map(|Plain(f)| f))
    }

    /// Stores `f` together with the argument tuple `args`.
    ///
    /// Each call passes clones of the bound arguments to `f`. The fit of the
    /// callable and its arguments is checked at compile time.
    ///
    /// ```
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// use inline_task::Task;
    ///
    /// let out = Arc::new(AtomicI32::new(0));
    /// let mut task: Task = Task::bind(
    ///     |a: i32, b: i32, out: Arc<AtomicI32>| out.store(a + b, Ordering::Relaxed),
    ///     (2, 3, Arc::clone(&out)),
    /// );
    /// task.call().unwrap();
    /// assert_eq!(out.load(Ordering::Relaxed), 5);
    /// ```
    ///
    /// Bound arguments must be `Send` as well:
    ///
    /// ```compile_fail
    /// use std::rc::Rc;
    ///
    /// use inline_task::Task;
    /// use inline_task::space::S2;
    ///
    /// let task = Task::<S2>::bind(|rc: Rc<u8>| drop(rc), (Rc::new(1),));
    /// ```
    pub fn bind<F, Args>(f: F, args: Args) -> Self
    where
        F: Apply<Args> + Clone + 'static,
        Args: Clone + 'static,
        K: Admits<F> + Admits<Args>,
    {
        Self::from_raw(RawTask::new(Bound::new(f, args)))
    }

    /// Like [`Task::bind`], but checks the fit at runtime and gives the
    /// callable and its arguments back on failure.
    pub fn try_bind<F, Args>(f: F, args: Args) -> Result<Self, CapacityError<(F, Args)>>
    where
        F: Apply<Args> + Clone + 'static,
        Args: Clone + 'static,
        K: Admits<F> + Admits<Args>,
    {
        RawTask::try_new(Bound::new(f, args))
            .map(Self::from_raw)
            .map_err(|err| err.map(Bound::into_parts))
    }

    /// Returns `true` if the task holds an occupant.
    pub fn is_occupied(&self) -> bool {
        self.raw.is_occupied()
    }

    /// Returns `true` if the task holds no occupant.
    pub fn is_empty(&self) -> bool {
        !self.raw.is_occupied()
    }

    /// Layout of the current occupant, including any bound arguments.
    pub fn occupant_layout(&self) -> Option<Layout> {
        self.raw.occupant_layout()
    }

    /// Calls the occupant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInvocation`] if the task is empty.
    #[inline]
    pub fn call(&mut self) -> Result<(), Error> {
        self.raw.call()
    }

    /// Moves the occupant into a new task and leaves this one empty.
    ///
    /// ```
    /// use inline_task::Task;
    ///
    /// let mut source: Task = Task::new(|| {});
    /// let mut target = source.take();
    ///
    /// assert!(source.is_empty());
    /// assert!(target.call().is_ok());
    /// ```
    pub fn take(&mut self) -> Self {
        Self::from_raw(self.raw.take())
    }

    /// Destroys the occupant, leaving the task empty.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Destroys the current occupant, if any, and stores `f` instead.
    pub fn replace<F>(&mut self, f: F)
    where
        F: FnMut() + Clone + 'static,
        K: Admits<F>,
    {
        *self = Self::new(f);
    }

    /// Like [`Task::replace`], but checks the fit at runtime. On failure the
    /// task keeps its current occupant.
    pub fn try_replace<F>(&mut self, f: F) -> Result<(), CapacityError<F>>
    where
        F: FnMut() + Clone + 'static,
        K: Admits<F>,
    {
        *self = Self::try_new(f)?;
        Ok(())
    }

    /// Moves the occupant into a task with a different space.
    ///
    /// Fails, giving the task back, if the occupant does not fit `ToSpace`.
    ///
    /// ```
    /// use inline_task::Task;
    /// use inline_task::space::{S1, S4};
    ///
    /// let word = 1usize;
    /// let task: Task<S4> = Task::new(move || assert_eq!(word, 1));
    /// let task: Task<S1> = task.resize().ok().unwrap();
    /// assert!(task.resize::<()>().is_err());
    /// ```
    pub fn resize<ToSpace>(self) -> Result<Task<ToSpace, K>, Self> {
        self.raw
            .resize()
            .map(Task::from_raw)
            .map_err(Self::from_raw)
    }
}

impl<F, K: Kind> Task<F, K> {
    /// Stores `f` in a task whose space is `F` itself, exactly as large and
    /// as aligned as the callable.
    ///
    /// ```
    /// use inline_task::Task;
    ///
    /// let pair = (1u64, 2u64);
    /// let mut task: Task<_> = Task::exact(move || assert_eq!(pair.0 + pair.1, 3));
    /// assert!(task.call().is_ok());
    /// ```
    pub fn exact(f: F) -> Self
    where
        F: FnMut() + Clone + 'static,
        K: Admits<F>,
    {
        Self::new(f)
    }
}

impl<Space, K: Kind> Clone for Task<Space, K> {
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<Space, K: Kind> Default for Task<Space, K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Space, K: Kind> fmt::Debug for Task<Space, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME)
            .field("occupied", &self.is_occupied())
            .field("capacity", &Self::CAPACITY)
            .field("alignment", &Self::ALIGNMENT)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::space::*;

    #[test]
    fn test_basic() {
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);

        let mut task: LocalTask<S2> = LocalTask::new(move || sink.set(sink.get() + 1));
        assert!(task.is_occupied());
        task.call().unwrap();
        task.call().unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_default_is_empty() {
        let mut task: Task = Task::default();
        assert!(task.is_empty());
        assert_eq!(task.call(), Err(Error::EmptyInvocation));
        assert_eq!(task.occupant_layout(), None);
    }

    #[test]
    fn test_const_empty() {
        const EMPTY: Task<S1> = Task::empty();
        let task = EMPTY;
        assert!(task.is_empty());
    }

    #[test]
    fn test_capacity_constants() {
        assert_eq!(Task::<S4>::CAPACITY, 4 * core::mem::size_of::<usize>());
        assert_eq!(Task::<Aligned<A16, 32>>::ALIGNMENT, 16);
        assert_eq!(LocalTask::<S1>::CAPACITY, core::mem::size_of::<usize>());
    }

    #[test]
    fn test_try_replace_keeps_occupant() {
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);

        let mut task: LocalTask<S2> = LocalTask::new(move || sink.set(sink.get() + 1));
        let wide = [0u8; 64];
        assert!(task.try_replace(move || assert_eq!(wide[0], 0)).is_err());

        task.call().unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_replace_destroys_previous() {
        let first = Rc::new(());
        let held = Rc::clone(&first);

        let mut task: LocalTask<S2> = LocalTask::new(move || drop(Rc::clone(&held)));
        assert_eq!(Rc::strong_count(&first), 2);

        task.replace(|| {});
        assert_eq!(Rc::strong_count(&first), 1);
        assert!(task.is_occupied());
    }

    #[test]
    fn test_try_bind_gives_back_parts() {
        let err = Task::<S1>::try_bind(|a: [usize; 4]| assert_eq!(a[0], 7), ([7usize; 4],))
            .err()
            .unwrap();
        assert!(matches!(err.error(), Error::CapacityExceeded { .. }));

        let (_, (args,)) = err.into_inner();
        assert_eq!(args, [7; 4]);
    }

    #[test]
    fn test_exact_space() {
        let pair = (1u32, 2u16);
        let mut task: LocalTask<_> = LocalTask::exact(move || {
            let _ = &pair;
        });
        assert_eq!(task.occupant_layout(), Some(Layout::new::<(u32, u16)>()));
        task.call().unwrap();
    }

    #[test]
    fn test_debug() {
        let task: Task<S1> = Task::new(|| {});
        assert_eq!(
            format!("{task:?}"),
            format!(
                "Task {{ occupied: true, capacity: {}, alignment: {} }}",
                core::mem::size_of::<usize>(),
                core::mem::align_of::<usize>()
            )
        );

        let local: LocalTask<()> = LocalTask::empty();
        assert_eq!(
            format!("{local:?}"),
            "LocalTask { occupied: false, capacity: 0, alignment: 1 }"
        );
    }
}
