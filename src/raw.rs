use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem::{self, align_of, size_of, MaybeUninit};
use core::ptr;

use crate::dispatch::{Dispatch, Occupant, Operation};
use crate::error::{CapacityError, Error};

/// Compile-time fit of an occupant `T` into `Space`.
struct Fits<T, Space>(PhantomData<(T, Space)>);

impl<T, Space> Fits<T, Space> {
    const FITS: bool =
        size_of::<T>() <= size_of::<Space>() && align_of::<T>() <= align_of::<Space>();

    const ASSERT: () = assert!(
        Self::FITS,
        "callable does not fit in the inline space of the task"
    );
}

/// Inline storage plus the dispatch bound to whatever occupies it.
///
/// `dispatch` is `Some` exactly when `storage` holds a live occupant.
///
/// Auto traits only follow `Space`; the public task adds the markers that
/// match what its occupants are allowed to be.
pub(crate) struct RawTask<Space> {
    storage: MaybeUninit<Space>,
    dispatch: Option<Dispatch>,
}

impl<Space> RawTask<Space> {
    pub(crate) const CAPACITY: usize = size_of::<Space>();
    pub(crate) const ALIGNMENT: usize = align_of::<Space>();

    pub(crate) const fn empty() -> Self {
        RawTask {
            storage: MaybeUninit::uninit(),
            dispatch: None,
        }
    }

    /// Stores `occupant`, rejecting oversized types at compile time.
    pub(crate) fn new<T: Occupant>(occupant: T) -> Self {
        let () = Fits::<T, Space>::ASSERT;
        // SAFETY: the size and alignment were just asserted.
        unsafe { Self::new_unchecked(occupant) }
    }

    /// Stores `occupant`, or gives it back if it does not fit.
    pub(crate) fn try_new<T: Occupant>(occupant: T) -> Result<Self, CapacityError<T>> {
        if Fits::<T, Space>::FITS {
            // SAFETY: the size and alignment were just checked.
            Ok(unsafe { Self::new_unchecked(occupant) })
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                size = size_of::<T>(),
                align = align_of::<T>(),
                capacity = Self::CAPACITY,
                capacity_align = Self::ALIGNMENT,
                "rejected oversized callable"
            );
            Err(CapacityError::new(
                occupant,
                size_of::<T>(),
                align_of::<T>(),
                Self::CAPACITY,
                Self::ALIGNMENT,
            ))
        }
    }

    /// # Safety
    ///
    /// `T` must fit in `Space` by both size and alignment.
    unsafe fn new_unchecked<T: Occupant>(occupant: T) -> Self {
        // Writes only ever target a fresh empty task, never a live occupant.
        let mut task = Self::empty();
        unsafe { task.storage.as_mut_ptr().cast::<T>().write(occupant) };
        task.dispatch = Some(Dispatch::of::<T>());
        task
    }

    pub(crate) fn is_occupied(&self) -> bool {
        self.dispatch.is_some()
    }

    pub(crate) fn occupant_layout(&self) -> Option<Layout> {
        self.dispatch.map(|dispatch| dispatch.layout)
    }

    pub(crate) fn call(&mut self) -> Result<(), Error> {
        match self.dispatch {
            Some(dispatch) => {
                // SAFETY: the invoker was bound to the live occupant, which
                // is exclusively borrowed through `self`.
                unsafe { (dispatch.invoker)(self.storage.as_mut_ptr().cast()) };
                Ok(())
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(capacity = Self::CAPACITY, "invoked an empty task");
                Err(Error::EmptyInvocation)
            }
        }
    }

    /// Moves the occupant out, leaving `self` empty.
    pub(crate) fn take(&mut self) -> Self {
        mem::replace(self, Self::empty())
    }

    /// Destroys the occupant, if any.
    pub(crate) fn clear(&mut self) {
        // Detach first so a panicking destructor cannot run twice.
        if let Some(dispatch) = self.dispatch.take() {
            // SAFETY: the manager was bound to the occupant in storage.
            unsafe {
                (dispatch.manager)(Operation::Destroy {
                    target: self.storage.as_mut_ptr().cast(),
                })
            }
        }
    }

    /// Relocates the occupant into a task with another space.
    pub(crate) fn resize<To>(mut self) -> Result<RawTask<To>, Self> {
        let Some(dispatch) = self.dispatch else {
            return Ok(RawTask::empty());
        };
        let layout = dispatch.layout;
        if layout.size() > RawTask::<To>::CAPACITY || layout.align() > RawTask::<To>::ALIGNMENT {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                size = layout.size(),
                align = layout.align(),
                capacity = RawTask::<To>::CAPACITY,
                capacity_align = RawTask::<To>::ALIGNMENT,
                "rejected resize of task"
            );
            return Err(self);
        }

        let mut task = RawTask::<To>::empty();
        // SAFETY: the occupant fits the destination, and detaching the
        // dispatch below hands it over without running its destructor.
        unsafe {
            ptr::copy_nonoverlapping(
                self.storage.as_ptr().cast::<u8>(),
                task.storage.as_mut_ptr().cast::<u8>(),
                layout.size(),
            );
        }
        task.dispatch = self.dispatch.take();
        Ok(task)
    }
}

impl<Space> Clone for RawTask<Space> {
    fn clone(&self) -> Self {
        let mut task = Self::empty();
        if let Some(dispatch) = self.dispatch {
            // SAFETY: the manager was bound to the occupant of `self`, and the
            // empty destination has room for it since it shares the space.
            unsafe {
                (dispatch.manager)(Operation::Clone {
                    src: self.storage.as_ptr().cast(),
                    dst: task.storage.as_mut_ptr().cast(),
                })
            }
            // Only now is there something to destroy.
            task.dispatch = Some(dispatch);
        }
        task
    }
}

impl<Space> Drop for RawTask<Space> {
    fn drop(&mut self) {
        self.clear();
    }
}
