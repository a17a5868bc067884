use core::alloc::Layout;
use core::ptr;

/// The operations a manager performs on an occupant it was bound to.
pub(crate) enum Operation {
    /// Clone the occupant at `src` into the uninitialized storage at `dst`.
    Clone { src: *const u8, dst: *mut u8 },
    /// Run the destructor of the occupant at `target` in place.
    Destroy { target: *mut u8 },
}

/// Clones or destroys an occupant of one concrete type.
///
/// # Safety
///
/// Every pointer in the operation must point to storage holding (or, for
/// `dst`, able to hold) the exact type the manager was bound to.
pub(crate) type Manager = unsafe fn(Operation);

/// Calls an occupant of one concrete type.
///
/// # Safety
///
/// The pointer must point to a live occupant of the type the invoker was
/// bound to, with no other reference to it alive.
pub(crate) type Invoker = unsafe fn(*mut u8);

/// Something a task can hold: it can be called repeatedly and cloned.
pub(crate) trait Occupant: Clone + 'static {
    fn invoke(&mut self);
}

/// The erased knowledge about an occupant, bound when it is constructed.
#[derive(Clone, Copy)]
pub(crate) struct Dispatch {
    pub(crate) manager: Manager,
    pub(crate) invoker: Invoker,
    pub(crate) layout: Layout,
}

impl Dispatch {
    pub(crate) fn of<T: Occupant>() -> Self {
        Dispatch {
            manager: manage::<T>,
            invoker: invoke::<T>,
            layout: Layout::new::<T>(),
        }
    }
}

unsafe fn manage<T: Occupant>(op: Operation) {
    match op {
        Operation::Clone { src, dst } => {
            let src = unsafe { &*src.cast::<T>() };
            unsafe { dst.cast::<T>().write(src.clone()) }
        }
        Operation::Destroy { target } => unsafe { ptr::drop_in_place(target.cast::<T>()) },
    }
}

unsafe fn invoke<T: Occupant>(target: *mut u8) {
    let occupant = unsafe { &mut *target.cast::<T>() };
    occupant.invoke();
}

/// An occupant made of a plain nullary callable.
#[derive(Clone)]
#[repr(transparent)]
pub(crate) struct Plain<F>(pub(crate) F);

impl<F> Occupant for Plain<F>
where
    F: FnMut() + Clone + 'static,
{
    #[inline]
    fn invoke(&mut self) {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use core::mem::MaybeUninit;
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone)]
    struct Counted {
        calls: Rc<Cell<usize>>,
        drops: Rc<Cell<usize>>,
    }

    impl Occupant for Counted {
        fn invoke(&mut self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn test_manager_clones_and_destroys() {
        let calls = Rc::new(Cell::new(0));
        let drops = Rc::new(Cell::new(0));
        let dispatch = Dispatch::of::<Counted>();

        let mut src = MaybeUninit::new(Counted {
            calls: Rc::clone(&calls),
            drops: Rc::clone(&drops),
        });
        let mut dst = MaybeUninit::<Counted>::uninit();

        unsafe {
            (dispatch.manager)(Operation::Clone {
                src: src.as_ptr().cast(),
                dst: dst.as_mut_ptr().cast(),
            });
            (dispatch.invoker)(dst.as_mut_ptr().cast());
            (dispatch.invoker)(src.as_mut_ptr().cast());
        }
        assert_eq!(calls.get(), 2);
        assert_eq!(drops.get(), 0);

        unsafe {
            (dispatch.manager)(Operation::Destroy {
                target: src.as_mut_ptr().cast(),
            });
            (dispatch.manager)(Operation::Destroy {
                target: dst.as_mut_ptr().cast(),
            });
        }
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_layout_matches_occupant() {
        let dispatch = Dispatch::of::<Plain<fn()>>();
        assert_eq!(dispatch.layout, Layout::new::<fn()>());
    }
}
