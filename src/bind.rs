//! Binding arguments to a callable at construction.

use crate::dispatch::Occupant;

/// A callable that can be applied to a bound argument tuple.
///
/// Implemented for every `FnMut(A1, .., An)` with up to eight arguments,
/// where each argument type is [`Clone`]. Every application receives fresh
/// clones of the bound arguments, so the bound tuple survives the call.
pub trait Apply<Args> {
    /// Calls `self` with clones of `args`.
    fn apply(&mut self, args: &Args);
}

macro_rules! impl_apply {
    ($($ty:ident $arg:ident),*) => {
        impl<Func, $($ty),*> Apply<($($ty,)*)> for Func
        where
            Func: FnMut($($ty),*),
            $($ty: Clone,)*
        {
            #[inline]
            fn apply(&mut self, args: &($($ty,)*)) {
                let ($($arg,)*) = args;
                self($($arg.clone()),*)
            }
        }
    };
}

impl_apply!();
impl_apply!(A1 a1);
impl_apply!(A1 a1, A2 a2);
impl_apply!(A1 a1, A2 a2, A3 a3);
impl_apply!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_apply!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_apply!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_apply!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_apply!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);

/// An occupant made of a callable and the arguments bound to it.
#[derive(Clone)]
pub(crate) struct Bound<F, Args> {
    func: F,
    args: Args,
}

impl<F, Args> Bound<F, Args> {
    pub(crate) fn new(func: F, args: Args) -> Self {
        Bound { func, args }
    }

    pub(crate) fn into_parts(self) -> (F, Args) {
        (self.func, self.args)
    }
}

impl<F, Args> Occupant for Bound<F, Args>
where
    F: Apply<Args> + Clone + 'static,
    Args: Clone + 'static,
{
    #[inline]
    fn invoke(&mut self) {
        self.func.apply(&self.args)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_apply_arities() {
        let mut zero = || {};
        zero.apply(&());

        let out = Cell::new(0);
        let mut one = |a: i32| out.set(a);
        one.apply(&(4,));
        assert_eq!(out.get(), 4);

        let mut eight = |a: i32, b: i32, c: i32, d: i32, e: i32, f: i32, g: i32, h: i32| {
            out.set(a + b + c + d + e + f + g + h)
        };
        eight.apply(&(1, 2, 3, 4, 5, 6, 7, 8));
        assert_eq!(out.get(), 36);
    }

    #[test]
    fn test_arguments_survive_calls() {
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let mut bound = Bound::new(
            move |s: String, n: usize| sink.set(sink.get() + s.len() * n),
            (String::from("abc"), 2usize),
        );

        bound.invoke();
        bound.invoke();
        assert_eq!(seen.get(), 12);

        let (_, (s, n)) = bound.into_parts();
        assert_eq!(s, "abc");
        assert_eq!(n, 2);
    }
}
