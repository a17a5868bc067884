//! Inline space types.
//!
//! A space only describes capacity: a task stores its occupant in a
//! `MaybeUninit<Space>`, so the capacity is `size_of::<Space>()` and the
//! alignment is `align_of::<Space>()`. No space value is ever constructed or
//! dropped, which means any type can be used as a space.

/// Space of one machine word.
pub struct S1 {
    _inner: [usize; 1],
}

/// Space of two machine words.
pub struct S2 {
    _inner: [usize; 2],
}

/// Space of four machine words.
pub struct S4 {
    _inner: [usize; 4],
}

/// Space of eight machine words.
pub struct S8 {
    _inner: [usize; 8],
}

/// Space of sixteen machine words.
pub struct S16 {
    _inner: [usize; 16],
}

/// Space of thirty-two machine words.
pub struct S32 {
    _inner: [usize; 32],
}

/// Space of sixty-four machine words.
pub struct S64 {
    _inner: [usize; 64],
}

macro_rules! alignments {
    ($($(#[$meta:meta])* $name:ident = $align:tt;)*) => {$(
        $(#[$meta])*
        #[repr(align($align))]
        pub struct $name;
    )*};
}

alignments! {
    /// 1-byte alignment marker.
    A1 = 1;
    /// 2-byte alignment marker.
    A2 = 2;
    /// 4-byte alignment marker.
    A4 = 4;
    /// 8-byte alignment marker.
    A8 = 8;
    /// 16-byte alignment marker.
    A16 = 16;
    /// 32-byte alignment marker.
    A32 = 32;
    /// 64-byte alignment marker.
    A64 = 64;
}

/// `N` bytes of space aligned to the alignment marker `A`.
///
/// The size is `N` rounded up to a multiple of the alignment.
///
/// ```
/// use inline_task::space::{Aligned, A16};
///
/// assert_eq!(core::mem::size_of::<Aligned<A16, 32>>(), 32);
/// assert_eq!(core::mem::align_of::<Aligned<A16, 32>>(), 16);
/// assert_eq!(core::mem::size_of::<Aligned<A16, 33>>(), 48);
/// ```
#[repr(C)]
pub struct Aligned<A, const N: usize> {
    _align: [A; 0],
    _bytes: [u8; N],
}

/// 32 bytes aligned to 16, used when a task names no space.
pub type DefaultSpace = Aligned<A16, 32>;

#[cfg(test)]
mod tests {
    use core::mem::{align_of, size_of};

    use static_assertions::const_assert_eq;

    use super::*;

    const_assert_eq!(size_of::<S1>(), size_of::<usize>());
    const_assert_eq!(size_of::<S64>(), 64 * size_of::<usize>());
    const_assert_eq!(align_of::<S4>(), align_of::<usize>());

    #[test]
    fn test_aligned_rounds_up() {
        assert_eq!(size_of::<Aligned<A1, 3>>(), 3);
        assert_eq!(size_of::<Aligned<A8, 3>>(), 8);
        assert_eq!(size_of::<Aligned<A64, 1>>(), 64);
        assert_eq!(align_of::<Aligned<A32, 1>>(), 32);
    }

    #[test]
    fn test_zero_sized_space() {
        assert_eq!(size_of::<Aligned<A16, 0>>(), 0);
        assert_eq!(align_of::<Aligned<A16, 0>>(), 16);
    }

    #[test]
    fn test_default_space() {
        assert_eq!(size_of::<DefaultSpace>(), 32);
        assert_eq!(align_of::<DefaultSpace>(), 16);
    }
}
