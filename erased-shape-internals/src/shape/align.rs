//! Alignment markers for inline buffers.
//!
//! Rust cannot take an alignment as a const generic argument to
//! `#[repr(align(N))]`, so the alignment of an inline buffer is selected with
//! a zero-sized marker type instead. A zero-length array of the marker is
//! placed in front of the buffer bytes, which raises the alignment of the
//! whole buffer without adding to its size.
//!
//! Every stored [`ShapeData`](super::data::ShapeData) begins with a vtable
//! reference, so alignments below that of a pointer would never fit anything
//! and are not offered.

mod sealed {
    /// Prevents downstream crates from declaring their own alignments.
    pub trait Sealed {}
}

/// An alignment that an inline buffer can be configured with.
///
/// This trait is sealed and implemented by [`Align8`], [`Align16`],
/// [`Align32`] and [`Align64`].
pub trait Alignment: sealed::Sealed + Copy + 'static {
    /// The alignment in bytes.
    const ALIGN: usize;
}

/// Declares an alignment marker together with its [`Alignment`] impl.
macro_rules! alignment {
    ($(#[$meta:meta])* $name:ident = $align:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
        #[repr(align($align))]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl Alignment for $name {
            const ALIGN: usize = $align;
        }
    };
}

alignment!(
    /// Aligns an inline buffer to 8 bytes.
    Align8 = 8
);
alignment!(
    /// Aligns an inline buffer to 16 bytes. This is the default.
    Align16 = 16
);
alignment!(
    /// Aligns an inline buffer to 32 bytes.
    Align32 = 32
);
alignment!(
    /// Aligns an inline buffer to 64 bytes.
    Align64 = 64
);

#[cfg(test)]
mod tests {
    use core::mem::{align_of, size_of};

    use super::*;

    #[test]
    fn test_markers_match_their_constant() {
        assert_eq!(align_of::<Align8>(), Align8::ALIGN);
        assert_eq!(align_of::<Align16>(), Align16::ALIGN);
        assert_eq!(align_of::<Align32>(), Align32::ALIGN);
        assert_eq!(align_of::<Align64>(), Align64::ALIGN);
    }

    #[test]
    fn test_markers_are_zero_sized() {
        assert_eq!(size_of::<Align8>(), 0);
        assert_eq!(size_of::<Align64>(), 0);
        assert_eq!(size_of::<[Align64; 0]>(), 0);
        assert_eq!(align_of::<[Align64; 0]>(), 64);
    }
}
