//! Type-erased shape stored inline, without a heap allocation.
//!
//! This module encapsulates the `buffer` field of [`RawInlineShape`], ensuring
//! it is only visible within this module. This visibility restriction
//! guarantees the safety invariant: **the leading bytes of the buffer always
//! hold an initialized `ShapeData<M>` that fits into the buffer**.
//!
//! # Safety Invariant
//!
//! The buffer can only be filled by [`RawInlineShape::from_model`], which
//! rejects models that do not fit at compile time, by [`Clone::clone`], which
//! copies a model that already fits into a buffer of the same configuration,
//! and by [`RawInlineShape::resize`], which checks the erased model's layout
//! against the new configuration before relocating it.
//!
//! Nothing above the vtable knows what the buffer holds, so the compiler
//! never drops it. [`RawInlineShape::drop`] drops the model in place through
//! the vtable, and operations that move the model elsewhere wrap `self` in
//! [`ManuallyDrop`] so that the old bytes are not dropped a second time.

use core::{
    cell::UnsafeCell,
    marker::PhantomData,
    mem::{ManuallyDrop, MaybeUninit},
    ptr::NonNull,
};

use crate::{
    handlers::DrawHandler,
    shape::{
        align::Alignment,
        data::ShapeData,
        model::{ExtendedModel, Model, PlainModel},
        raw::{RawShape, RawShapeRef},
    },
    util::Erased,
};

/// Uninitialized bytes with the size `SIZE` and the alignment of `A`.
#[repr(C)]
struct InlineBuffer<const SIZE: usize, A: Alignment> {
    /// Raises the alignment of the buffer without adding to its size
    _alignment: [A; 0],
    /// The storage itself. The `UnsafeCell` lets a stored model with interior
    /// mutability be mutated through a pointer derived from `&self`.
    bytes: UnsafeCell<[MaybeUninit<u8>; SIZE]>,
}

impl<const SIZE: usize, A: Alignment> InlineBuffer<SIZE, A> {
    /// Creates a buffer holding no value.
    #[inline]
    const fn uninit() -> Self {
        Self {
            _alignment: [],
            bytes: UnsafeCell::new([MaybeUninit::uninit(); SIZE]),
        }
    }

    /// Returns a pointer to the start of the buffer.
    #[inline]
    fn as_ptr(&self) -> NonNull<ShapeData<Erased>> {
        NonNull::from(&self.bytes).cast::<ShapeData<Erased>>()
    }

    /// Returns a pointer to the start of the buffer that may be used to move
    /// or drop its contents.
    #[inline]
    fn as_mut_ptr(&mut self) -> NonNull<ShapeData<Erased>> {
        NonNull::from(&mut self.bytes).cast::<ShapeData<Erased>>()
    }
}

/// Returns whether a `ShapeData` with the given size and alignment can be
/// stored in an inline buffer of `SIZE` bytes aligned to `A`.
#[inline]
const fn fits<const SIZE: usize, A: Alignment>(size: usize, align: usize) -> bool {
    size <= SIZE && align <= A::ALIGN
}

/// An owned [`ShapeData`] constructed in place inside a buffer of `SIZE` bytes
/// aligned to `A`.
///
/// The value never touches the heap. Moving a [`RawInlineShape`] moves the
/// whole buffer, which is sound because the stored model is an ordinary Rust
/// value and Rust values can always be moved bitwise.
///
/// The type is neither [`Send`] nor [`Sync`], because the stored type is
/// unknown.
#[repr(C)]
pub struct RawInlineShape<const SIZE: usize, A: Alignment> {
    /// The buffer holding the `ShapeData<M>`
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The buffer starts with an initialized `ShapeData<M>` for some `M`.
    /// 2. `size_of::<ShapeData<M>>() <= SIZE` and `align_of::<ShapeData<M>>()
    ///    <= A::ALIGN`.
    /// 3. The `ShapeData<M>` stays initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation
    ///    and after it has been relocated out of a `ManuallyDrop<Self>`.
    buffer: InlineBuffer<SIZE, A>,
    /// Opts out of `Send` and `Sync`
    _marker: PhantomData<*const ShapeData<Erased>>,
}

impl<const SIZE: usize, A: Alignment> RawInlineShape<SIZE, A> {
    /// Creates a new [`RawInlineShape`] that draws `value` with the handler
    /// `H`.
    ///
    /// Fails to compile if the value does not fit into the buffer.
    #[inline]
    pub fn new<T, H>(value: T) -> Self
    where
        T: Clone + 'static,
        H: DrawHandler<T>,
    {
        Self::from_model(PlainModel::<T, H>::new(value))
    }

    /// Creates a new [`RawInlineShape`] that draws `value` by calling
    /// `strategy`.
    ///
    /// Fails to compile if the value and the strategy together do not fit
    /// into the buffer.
    #[inline]
    pub fn with_strategy<T, D>(value: T, strategy: D) -> Self
    where
        T: Clone + 'static,
        D: Fn(&T, &mut core::fmt::Formatter<'_>) -> core::fmt::Result + Clone + 'static,
    {
        Self::from_model(ExtendedModel::new(value, strategy))
    }

    /// Constructs the model in place inside a fresh buffer.
    #[inline]
    fn from_model<M: Model>(model: M) -> Self {
        const {
            assert!(
                core::mem::size_of::<ShapeData<M>>() <= SIZE,
                "the shape does not fit into the inline buffer: increase its size",
            );
            assert!(
                core::mem::align_of::<ShapeData<M>>() <= A::ALIGN,
                "the shape does not fit into the inline buffer: increase its alignment",
            );
        }

        let mut buffer = InlineBuffer::<SIZE, A>::uninit();
        let target: NonNull<ShapeData<M>> = buffer.as_mut_ptr().cast();
        // SAFETY: The buffer is valid for writes of `SIZE` bytes and aligned to
        // `A::ALIGN`, and the const block above proves that `ShapeData<M>` fits.
        // The buffer holds no value yet, so nothing is overwritten.
        unsafe { target.write(ShapeData::new(model)) };

        Self {
            // SAFETY:
            // 1. We just wrote a `ShapeData<M>` to the start of the buffer.
            // 2. Checked by the const block above.
            // 3. We are creating the object here.
            buffer,
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the [`ShapeData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawShapeRef<'_> {
        // SAFETY:
        // 1. Guaranteed by the invariants on `RawInlineShape`.
        // 2. We hold a shared borrow of `self` for the returned lifetime, so the
        //    buffer can neither be moved nor dropped meanwhile.
        unsafe { RawShapeRef::from_non_null(self.buffer.as_ptr()) }
    }

    /// Moves the stored model into a buffer with a different configuration.
    ///
    /// The stored model type is no longer known at this point, so unlike
    /// construction the fit is checked at run time. If the model does not fit
    /// into the new buffer, `self` is returned unchanged in the `Err`
    /// variant.
    pub fn resize<const NEW_SIZE: usize, B: Alignment>(
        self,
    ) -> Result<RawInlineShape<NEW_SIZE, B>, Self> {
        let layout = self.as_ref().layout();
        if !fits::<NEW_SIZE, B>(layout.size(), layout.align()) {
            return Err(self);
        }

        let vtable = self.as_ref().vtable();
        let mut this = ManuallyDrop::new(self);
        let mut buffer = InlineBuffer::<NEW_SIZE, B>::uninit();

        // SAFETY:
        // 1. The buffer of `this` starts with an initialized `ShapeData<M>` and
        //    `vtable` belongs to it.
        // 2. The new buffer is valid for writes of `NEW_SIZE` bytes aligned to
        //    `B::ALIGN`, which we just checked is enough for the model. The two
        //    buffers are distinct locals, so they do not overlap.
        // 3. `this` is in a `ManuallyDrop` and is never used again.
        unsafe { vtable.relocate_into(this.buffer.as_mut_ptr(), buffer.as_mut_ptr()) };

        Ok(RawInlineShape {
            // SAFETY:
            // 1. The model was just relocated into the start of the buffer.
            // 2. Checked above.
            // 3. We are creating the object here.
            buffer,
            _marker: PhantomData,
        })
    }

    /// Moves the stored model into a heap allocated [`RawShape`].
    #[inline]
    pub fn into_boxed(self) -> RawShape {
        let vtable = self.as_ref().vtable();
        let mut this = ManuallyDrop::new(self);

        // SAFETY:
        // 1. The buffer of `this` starts with an initialized `ShapeData<M>` and
        //    `vtable` belongs to it.
        // 2. `this` is in a `ManuallyDrop` and is never used again.
        unsafe { vtable.relocate_boxed(this.buffer.as_mut_ptr()) }
    }
}

impl<const SIZE: usize, A: Alignment> Clone for RawInlineShape<SIZE, A> {
    /// Deep-copies the model into the buffer of a new [`RawInlineShape`].
    ///
    /// The new buffer is filled before the new value exists, so if cloning the
    /// model panics there is nothing to clean up and `self` is unaffected.
    #[inline]
    fn clone(&self) -> Self {
        let mut buffer = InlineBuffer::<SIZE, A>::uninit();

        // SAFETY:
        // 1. The new buffer has the same configuration as ours, and ours holds the
        //    model, so it is large and aligned enough.
        // 2. The new buffer holds no value yet.
        unsafe { self.as_ref().clone_into(buffer.as_mut_ptr()) };

        Self {
            // SAFETY:
            // 1. `clone_into` wrote a `ShapeData<M>` to the start of the buffer.
            // 2. Same model type as `self`, same configuration.
            // 3. We are creating the object here.
            buffer,
            _marker: PhantomData,
        }
    }
}

impl<const SIZE: usize, A: Alignment> core::ops::Drop for RawInlineShape<SIZE, A> {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The buffer holds an initialized `ShapeData<M>` and the vtable read from
        //    it belongs to `M`, as guaranteed by the invariants on this type.
        // 2. We are in the drop function, so the value is not used again. Values
        //    relocated elsewhere were wrapped in `ManuallyDrop` and never get here.
        unsafe { vtable.drop_in_place(self.buffer.as_mut_ptr()) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, rc::Rc, string::String};
    use core::{any::TypeId, cell::Cell};

    use super::*;
    use crate::shape::align::{Align8, Align16, Align64};

    struct HandlerU64;
    impl DrawHandler<u64> for HandlerU64 {
        fn draw(value: &u64, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(formatter, "u64 {value}")
        }
    }

    #[derive(Clone)]
    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct HandlerCounted;
    impl DrawHandler<Counted> for HandlerCounted {
        fn draw(value: &Counted, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(formatter, "dropped {} times", value.0.get())
        }
    }

    struct Draw<'a>(RawShapeRef<'a>);
    impl core::fmt::Display for Draw<'_> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            self.0.draw(f)
        }
    }

    #[test]
    fn test_inline_shape_size() {
        assert_eq!(core::mem::size_of::<RawInlineShape<128, Align16>>(), 128);
        assert_eq!(core::mem::align_of::<RawInlineShape<128, Align16>>(), 16);
        assert_eq!(core::mem::size_of::<RawInlineShape<24, Align8>>(), 24);
        assert_eq!(core::mem::size_of::<RawInlineShape<24, Align64>>(), 64);
    }

    #[test]
    fn test_inline_shape_stores_in_buffer() {
        let shape = RawInlineShape::<128, Align16>::new::<u64, HandlerU64>(9);
        let buffer_start = core::ptr::from_ref(&shape).cast::<u8>();

        assert_eq!(shape.as_ref().as_ptr().cast::<u8>(), buffer_start);
        assert_eq!(format!("{}", Draw(shape.as_ref())), "u64 9");
        assert_eq!(shape.as_ref().value_type_id(), TypeId::of::<u64>());
    }

    #[test]
    fn test_inline_shape_strategy() {
        let shape = RawInlineShape::<32, Align8>::with_strategy(
            3_u64,
            |value: &u64, f: &mut core::fmt::Formatter<'_>| write!(f, "strategy {value}"),
        );
        assert_eq!(format!("{}", Draw(shape.as_ref())), "strategy 3");
    }

    #[test]
    fn test_inline_shape_clone_is_independent() {
        let value = String::from("x");
        let shape = RawInlineShape::<64, Align16>::new::<String, StringHandler>(value);
        let copy = shape.clone();

        assert_ne!(shape.as_ref().as_ptr(), copy.as_ref().as_ptr());
        drop(shape);
        assert_eq!(format!("{}", Draw(copy.as_ref())), "string x");
    }

    struct StringHandler;
    impl DrawHandler<String> for StringHandler {
        fn draw(value: &String, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(formatter, "string {value}")
        }
    }

    #[test]
    fn test_inline_shape_drops_exactly_once() {
        let drops = Rc::new(Cell::new(0));

        let counted = Counted(drops.clone());
        let shape = RawInlineShape::<32, Align8>::new::<Counted, HandlerCounted>(counted);
        let copy = shape.clone();
        assert_eq!(drops.get(), 0);

        drop(shape);
        assert_eq!(drops.get(), 1);
        drop(copy);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_inline_shape_resize() {
        let drops = Rc::new(Cell::new(0));
        let counted = Counted(drops.clone());
        let shape = RawInlineShape::<128, Align16>::new::<Counted, HandlerCounted>(counted);

        let smaller: RawInlineShape<16, Align8> = match shape.resize() {
            Ok(shape) => shape,
            Err(_) => panic!("a pointer-sized model fits into 16 bytes"),
        };
        assert_eq!(drops.get(), 0);
        assert_eq!(format!("{}", Draw(smaller.as_ref())), "dropped 0 times");

        drop(smaller);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_inline_shape_resize_rejects_without_side_effects() {
        let drops = Rc::new(Cell::new(0));
        let shape = RawInlineShape::<64, Align16>::with_strategy(
            Counted(drops.clone()),
            |_: &Counted, f: &mut core::fmt::Formatter<'_>| write!(f, "kept"),
        );

        let shape = match shape.resize::<8, Align8>() {
            Ok(_) => panic!("a vtable and a model cannot fit into 8 bytes"),
            Err(shape) => shape,
        };
        assert_eq!(drops.get(), 0);
        assert_eq!(format!("{}", Draw(shape.as_ref())), "kept");
    }

    #[test]
    fn test_inline_shape_into_boxed() {
        let drops = Rc::new(Cell::new(0));
        let counted = Counted(drops.clone());
        let shape = RawInlineShape::<32, Align8>::new::<Counted, HandlerCounted>(counted);

        let boxed = shape.into_boxed();
        assert_eq!(drops.get(), 0);
        assert_eq!(format!("{}", Draw(boxed.as_ref())), "dropped 0 times");

        drop(boxed);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_inline_shape_interior_mutability() {
        #[derive(Clone)]
        struct Hits(Cell<u32>);

        struct HitHandler;
        impl DrawHandler<Hits> for HitHandler {
            fn draw(value: &Hits, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                value.0.set(value.0.get() + 1);
                write!(formatter, "{}", value.0.get())
            }
        }

        let hits = Hits(Cell::new(0));
        let shape = RawInlineShape::<32, Align8>::new::<Hits, HitHandler>(hits);
        assert_eq!(format!("{}", Draw(shape.as_ref())), "1");
        assert_eq!(format!("{}", Draw(shape.as_ref())), "2");
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawInlineShape<128, Align16>: Send, Sync);
    }
}
