//! Type-erased shape pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawShape`] and
//! [`RawShapeRef`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer of a
//! [`RawShape`] always comes from `Box<ShapeData<M>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field of [`RawShape`] can only be set via
//! [`RawShape::from_data`] (which creates it from `Box::into_raw`), and cannot
//! be modified afterward (no `pub` or `pub(crate)` fields), the pointer
//! provenance remains valid throughout the value's lifetime.
//!
//! The [`RawShape::drop`] implementation relies on this invariant to safely
//! reconstruct the `Box` and deallocate the memory.
//!
//! A [`RawShapeRef`] is weaker: it points to an initialized `ShapeData<M>`
//! that is either owned by a [`RawShape`] or lives inside the buffer of a
//! [`RawInlineShape`](crate::RawInlineShape).
//!
//! # Type Erasure
//!
//! The concrete model type `M` is erased by casting to `ShapeData<Erased>`.
//! The vtable stored within the `ShapeData` provides the function pointers
//! needed to operate on the model afterwards.

use alloc::boxed::Box;
use core::{alloc::Layout, any::TypeId, ptr::NonNull};

use crate::{
    handlers::DrawHandler,
    shape::{
        data::ShapeData,
        model::{ExtendedModel, Model, PlainModel},
    },
    util::Erased,
};

/// A pointer to a [`ShapeData`] that is guaranteed to point to an
/// initialized instance of a [`ShapeData<M>`] for some specific `M`, though
/// we do not know which actual `M` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawShape::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<ShapeData<M>>`] directly, because that does not
/// allow us to type-erase the `M`.
#[repr(transparent)]
pub struct RawShape {
    /// Pointer to the inner shape data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ShapeData<M>>` for
    ///    some `M` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ShapeData<M>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation.
    ptr: NonNull<ShapeData<Erased>>,
}

impl RawShape {
    /// Creates a new [`RawShape`] that draws `value` with the handler `H`.
    #[inline]
    pub fn new<T, H>(value: T) -> Self
    where
        T: Clone + 'static,
        H: DrawHandler<T>,
    {
        Self::from_model(PlainModel::<T, H>::new(value))
    }

    /// Creates a new [`RawShape`] that draws `value` by calling `strategy`.
    #[inline]
    pub fn with_strategy<T, D>(value: T, strategy: D) -> Self
    where
        T: Clone + 'static,
        D: Fn(&T, &mut core::fmt::Formatter<'_>) -> core::fmt::Result + Clone + 'static,
    {
        Self::from_model(ExtendedModel::new(value, strategy))
    }

    /// Allocates the model on the heap.
    #[inline]
    pub(super) fn from_model<M: Model>(model: M) -> Self {
        Self::from_data(Box::new(ShapeData::new(model)))
    }

    /// Takes ownership of an already allocated [`ShapeData`].
    #[inline]
    pub(super) fn from_data<M: Model>(data: Box<ShapeData<M>>) -> Self {
        let ptr: *mut ShapeData<M> = Box::into_raw(data);
        let ptr: *mut ShapeData<Erased> = ptr.cast::<ShapeData<Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<ShapeData<Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self { ptr }
    }

    /// Returns a reference to the [`ShapeData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawShapeRef<'_> {
        RawShapeRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }
}

impl Clone for RawShape {
    /// Deep-copies the model into a new allocation.
    ///
    /// Nothing is shared between the original and the copy afterwards.
    #[inline]
    fn clone(&self) -> Self {
        self.as_ref().clone_boxed()
    }
}

impl core::ops::Drop for RawShape {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawShape::from_data`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to match the
        //    data in the `ShapeData`.
        // 3. The pointer is initialized and has not been previously free as guaranteed
        //    by the invariants on this type. We are correctly transferring ownership
        //    here and the pointer is not used afterwards, as we are in the drop
        //    function.
        unsafe { vtable.drop_boxed(self.ptr) }
    }
}

/// A lifetime-bound pointer to a [`ShapeData`] that is guaranteed to point to
/// an initialized instance of a [`ShapeData<M>`] for some specific `M`,
/// though we do not know which actual `M` it is.
///
/// We cannot use a [`&'a ShapeData<M>`] directly, because that would require
/// us to know the actual type of the model, which we do not.
///
/// [`&'a ShapeData<M>`]: ShapeData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawShapeRef<'a> {
    /// Pointer to the inner shape data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer points to an initialized `ShapeData<M>` for some `M`,
    ///    owned either by a `RawShape` or by a `RawInlineShape`.
    /// 2. The pointer will point to the same `ShapeData<M>` for the entire
    ///    lifetime `'a`.
    ptr: NonNull<ShapeData<Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a ShapeData<Erased>`
    _marker: core::marker::PhantomData<&'a ShapeData<Erased>>,
}

impl<'a> RawShapeRef<'a> {
    /// Creates a [`RawShapeRef`] from a pointer into other storage.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized `ShapeData<M>` for some `M`.
    /// 2. The `ShapeData<M>` stays initialized and is not mutated or moved for
    ///    the lifetime `'a`.
    #[inline]
    pub(super) unsafe fn from_non_null(ptr: NonNull<ShapeData<Erased>>) -> Self {
        Self {
            ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Casts the [`RawShapeRef`] to a [`ShapeData<M>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `M` matches the actual model type stored in the
    ///    [`ShapeData`].
    #[inline]
    pub(super) unsafe fn cast_inner<M: Model>(self) -> &'a ShapeData<M> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<M::Value>());

        let this = self.ptr.cast::<ShapeData<M>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawShapeRef's type invariants)
        // - The pointee is properly initialized (RawShapeRef's doc comment guarantees
        //   it points to an initialized ShapeData<M> for some M)
        // - The type `M` matches the actual model type (guaranteed by caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawShapeRef<'a>'s lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a raw pointer to the [`ShapeData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const ShapeData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the [`TypeId`] of the stored value.
    #[inline]
    pub fn value_type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the stored value.
    #[inline]
    pub fn value_type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Returns the [`TypeId`] of the handler or strategy that draws the
    /// stored value.
    #[inline]
    pub fn dispatch_type_id(self) -> TypeId {
        self.vtable().dispatch_type_id()
    }

    /// Returns the memory layout of the stored [`ShapeData`], vtable pointer
    /// included.
    #[inline]
    pub fn layout(self) -> Layout {
        self.vtable().layout()
    }

    /// Draws the stored value with the handler or strategy chosen when the
    /// [`ShapeData`] was created.
    #[inline]
    pub fn draw(self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ShapeData`.
        unsafe { vtable.draw(self, formatter) }
    }

    /// Deep-copies the stored model into a new heap allocated [`RawShape`].
    #[inline]
    pub fn clone_boxed(self) -> RawShape {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ShapeData`.
        unsafe { vtable.clone_boxed(self) }
    }

    /// Deep-copies the stored model into the memory at `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `target` is valid for writes of [`Self::layout`] bytes and aligned to
    ///    [`Self::layout`].
    /// 2. `target` does not hold a live value that needs dropping.
    #[inline]
    pub(super) unsafe fn clone_into(self, target: NonNull<ShapeData<Erased>>) {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ShapeData`.
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { vtable.clone_into(self, target) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;

    struct HandlerI32;
    impl DrawHandler<i32> for HandlerI32 {
        fn draw(value: &i32, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(formatter, "i32 {value}")
        }
    }

    struct HandlerString;
    impl DrawHandler<String> for HandlerString {
        fn draw(value: &String, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(formatter, "string {value:?}")
        }
    }

    // Helper struct for testing drawing
    struct TestDisplayFormatter<F> {
        formatter_fn: F,
    }

    impl<F> TestDisplayFormatter<F>
    where
        F: Fn(&mut core::fmt::Formatter<'_>) -> core::fmt::Result,
    {
        fn new(formatter_fn: F) -> Self {
            Self { formatter_fn }
        }
    }

    impl<F> core::fmt::Display for TestDisplayFormatter<F>
    where
        F: Fn(&mut core::fmt::Formatter<'_>) -> core::fmt::Result,
    {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            (self.formatter_fn)(f)
        }
    }

    #[test]
    fn test_raw_shape_size() {
        assert_eq!(
            core::mem::size_of::<RawShape>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawShape>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<RawShapeRef<'_>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawShapeRef<'_>>>(),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_shape_get_refs() {
        let shape = RawShape::new::<i32, HandlerI32>(100);
        let shape_ref = shape.as_ref();

        // Accessing the pointer multiple times should be safe and consistent
        let ptr1 = shape_ref.as_ptr();
        let ptr2 = shape_ref.as_ptr();
        assert_eq!(ptr1, ptr2);
    }

    #[test]
    fn test_raw_shape_type_info() {
        let int_shape = RawShape::new::<i32, HandlerI32>(42);
        let string_shape = RawShape::new::<String, HandlerString>(String::from("test"));

        assert_eq!(int_shape.as_ref().value_type_id(), TypeId::of::<i32>());
        assert_eq!(
            string_shape.as_ref().value_type_id(),
            TypeId::of::<String>()
        );
        assert_eq!(
            int_shape.as_ref().dispatch_type_id(),
            TypeId::of::<HandlerI32>()
        );

        // The vtables should be different
        assert!(!core::ptr::eq(
            int_shape.as_ref().vtable(),
            string_shape.as_ref().vtable()
        ));
    }

    #[test]
    fn test_raw_shape_draw() {
        let int_shape = RawShape::new::<i32, HandlerI32>(42);
        let string_shape = RawShape::new::<String, HandlerString>(String::from("test"));

        let int_ref = int_shape.as_ref();
        let string_ref = string_shape.as_ref();

        assert_eq!(
            format!("{}", TestDisplayFormatter::new(|f| int_ref.draw(f))),
            "i32 42"
        );
        assert_eq!(
            format!("{}", TestDisplayFormatter::new(|f| string_ref.draw(f))),
            "string \"test\""
        );
    }

    #[test]
    fn test_raw_shape_strategy_overrides_handler() {
        fn injected(value: &i32, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "injected {value}")
        }

        let shape = RawShape::with_strategy(5_i32, injected);
        let shape_ref = shape.as_ref();

        assert_eq!(
            format!("{}", TestDisplayFormatter::new(|f| shape_ref.draw(f))),
            "injected 5"
        );
        assert_eq!(shape_ref.value_type_id(), TypeId::of::<i32>());
    }

    #[test]
    fn test_raw_shape_clone_is_deep() {
        let original = RawShape::new::<String, HandlerString>(String::from("deep"));
        let copy = original.clone();

        assert_ne!(original.as_ref().as_ptr(), copy.as_ref().as_ptr());
        assert!(core::ptr::eq(
            original.as_ref().vtable(),
            copy.as_ref().vtable()
        ));

        drop(original);
        let copy_ref = copy.as_ref();
        assert_eq!(
            format!("{}", TestDisplayFormatter::new(|f| copy_ref.draw(f))),
            "string \"deep\""
        );
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawShape: Send, Sync);
        static_assertions::assert_not_impl_any!(RawShapeRef<'_>: Send, Sync);
    }
}
