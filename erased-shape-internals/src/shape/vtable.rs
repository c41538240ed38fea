//! Vtable for type-erased shape operations.
//!
//! This module contains the [`ShapeVtable`], the concept of the erased
//! container. It enables drawing, duplicating, relocating and destroying a
//! [`ShapeData`] when its concrete model type `M` has been erased. The vtable
//! stores function pointers that dispatch to the correct typed
//! implementations.
//!
//! This module encapsulates the fields of [`ShapeVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameter must match the actual model type
//! stored in the [`ShapeData`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`ShapeVtable::new`], which pairs the function pointers
//! with a specific model type `M` at compile time.
//!
//! # Storage Strategies
//!
//! Some entries only make sense for one storage strategy:
//!
//! - `clone_boxed` and `drop_boxed` work on [`Box`] allocations and are used by
//!   [`RawShape`].
//! - `clone_into`, `relocate_into` and `drop_in_place` work on caller-supplied
//!   memory and are used by [`RawInlineShape`].
//! - `relocate_boxed` moves a model out of caller-supplied memory into a fresh
//!   [`Box`] allocation.
//!
//! [`RawInlineShape`]: crate::RawInlineShape

use alloc::boxed::Box;
use core::{alloc::Layout, any::TypeId, ptr::NonNull};

use crate::{
    shape::{
        data::ShapeData,
        model::Model,
        raw::{RawShape, RawShapeRef},
    },
    util::Erased,
};

/// Vtable for type-erased shape operations.
///
/// Contains function pointers for performing operations on shapes without
/// knowing their model type at compile time.
///
/// # Safety
///
/// The following safety invariants are guaranteed to be upheld as long as this
/// struct exists:
///
/// * The fields `draw`, `clone_boxed`, `drop_boxed`, `clone_into`,
///   `relocate_into`, `relocate_boxed` and `drop_in_place` all point to the
///   functions defined below
/// * The concrete pointers are all instantiated with the same model type `M`
///   that was used to create this `ShapeVtable`, and `layout` is the layout of
///   `ShapeData<M>`.
pub(crate) struct ShapeVtable {
    /// Gets the [`TypeId`] of the value type stored in the model.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the value type stored in the
    /// model.
    type_name: fn() -> &'static str,
    /// Gets the [`TypeId`] of the handler or strategy of the model.
    dispatch_type_id: fn() -> TypeId,
    /// The layout of the whole `ShapeData<M>`.
    layout: Layout,
    /// Draws the model.
    draw: unsafe fn(RawShapeRef<'_>, &mut core::fmt::Formatter<'_>) -> core::fmt::Result,
    /// Clones the model into a new [`Box`] allocation.
    clone_boxed: unsafe fn(RawShapeRef<'_>) -> RawShape,
    /// Drops the [`Box<ShapeData<M>>`] instance pointed to by this pointer.
    drop_boxed: unsafe fn(NonNull<ShapeData<Erased>>),
    /// Clones the model into the memory pointed to by the second argument.
    clone_into: unsafe fn(RawShapeRef<'_>, NonNull<ShapeData<Erased>>),
    /// Moves the `ShapeData<M>` from the first pointer to the second.
    relocate_into: unsafe fn(NonNull<ShapeData<Erased>>, NonNull<ShapeData<Erased>>),
    /// Moves the `ShapeData<M>` behind the pointer into a new [`Box`]
    /// allocation.
    relocate_boxed: unsafe fn(NonNull<ShapeData<Erased>>) -> RawShape,
    /// Drops the `ShapeData<M>` in place without freeing its memory.
    drop_in_place: unsafe fn(NonNull<ShapeData<Erased>>),
}

impl ShapeVtable {
    /// Creates a new [`ShapeVtable`] for the model type `M`.
    pub(super) const fn new<M: Model>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<M::Value>,
                type_name: core::any::type_name::<M::Value>,
                dispatch_type_id: TypeId::of::<M::Dispatch>,
                layout: Layout::new::<ShapeData<M>>(),
                draw: draw::<M>,
                clone_boxed: clone_boxed::<M>,
                drop_boxed: drop_boxed::<M>,
                clone_into: clone_into::<M>,
                relocate_into: relocate_into::<M>,
                relocate_boxed: relocate_boxed::<M>,
                drop_in_place: drop_in_place::<M>,
            }
        }
    }

    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`ShapeVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the value type that was used to
    /// create this [`ShapeVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Gets the [`TypeId`] of the handler or strategy that was used to create
    /// this [`ShapeVtable`].
    #[inline]
    pub(super) fn dispatch_type_id(&self) -> TypeId {
        (self.dispatch_type_id)()
    }

    /// Gets the layout of the `ShapeData<M>` described by this vtable.
    #[inline]
    pub(super) fn layout(&self) -> Layout {
        self.layout
    }

    /// Draws the model using the [`Model::draw`] function of the model type
    /// used when creating this [`ShapeVtable`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ShapeVtable`] must be a vtable for the model type stored in
    ///    the [`RawShapeRef`].
    #[inline]
    pub(super) unsafe fn draw(
        &self,
        ptr: RawShapeRef<'_>,
        formatter: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        // SAFETY: We know that the `self.draw` field points to the function
        // `draw::<M>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.draw)(ptr, formatter) }
    }

    /// Clones the model into a new [`Box`] allocation.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ShapeVtable`] must be a vtable for the model type stored in
    ///    the [`RawShapeRef`].
    #[inline]
    pub(super) unsafe fn clone_boxed(&self, ptr: RawShapeRef<'_>) -> RawShape {
        // SAFETY: We know that the `self.clone_boxed` field points to the function
        // `clone_boxed::<M>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.clone_boxed)(ptr) }
    }

    /// Drops the `Box<ShapeData<M>>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<ShapeData<M>>`] via [`Box::into_raw`]
    /// 2. This [`ShapeVtable`] must be a vtable for the model type stored in
    ///    the [`ShapeData`].
    /// 3. This method drops the [`Box<ShapeData<M>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it is
    ///    able to transfer ownership of the pointer, and that it will not use
    ///    the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop_boxed(&self, ptr: NonNull<ShapeData<Erased>>) {
        // SAFETY: We know that `self.drop_boxed` points to the function
        // `drop_boxed::<M>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.drop_boxed)(ptr) }
    }

    /// Clones the model into the memory pointed to by `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ShapeVtable`] must be a vtable for the model type stored in
    ///    the [`RawShapeRef`].
    /// 2. `target` is valid for writes of [`Self::layout`] and aligned to it.
    /// 3. `target` does not hold a live value, or the caller accepts that the
    ///    value is overwritten without being dropped.
    #[inline]
    pub(super) unsafe fn clone_into(
        &self,
        ptr: RawShapeRef<'_>,
        target: NonNull<ShapeData<Erased>>,
    ) {
        // SAFETY: We know that the `self.clone_into` field points to the function
        // `clone_into::<M>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.clone_into)(ptr, target) }
    }

    /// Moves the `ShapeData<M>` at `source` into the memory at `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` points to an initialized `ShapeData<M>` and this
    ///    [`ShapeVtable`] is the vtable for `M`.
    /// 2. `target` is valid for writes of [`Self::layout`] and aligned to it,
    ///    and does not overlap `source`.
    /// 3. After this call the memory at `source` is logically uninitialized:
    ///    the caller must neither drop nor use it again.
    #[inline]
    pub(super) unsafe fn relocate_into(
        &self,
        source: NonNull<ShapeData<Erased>>,
        target: NonNull<ShapeData<Erased>>,
    ) {
        // SAFETY: We know that the `self.relocate_into` field points to the
        // function `relocate_into::<M>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.relocate_into)(source, target) }
    }

    /// Moves the `ShapeData<M>` at `source` into a new [`Box`] allocation.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` points to an initialized `ShapeData<M>` and this
    ///    [`ShapeVtable`] is the vtable for `M`.
    /// 2. After this call the memory at `source` is logically uninitialized:
    ///    the caller must neither drop nor use it again.
    #[inline]
    pub(super) unsafe fn relocate_boxed(&self, source: NonNull<ShapeData<Erased>>) -> RawShape {
        // SAFETY: We know that the `self.relocate_boxed` field points to the
        // function `relocate_boxed::<M>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.relocate_boxed)(source) }
    }

    /// Drops the `ShapeData<M>` at `ptr` in place.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized `ShapeData<M>` and this
    ///    [`ShapeVtable`] is the vtable for `M`.
    /// 2. The value has not previously been dropped or relocated, and the
    ///    caller will not use it after calling this method.
    #[inline]
    pub(super) unsafe fn drop_in_place(&self, ptr: NonNull<ShapeData<Erased>>) {
        // SAFETY: We know that the `self.drop_in_place` field points to the
        // function `drop_in_place::<M>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.drop_in_place)(ptr) }
    }
}

/// Draws the model using its [`Model::draw`] implementation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `M` matches the actual model type stored in the [`ShapeData`]
unsafe fn draw<M: Model>(
    ptr: RawShapeRef<'_>,
    formatter: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    // SAFETY:
    // 1. Guaranteed by the caller
    let model: &M = unsafe { ptr.model_downcast_unchecked::<M>() };
    model.draw(formatter)
}

/// Clones the model into a new [`Box<ShapeData<M>>`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `M` matches the actual model type stored in the [`ShapeData`]
unsafe fn clone_boxed<M: Model>(ptr: RawShapeRef<'_>) -> RawShape {
    // SAFETY:
    // 1. Guaranteed by the caller
    let model: &M = unsafe { ptr.model_downcast_unchecked::<M>() };
    RawShape::from_model(model.clone())
}

/// Drops the [`Box<ShapeData<M>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<ShapeData<M>>`] via [`Box::into_raw`]
/// 2. The model type `M` matches the actual model type stored in the
///    [`ShapeData`]
/// 3. This method drops the [`Box<ShapeData<M>>`], so the caller must ensure
///    that the pointer has not previously been dropped, that it is able to
///    transfer ownership of the pointer, and that it will not use the pointer
///    after calling this method.
unsafe fn drop_boxed<M: Model>(ptr: NonNull<ShapeData<Erased>>) {
    let ptr: NonNull<ShapeData<M>> = ptr.cast();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller, and it
    // came from a call to `Box::into_raw` as also guaranteed by our caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Clones the model into the memory at `target`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `M` matches the actual model type stored in the [`ShapeData`]
/// 2. `target` is valid for writes of a `ShapeData<M>` and suitably aligned
/// 3. `target` does not hold a live value that needs dropping
unsafe fn clone_into<M: Model>(ptr: RawShapeRef<'_>, target: NonNull<ShapeData<Erased>>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let model: &M = unsafe { ptr.model_downcast_unchecked::<M>() };
    // A panicking `clone` unwinds from here, before anything is written.
    let data = ShapeData::new(model.clone());
    let target: NonNull<ShapeData<M>> = target.cast();
    // SAFETY:
    // 2. Guaranteed by the caller
    // 3. Guaranteed by the caller
    unsafe { target.write(data) };
}

/// Moves the `ShapeData<M>` at `source` to `target`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` points to an initialized `ShapeData<M>`
/// 2. `target` is valid for writes of a `ShapeData<M>`, suitably aligned, and
///    does not overlap `source`
/// 3. `source` is treated as uninitialized afterwards
unsafe fn relocate_into<M: Model>(
    source: NonNull<ShapeData<Erased>>,
    target: NonNull<ShapeData<Erased>>,
) {
    let source: NonNull<ShapeData<M>> = source.cast();
    let target: NonNull<ShapeData<M>> = target.cast();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 3. Guaranteed by the caller, so this read does not duplicate ownership
    let data = unsafe { source.read() };
    // SAFETY:
    // 2. Guaranteed by the caller
    unsafe { target.write(data) };
}

/// Moves the `ShapeData<M>` at `source` into a new [`Box`] allocation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` points to an initialized `ShapeData<M>`
/// 2. `source` is treated as uninitialized afterwards
unsafe fn relocate_boxed<M: Model>(source: NonNull<ShapeData<Erased>>) -> RawShape {
    let source: NonNull<ShapeData<M>> = source.cast();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller, so this read does not duplicate ownership
    let data = unsafe { source.read() };
    RawShape::from_data(Box::new(data))
}

/// Drops the `ShapeData<M>` at `ptr` without freeing its memory.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `ShapeData<M>`
/// 2. The value is not used again afterwards
unsafe fn drop_in_place<M: Model>(ptr: NonNull<ShapeData<Erased>>) {
    let ptr: NonNull<ShapeData<M>> = ptr.cast();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe { ptr.drop_in_place() };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handlers::DrawHandler, shape::model::PlainModel};

    struct HandlerI32;
    impl DrawHandler<i32> for HandlerI32 {
        fn draw(value: &i32, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            core::fmt::Display::fmt(value, formatter)
        }
    }

    #[test]
    fn test_shape_vtable_eq() {
        // Test that vtables have proper static lifetime and can be safely shared
        let vtable1 = ShapeVtable::new::<PlainModel<i32, HandlerI32>>();
        let vtable2 = ShapeVtable::new::<PlainModel<i32, HandlerI32>>();

        // Both should be the exact same static instance
        assert!(core::ptr::eq(vtable1, vtable2));
    }

    #[test]
    fn test_shape_vtable_type_info() {
        let vtable = ShapeVtable::new::<PlainModel<i32, HandlerI32>>();
        assert_eq!(vtable.type_id(), TypeId::of::<i32>());
        assert_eq!(vtable.type_name(), "i32");
        assert_eq!(vtable.dispatch_type_id(), TypeId::of::<HandlerI32>());
    }

    #[test]
    fn test_shape_vtable_layout() {
        let vtable = ShapeVtable::new::<PlainModel<i32, HandlerI32>>();
        assert_eq!(
            vtable.layout(),
            Layout::new::<ShapeData<PlainModel<i32, HandlerI32>>>()
        );
        assert_eq!(vtable.layout().align(), core::mem::align_of::<usize>());
    }
}
