//! This module encapsulates the fields of the [`ShapeData`]. Since this is
//! the only place they are visible, this means that the type of the
//! [`ShapeVtable`] is guaranteed to always be in sync with the type of the
//! actual model. This follows from the fact that they are in sync when
//! created and that the API offers no way to change the [`ShapeVtable`] or
//! the model type after creation.

use crate::shape::{model::Model, raw::RawShapeRef, vtable::ShapeVtable};

/// Type-erased shape data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the concrete
/// model type `M` is unknown. This is also what lets the inline storage
/// reinterpret the leading bytes of its buffer as the vtable pointer.
#[repr(C)]
pub(crate) struct ShapeData<M: 'static> {
    /// The Vtable of this shape
    vtable: &'static ShapeVtable,
    /// The model wrapping the stored value
    model: M,
}

impl<M: Model> ShapeData<M> {
    /// Creates a new [`ShapeData`] for the model.
    ///
    /// This method creates the vtable for type-erased dispatch and pairs it
    /// with the model.
    #[inline]
    pub(super) fn new(model: M) -> Self {
        Self {
            vtable: ShapeVtable::new::<M>(),
            model,
        }
    }
}

impl<'a> RawShapeRef<'a> {
    /// Returns a reference to the [`ShapeVtable`] of the [`ShapeData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static ShapeVtable {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual inner model type, but we do know
        // that it points to an instance of `ShapeData<M>` for some specific `M`.
        // Since `ShapeData<M>` is `#[repr(C)]`, that means that it's
        // safe to create pointers to the fields before the actual model.
        //
        // We need to take care to avoid creating an actual reference to
        // the `ShapeData` itself though, as that would still be undefined behavior
        // since we don't have the right type.
        let vtable_ptr: *const &'static ShapeVtable = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Deferencing the pointer and getting out the `&'static
        // ShapeVtable` is valid for the same reasons
        unsafe { *vtable_ptr }
    }

    /// Accesses the model of the [`ShapeData`] instance as a reference to the
    /// specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `M` matches the actual model type
    /// stored in the [`ShapeData`].
    #[inline]
    pub(super) unsafe fn model_downcast_unchecked<M: Model>(self) -> &'a M {
        // SAFETY: The inner function requires that `M` matches the type stored, but
        // that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<M>() };
        &this.model
    }
}
