use core::any::{TypeId, type_name};

use erased_shape_internals::{Align16, Alignment, RawInlineShape};

use crate::{
    Shape,
    handlers::{self, DrawHandler},
};

/// A type-erased value that can be drawn, stored inside the container
/// itself.
///
/// [`InlineShape`] is the allocation-free counterpart of [`Shape`]. The value
/// and its drawing behavior are kept in a buffer of `SIZE` bytes aligned
/// according to `A`, which is part of the [`InlineShape`]. Creating,
/// copying, moving and dropping an [`InlineShape`] never touches the heap.
///
/// # Type Parameters
///
/// - **Size (`SIZE`)**: the capacity of the buffer in bytes. Defaults to
///   128.
/// - **Alignment (`A`)**: one of [`Align8`](crate::Align8),
///   [`Align16`], [`Align32`](crate::Align32) or
///   [`Align64`](crate::Align64). Defaults to [`Align16`].
///
/// Because the parameters have defaults, the plain name `InlineShape` in a
/// type annotation means `InlineShape<128, Align16>`. In expression position
/// the parameters are inferred, so a binding usually needs a type
/// annotation:
///
/// ```
/// use erased_shape::{InlineShape, handlers};
///
/// let shape: InlineShape = InlineShape::new_custom::<handlers::Display, _>(5_u32);
/// assert_eq!(shape.to_string(), "5");
/// ```
///
/// # Capacity
///
/// The buffer holds a vtable reference followed by the value and, for
/// [`InlineShape::with_strategy`], the strategy. A value that does not fit,
/// or that needs a stricter alignment than `A`, fails to compile. Use
/// [`InlineShape::layout`] to see how much of the buffer a value occupies.
///
/// # Value Semantics
///
/// [`Clone`] copies the value into the buffer of a new [`InlineShape`].
/// Moving an [`InlineShape`] moves the whole buffer, and the moved-from
/// binding cannot be used again. Dropping drops the value exactly once.
///
/// # Examples
///
/// ```
/// use core::fmt;
///
/// use erased_shape::{Align8, Drawable, InlineShape};
///
/// #[derive(Clone)]
/// struct Square {
///     side: f64,
/// }
///
/// impl Drawable for Square {
///     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(canvas, "square of side {}", self.side)
///     }
/// }
///
/// let shape: InlineShape<32, Align8> = InlineShape::new(Square { side: 10.0 });
/// assert_eq!(shape.to_string(), "square of side 10");
/// assert_eq!(size_of::<InlineShape<32, Align8>>(), 32);
/// ```
#[repr(transparent)]
pub struct InlineShape<const SIZE: usize = 128, A: Alignment = Align16> {
    /// The buffer holding the erased value and its drawing behavior
    raw: RawInlineShape<SIZE, A>,
}

impl<const SIZE: usize, A: Alignment> InlineShape<SIZE, A> {
    /// Stores `value` in the buffer and draws it with its own
    /// [`Drawable`](crate::Drawable) implementation.
    ///
    /// Fails to compile if the value does not fit into the buffer.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: crate::Drawable + Clone + 'static,
    {
        Self::new_custom::<handlers::Drawable, T>(value)
    }

    /// Stores `value` in the buffer and draws it with the handler `H`.
    ///
    /// Fails to compile if the value does not fit into the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use erased_shape::{Align8, InlineShape, handlers};
    ///
    /// let shape = InlineShape::<16, Align8>::new_custom::<handlers::Display, _>('x');
    /// assert_eq!(shape.to_string(), "x");
    /// ```
    #[must_use]
    pub fn new_custom<H, T>(value: T) -> Self
    where
        T: Clone + 'static,
        H: DrawHandler<T>,
    {
        tracing::trace!(
            value_type = type_name::<T>(),
            handler = type_name::<H>(),
            capacity = SIZE,
            alignment = A::ALIGN,
            "storing shape inline"
        );
        Self {
            raw: RawInlineShape::new::<T, H>(value),
        }
    }

    /// Stores `value` in the buffer and draws it by calling `strategy`.
    ///
    /// Fails to compile if the value and the strategy together do not fit
    /// into the buffer. A closure that captures nothing takes no space.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::fmt;
    ///
    /// use erased_shape::InlineShape;
    ///
    /// let strategy = |radius: &f64, canvas: &mut fmt::Formatter<'_>| {
    ///     write!(canvas, "circle radius: {radius}")
    /// };
    /// let shape: InlineShape = InlineShape::with_strategy(2.0_f64, strategy);
    /// assert_eq!(shape.to_string(), "circle radius: 2");
    /// ```
    #[must_use]
    pub fn with_strategy<T, D>(value: T, strategy: D) -> Self
    where
        T: Clone + 'static,
        D: Fn(&T, &mut core::fmt::Formatter<'_>) -> core::fmt::Result + Clone + 'static,
    {
        tracing::trace!(
            value_type = type_name::<T>(),
            strategy = type_name::<D>(),
            capacity = SIZE,
            alignment = A::ALIGN,
            "storing shape with a strategy inline"
        );
        Self {
            raw: RawInlineShape::with_strategy(value, strategy),
        }
    }

    /// Returns the name of the type of the stored value.
    #[must_use]
    pub fn value_type_name(&self) -> &'static str {
        self.raw.as_ref().value_type_name()
    }

    /// Returns the [`TypeId`] of the behavior that draws the stored value.
    ///
    /// See [`Shape::dispatch_type_id`]. The identity survives
    /// [`InlineShape::resize`] and [`InlineShape::into_shape`].
    #[must_use]
    pub fn dispatch_type_id(&self) -> TypeId {
        self.raw.as_ref().dispatch_type_id()
    }

    /// Returns the [`Layout`](core::alloc::Layout) the value and its behavior
    /// occupy at the start of the buffer.
    ///
    /// The size is at most `SIZE` and the alignment at most that of `A`.
    #[must_use]
    pub fn layout(&self) -> core::alloc::Layout {
        self.raw.as_ref().layout()
    }

    /// Moves the stored value into an [`InlineShape`] with a different buffer
    /// size or alignment.
    ///
    /// The type of the stored value is no longer known, so unlike
    /// construction the fit is checked at run time. If the value does not fit
    /// into the new buffer, the shape is handed back unchanged in the `Err`
    /// variant.
    ///
    /// The value is moved, not copied: no [`Clone`] or [`Drop`] of the stored
    /// value runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use erased_shape::{Align8, InlineShape, handlers};
    ///
    /// let shape: InlineShape = InlineShape::new_custom::<handlers::Debug, _>([1_u64, 2, 3]);
    ///
    /// let Err(shape) = shape.resize::<16, Align8>() else {
    ///     panic!("three integers and a vtable reference do not fit into 16 bytes");
    /// };
    /// let Ok(shape) = shape.resize::<32, Align8>() else {
    ///     panic!("they do fit into 32 bytes");
    /// };
    /// assert_eq!(shape.to_string(), "[1, 2, 3]");
    /// ```
    pub fn resize<const NEW_SIZE: usize, B: Alignment>(
        self,
    ) -> Result<InlineShape<NEW_SIZE, B>, Self> {
        let layout = self.layout();
        match self.raw.resize::<NEW_SIZE, B>() {
            Ok(raw) => {
                tracing::trace!(
                    value_type = raw.as_ref().value_type_name(),
                    from_capacity = SIZE,
                    to_capacity = NEW_SIZE,
                    "relocated inline shape"
                );
                Ok(InlineShape { raw })
            }
            Err(raw) => {
                tracing::debug!(
                    value_type = raw.as_ref().value_type_name(),
                    required_size = layout.size(),
                    required_alignment = layout.align(),
                    capacity = NEW_SIZE,
                    alignment = B::ALIGN,
                    "inline shape does not fit into the requested buffer"
                );
                Err(Self { raw })
            }
        }
    }

    /// Moves the stored value onto the heap.
    ///
    /// Like [`InlineShape::resize`] this moves the value without copying it.
    /// The same conversion is available through [`From`].
    ///
    /// # Examples
    ///
    /// ```
    /// use erased_shape::{InlineShape, Shape, handlers};
    ///
    /// let inline: InlineShape = InlineShape::new_custom::<handlers::Display, _>("moved");
    /// let shape: Shape = inline.into_shape();
    /// assert_eq!(shape.to_string(), "moved");
    /// ```
    #[must_use]
    pub fn into_shape(self) -> Shape {
        tracing::trace!(
            value_type = self.value_type_name(),
            "moving inline shape to the heap"
        );
        Shape::from_raw(self.raw.into_boxed())
    }
}

impl<const SIZE: usize, A: Alignment> Clone for InlineShape<SIZE, A> {
    fn clone(&self) -> Self {
        tracing::trace!(
            value_type = self.value_type_name(),
            "copying inline shape"
        );
        Self {
            raw: self.raw.clone(),
        }
    }

    /// Replaces `self` with a deep copy of `source`.
    ///
    /// The copy is made before anything is released, so if copying the value
    /// panics `self` is left untouched.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        core::mem::swap(self, &mut copy);
    }
}

impl<const SIZE: usize, A: Alignment> From<InlineShape<SIZE, A>> for Shape {
    #[inline]
    fn from(shape: InlineShape<SIZE, A>) -> Self {
        shape.into_shape()
    }
}

impl<const SIZE: usize, A: Alignment> crate::Drawable for InlineShape<SIZE, A> {
    #[inline]
    fn draw(&self, canvas: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.raw.as_ref().draw(canvas)
    }
}

impl<const SIZE: usize, A: Alignment> core::fmt::Display for InlineShape<SIZE, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        crate::Drawable::draw(self, f)
    }
}

impl<const SIZE: usize, A: Alignment> core::fmt::Debug for InlineShape<SIZE, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InlineShape")
            .field("value_type", &self.value_type_name())
            .field("capacity", &SIZE)
            .field("alignment", &A::ALIGN)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString};
    use core::{
        fmt,
        mem::{align_of, size_of},
    };

    use super::*;
    use crate::{Align8, Align32, Align64, Drawable};

    #[derive(Clone)]
    struct Square {
        side: f64,
    }

    impl Drawable for Square {
        fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(canvas, "square {}", self.side)
        }
    }

    #[test]
    fn test_size_and_alignment_are_configured() {
        assert_eq!(size_of::<InlineShape>(), 128);
        assert_eq!(align_of::<InlineShape>(), 16);
        assert_eq!(size_of::<InlineShape<64, Align8>>(), 64);
        assert_eq!(align_of::<InlineShape<64, Align32>>(), 32);
        assert_eq!(align_of::<InlineShape<64, Align64>>(), 64);
        static_assertions::assert_not_impl_any!(InlineShape: Send, Sync);
    }

    /// Needs 32 byte alignment while being only one byte of data
    #[derive(Clone)]
    #[repr(align(32))]
    struct Wide(u8);

    impl Drawable for Wide {
        fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(canvas, "wide {}", self.0)
        }
    }

    fn injected(square: &Square, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(canvas, "injected {}", square.side)
    }

    #[test]
    fn test_constructors_pick_behavior() {
        let own: InlineShape = InlineShape::new(Square { side: 5.0 });
        let handled: InlineShape = InlineShape::new_custom::<handlers::Debug, _>("quoted");
        let strategy: InlineShape = InlineShape::with_strategy(Square { side: 6.0 }, injected);

        assert_eq!(own.to_string(), "square 5");
        assert_eq!(handled.to_string(), "\"quoted\"");
        assert_eq!(strategy.to_string(), "injected 6");
    }

    #[test]
    fn test_layout_fits_buffer() {
        let shape: InlineShape<32, Align8> = InlineShape::new(Square { side: 1.0 });
        let layout = shape.layout();
        assert!(layout.size() <= 32);
        assert!(layout.align() <= 8);
        assert_eq!(layout.size(), size_of::<(usize, f64)>());
    }

    #[test]
    fn test_resize_round_trip_keeps_behavior() {
        let shape: InlineShape = InlineShape::new(Square { side: 2.0 });

        let Ok(small) = shape.resize::<16, Align8>() else {
            panic!("a vtable reference and an f64 fit into 16 bytes");
        };
        assert_eq!(small.to_string(), "square 2");

        let Err(small) = small.resize::<8, Align8>() else {
            panic!("they do not fit into 8 bytes");
        };
        assert_eq!(small.to_string(), "square 2");

        let Ok(large) = small.resize::<256, Align64>() else {
            panic!("growing always fits");
        };
        assert_eq!(large.to_string(), "square 2");
    }

    #[test]
    fn test_resize_rejects_weaker_alignment() {
        let shape: InlineShape<128, Align32> = InlineShape::new(Wide(7));
        assert_eq!(shape.layout().align(), 32);
        assert!(shape.layout().size() <= 128);

        // Plenty of room, but only 16 byte alignment
        let Err(shape) = shape.resize::<128, Align16>() else {
            panic!("a value aligned to 32 bytes needs a buffer aligned to 32 bytes");
        };
        assert_eq!(shape.to_string(), "wide 7");
        assert_eq!(shape.layout().align(), 32);

        let Ok(shape) = shape.resize::<64, Align64>() else {
            panic!("a stricter alignment always fits");
        };
        assert_eq!(shape.to_string(), "wide 7");
    }

    #[test]
    fn test_dispatch_type_id_survives_relocation() {
        let shape: InlineShape = InlineShape::new_custom::<handlers::Display, _>(4_u32);
        assert_eq!(shape.dispatch_type_id(), TypeId::of::<handlers::Display>());

        let Ok(shape) = shape.resize::<16, Align8>() else {
            panic!("a vtable reference and a u32 fit into 16 bytes");
        };
        assert_eq!(shape.dispatch_type_id(), TypeId::of::<handlers::Display>());

        let heap = shape.into_shape();
        assert_eq!(heap.dispatch_type_id(), TypeId::of::<handlers::Display>());
    }

    #[test]
    fn test_into_shape_and_from() {
        let first: InlineShape = InlineShape::new(Square { side: 3.0 });
        let second = first.clone();

        let heap = first.into_shape();
        let converted: Shape = second.into();
        assert_eq!(heap.to_string(), "square 3");
        assert_eq!(converted.to_string(), "square 3");
        assert_eq!(heap.value_type_name(), converted.value_type_name());
    }

    #[test]
    fn test_clone_from_replaces_value() {
        let mut target: InlineShape = InlineShape::new(Square { side: 1.0 });
        let source: InlineShape = InlineShape::new_custom::<handlers::Display, _>(8_i8);

        target.clone_from(&source);
        assert_eq!(target.to_string(), "8");
        assert_eq!(source.to_string(), "8");
    }

    #[test]
    fn test_debug_reports_configuration() {
        let shape: InlineShape<32, Align8> = InlineShape::new_custom::<handlers::Display, _>(1_u8);
        assert_eq!(
            format!("{shape:?}"),
            "InlineShape { value_type: \"u8\", capacity: 32, alignment: 8 }"
        );
    }
}
