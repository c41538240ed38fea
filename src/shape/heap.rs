use core::any::{TypeId, type_name};

use erased_shape_internals::RawShape;

use crate::handlers::{self, DrawHandler};

/// A heap-backed, type-erased value that can be drawn.
///
/// A [`Shape`] owns exactly one value of a type that is forgotten once it is
/// stored, together with the behavior used to draw it. The value lives in a
/// single heap allocation that the [`Shape`] owns exclusively, so a
/// [`Shape`] is one pointer wide no matter what it holds.
///
/// [`Shape`] has value semantics:
///
/// - [`Clone`] allocates a new, independent copy of the stored value (and of
///   its strategy, if it has one). Nothing is shared between the copies.
/// - Moving a [`Shape`] transfers the allocation without copying the value.
///   A moved-from [`Shape`] cannot be used again, which the compiler
///   enforces.
/// - Dropping a [`Shape`] drops the stored value exactly once.
///
/// # Drawing
///
/// A [`Shape`] implements [`Drawable`](crate::Drawable) and
/// [`Display`](core::fmt::Display) by forwarding to the stored behavior. The
/// [`draw_into`](crate::draw_into) family of functions wraps this and
/// reports failures as [`rootcause::Report`]s.
///
/// # Thread Safety
///
/// A [`Shape`] is neither [`Send`] nor [`Sync`], because the stored value may
/// not be either:
///
/// ```compile_fail
/// fn assert_send<T: Send>() {}
/// assert_send::<erased_shape::Shape>();
/// ```
///
/// # Examples
///
/// ```
/// use core::fmt;
///
/// use erased_shape::{Drawable, Shape};
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
/// let original = Shape::new(Square { side: 5.0 });
/// let copy = original.clone();
/// drop(original);
/// assert_eq!(copy.to_string(), "square of side 5");
/// ```
#[repr(transparent)]
pub struct Shape {
    /// The erased value and its drawing behavior
    raw: RawShape,
}

impl Shape {
    /// Stores `value` and draws it with its own
    /// [`Drawable`](crate::Drawable) implementation.
    ///
    /// See also:
    ///
    /// - [`Shape::new_custom`] to draw the value with a
    ///   [handler](crate::handlers) instead.
    /// - [`Shape::with_strategy`] to draw the value with a closure.
    ///
    /// # Examples
    ///
    /// ```
    /// # use core::fmt;
    /// # use erased_shape::{Drawable, Shape};
    /// #[derive(Clone)]
    /// struct Circle(f64);
    ///
    /// impl Drawable for Circle {
    ///     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
    ///         write!(canvas, "circle {}", self.0)
    ///     }
    /// }
    ///
    /// let shape = Shape::new(Circle(1.5));
    /// assert_eq!(shape.to_string(), "circle 1.5");
    /// ```
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: crate::Drawable + Clone + 'static,
    {
        Self::new_custom::<handlers::Drawable, T>(value)
    }

    /// Stores `value` and draws it with the handler `H`.
    ///
    /// # Examples
    ///
    /// ```
    /// use erased_shape::{Shape, handlers};
    ///
    /// let shape = Shape::new_custom::<handlers::Debug, _>((1, 2));
    /// assert_eq!(shape.to_string(), "(1, 2)");
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
            "storing shape on the heap"
        );
        Self {
            raw: RawShape::new::<T, H>(value),
        }
    }

    /// Stores `value` and draws it by calling `strategy`.
    ///
    /// The strategy is stored next to the value and copied together with
    /// it. The value does not need to implement
    /// [`Drawable`](crate::Drawable).
    ///
    /// # Examples
    ///
    /// ```
    /// use core::fmt;
    ///
    /// use erased_shape::Shape;
    ///
    /// let prefix = String::from("radius");
    /// let strategy = move |radius: &f64, canvas: &mut fmt::Formatter<'_>| {
    ///     write!(canvas, "{prefix} {radius}")
    /// };
    /// let shape = Shape::with_strategy(2.0_f64, strategy);
    /// assert_eq!(shape.to_string(), "radius 2");
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
            "storing shape with a strategy on the heap"
        );
        Self {
            raw: RawShape::with_strategy(value, strategy),
        }
    }

    /// Wraps an existing raw shape.
    pub(crate) fn from_raw(raw: RawShape) -> Self {
        Self { raw }
    }

    /// Returns the name of the type of the stored value.
    ///
    /// The name is meant for diagnostics only, see
    /// [`core::any::type_name`].
    ///
    /// # Examples
    ///
    /// ```
    /// use erased_shape::{Shape, handlers};
    ///
    /// let shape = Shape::new_custom::<handlers::Display, _>(7_u8);
    /// assert_eq!(shape.value_type_name(), "u8");
    /// ```
    #[must_use]
    pub fn value_type_name(&self) -> &'static str {
        self.raw.as_ref().value_type_name()
    }

    /// Returns the [`TypeId`] of the behavior that draws the stored value.
    ///
    /// That is the handler type for [`Shape::new_custom`], the
    /// [`handlers::Drawable`] handler for [`Shape::new`], and the type of the
    /// strategy for [`Shape::with_strategy`].
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    ///
    /// use erased_shape::{Shape, handlers};
    ///
    /// let shape = Shape::new_custom::<handlers::Debug, _>("quoted");
    /// assert_eq!(shape.dispatch_type_id(), TypeId::of::<handlers::Debug>());
    /// ```
    #[must_use]
    pub fn dispatch_type_id(&self) -> TypeId {
        self.raw.as_ref().dispatch_type_id()
    }

    /// Returns the [`Layout`](core::alloc::Layout) of the allocation that
    /// holds the value and its behavior.
    #[must_use]
    pub fn layout(&self) -> core::alloc::Layout {
        self.raw.as_ref().layout()
    }
}

impl Clone for Shape {
    fn clone(&self) -> Self {
        tracing::trace!(value_type = self.value_type_name(), "copying heap shape");
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

impl crate::Drawable for Shape {
    #[inline]
    fn draw(&self, canvas: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.raw.as_ref().draw(canvas)
    }
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        crate::Drawable::draw(self, f)
    }
}

impl core::fmt::Debug for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shape")
            .field("value_type", &self.value_type_name())
            .finish()
    }
}
