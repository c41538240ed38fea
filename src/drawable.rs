use core::fmt;

/// A value that knows how to draw itself.
///
/// This is the behavior [`Shape::new`](crate::Shape::new) and
/// [`InlineShape::new`](crate::InlineShape::new) pick up. Types that should
/// be drawn in a different way, or that cannot implement this trait because
/// they belong to another crate, can be stored with a
/// [handler](crate::handlers) or a strategy instead.
///
/// Drawing writes to a [`fmt::Formatter`]. Returning [`fmt::Error`] marks
/// the drawing as failed, and the failure is reported by
/// [`draw_into`](crate::draw_into) and friends.
///
/// # Examples
///
/// ```
/// use core::fmt;
///
/// use erased_shape::{Drawable, Drawing};
///
/// struct Square {
///     side: f64,
/// }
///
/// impl Drawable for Square {
///     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
///         writeln!(canvas, "Drawing Square")?;
///         writeln!(canvas, "Square side: {}", self.side)
///     }
/// }
///
/// let rendered = Drawing(&Square { side: 5.0 }).to_string();
/// assert_eq!(rendered, "Drawing Square\nSquare side: 5\n");
/// ```
pub trait Drawable {
    /// Draws `self` onto `canvas`.
    fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Drawable + ?Sized> Drawable for &T {
    #[inline]
    fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::draw(*self, canvas)
    }
}

impl<T: Drawable + ?Sized> Drawable for alloc::boxed::Box<T> {
    #[inline]
    fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::draw(self, canvas)
    }
}
