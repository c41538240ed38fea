//! Handlers that define how a stored value is drawn.
//!
//! A handler is the "free drawing function" of a stored type, lifted to the
//! type level so that it can be selected once, when a shape is constructed,
//! and remembered after the stored type has been erased.

/// Trait for implementing the drawing behavior of a stored value.
///
/// Handlers are zero-sized marker types. The handler used for a shape is
/// fixed when the shape is constructed and cannot be changed afterwards.
///
/// # When to Implement
///
/// The `erased-shape` crate provides built-in handlers for types that
/// implement its `Drawable` trait, or `Display`, or `Debug`. Implement this
/// trait when the drawing of a type should come from somewhere else, such as
/// a drawing library that you cannot add trait implementations to the type
/// for, or when the same type should be drawn differently by different
/// libraries.
///
/// # Examples
///
/// ```
/// use erased_shape_internals::handlers::DrawHandler;
///
/// #[derive(Clone)]
/// struct Circle {
///     radius: f64,
/// }
///
/// // A drawing library that renders circles as ASCII art
/// struct AsciiArt;
///
/// impl DrawHandler<Circle> for AsciiArt {
///     fn draw(value: &Circle, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         writeln!(f, "  ___  ")?;
///         writeln!(f, " /   \\  r={}", value.radius)?;
///         writeln!(f, " \\___/ ")
///     }
/// }
/// ```
pub trait DrawHandler<T>: 'static {
    /// Draws the value.
    ///
    /// Drawing writes to the formatter. An error returned from here is
    /// reported to whoever requested the drawing; it never affects the
    /// storage of the shape holding the value.
    fn draw(value: &T, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result;
}
