//! Handlers that decide how a stored value is drawn.
//!
//! A handler is a zero-sized type implementing [`DrawHandler<T>`]. It is
//! chosen when a value is stored with
//! [`Shape::new_custom`](crate::Shape::new_custom) or
//! [`InlineShape::new_custom`](crate::InlineShape::new_custom), and the
//! container remembers it for as long as the value lives. Handlers are
//! selected at the type level, so they add nothing to the size of the
//! stored value.
//!
//! # Built-in Handlers
//!
//! - [`Drawable`]: calls the value's own [`crate::Drawable`] implementation.
//!   This is the handler used by [`Shape::new`](crate::Shape::new).
//! - [`Display`]: draws the value's [`core::fmt::Display`] output.
//! - [`Debug`]: draws the value's [`core::fmt::Debug`] output.
//! - [`Any`]: draws only the type name. Works for every type.
//!
//! # Custom Handlers
//!
//! A handler can also be implemented for types from other crates, which is
//! how one drawing library can be swapped for another without the drawn
//! types knowing:
//!
//! ```
//! use core::fmt;
//!
//! use erased_shape::{Shape, handlers::DrawHandler};
//!
//! #[derive(Clone)]
//! struct Square {
//!     side: f64,
//! }
//!
//! struct AsciiArt;
//!
//! impl DrawHandler<Square> for AsciiArt {
//!     fn draw(value: &Square, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(formatter, "[{}]", value.side)
//!     }
//! }
//!
//! let shape = Shape::new_custom::<AsciiArt, _>(Square { side: 3.0 });
//! assert_eq!(shape.to_string(), "[3]");
//! ```

pub use erased_shape_internals::handlers::DrawHandler;

/// Draws a value with its own [`crate::Drawable`] implementation.
///
/// # Examples
///
/// ```
/// use core::fmt;
///
/// use erased_shape::{Drawable, Shape, handlers};
///
/// #[derive(Clone)]
/// struct Dot;
///
/// impl Drawable for Dot {
///     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
///         canvas.write_str(".")
///     }
/// }
///
/// let shape = Shape::new_custom::<handlers::Drawable, _>(Dot);
/// assert_eq!(shape.to_string(), ".");
/// ```
#[derive(Copy, Clone)]
pub struct Drawable;

impl<T> DrawHandler<T> for Drawable
where
    T: crate::Drawable,
{
    #[inline]
    fn draw(value: &T, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        crate::Drawable::draw(value, formatter)
    }
}

/// Draws a value with its [`core::fmt::Display`] implementation.
///
/// # Examples
///
/// ```
/// use erased_shape::{Shape, handlers};
///
/// let shape = Shape::new_custom::<handlers::Display, _>(42_u32);
/// assert_eq!(shape.to_string(), "42");
/// ```
#[derive(Copy, Clone)]
pub struct Display;

impl<T> DrawHandler<T> for Display
where
    T: core::fmt::Display,
{
    #[inline]
    fn draw(value: &T, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(value, formatter)
    }
}

/// Draws a value with its [`core::fmt::Debug`] implementation.
///
/// # Examples
///
/// ```
/// use erased_shape::{Shape, handlers};
///
/// let shape = Shape::new_custom::<handlers::Debug, _>(Some("corner"));
/// assert_eq!(shape.to_string(), "Some(\"corner\")");
/// ```
#[derive(Copy, Clone)]
pub struct Debug;

impl<T> DrawHandler<T> for Debug
where
    T: core::fmt::Debug,
{
    #[inline]
    fn draw(value: &T, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(value, formatter)
    }
}

/// Draws a placeholder naming the type of the value.
///
/// Useful for values that have no visual representation of their own.
///
/// # Examples
///
/// ```
/// use erased_shape::{Shape, handlers};
///
/// #[derive(Clone)]
/// struct Hidden;
///
/// let shape = Shape::new_custom::<handlers::Any, _>(Hidden);
/// assert!(shape.to_string().starts_with("An object of type "));
/// assert!(shape.to_string().ends_with("Hidden"));
/// ```
#[derive(Copy, Clone)]
pub struct Any;

impl<T> DrawHandler<T> for Any {
    #[inline]
    fn draw(_value: &T, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let type_name = core::any::type_name::<T>();
        write!(formatter, "An object of type {type_name}")
    }
}
