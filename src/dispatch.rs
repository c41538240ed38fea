//! Drawing shapes into writers and onto standard output.

use alloc::format;
use core::{any::type_name, fmt};

use rootcause::Report;

use crate::{DrawError, Drawable};

/// Adapts a [`Drawable`] to [`Display`](fmt::Display), so it can be used
/// with `format!`, `write!` and friends.
///
/// # Examples
///
/// ```
/// use erased_shape::{Drawing, Shape, handlers};
///
/// let shape = Shape::new_custom::<handlers::Display, _>(12);
/// assert_eq!(format!("<{}>", Drawing(&shape)), "<12>");
/// ```
pub struct Drawing<'a, S: ?Sized>(pub &'a S);

impl<S: ?Sized> Copy for Drawing<'_, S> {}

impl<S: ?Sized> Clone for Drawing<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Drawable + ?Sized> fmt::Display for Drawing<'_, S> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.draw(f)
    }
}

/// Draws a single shape into `out`.
///
/// # Errors
///
/// Returns a report with [`DrawError::Render`] as its context if the drawing
/// behavior or the writer fails. Text written before the failure stays in
/// `out`.
///
/// # Examples
///
/// ```
/// use erased_shape::{Shape, handlers};
///
/// let shape = Shape::new_custom::<handlers::Debug, _>('o');
/// let mut canvas = String::new();
/// erased_shape::draw_into(&shape, &mut canvas).unwrap();
/// assert_eq!(canvas, "'o'");
/// ```
pub fn draw_into<S, W>(shape: &S, out: &mut W) -> Result<(), Report<DrawError>>
where
    S: Drawable + ?Sized,
    W: fmt::Write + ?Sized,
{
    if write!(out, "{}", Drawing(shape)).is_ok() {
        return Ok(());
    }

    let shape_type = type_name::<S>();
    tracing::warn!(shape_type, "drawing a shape failed");
    let report = Report::new(DrawError::Render);
    Err(report.attach(format!("shape type: {shape_type}")))
}

/// Draws every shape of `shapes` into `out`, in iteration order.
///
/// # Errors
///
/// Stops at the first shape that fails to draw. The returned report has
/// [`DrawError::Render`] as its context and names the index of the failing
/// shape in an attachment. The drawings of the shapes before it stay in
/// `out`.
///
/// # Examples
///
/// ```
/// use erased_shape::{InlineShape, handlers};
///
/// let shapes: Vec<InlineShape> = vec![
///     InlineShape::new_custom::<handlers::Display, _>(1),
///     InlineShape::new_custom::<handlers::Display, _>(2),
/// ];
/// let mut canvas = String::new();
/// erased_shape::draw_all_into(&shapes, &mut canvas).unwrap();
/// assert_eq!(canvas, "12");
/// ```
pub fn draw_all_into<'a, I, S, W>(shapes: I, out: &mut W) -> Result<(), Report<DrawError>>
where
    I: IntoIterator<Item = &'a S>,
    S: Drawable + ?Sized + 'a,
    W: fmt::Write + ?Sized,
{
    for (index, shape) in shapes.into_iter().enumerate() {
        if let Err(report) = draw_into(shape, &mut *out) {
            return Err(report.attach(format!("shape index: {index}")));
        }
    }
    Ok(())
}

/// Draws a single shape to standard output.
///
/// The drawing is rendered completely before anything is written, so a
/// shape that fails to draw leaves no partial output behind.
///
/// # Errors
///
/// Returns a report with [`DrawError::Render`] as its context if the shape
/// fails to draw, or [`DrawError::Output`] if standard output cannot be
/// written to.
#[cfg(feature = "std")]
pub fn draw<S>(shape: &S) -> Result<(), Report<DrawError>>
where
    S: Drawable + ?Sized,
{
    use std::io::Write as _;

    let mut rendered = alloc::string::String::new();
    draw_into(shape, &mut rendered)?;

    std::io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .map_err(|error| {
            tracing::warn!(%error, "writing a drawing to standard output failed");
            Report::new(DrawError::Output).attach(error)
        })
}

/// Draws every shape of `shapes` to standard output, in iteration order.
///
/// # Errors
///
/// Stops at the first shape that fails to draw or cannot be written. The
/// index of that shape is attached to the returned report.
#[cfg(feature = "std")]
pub fn draw_all<'a, I, S>(shapes: I) -> Result<(), Report<DrawError>>
where
    I: IntoIterator<Item = &'a S>,
    S: Drawable + ?Sized + 'a,
{
    for (index, shape) in shapes.into_iter().enumerate() {
        if let Err(report) = draw(shape) {
            return Err(report.attach(format!("shape index: {index}")));
        }
    }
    Ok(())
}
