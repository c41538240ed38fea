#![no_std]
#![deny(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Value-semantic, type-erased containers for anything that can be drawn.
//!
//! ## Overview
//!
//! This crate lets unrelated types be stored side by side and drawn
//! uniformly, without those types implementing a common base trait object
//! and without the caller ever seeing the concrete type again. The behavior
//! is attached to the value when it is put into a container, not when its
//! type is declared.
//!
//! Two containers are provided:
//!
//! - [`Shape`] keeps the value in a single heap allocation.
//! - [`InlineShape`] keeps the value in a fixed-size buffer inside the
//!   container itself, and never allocates.
//!
//! Both behave like values: cloning produces a deep, independent copy, and
//! dropping releases exactly what the container owns. Neither exposes the
//! stored value again.
//!
//! ## Quick Example
//!
//! ```
//! use core::fmt;
//!
//! use erased_shape::{Drawable, Shape};
//!
//! #[derive(Clone)]
//! struct Circle {
//!     radius: f64,
//! }
//!
//! impl Drawable for Circle {
//!     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(canvas, "circle of radius {}", self.radius)
//!     }
//! }
//!
//! fn tiny_circle(circle: &Circle, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
//!     write!(canvas, "a tiny circle ({})", circle.radius)
//! }
//!
//! let shapes = vec![
//!     Shape::new(Circle { radius: 4.0 }),
//!     Shape::with_strategy(Circle { radius: 2.0 }, tiny_circle),
//! ];
//!
//! let mut drawn = String::new();
//! erased_shape::draw_all_into(&shapes, &mut drawn).unwrap();
//! assert_eq!(drawn, "circle of radius 4a tiny circle (2)");
//! ```
//!
//! ## Choosing how a value is drawn
//!
//! There are three ways to attach drawing behavior to a value:
//!
//! - [`Shape::new`] uses the value's own [`Drawable`] implementation.
//! - [`Shape::new_custom`] selects a [handler](handlers) at the type level,
//!   for example [`handlers::Display`] to draw a value with its
//!   [`Display`](core::fmt::Display) output. Implement
//!   [`DrawHandler`](handlers::DrawHandler) to provide your own, which is how
//!   an external drawing library can be plugged in without touching the drawn
//!   types.
//! - [`Shape::with_strategy`] stores a closure next to the value and calls it
//!   instead. The closure is copied together with the value.
//!
//! A value with no drawing behavior is rejected at compile time:
//!
//! ```compile_fail
//! #[derive(Clone)]
//! struct Triangle;
//!
//! let _shape = erased_shape::Shape::new(Triangle);
//! ```
//!
//! The same three constructors exist on [`InlineShape`].
//!
//! ## Inline storage
//!
//! [`InlineShape`] takes the buffer size in bytes and an
//! [alignment marker](Align16) as type parameters. A value that does not fit
//! is a compile error, never a silent fallback to the heap:
//!
//! ```compile_fail
//! # use core::fmt;
//! # use erased_shape::{Drawable, InlineShape};
//! #[derive(Clone)]
//! struct Huge([u8; 256]);
//!
//! impl Drawable for Huge {
//!     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         canvas.write_str("huge")
//!     }
//! }
//!
//! let _shape: InlineShape<64> = InlineShape::new(Huge([0; 256]));
//! ```
//!
//! The same holds for a value that fits by size but needs a stricter
//! alignment than the buffer provides:
//!
//! ```compile_fail
//! # use core::fmt;
//! # use erased_shape::{Align16, Drawable, InlineShape};
//! #[derive(Clone)]
//! #[repr(align(32))]
//! struct Wide(u8);
//!
//! impl Drawable for Wide {
//!     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(canvas, "wide {}", self.0)
//!     }
//! }
//!
//! let _shape: InlineShape<128, Align16> = InlineShape::new(Wide(7));
//! ```
//!
//! Stored in a buffer that is aligned strictly enough, the same value is
//! accepted:
//!
//! ```
//! # use core::fmt;
//! # use erased_shape::{Align32, Drawable, InlineShape};
//! # #[derive(Clone)]
//! # #[repr(align(32))]
//! # struct Wide(u8);
//! # impl Drawable for Wide {
//! #     fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
//! #         write!(canvas, "wide {}", self.0)
//! #     }
//! # }
//! let shape: InlineShape<128, Align32> = InlineShape::new(Wide(7));
//! assert_eq!(shape.to_string(), "wide 7");
//! ```
//!
//! An existing inline shape can be moved into a differently sized buffer
//! with [`InlineShape::resize`], which checks the fit at run time, or onto
//! the heap with [`InlineShape::into_shape`].
//!
//! ## Errors
//!
//! Drawing goes through [`core::fmt::Formatter`], so drawing behaviors report
//! failure with [`core::fmt::Error`]. The free functions in this crate turn
//! such a failure into a [`rootcause::Report`] with a [`DrawError`] context
//! and stop at the first failing shape.
//!
//! ## Logging
//!
//! Construction, copies and relocations are reported as [`tracing`] events
//! at `TRACE` level. Rejected resizes are reported at `DEBUG` level and
//! drawing failures at `WARN` level. Nothing is printed unless the
//! application installs a subscriber.
//!
//! ## Features
//!
//! - `std`: enables `draw` and `draw_all`, which write to standard
//!   output, and the `std` feature of `tracing`. Everything else works in
//!   `no_std` environments with `alloc`.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod dispatch;
mod drawable;
mod error;
pub mod handlers;
pub mod prelude;
mod shape;

pub use self::{
    dispatch::{Drawing, draw_all_into, draw_into},
    drawable::Drawable,
    error::DrawError,
    shape::{Align8, Align16, Align32, Align64, Alignment, InlineShape, Shape},
};

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub use self::dispatch::{draw, draw_all};
