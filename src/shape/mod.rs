//! The two shape containers.
//!
//! Both wrap a raw container from `erased-shape-internals` and add the safe,
//! value-like surface on top: constructors that pick the drawing behavior,
//! copies, drawing, and the conversions between the two storage
//! strategies.

mod heap;
mod inline;

pub use erased_shape_internals::{Align8, Align16, Align32, Align64, Alignment};

pub use self::{heap::Shape, inline::InlineShape};
