//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use erased_shape::prelude::*;
//!
//! let shapes: Vec<InlineShape> = vec![
//!     InlineShape::new_custom::<handlers::Display, _>("north"),
//!     InlineShape::new_custom::<handlers::Display, _>("south"),
//! ];
//!
//! let mut canvas = String::new();
//! draw_all_into(&shapes, &mut canvas).unwrap();
//! assert_eq!(canvas, "northsouth");
//! ```
//!
//! # What's Included
//!
//! - **[`Shape`]** and **[`InlineShape`]**: the two containers
//! - **[`Drawable`]**: the trait for values that draw themselves
//! - **[`draw_into`]** and **[`draw_all_into`]**: drawing into any
//!   [`core::fmt::Write`]
//! - **[`handlers`]**: built-in drawing handlers and the
//!   [`DrawHandler`](handlers::DrawHandler) trait
//! - **[`DrawError`]**: the context of drawing failures

pub use crate::{DrawError, Drawable, InlineShape, Shape, draw_all_into, draw_into, handlers};
