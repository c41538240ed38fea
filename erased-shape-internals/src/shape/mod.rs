//! Module containing the type-erased shape data structures and both storage
//! strategies

mod align;
mod data;
mod inline;
mod model;
mod raw;
mod vtable;

pub use self::{
    align::{Align8, Align16, Align32, Align64, Alignment},
    inline::RawInlineShape,
    raw::{RawShape, RawShapeRef},
};
