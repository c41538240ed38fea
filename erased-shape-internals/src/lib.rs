#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`erased-shape`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage and the unsafe
//! operations that power the [`erased-shape`] containers. It provides the
//! concept/model machinery: a hand-written vtable per stored model type, and
//! two storage strategies for the erased model.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`erased-shape`] crate, not this one.
//!
//! # Architecture
//!
//! - **Models**: a stored value is wrapped in one of two adapters before it is
//!   erased:
//!   - [`PlainModel`]: the value plus a [`DrawHandler`] type chosen at
//!     construction. Drawing calls the handler.
//!   - [`ExtendedModel`]: the value plus an injected strategy closure. Drawing
//!     calls the strategy.
//! - **[`ShapeData`]**: `#[repr(C)]` pair of a `&'static` [`ShapeVtable`] and a
//!   model. Because the vtable is the first field, it can be read through a
//!   pointer whose model type has been erased.
//! - **[`ShapeVtable`]**: the concept. Function pointers for drawing, cloning,
//!   relocating and dropping a [`ShapeData`], all instantiated for one model
//!   type.
//! - **Storage**:
//!   - [`RawShape`]: owned [`ShapeData`] in a [`Box`] allocation.
//!   - [`RawInlineShape`]: owned [`ShapeData`] constructed in place inside a
//!     fixed-size, fixed-alignment buffer embedded in the value.
//!   - [`RawShapeRef`]: borrowed pointer to a [`ShapeData`] in either storage.
//! - **[`handlers`]**: the [`DrawHandler`] trait.
//!
//! # Safety Strategy
//!
//! When we erase `ShapeData<PlainModel<Circle, H>>` to `ShapeData<Erased>`, the
//! vtable function pointers must still match the model stored in memory, and
//! for the inline storage the buffer must be large enough and aligned enough
//! for that model.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: fields of [`ShapeData`], [`ShapeVtable`],
//!   [`RawShape`] and [`RawInlineShape`] are module-private, so the invariants
//!   can be verified locally within a single file
//! - **`#[repr(C)]` layout**: enables reading the vtable through an erased
//!   pointer without constructing an invalid reference
//! - **Compile-time capacity checks**: constructing a [`RawInlineShape`] with a
//!   model that does not fit fails to compile
//!
//! [`erased-shape`]: https://docs.rs/erased-shape/latest/erased_shape/
//! [`PlainModel`]: shape::model::PlainModel
//! [`ExtendedModel`]: shape::model::ExtendedModel
//! [`ShapeData`]: shape::data::ShapeData
//! [`ShapeVtable`]: shape::vtable::ShapeVtable
//! [`DrawHandler`]: handlers::DrawHandler
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

pub mod handlers;
mod shape;
mod util;

pub use shape::{
    Align8, Align16, Align32, Align64, Alignment, RawInlineShape, RawShape, RawShapeRef,
};
