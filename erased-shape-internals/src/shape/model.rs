//! The per-type adapters that are stored behind the erased vtable.
//!
//! A user type never implements anything of this module. Instead the
//! constructors of [`RawShape`] and [`RawInlineShape`] wrap the value in one of
//! the two models, and the vtable is instantiated for that model.
//!
//! [`RawShape`]: crate::RawShape
//! [`RawInlineShape`]: crate::RawInlineShape

use core::marker::PhantomData;

use crate::handlers::DrawHandler;

/// A concrete adapter for one stored value type.
///
/// Every [`ShapeVtable`](super::vtable::ShapeVtable) is instantiated for
/// exactly one implementor of this trait.
pub(crate) trait Model: Clone + 'static {
    /// The user type stored inside the model.
    type Value: 'static;

    /// The type that supplies the drawing behavior: a handler for
    /// [`PlainModel`], the strategy type for [`ExtendedModel`].
    type Dispatch: 'static;

    /// Draws the stored value.
    fn draw(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result;
}

/// Model that draws its value with a [`DrawHandler`] selected by type.
pub(crate) struct PlainModel<T, H> {
    /// The stored value
    value: T,
    /// The handler is only known by type
    _handler: PhantomData<fn() -> H>,
}

impl<T, H> PlainModel<T, H> {
    /// Wraps the value, remembering the handler `H`.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            _handler: PhantomData,
        }
    }
}

impl<T: Clone, H> Clone for PlainModel<T, H> {
    #[inline]
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T, H> Model for PlainModel<T, H>
where
    T: Clone + 'static,
    H: DrawHandler<T>,
{
    type Value = T;
    type Dispatch = H;

    #[inline]
    fn draw(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        H::draw(&self.value, formatter)
    }
}

/// Model that carries an injected drawing strategy next to its value.
#[derive(Clone)]
pub(crate) struct ExtendedModel<T, D> {
    /// The stored value
    value: T,
    /// Called with the value instead of any handler
    strategy: D,
}

impl<T, D> ExtendedModel<T, D> {
    /// Pairs the value with the strategy used to draw it.
    #[inline]
    pub(crate) fn new(value: T, strategy: D) -> Self {
        Self { value, strategy }
    }
}

impl<T, D> Model for ExtendedModel<T, D>
where
    T: Clone + 'static,
    D: Fn(&T, &mut core::fmt::Formatter<'_>) -> core::fmt::Result + Clone + 'static,
{
    type Value = T;
    type Dispatch = D;

    #[inline]
    fn draw(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        (self.strategy)(&self.value, formatter)
    }
}
