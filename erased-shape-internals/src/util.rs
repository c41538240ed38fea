//! Internal utility types.

/// Marker type used when type-erasing shape data.
///
/// This zero-sized type serves as a placeholder in generic type parameters
/// when the actual model type has been erased. For example,
/// `ShapeData<Erased>` represents shape data whose model type is unknown at
/// the current scope.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;
