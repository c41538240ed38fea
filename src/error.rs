/// The reason a drawing could not be produced.
///
/// This is used as the context of the [`rootcause::Report`] returned by
/// [`draw_into`](crate::draw_into) and the other drawing functions. The
/// report carries further details, such as the position of the failing shape
/// in a collection, as attachments.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawError {
    /// A drawing behavior, or the writer it was drawing into, returned
    /// [`core::fmt::Error`].
    Render,
    /// The finished drawing could not be written to standard output.
    Output,
}

impl core::fmt::Display for DrawError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DrawError::Render => write!(f, "the shape could not be drawn"),
            DrawError::Output => write!(f, "the drawing could not be written to its output"),
        }
    }
}

impl core::fmt::Debug for DrawError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DrawError::Render => write!(f, "DrawError::Render"),
            DrawError::Output => write!(f, "DrawError::Output"),
        }
    }
}

impl core::error::Error for DrawError {}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn test_display_and_debug() {
        assert_eq!(
            format!("{}", DrawError::Render),
            "the shape could not be drawn"
        );
        assert_eq!(format!("{:?}", DrawError::Output), "DrawError::Output");
    }
}
