//! Drawing a heterogeneous collection of shapes.
//!
//! This example demonstrates:
//! 1. Storing unrelated types side by side in a `Vec<Shape>`
//! 2. Injecting a drawing strategy for a single value
//! 3. Swapping the drawing library without touching the shape types
//! 4. The same collection stored inline, without heap allocations
//!
//! Run with:
//!
//! ```text
//! cargo run --example draw_shapes --features std
//! ERASED_SHAPE_DRAW_LIBRARY=draw2 cargo run --example draw_shapes --features std
//! RUST_LOG=erased_shape=trace cargo run --example draw_shapes --features std
//! ```

use std::{env, fmt};

use erased_shape::{
    Align8,
    DrawError,
    Drawable,
    InlineShape,
    Shape,
    draw_all,
    handlers::{self, DrawHandler},
};
use rootcause::Report;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Circle {
    radius: f64,
}

impl Circle {
    fn radius(&self) -> f64 {
        self.radius
    }
}

#[derive(Debug, Clone)]
struct Square {
    side: f64,
}

impl Square {
    fn side(&self) -> f64 {
        self.side
    }
}

// The shapes' own drawing, used by the first library.
impl Drawable for Circle {
    fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(canvas, "Drawing Circle using draw1 library")?;
        writeln!(canvas, "Circle radius: {}", self.radius())?;
        writeln!(canvas)
    }
}

impl Drawable for Square {
    fn draw(&self, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(canvas, "Drawing Square using draw1 library")?;
        writeln!(canvas, "Square side: {}", self.side())?;
        writeln!(canvas)
    }
}

/// A second drawing library, plugged in from the outside.
struct Draw2;

impl DrawHandler<Circle> for Draw2 {
    fn draw(value: &Circle, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "Drawing Circle using draw2 library")?;
        writeln!(formatter, "Circle radius: {}", value.radius())?;
        writeln!(formatter)
    }
}

impl DrawHandler<Square> for Draw2 {
    fn draw(value: &Square, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "Drawing Square using draw2 library")?;
        writeln!(formatter, "Square side: {}", value.side())?;
        writeln!(formatter)
    }
}

fn injected_strategy(circle: &Circle, canvas: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(canvas, "Drawing Circle using an injected strategy")?;
    writeln!(canvas, "Circle radius: {}", circle.radius())?;
    writeln!(canvas)
}

/// Builds the collection, drawing everything without a strategy with `L`.
fn heap_shapes<L>() -> Vec<Shape>
where
    L: DrawHandler<Circle> + DrawHandler<Square>,
{
    vec![
        Shape::with_strategy(Circle { radius: 2.0 }, injected_strategy),
        Shape::new_custom::<L, _>(Square { side: 5.0 }),
        Shape::new_custom::<L, _>(Circle { radius: 4.0 }),
        Shape::new_custom::<L, _>(Square { side: 10.0 }),
    ]
}

/// Same as [`heap_shapes`], stored in 32 byte buffers.
fn inline_shapes<L>() -> Vec<InlineShape<32, Align8>>
where
    L: DrawHandler<Circle> + DrawHandler<Square>,
{
    vec![
        InlineShape::with_strategy(Circle { radius: 2.0 }, injected_strategy),
        InlineShape::new_custom::<L, _>(Square { side: 5.0 }),
        InlineShape::new_custom::<L, _>(Circle { radius: 4.0 }),
        InlineShape::new_custom::<L, _>(Square { side: 10.0 }),
    ]
}

fn main() -> Result<(), Report<DrawError>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let library = env::var("ERASED_SHAPE_DRAW_LIBRARY").unwrap_or_default();
    let use_draw2 = library == "draw2";

    println!("=== Shapes on the heap ===\n");
    let shapes = if use_draw2 {
        heap_shapes::<Draw2>()
    } else {
        heap_shapes::<handlers::Drawable>()
    };
    draw_all(&shapes)?;

    // Copies are independent values
    let copies = shapes.clone();
    drop(shapes);
    println!("=== Copies of the shapes ===\n");
    draw_all(&copies)?;

    println!("=== Shapes stored inline ===\n");
    let inline = if use_draw2 {
        inline_shapes::<Draw2>()
    } else {
        inline_shapes::<handlers::Drawable>()
    };
    draw_all(&inline)?;

    Ok(())
}
