//! Integration tests for the erased-shape-internals crate.
//!
//! These tests exercise the public raw storage types the way the
//! `erased-shape` crate uses them:
//!
//! ## Heap storage
//! - `test_heap_dispatch_per_type`: each stored type is drawn by its own
//!   handler after erasure
//! - `test_heap_strategy_bypasses_handler`: an injected strategy is used
//!   instead of a handler
//! - `test_heap_clone_and_drop_behavior`: deep copies, exactly-once drops
//!
//! ## Inline storage
//! - `test_inline_dispatch_per_type`: same as above, without allocation
//! - `test_inline_clone_and_drop_behavior`: copies and drops through the
//!   vtable's in-place entries
//! - `test_inline_resize_and_into_boxed`: relocation between buffers and into
//!   the heap keeps the value alive exactly once
//!
//! ## Heterogeneous collections
//! - `test_heterogeneous_collection_order`: a `Vec` of erased shapes is drawn
//!   in order, each with its own behavior
//! - `test_layout_reporting`: the reported layout matches what was stored

use std::{any::TypeId, cell::RefCell, fmt, rc::Rc};

use erased_shape_internals::{
    Align8, Align16, RawInlineShape, RawShape, RawShapeRef, handlers::DrawHandler,
};

// Test data structures
#[derive(Debug, Clone, PartialEq)]
struct Circle {
    radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Square {
    side: f64,
}

// Test handlers
struct Library;

impl DrawHandler<Circle> for Library {
    fn draw(value: &Circle, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "circle r={}", value.radius)
    }
}

impl DrawHandler<Square> for Library {
    fn draw(value: &Square, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "square s={}", value.side)
    }
}

// Counter to track creation, clones and drops
#[derive(Debug)]
struct DropCounter {
    name: String,
    log: Rc<RefCell<Vec<String>>>,
}

impl DropCounter {
    fn new(name: &str, log: Rc<RefCell<Vec<String>>>) -> Self {
        log.borrow_mut().push(format!("Created: {name}"));
        Self {
            name: name.to_string(),
            log,
        }
    }
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        self.log.borrow_mut().push(format!("Cloned: {}", self.name));
        Self {
            name: self.name.clone(),
            log: self.log.clone(),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("Dropped: {}", self.name));
    }
}

struct CounterHandler;

impl DrawHandler<DropCounter> for CounterHandler {
    fn draw(value: &DropCounter, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "DropCounter({})", value.name)
    }
}

// Helper to draw a `RawShapeRef` with `format!`
struct Drawn<'a>(RawShapeRef<'a>);

impl fmt::Display for Drawn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.draw(f)
    }
}

#[test]
fn test_heap_dispatch_per_type() {
    let circle = RawShape::new::<_, Library>(Circle { radius: 4.0 });
    let square = RawShape::new::<_, Library>(Square { side: 5.0 });

    assert_eq!(format!("{}", Drawn(circle.as_ref())), "circle r=4");
    assert_eq!(format!("{}", Drawn(square.as_ref())), "square s=5");

    assert_eq!(circle.as_ref().value_type_id(), TypeId::of::<Circle>());
    assert_eq!(square.as_ref().value_type_id(), TypeId::of::<Square>());
    assert!(circle.as_ref().value_type_name().ends_with("Circle"));
    assert_eq!(circle.as_ref().dispatch_type_id(), TypeId::of::<Library>());
}

fn injected_strategy(circle: &Circle, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Drawing Circle using an injected strategy")?;
    writeln!(f, "Circle radius: {}", circle.radius)
}

fn injected_radius(circle: &Circle, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "injected r={}", circle.radius)
}

#[test]
fn test_heap_strategy_bypasses_handler() {
    let shape = RawShape::with_strategy(Circle { radius: 2.0 }, injected_strategy);

    assert_eq!(
        format!("{}", Drawn(shape.as_ref())),
        "Drawing Circle using an injected strategy\nCircle radius: 2\n"
    );
    assert_ne!(shape.as_ref().dispatch_type_id(), TypeId::of::<Library>());
}

#[test]
fn test_heap_clone_and_drop_behavior() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    {
        let counter = DropCounter::new("heap", log.clone());
        let original = RawShape::new::<_, CounterHandler>(counter);
        let copy = original.clone();

        assert_eq!(
            *log.borrow(),
            vec!["Created: heap".to_string(), "Cloned: heap".to_string()]
        );
        assert_eq!(original.as_ref().layout(), copy.as_ref().layout());

        // Dropping the original leaves the copy intact
        drop(original);
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(log.borrow()[2], "Dropped: heap");
        assert_eq!(format!("{}", Drawn(copy.as_ref())), "DropCounter(heap)");

        // Moving the handle does not clone or drop anything
        let moved = copy;
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(format!("{}", Drawn(moved.as_ref())), "DropCounter(heap)");
    }

    let final_log = log.borrow();
    assert_eq!(final_log.len(), 4);
    assert_eq!(final_log[3], "Dropped: heap");
}

#[test]
fn test_inline_dispatch_per_type() {
    let circle = RawInlineShape::<128, Align16>::new::<_, Library>(Circle { radius: 4.0 });
    let square = RawInlineShape::<128, Align16>::new::<_, Library>(Square { side: 5.0 });

    assert_eq!(format!("{}", Drawn(circle.as_ref())), "circle r=4");
    assert_eq!(format!("{}", Drawn(square.as_ref())), "square s=5");
    assert_eq!(circle.as_ref().value_type_id(), TypeId::of::<Circle>());
}

#[test]
fn test_inline_clone_and_drop_behavior() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    {
        let counter = DropCounter::new("inline", log.clone());
        let original = RawInlineShape::<64, Align8>::new::<_, CounterHandler>(counter);
        let copy = original.clone();
        drop(original);

        assert_eq!(
            *log.borrow(),
            vec![
                "Created: inline".to_string(),
                "Cloned: inline".to_string(),
                "Dropped: inline".to_string(),
            ]
        );
        assert_eq!(format!("{}", Drawn(copy.as_ref())), "DropCounter(inline)");

        // A bitwise move of the whole buffer neither clones nor drops
        let moved = copy;
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(format!("{}", Drawn(moved.as_ref())), "DropCounter(inline)");
    }

    assert_eq!(log.borrow().len(), 4);
    assert_eq!(log.borrow()[3], "Dropped: inline");
}

#[test]
fn test_inline_resize_and_into_boxed() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    {
        let counter = DropCounter::new("relocated", log.clone());
        let shape = RawInlineShape::<128, Align16>::new::<_, CounterHandler>(counter);

        let Ok(shape) = shape.resize::<64, Align8>() else {
            panic!("resize to a buffer that is large enough must succeed");
        };
        let Err(shape) = shape.resize::<16, Align8>() else {
            panic!("resize to a buffer that is too small must fail");
        };
        let boxed = shape.into_boxed();

        // Only the creation so far: relocation moves, it does not clone or drop
        assert_eq!(*log.borrow(), vec!["Created: relocated".to_string()]);
        assert_eq!(
            format!("{}", Drawn(boxed.as_ref())),
            "DropCounter(relocated)"
        );
    }

    assert_eq!(
        *log.borrow(),
        vec![
            "Created: relocated".to_string(),
            "Dropped: relocated".to_string(),
        ]
    );
}

#[test]
fn test_heterogeneous_collection_order() {
    let shapes = vec![
        RawShape::with_strategy(Circle { radius: 2.0 }, injected_radius),
        RawShape::new::<_, Library>(Square { side: 5.0 }),
        RawShape::new::<_, Library>(Circle { radius: 4.0 }),
        RawShape::new::<_, Library>(Square { side: 10.0 }),
    ];

    let drawn: Vec<String> = shapes
        .iter()
        .map(|shape| format!("{}", Drawn(shape.as_ref())))
        .collect();

    assert_eq!(
        drawn,
        ["injected r=2", "square s=5", "circle r=4", "square s=10"]
    );
}

#[test]
fn test_layout_reporting() {
    let heap = RawShape::new::<_, Library>(Circle { radius: 1.0 });
    let inline = RawInlineShape::<128, Align16>::new::<_, Library>(Circle { radius: 1.0 });

    // A vtable reference followed by an `f64`
    let expected = std::alloc::Layout::new::<(usize, f64)>();
    assert_eq!(heap.as_ref().layout().size(), expected.size());
    assert_eq!(inline.as_ref().layout(), heap.as_ref().layout());
}
