//! Objects whose layout is described by shared, immutable maps.
//!
//! An [`Object`] is a fixed-capacity array of slots plus a [`Cell`] header
//! naming the [`Map`] that describes it. Maps form a tree rooted at the empty
//! map; each non-root map adds one slot named by an [`Id`] to its parent.
//! Objects that acquire the same properties in the same order end up pointing
//! at the same map.

mod id;
pub use id::{Id, IdGenerator, SymbolTable};

mod cell;
pub use cell::{Cell, MapRef};

mod map;
pub use map::{Index, MapKind, Map};

pub mod heap;
pub use heap::{Allocator, Heap};

mod context;
pub use context::{Context};

mod object;
pub use object::{Value, MAX_SLOTS, Object};

mod config;
pub use config::{Config};

mod error;
pub use error::{Error, Result};

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts allocations without limit, to check that the allocator is used.
    #[derive(Debug, Default)]
    struct Counter(Vec<usize>);

    impl Allocator for Counter {
        fn allocate(&mut self, size: usize) -> Result<()> {
            self.0.push(size);
            Ok(())
        }
    }

    #[test]
    fn custom_allocator() {
        let mut cx = Context::with_allocator(&Config::default(), Counter::default()).unwrap();
        assert_eq!(cx.allocator().0.len(), 2);
        let mut o = cx.new_object().unwrap();
        o.set(&mut cx, Id::new(0), 1).unwrap();
        o.set(&mut cx, Id::new(0), 2).unwrap();
        let sizes = &cx.allocator().0;
        assert_eq!(sizes.len(), 4);
        assert_eq!(sizes[2], std::mem::size_of::<Object>());
        assert_eq!(sizes[3], std::mem::size_of::<Map>());
    }

    #[test]
    fn symbols_drive_objects() {
        let mut cx = Context::new();
        let mut symbols = SymbolTable::new();
        let mut point = cx.new_object().unwrap();
        point.set(&mut cx, symbols.intern("x"), 3).unwrap();
        point.set(&mut cx, symbols.intern("y"), 4).unwrap();
        let names: Vec<_> = cx.ids(point.map()).into_iter()
            .map(|id| symbols.name(id).unwrap())
            .collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn sibling_objects_share_maps() {
        let mut cx = Context::new();
        let mut p = cx.new_object().unwrap();
        let mut q = cx.new_object().unwrap();
        for (i, value) in [(0, 1), (1, 2), (2, 3)] {
            p.set(&mut cx, Id::new(i), value).unwrap();
            q.set(&mut cx, Id::new(i), -value).unwrap();
        }
        assert_eq!(p.map(), q.map());
        let mut r = cx.new_object().unwrap();
        r.set(&mut cx, Id::new(1), 0).unwrap();
        r.set(&mut cx, Id::new(0), 0).unwrap();
        assert_ne!(r.map(), p.map());
    }
}
