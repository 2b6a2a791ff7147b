use std::{mem};

use rustc_hash::{FxHashMap};

use super::{Id, Index, Map, MapKind, MapRef, Object, Config, Error, Result};
use super::heap::{Allocator, Heap};

/// The ambient state needed to create [`Map`]s and [`Object`]s.
///
/// Owns every `Map`, including the unique meta-map and empty map. All
/// allocation goes through the [`Allocator`] `A`, so every method that takes
/// `&mut Context` may collect.
pub struct Context<A: Allocator = Heap> {
    allocator: A,

    /// Indexed by [`MapRef`]. Maps are never freed.
    maps: Vec<Map>,

    meta_map: MapRef,
    empty_map: MapRef,

    /// Previously created children, keyed by parent and `Id`. `None` if
    /// `Config::intern_maps` is `false`.
    transitions: Option<FxHashMap<(MapRef, Id), MapRef>>,
}

impl Context<Heap> {
    /// A `Context` with the default [`Config`].
    pub fn new() -> Self {
        Self::with_allocator(&Config::default(), Heap::default())
            .expect("An unlimited heap cannot be exhausted")
    }

    /// A `Context` whose [`Heap`] obeys `config.heap_limit`.
    ///
    /// Fails if the limit does not leave room for the meta-map and empty map.
    pub fn with_config(config: &Config) -> Result<Self> {
        Self::with_allocator(config, Heap::new(config.heap_limit))
    }
}

impl Default for Context<Heap> {
    fn default() -> Self { Self::new() }
}

impl<A: Allocator> Context<A> {
    /// A `Context` that allocates using `allocator`.
    ///
    /// `config.heap_limit` is ignored; the limit is up to `allocator`.
    pub fn with_allocator(config: &Config, allocator: A) -> Result<Self> {
        let transitions = if config.intern_maps { Some(FxHashMap::default()) } else { None };
        let mut cx = Self {
            allocator,
            maps: Vec::new(),
            meta_map: MapRef::PLACEHOLDER,
            empty_map: MapRef::PLACEHOLDER,
            transitions,
        };
        // The meta-map describes itself, so it cannot be constructed with its
        // final `Cell`.
        cx.allocator.allocate(mem::size_of::<Map>())?;
        cx.maps.push(Map::new(MapRef::PLACEHOLDER, MapKind::Meta));
        let meta_map = MapRef::new(0);
        cx.maps[meta_map.as_usize()].cell_mut().set_map(meta_map);
        cx.meta_map = meta_map;
        cx.empty_map = cx.alloc_map(MapKind::Empty)?;
        Ok(cx)
    }

    pub fn allocator(&self) -> &A { &self.allocator }

    pub fn allocator_mut(&mut self) -> &mut A { &mut self.allocator }

    /// `true` if `extend()` returns existing children where possible.
    pub fn interns_maps(&self) -> bool { self.transitions.is_some() }

    /// The map of every `Map`.
    pub fn meta_map(&self) -> MapRef { self.meta_map }

    /// The map of objects with no slots.
    pub fn empty_map(&self) -> MapRef { self.empty_map }

    /// Panics if `map` belongs to a different `Context`.
    pub fn map(&self, map: MapRef) -> &Map { &self.maps[map.as_usize()] }

    /// The number of `Map`s created so far, including the meta-map and the
    /// empty map.
    pub fn map_count(&self) -> usize { self.maps.len() }

    /// Allocate and record a new `Map`. May collect.
    fn alloc_map(&mut self, kind: MapKind) -> Result<MapRef> {
        self.allocator.allocate(mem::size_of::<Map>())?;
        let map = MapRef::new(self.maps.len());
        self.maps.push(Map::new(self.meta_map, kind));
        Ok(map)
    }

    /// Finds the slot of `map` named `id`, by walking towards the empty map.
    ///
    /// Takes time proportional to the number of slots of `map`. Returns `None`
    /// for the meta-map.
    pub fn lookup(&self, map: MapRef, id: Id) -> Option<Index> {
        let mut m = map;
        loop {
            match self.map(m).kind() {
                MapKind::Object {parent, id: slot_id, index} => {
                    if slot_id == id { return Some(index); }
                    m = parent;
                },
                MapKind::Empty | MapKind::Meta => return None,
            }
        }
    }

    /// Returns a map describing the slots of `map` plus one more slot named
    /// `id`. May collect.
    ///
    /// If interning is enabled and `map` has been extended with `id` before,
    /// returns the same child as last time without allocating.
    ///
    /// Fails if `map` is the meta-map, if `map` already has a slot named `id`,
    /// if the new index would not fit in an [`Index`], or if allocation fails.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn extend(&mut self, map: MapRef, id: Id) -> Result<MapRef> {
        let next = match self.map(map).kind() {
            MapKind::Meta => return Err(Error::NotAnObjectMap {map}),
            MapKind::Empty => 0,
            MapKind::Object {index, ..} => index as usize + 1,
        };
        if let Some(&child) = self.transitions.as_ref().and_then(|t| t.get(&(map, id))) {
            tracing::trace!(?child, "reusing map");
            return Ok(child);
        }
        if let Some(index) = self.lookup(map, id) {
            return Err(Error::DuplicateSlot {id, index});
        }
        let index = Index::try_from(next).map_err(|_| Error::MapTooDeep {map})?;
        let child = self.alloc_map(MapKind::Object {parent: map, id, index})?;
        if let Some(transitions) = &mut self.transitions {
            transitions.insert((map, id), child);
        }
        tracing::trace!(?child, index, "created map");
        Ok(child)
    }

    /// The number of slots described by `map`, or `0` for the meta-map.
    pub fn depth(&self, map: MapRef) -> usize {
        self.map(map).slot_count().unwrap_or(0)
    }

    /// The `Id`s of the slots of `map`, in slot order.
    pub fn ids(&self, map: MapRef) -> Vec<Id> {
        let mut ids = Vec::with_capacity(self.depth(map));
        let mut m = map;
        while let MapKind::Object {parent, id, ..} = self.map(m).kind() {
            ids.push(id);
            m = parent;
        }
        ids.reverse();
        ids
    }

    // ------------------------------------------------------------------------

    /// Allocate an object with no slots. May collect.
    pub fn new_object(&mut self) -> Result<Object> {
        self.allocator.allocate(mem::size_of::<Object>())?;
        Ok(Object::new(self.empty_map))
    }

    /// Allocate an object described by `map`, with every slot `0`. May collect.
    ///
    /// Fails if `map` is the meta-map, or if it has too many slots for an
    /// `Object`.
    pub fn new_object_with_map(&mut self, map: MapRef) -> Result<Object> {
        let m = self.map(map);
        let slot_count = m.slot_count().ok_or(Error::NotAnObjectMap {map})?;
        if slot_count > Object::CAPACITY {
            let id = m.id().ok_or(Error::NotAnObjectMap {map})?;
            return Err(Error::ObjectFull {id, capacity: Object::CAPACITY});
        }
        self.allocator.allocate(mem::size_of::<Object>())?;
        Ok(Object::with_slot_count(map, slot_count))
    }

    /// Allocate a copy of `object`, sharing its map. May collect.
    pub fn copy_object(&mut self, object: &Object) -> Result<Object> {
        self.allocator.allocate(mem::size_of::<Object>())?;
        Ok(object.copy())
    }
}

impl<A: Allocator + std::fmt::Debug> std::fmt::Debug for Context<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("allocator", &self.allocator)
            .field("map_count", &self.maps.len())
            .field("interns_maps", &self.interns_maps())
            .finish()
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<const N: usize>() -> [Id; N] {
        std::array::from_fn(|i| Id::new(i as u32))
    }

    #[test]
    fn meta_map_describes_itself() {
        let cx = Context::new();
        let meta = cx.map(cx.meta_map());
        assert!(meta.is_meta());
        assert_eq!(meta.meta_map(), cx.meta_map());
        assert_eq!(cx.map(cx.empty_map()).meta_map(), cx.meta_map());
        assert_eq!(cx.map_count(), 2);
        assert_eq!(cx.allocator().count(), 2);
    }

    #[test]
    fn lookup_on_empty_map() {
        let cx = Context::new();
        for id in ids::<8>() {
            assert_eq!(cx.lookup(cx.empty_map(), id), None);
        }
        assert_eq!(cx.lookup(cx.meta_map(), Id::new(0)), None);
    }

    #[test]
    fn extend_assigns_consecutive_indices() {
        let mut cx = Context::new();
        let [a, b, c] = ids();
        let ma = cx.extend(cx.empty_map(), a).unwrap();
        let mb = cx.extend(ma, b).unwrap();
        let mc = cx.extend(mb, c).unwrap();
        assert_eq!(cx.map(ma).index(), Some(0));
        assert_eq!(cx.map(mb).index(), Some(1));
        assert_eq!(cx.map(mc).index(), Some(2));
        assert_eq!(cx.map(mc).parent(), Some(mb));
        assert_eq!(cx.map(ma).parent(), Some(cx.empty_map()));
        assert_eq!(cx.map(mc).meta_map(), cx.meta_map());
        assert_eq!(cx.lookup(mc, a), Some(0));
        assert_eq!(cx.lookup(mc, b), Some(1));
        assert_eq!(cx.lookup(mc, c), Some(2));
        assert_eq!(cx.lookup(mb, c), None);
        assert_eq!(cx.ids(mc), vec![a, b, c]);
        assert_eq!(cx.depth(mc), 3);
    }

    #[test]
    fn extend_interns_children() {
        let mut cx = Context::new();
        let [a, b] = ids();
        let first = cx.extend(cx.empty_map(), a).unwrap();
        let count = cx.map_count();
        assert_eq!(cx.extend(cx.empty_map(), a).unwrap(), first);
        assert_eq!(cx.map_count(), count);
        assert_ne!(cx.extend(cx.empty_map(), b).unwrap(), first);
    }

    #[test]
    fn extend_without_interning() {
        let config = Config {intern_maps: false, ..Config::default()};
        let mut cx = Context::with_config(&config).unwrap();
        assert!(!cx.interns_maps());
        let [a] = ids();
        let first = cx.extend(cx.empty_map(), a).unwrap();
        let second = cx.extend(cx.empty_map(), a).unwrap();
        assert_ne!(first, second);
        assert_eq!(cx.map(first), cx.map(second));
    }

    #[test]
    fn extend_rejects_duplicates() {
        let mut cx = Context::new();
        let [a, b] = ids();
        let ma = cx.extend(cx.empty_map(), a).unwrap();
        let mb = cx.extend(ma, b).unwrap();
        assert_eq!(cx.extend(mb, a), Err(Error::DuplicateSlot {id: a, index: 0}));
    }

    #[test]
    fn extend_rejects_meta_map() {
        let mut cx = Context::new();
        let meta = cx.meta_map();
        assert_eq!(cx.extend(meta, Id::new(0)), Err(Error::NotAnObjectMap {map: meta}));
    }

    #[test]
    fn extend_stops_at_index_limit() {
        let mut cx = Context::new();
        let mut map = cx.empty_map();
        for i in 0..=(Index::MAX as u32) {
            map = cx.extend(map, Id::new(i)).unwrap();
        }
        assert_eq!(cx.map(map).index(), Some(Index::MAX));
        assert_eq!(cx.extend(map, Id::new(1000)), Err(Error::MapTooDeep {map}));
    }

    #[test]
    fn failed_allocation_creates_no_map() {
        let limit = 3 * mem::size_of::<Map>();
        let config = Config {heap_limit: Some(limit), ..Config::default()};
        let mut cx = Context::with_config(&config).unwrap();
        let [a, b] = ids();
        let ma = cx.extend(cx.empty_map(), a).unwrap();
        let count = cx.map_count();
        assert!(matches!(cx.extend(ma, b), Err(Error::OutOfMemory {..})));
        assert_eq!(cx.map_count(), count);
        // The failed child must not have been interned.
        assert!(matches!(cx.extend(ma, b), Err(Error::OutOfMemory {..})));
    }

    #[test]
    fn limit_too_small_for_roots() {
        let config = Config {heap_limit: Some(1), ..Config::default()};
        assert!(matches!(Context::with_config(&config), Err(Error::OutOfMemory {..})));
    }
}
