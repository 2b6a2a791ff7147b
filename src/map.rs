use super::{Cell, Id, MapRef};

/// The number of a slot within an [`Object`].
///
/// [`Object`]: crate::Object
pub type Index = u8;

/// Distinguishes the three kinds of [`Map`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapKind {
    /// The map of every `Map`, including itself.
    Meta,

    /// The map of an object with no slots.
    Empty,

    /// The map of an object with `index + 1` slots. Extends `parent` with a
    /// slot named `id` at `index`.
    Object {parent: MapRef, id: Id, index: Index},
}

/// A node of the shape tree.
///
/// Objects that acquired the same properties in the same order share a `Map`.
/// A `Map` never changes after construction; an object changes shape by
/// pointing its [`Cell`] at a different `Map`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    cell: Cell,
    kind: MapKind,
}

impl Map {
    pub(crate) fn new(meta_map: MapRef, kind: MapKind) -> Self {
        Self {cell: Cell::new(meta_map), kind}
    }

    pub fn kind(&self) -> MapKind { self.kind }

    pub fn cell(&self) -> &Cell { &self.cell }

    pub(crate) fn cell_mut(&mut self) -> &mut Cell { &mut self.cell }

    /// The map that describes `self`.
    pub fn meta_map(&self) -> MapRef { self.cell.map() }

    pub fn is_meta(&self) -> bool { matches!(self.kind, MapKind::Meta) }

    pub fn is_empty(&self) -> bool { matches!(self.kind, MapKind::Empty) }

    /// The map that `self` extends, if `self` is a [`MapKind::Object`].
    pub fn parent(&self) -> Option<MapRef> {
        if let MapKind::Object {parent, ..} = self.kind { Some(parent) } else { None }
    }

    /// The property that `self` adds, if `self` is a [`MapKind::Object`].
    pub fn id(&self) -> Option<Id> {
        if let MapKind::Object {id, ..} = self.kind { Some(id) } else { None }
    }

    /// The slot that `self` adds, if `self` is a [`MapKind::Object`].
    pub fn index(&self) -> Option<Index> {
        if let MapKind::Object {index, ..} = self.kind { Some(index) } else { None }
    }

    /// The number of slots of an object described by `self`, which is also the
    /// index of the next slot to assign. `None` for the meta-map.
    pub fn slot_count(&self) -> Option<usize> {
        match self.kind {
            MapKind::Meta => None,
            MapKind::Empty => Some(0),
            MapKind::Object {index, ..} => Some(index as usize + 1),
        }
    }
}

// ----------------------------------------------------------------------------
