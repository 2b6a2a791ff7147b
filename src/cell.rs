use std::{fmt};

/// A handle to a [`Map`] owned by a [`Context`].
///
/// `MapRef`s are only meaningful to the `Context` that created them.
///
/// [`Map`]: crate::Map
/// [`Context`]: crate::Context
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MapRef(u32);

impl MapRef {
    /// Stands in for the meta-map while the meta-map is being constructed.
    pub(crate) const PLACEHOLDER: Self = Self(u32::MAX);

    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("Too many maps"))
    }

    pub(crate) fn as_usize(self) -> usize { self.0 as usize }
}

impl fmt::Debug for MapRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == Self::PLACEHOLDER {
            f.write_str("Map(?)")
        } else {
            write!(f, "Map({})", self.0)
        }
    }
}

// ----------------------------------------------------------------------------

/// The header of every heap object.
///
/// Records which [`Map`] describes the object. This is the only mutable part
/// of a `Map`'s representation, and it is how an object changes shape.
///
/// [`Map`]: crate::Map
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    map: MapRef,
}

impl Cell {
    pub const fn new(map: MapRef) -> Self { Self {map} }

    pub const fn map(&self) -> MapRef { self.map }

    pub fn set_map(&mut self, map: MapRef) -> &mut Self {
        self.map = map;
        self
    }
}

// ----------------------------------------------------------------------------
