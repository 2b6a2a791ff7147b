use thiserror::{Error as ThisError};

use super::{Id, Index, MapRef};

/// Everything that can go wrong while growing a map or an object.
///
/// A missing property is not an `Error`; see [`Object::get()`].
///
/// [`Object::get()`]: crate::Object::get
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The object already has `capacity` slots.
    #[error("object full: no room for property {id} (capacity {capacity})")]
    ObjectFull {id: Id, capacity: usize},

    /// The map already has a slot for `id`.
    #[error("property {id} already occupies slot {index}")]
    DuplicateSlot {id: Id, index: Index},

    /// An object claims to be described by a map that does not describe
    /// objects.
    #[error("{map:?} is neither an empty map nor an object map")]
    NotAnObjectMap {map: MapRef},

    /// The next slot index is not representable.
    #[error("{map:?} cannot be extended any further")]
    MapTooDeep {map: MapRef},

    /// The allocator refused a request.
    #[error("out of memory: requested {requested}B with {used}B of {limit}B in use")]
    OutOfMemory {requested: usize, used: usize, limit: usize},
}

/// A `T` or an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
