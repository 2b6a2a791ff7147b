use std::{fmt};
use std::rc::{Rc};

use rustc_hash::{FxHashMap};

/// Names a property.
///
/// Each distinct property name is assigned one `Id` by a [`SymbolTable`],
/// which lives as long as the table. `Id`s are never reused.
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Id(u32);

impl Id {
    pub const fn new(raw: u32) -> Self { Self(raw) }
    pub const fn raw(self) -> u32 { self.0 }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.0.fmt(f) }
}

// ----------------------------------------------------------------------------

/// Mints fresh [`Id`]s, starting at `0`.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next_id: u32,
}

impl IdGenerator {
    /// Returns an `Id` that this generator has never returned before.
    pub fn new_id(&mut self) -> Id {
        let id = Id(self.next_id);
        self.next_id = self.next_id.checked_add(1).expect("Id space exhausted");
        id
    }
}

// ----------------------------------------------------------------------------

/// Maps property names to [`Id`]s and back.
///
/// Interning is lazy: the first lookup of a name mints its `Id`. There is no
/// way to remove a name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    generator: IdGenerator,
    ids: FxHashMap<Rc<str>, Id>,
    names: Vec<Rc<str>>,
}

impl SymbolTable {
    pub fn new() -> Self { Self::default() }

    /// Returns the `Id` of `name`, minting one if `name` is new.
    pub fn intern(&mut self, name: &str) -> Id {
        if let Some(&id) = self.ids.get(name) { return id; }
        let id = self.generator.new_id();
        let name: Rc<str> = name.into();
        self.ids.insert(name.clone(), id);
        self.names.push(name);
        tracing::trace!(%id, name = &*self.names[id.raw() as usize], "interned");
        id
    }

    /// Returns the `Id` of `name` if it has been interned.
    pub fn get(&self, name: &str) -> Option<Id> { self.ids.get(name).copied() }

    /// Returns the name that `id` was minted for.
    pub fn name(&self, id: Id) -> Option<&str> {
        self.names.get(id.raw() as usize).map(|name| &**name)
    }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }
}

// ----------------------------------------------------------------------------
