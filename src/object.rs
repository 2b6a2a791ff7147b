use arrayvec::{ArrayVec};

use super::{Cell, Context, Id, Index, MapRef, Error, Result};
use super::heap::{Allocator};

/// The contents of a slot.
pub type Value = i32;

/// The number of slots an [`Object`] has room for.
pub const MAX_SLOTS: usize = 32;

/// A heap object with a fixed capacity for named slots.
///
/// The object's [`Map`] says which [`Id`] each slot holds. Only the slots that
/// the map describes are present; the rest of the capacity is unused.
///
/// [`Map`]: crate::Map
#[derive(Debug, PartialEq, Eq)]
pub struct Object {
    cell: Cell,
    slots: ArrayVec<Value, MAX_SLOTS>,
}

impl Object {
    pub const CAPACITY: usize = MAX_SLOTS;

    /// An object described by `empty_map`.
    pub(crate) fn new(empty_map: MapRef) -> Self {
        Self {cell: Cell::new(empty_map), slots: ArrayVec::new()}
    }

    /// An object described by `map`, with `slot_count` zero slots.
    pub(crate) fn with_slot_count(map: MapRef, slot_count: usize) -> Self {
        let mut slots = ArrayVec::new();
        slots.extend(std::iter::repeat(0).take(slot_count));
        Self {cell: Cell::new(map), slots}
    }

    /// Shares the map of `self` and duplicates its slots.
    pub(crate) fn copy(&self) -> Self {
        Self {cell: self.cell, slots: self.slots.clone()}
    }

    pub fn cell(&self) -> &Cell { &self.cell }

    /// The map that currently describes `self`.
    pub fn map(&self) -> MapRef { self.cell.map() }

    /// The slots that the map describes, in slot order.
    pub fn slots(&self) -> &[Value] { &self.slots }

    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Returns the index of the slot named `id`, if any.
    pub fn index<A: Allocator>(&self, cx: &Context<A>, id: Id) -> Option<Index> {
        cx.lookup(self.map(), id)
    }

    /// Returns the value of the slot named `id`, if any.
    pub fn get<A: Allocator>(&self, cx: &Context<A>, id: Id) -> Option<Value> {
        self.index(cx, id).map(|index| self.slots[index as usize])
    }

    /// Sets the slot named `id` to `value`, creating the slot if necessary.
    /// Returns the index of the slot. May collect.
    ///
    /// Overwriting an existing slot never changes the map or allocates.
    pub fn set<A: Allocator>(&mut self, cx: &mut Context<A>, id: Id, value: Value) -> Result<Index> {
        let index = match self.index(cx, id) {
            Some(index) => index,
            None => self.new_slot(cx, id)?,
        };
        self.slots[index as usize] = value;
        Ok(index)
    }

    /// Adds a slot named `id`, initially `0`, and returns its index. May collect.
    ///
    /// Fails without changing `self` if `self` already has a slot named `id`,
    /// if `self` is full, or if allocation fails.
    pub fn new_slot<A: Allocator>(&mut self, cx: &mut Context<A>, id: Id) -> Result<Index> {
        let map = self.map();
        let slot_count = cx.map(map).slot_count().ok_or(Error::NotAnObjectMap {map})?;
        debug_assert_eq!(slot_count, self.slots.len());
        if slot_count >= Self::CAPACITY {
            tracing::warn!(?map, %id, "object full");
            return Err(Error::ObjectFull {id, capacity: Self::CAPACITY});
        }
        let child = cx.extend(map, id)?;
        let index = cx.map(child).index().ok_or(Error::NotAnObjectMap {map: child})?;
        self.slots.try_push(0).map_err(|_| Error::ObjectFull {id, capacity: Self::CAPACITY})?;
        self.cell.set_map(child);
        tracing::trace!(from = ?map, to = ?child, %id, index, "new slot");
        Ok(index)
    }
}

// ----------------------------------------------------------------------------
