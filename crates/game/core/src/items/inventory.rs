//! Fixed-capacity item slots.

use arrayvec::ArrayVec;

use crate::error::{ErrorSeverity, GameError};

/// Errors from slot operations.
///
/// `Full` hands the rejected item back so the caller can route it to a
/// replace-or-discard decision.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InventoryError<T: core::fmt::Debug> {
    #[error("all {capacity} slots are full")]
    Full { item: T, capacity: usize },

    #[error("slot {0} is out of range")]
    InvalidSlot(usize),

    #[error("slot {0} is empty")]
    EmptySlot(usize),
}

impl<T: core::fmt::Debug> GameError for InventoryError<T> {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Full { .. } => ErrorSeverity::Recoverable,
            Self::InvalidSlot(_) | Self::EmptySlot(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Full { .. } => "INVENTORY_FULL",
            Self::InvalidSlot(_) => "INVENTORY_INVALID_SLOT",
            Self::EmptySlot(_) => "INVENTORY_EMPTY_SLOT",
        }
    }
}

/// `N` fixed slots, each empty or holding one item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slots<T, const N: usize> {
    /// Always exactly `N` entries.
    slots: ArrayVec<Option<T>, N>,
}

impl<T: core::fmt::Debug, const N: usize> Slots<T, N> {
    pub fn new() -> Self {
        let mut slots = ArrayVec::new();
        while !slots.is_full() {
            slots.push(None);
        }
        Self { slots }
    }

    /// Places `item` in the first empty slot and returns the slot index.
    pub fn insert(&mut self, item: T) -> Result<usize, InventoryError<T>> {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = Some(item);
                Ok(index)
            }
            None => Err(InventoryError::Full { item, capacity: N }),
        }
    }

    /// Empties a slot, returning its item.
    pub fn take(&mut self, index: usize) -> Result<T, InventoryError<T>> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::InvalidSlot(index))?;
        slot.take().ok_or(InventoryError::EmptySlot(index))
    }

    /// Puts `item` into slot `index`, returning whatever was there.
    pub fn replace(&mut self, index: usize, item: T) -> Result<Option<T>, InventoryError<T>> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::InvalidSlot(index))?;
        Ok(slot.replace(item))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterates `(index, item)` over occupied slots.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (i, item)))
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: core::fmt::Debug, const N: usize> Default for Slots<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
