use slotmap::SlotMap;

use crate::core::{BodyHandle, ConstraintHandle};
use crate::error::PhysicsError;
use crate::Result;

/// Generic storage trait for physics objects
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns whether the handle resolves to a live item
    fn contains(&self, handle: H) -> bool;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool;

    /// Clears all items from the storage
    fn clear(&mut self);

    /// Returns an iterator over all items
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;

    /// Returns a mutable iterator over all items
    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a;
}

macro_rules! slot_storage {
    ($storage:ident, $handle:ty) => {
        impl<T> Storage<T, $handle> for $storage<T> {
            fn new() -> Self {
                Self {
                    items: SlotMap::with_key(),
                }
            }

            fn add(&mut self, item: T) -> $handle {
                self.items.insert(item)
            }

            fn get(&self, handle: $handle) -> Option<&T> {
                self.items.get(handle)
            }

            fn get_mut(&mut self, handle: $handle) -> Option<&mut T> {
                self.items.get_mut(handle)
            }

            fn remove(&mut self, handle: $handle) -> Option<T> {
                self.items.remove(handle)
            }

            fn contains(&self, handle: $handle) -> bool {
                self.items.contains_key(handle)
            }

            fn len(&self) -> usize {
                self.items.len()
            }

            fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            fn clear(&mut self) {
                self.items.clear();
            }

            fn iter<'a>(&'a self) -> impl Iterator<Item = ($handle, &'a T)> + 'a where T: 'a {
                self.items.iter()
            }

            fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = ($handle, &'a mut T)> + 'a where T: 'a {
                self.items.iter_mut()
            }
        }

        impl<T> Default for $storage<T> {
            fn default() -> Self {
                <Self as Storage<T, $handle>>::new()
            }
        }
    };
}

/// Generational storage for physics bodies. A removed body's handle never resolves again.
#[derive(Debug, Clone)]
pub struct BodyStorage<T> {
    items: SlotMap<BodyHandle, T>,
}

slot_storage!(BodyStorage, BodyHandle);

impl<T> BodyStorage<T> {
    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Borrows two bodies at once
    pub fn get_pair(&self, a: BodyHandle, b: BodyHandle) -> Option<(&T, &T)> {
        Some((self.items.get(a)?, self.items.get(b)?))
    }

    /// Borrows two distinct bodies mutably at once
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut T, &mut T)> {
        self.items.get_disjoint_mut([a, b]).map(|[a, b]| (a, b))
    }
}

/// Generational storage for constraints
#[derive(Debug, Clone)]
pub struct ConstraintStorage<T> {
    items: SlotMap<ConstraintHandle, T>,
}

slot_storage!(ConstraintStorage, ConstraintHandle);

impl<T> ConstraintStorage<T> {
    /// Gets a constraint by its handle, returning an error if not found
    pub fn get_constraint(&self, handle: ConstraintHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a constraint by its handle, returning an error if not found
    pub fn get_constraint_mut(&mut self, handle: ConstraintHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle)))
    }

    /// Keeps only the constraints for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(ConstraintHandle, &mut T) -> bool) {
        self.items.retain(|handle, item| keep(handle, item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handle_never_resolves_again() {
        let mut storage: BodyStorage<u32> = Storage::new();
        let first = storage.add(1);
        storage.remove(first);
        let second = storage.add(2);

        assert_ne!(first, second);
        assert!(storage.get(first).is_none());
        assert!(storage.get_body(first).is_err());
        assert_eq!(storage.get_body(second).ok(), Some(&2));
    }

    #[test]
    fn pair_borrow_rejects_same_handle() {
        let mut storage: BodyStorage<u32> = Storage::new();
        let a = storage.add(1);
        let b = storage.add(2);

        assert!(storage.get_pair_mut(a, a).is_none());
        let (x, y) = storage.get_pair_mut(a, b).unwrap();
        std::mem::swap(x, y);
        assert_eq!(storage.get(a), Some(&2));
    }
}
