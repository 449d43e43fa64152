//! Fixed-capacity entity pool
//!
//! Slots are allocated once and toggled active/inactive. Spawning scans in
//! index order and is dropped when every slot is busy; the pool never grows.

/// A reusable pool slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot<T> {
    pub active: bool,
    pub entity: T,
}

/// `N` pre-allocated slots of `T`
#[derive(Debug, Clone)]
pub struct EntityPool<T, const N: usize> {
    slots: [Slot<T>; N],
}

impl<T: Copy, const N: usize> EntityPool<T, N> {
    /// Create a pool with every slot inactive and holding `parked`
    pub fn new(parked: T) -> Self {
        Self {
            slots: [Slot {
                active: false,
                entity: parked,
            }; N],
        }
    }
}

impl<T, const N: usize> EntityPool<T, N> {
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Activate the first free slot, letting `init` place the entity.
    ///
    /// Returns the slot index, or `None` if the pool is full.
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> Option<usize> {
        let (index, slot) = self.slots.iter_mut().enumerate().find(|(_, s)| !s.active)?;
        init(&mut slot.entity);
        slot.active = true;
        Some(index)
    }

    /// Deactivate every active entity matching `expired`, returning how many were reaped
    pub fn reap(&mut self, mut expired: impl FnMut(&T) -> bool) -> usize {
        let mut reaped = 0;
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            if expired(&slot.entity) {
                slot.active = false;
                reaped += 1;
            }
        }
        reaped
    }

    /// Deactivate all slots
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Active entities with their slot index, ascending
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (i, &s.entity))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots
            .iter_mut()
            .filter(|s| s.active)
            .map(|s| &mut s.entity)
    }

    /// All slots, active or not, in index order
    pub fn slots(&self) -> &[Slot<T>; N] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Slot<T>> {
        self.slots.get(index)
    }
}
