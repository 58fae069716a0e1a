/// Fixed-capacity entity storage.
///
/// Slots are allocated once when the pool is built and reused forever.  The
/// pool keeps no activity table of its own: each entity knows whether it is
/// active, so an entity that retires itself (left the screen, finished
/// exploding) is immediately free for the next `acquire`.

/// An entity that can live in a [`Pool`].
pub trait Poolable: Default {
    fn is_active(&self) -> bool;
    /// Claim the slot.  `spawn`-style methods set the real state afterwards.
    fn activate(&mut self);
    fn deactivate(&mut self);
}

#[derive(Clone, Debug)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Poolable> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::default);
        Self { slots }
    }

    /// First inactive slot, marked active, or `None` when every slot is in use.
    /// Callers treat `None` as "drop this spawn".
    pub fn acquire(&mut self) -> Option<&mut T> {
        let slot = self.slots.iter_mut().find(|s| !s.is_active())?;
        slot.activate();
        Some(slot)
    }

    /// Index-returning variant of [`Pool::acquire`].
    pub fn acquire_index(&mut self) -> Option<usize> {
        let index = self.slots.iter().position(|s| !s.is_active())?;
        self.slots[index].activate();
        Some(index)
    }

    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.deactivate();
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.is_active())
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn inactive_count(&self) -> usize {
        self.capacity() - self.active_count()
    }

    /// Deactivate every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Token {
        active: bool,
    }

    impl Poolable for Token {
        fn is_active(&self) -> bool {
            self.active
        }
        fn activate(&mut self) {
            self.active = true;
        }
        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    #[test]
    fn acquire_index_walks_slots_in_order() {
        let mut pool: Pool<Token> = Pool::new(3);
        assert_eq!(pool.acquire_index(), Some(0));
        assert_eq!(pool.acquire_index(), Some(1));
        pool.release(0);
        assert_eq!(pool.acquire_index(), Some(0));
        assert_eq!(pool.acquire_index(), Some(2));
        assert_eq!(pool.acquire_index(), None);
    }

    #[test]
    fn release_out_of_range_is_ignored() {
        let mut pool: Pool<Token> = Pool::new(1);
        pool.release(5);
        assert_eq!(pool.active_count(), 0);
    }
}
