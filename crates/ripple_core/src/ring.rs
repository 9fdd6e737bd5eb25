//! Triple-buffer ring
//!
//! Three slots hold the wave state at t-2dt, t-dt and t. A single pointer names
//! the oldest slot; every other role is a forward offset from it, so the
//! arithmetic never needs a negative modulo.

/// Number of slots in the ring.
pub const SLOT_COUNT: usize = 3;

/// Index of the slot holding the state from two steps ago.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RingPointer(usize);

impl RingPointer {
    pub fn new(index: usize) -> Self {
        Self(index % SLOT_COUNT)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// `(pointer + offset) mod 3`
    #[inline]
    pub fn slot(self, offset: usize) -> usize {
        debug_assert!(offset < SLOT_COUNT, "ring offset {offset} out of range");
        (self.0 + offset) % SLOT_COUNT
    }

    /// Slot read as the state two steps ago.
    #[inline]
    pub fn oldest(self) -> usize {
        self.slot(0)
    }

    /// Slot read as the state one step ago.
    #[inline]
    pub fn previous(self) -> usize {
        self.slot(1)
    }

    /// Slot the next step writes, and present shows.
    #[inline]
    pub fn newest(self) -> usize {
        self.slot(2)
    }

    /// Rotation after a completed simulation step.
    #[must_use]
    pub fn after_step(self) -> Self {
        Self(self.slot(1))
    }

    /// Rotation before a splash; equivalent to stepping back one slot.
    #[must_use]
    pub fn after_splash(self) -> Self {
        Self(self.slot(2))
    }
}

/// Fixed array of three slots addressed through a [`RingPointer`].
#[derive(Debug, Clone)]
pub struct BufferRing<T> {
    slots: [T; SLOT_COUNT],
}

impl<T> BufferRing<T> {
    pub fn new(slots: [T; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self {
            slots: std::array::from_fn(f),
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> &T {
        &self.slots[index]
    }

    /// Slot at `offset` from `pointer`.
    #[inline]
    pub fn at(&self, pointer: RingPointer, offset: usize) -> &T {
        &self.slots[pointer.slot(offset)]
    }

    /// Mutable target slot together with shared source slots.
    ///
    /// Panics if `target` appears among `sources`; a slot is never read and
    /// written by the same pass.
    pub fn split<const N: usize>(&mut self, target: usize, sources: [usize; N]) -> (&mut T, [&T; N]) {
        assert!(
            !sources.contains(&target),
            "slot {target} is both source and target"
        );
        let ptr = self.slots.as_mut_ptr();
        // SAFETY: target differs from every source index, and all indices are
        // bounds-checked below, so the mutable borrow never aliases a shared one.
        unsafe {
            assert!(target < SLOT_COUNT && sources.iter().all(|&s| s < SLOT_COUNT));
            let target = &mut *ptr.add(target);
            let sources = sources.map(|s| &*ptr.add(s));
            (target, sources)
        }
    }
}
