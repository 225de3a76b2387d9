/// Selector of a [`SwapPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub const fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Two named slots and the one-bit selector naming the active one.
///
/// Producers only ever reach the active slot. [`SwapPair::swap`] flips the
/// selector and hands back the slot it detached alongside the new active one,
/// as two disjoint borrows, so a drained value can never alias the slot
/// producers now write to.
#[derive(Debug, Clone)]
pub struct SwapPair<T> {
    a: T,
    b: T,
    active: Slot,
}

impl<T> SwapPair<T> {
    pub const fn new(a: T, b: T) -> Self {
        Self { a, b, active: Slot::A }
    }

    pub const fn active_slot(&self) -> Slot {
        self.active
    }

    pub fn active(&self) -> &T {
        match self.active {
            Slot::A => &self.a,
            Slot::B => &self.b,
        }
    }

    pub fn active_mut(&mut self) -> &mut T {
        match self.active {
            Slot::A => &mut self.a,
            Slot::B => &mut self.b,
        }
    }

    pub fn inactive(&self) -> &T {
        match self.active {
            Slot::A => &self.b,
            Slot::B => &self.a,
        }
    }

    /// Activates the other slot. Returns `(detached, active)`.
    pub fn swap(&mut self) -> (&mut T, &mut T) {
        self.active = self.active.other();
        match self.active {
            Slot::A => (&mut self.b, &mut self.a),
            Slot::B => (&mut self.a, &mut self.b),
        }
    }

    /// Applies `f` to both slots, leaving the selector alone.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        f(&mut self.a);
        f(&mut self.b);
    }
}

impl<T: Default> Default for SwapPair<T> {
    fn default() -> Self {
        Self::new(T::default(), T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_detaches_previously_active_slot() {
        let mut pair = SwapPair::new(0u32, 0u32);
        *pair.active_mut() += 7;

        let (detached, active) = pair.swap();
        assert_eq!(*detached, 7);
        *active += 1;

        assert_eq!(pair.active_slot(), Slot::B);
        assert_eq!(*pair.active(), 1);
        assert_eq!(*pair.inactive(), 7);
    }

    #[test]
    fn two_swaps_return_to_the_first_slot() {
        let mut pair = SwapPair::new('a', 'b');
        pair.swap();
        pair.swap();
        assert_eq!(pair.active_slot(), Slot::A);
        assert_eq!(*pair.active(), 'a');
    }
}
