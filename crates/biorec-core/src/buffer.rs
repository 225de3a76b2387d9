use crate::pair::SwapPair;

/// Fill/display packet buffers.
///
/// The assembler writes the fill slot through [`fill_mut`](Self::fill_mut);
/// the stream only sees the display slot. Roles change only in
/// [`swap`](Self::swap).
pub struct DoubleBuffer<const N: usize> {
    slots: SwapPair<[u8; N]>,
}

impl<const N: usize> DoubleBuffer<N> {
    pub const fn new() -> Self {
        Self { slots: SwapPair::new([0; N], [0; N]) }
    }

    pub fn fill_mut(&mut self) -> &mut [u8; N] {
        self.slots.active_mut()
    }

    pub fn display(&self) -> &[u8; N] {
        self.slots.inactive()
    }

    /// The completed fill slot becomes the display slot.
    pub fn swap(&mut self) {
        self.slots.swap();
    }
}

impl<const N: usize> Default for DoubleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_frame_moves_to_display() {
        let mut buffers = DoubleBuffer::<4>::new();
        buffers.fill_mut().copy_from_slice(&[1, 2, 3, 4]);
        buffers.swap();

        assert_eq!(buffers.display(), &[1, 2, 3, 4]);

        // Writing the new fill slot leaves the displayed frame intact.
        buffers.fill_mut().fill(9);
        assert_eq!(buffers.display(), &[1, 2, 3, 4]);
    }
}
