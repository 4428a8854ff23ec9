//! Address decoding.
//!
//! Splits a byte address into `| tag | set index | line offset |`. The set
//! count need not be a power of two, so the set index is taken modulo the
//! number of sets rather than masked.

/// Address field layout for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    set_shift: u32,
    num_sets: u64,
}

impl AddressLayout {
    /// Creates the layout for lines of `line_bytes` bytes spread over `num_sets` sets.
    ///
    /// # Panics
    ///
    /// Panics if `line_bytes` is not a power of two or `num_sets` is zero.
    pub fn new(line_bytes: u64, num_sets: usize) -> Self {
        assert!(
            line_bytes.is_power_of_two(),
            "line size {line_bytes} is not a power of two"
        );
        assert!(num_sets > 0, "cache must have at least one set");
        Self {
            set_shift: line_bytes.trailing_zeros(),
            num_sets: num_sets as u64,
        }
    }

    /// Bit offset of the set-index field.
    #[inline]
    pub const fn set_shift(&self) -> u32 {
        self.set_shift
    }

    /// Mask covering the byte offset within a line.
    #[inline]
    pub const fn line_mask(&self) -> u64 {
        (1u64 << self.set_shift) - 1
    }

    /// Decodes `address` into `(set index, tag)`.
    #[inline]
    pub const fn decode(&self, address: u64) -> (usize, u64) {
        let line = address >> self.set_shift;
        ((line % self.num_sets) as usize, line / self.num_sets)
    }

    /// Rebuilds the base address of the line holding `tag` in `set`.
    #[inline]
    pub const fn line_address(&self, set: usize, tag: u64) -> u64 {
        (tag * self.num_sets + set as u64) << self.set_shift
    }
}
