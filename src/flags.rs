use num_traits::{One, PrimInt};

/// Trait implemented by flag enums that occupy one bit each.
///
/// The enum discriminant (via `#[repr(u8)]`) doubles as the bit index and
/// the backing integer is picked through the associated `Storage` type.
pub trait FlagBitmask {
    type Storage: PrimInt;

    /// Bit index of this flag. Must stay below the bit width of `Storage`.
    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container over any primitive integer storage.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    enum Edge {
        North,
        East,
        South,
    }

    impl FlagBitmask for Edge {
        type Storage = u16;

        fn bit_index(&self) -> u8 {
            *self as u8
        }
    }

    #[test]
    fn masks_follow_declaration_order() {
        assert_eq!(Edge::North.mask(), 0b001);
        assert_eq!(Edge::East.mask(), 0b010);
        assert_eq!(Edge::South.mask(), 0b100);
    }

    #[test]
    fn add_and_query_flags() {
        let mut flags = BitmaskFlags::<u16>::default();
        flags.add(Edge::North);
        flags.add(Edge::South);

        assert!(flags.has(Edge::North));
        assert!(flags.has(Edge::South));
        assert!(!flags.has(Edge::East));
        assert!(!flags.is_empty());
    }

    #[test]
    fn remove_clears_only_the_target_bit() {
        let mut flags = BitmaskFlags::new(0b101_u16);
        flags.remove(Edge::North);

        assert!(!flags.has(Edge::North));
        assert!(flags.has(Edge::South));

        // Removing an absent flag is a no-op.
        flags.remove(Edge::East);
        assert_eq!(flags.bits, 0b100);
    }

    #[test]
    fn default_is_empty() {
        assert!(BitmaskFlags::<u16>::default().is_empty());
    }
}
