//! Small typed bitsets.
//!
//! Flag enums declare their bit positions through [`FlagBitmask`]; a
//! [`BitmaskFlags`] stores any number of them in one primitive integer. The
//! collision probe uses this for its per-state policy set.

use num_traits::{One, PrimInt};

/// Implemented by flag enums; the discriminant is the bit index.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // `bit_index()` must stay below the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A set of flags packed into a primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, tags: &[U]) {
        for &tag in tags {
            self.add(tag);
        }
    }

    pub fn remove_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, tags: &[U]) {
        for &tag in tags {
            self.remove(tag);
        }
    }
}

/// Declares a flag enum and implements [`FlagBitmask`] for it.
///
/// ```rust
/// locomotion::define_bitmask_flags!(SurfaceMarker, u8, {
///     Wet,
///     Icy,
///     Burning,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($(#[$meta:meta])* $name:ident, $storage:ty, { $($(#[$vmeta:meta])* $variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::define_bitmask_flags!(Marker, u8, { A, B, C });

    #[test]
    fn tags_map_to_their_own_bits() {
        assert_eq!(Marker::A.mask(), 0b001);
        assert_eq!(Marker::C.mask(), 0b100);
    }

    #[test]
    fn many_tags_toggle_together() {
        let mut flags = BitmaskFlags::<u8>::default();
        flags.add_many(&[Marker::A, Marker::C]);
        assert!(flags.has(Marker::A));
        assert!(!flags.has(Marker::B));

        flags.remove(Marker::A);
        flags.add(Marker::B);
        assert_eq!(flags.bits, 0b110);

        flags.remove_many(&[Marker::B, Marker::C]);
        assert_eq!(flags, BitmaskFlags::default());
    }
}
