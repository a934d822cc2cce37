use core::fmt;

use crate::BinaryFieldElement;

// low bits of the irreducible polynomials, the leading x^n term is implicit
const IRREDUCIBLE_32: u32 = 0b1000_1101; // x^32 + x^7 + x^3 + x^2 + 1
const IRREDUCIBLE_128: u128 = 0b1000_0111; // x^128 + x^7 + x^2 + x + 1

macro_rules! impl_binary_elem {
    ($name:ident, $value_type:ty, $bits:expr, $irreducible:expr) => {
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name($value_type);

        impl $name {
            pub const fn from_value(val: $value_type) -> Self {
                Self(val)
            }

            /// raw polynomial-basis bits
            pub const fn value(&self) -> $value_type {
                self.0
            }

            /// multiply by x, folding the overflowing x^n term back in
            #[inline]
            const fn mul_x(v: $value_type) -> $value_type {
                let carry = v >> ($bits - 1);
                (v << 1) ^ (carry * $irreducible)
            }
        }

        impl BinaryFieldElement for $name {
            const BITS: u32 = $bits;

            fn zero() -> Self {
                Self(0)
            }

            fn one() -> Self {
                Self(1)
            }

            #[inline]
            fn add(&self, other: &Self) -> Self {
                Self(self.0 ^ other.0)
            }

            fn mul(&self, other: &Self) -> Self {
                let mut a = self.0;
                let mut b = other.0;
                let mut acc: $value_type = 0;

                while b != 0 {
                    if b & 1 == 1 {
                        acc ^= a;
                    }
                    a = Self::mul_x(a);
                    b >>= 1;
                }

                Self(acc)
            }
        }

        impl From<$value_type> for $name {
            fn from(val: $value_type) -> Self {
                Self::from_value(val)
            }
        }

        impl From<bool> for $name {
            fn from(b: bool) -> Self {
                if b {
                    Self::one()
                } else {
                    Self::zero()
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        #[cfg(feature = "rand")]
        impl rand::distributions::Distribution<$name> for rand::distributions::Standard {
            fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> $name {
                $name::from_value(rng.gen())
            }
        }
    };
}

impl_binary_elem!(BinaryElem32, u32, 32, IRREDUCIBLE_32);
impl_binary_elem!(BinaryElem128, u128, 128, IRREDUCIBLE_128);

impl From<u64> for BinaryElem128 {
    fn from(val: u64) -> Self {
        Self::from_value(val as u128)
    }
}
