//! Binary extension fields GF(2^n)
//!
//! Elements are stored in polynomial basis: bit `i` of the value is the
//! coefficient of `x^i`. Addition is XOR, multiplication is carry-less
//! multiplication reduced modulo a fixed irreducible polynomial.
//!
//! | type            | modulus                          |
//! |-----------------|----------------------------------|
//! | `BinaryElem32`  | `x^32 + x^7 + x^3 + x^2 + 1`     |
//! | `BinaryElem128` | `x^128 + x^7 + x^2 + x + 1` (GCM)|

use core::fmt;
use core::hash::Hash;

mod elem;

pub use elem::{BinaryElem128, BinaryElem32};

/// common interface of the binary field element types
pub trait BinaryFieldElement:
    Send + Sync + Sized + Copy + Clone + Default + PartialEq + Eq + Hash + fmt::Debug + fmt::Display
{
    /// extension degree over GF(2)
    const BITS: u32;

    fn zero() -> Self;
    fn one() -> Self;
    fn add(&self, other: &Self) -> Self;
    fn mul(&self, other: &Self) -> Self;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    fn square(&self) -> Self {
        self.mul(self)
    }

    fn pow(&self, mut exp: u128) -> Self {
        let mut result = Self::one();
        let mut base = *self;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.square();
            exp >>= 1;
        }

        result
    }

    /// multiplicative inverse via fermat: a^(2^n - 2)
    ///
    /// panics on zero
    fn inv(&self) -> Self {
        assert!(!self.is_zero(), "Cannot invert zero");
        let exp = if Self::BITS == 128 {
            u128::MAX - 1
        } else {
            (1u128 << Self::BITS) - 2
        };
        self.pow(exp)
    }
}
