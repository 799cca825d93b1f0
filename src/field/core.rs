//! Scalar field elements for Curve25519.
//!
//! ## Representation
//!
//! An element is stored as 10 signed 32-bit limbs with alternating widths
//!
//! ```text
//! [26, 25, 26, 25, 26, 25, 26, 25, 26, 25] bits
//! ```
//!
//! starting at bit offsets `0, 26, 51, 77, 102, 128, 153, 179, 204, 230`.
//! Limb `i` therefore carries weight `2^⌈25.5·i⌉`, and the product of two odd
//! limbs lands one bit above the limb it is accumulated into, which is why the
//! multiplication doubles those terms.
//!
//! Additions and subtractions are lazy: they work limb by limb and leave the
//! result unreduced. Multiplication, squaring and [`FieldElement::mul_small`]
//! end with a carry chain that brings every limb back to (roughly) its nominal
//! width, folding the overflow of limb 9 into limb 0 multiplied by 19 since
//! `2²⁵⁵ ≡ 19 (mod p)`.
//!
//! Canonical form only exists in bytes: [`FieldElement::to_bytes`] always
//! returns the unique representative in `[0, p)`.

use std::array;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use super::ct::ConstantTimeEq;

/// Bit offset of each limb inside the 255-bit little-endian integer.
pub const LIMB_OFFSETS: [u32; 10] = [0, 26, 51, 77, 102, 128, 153, 179, 204, 230];

/// Nominal width of each limb.
pub const LIMB_WIDTHS: [u32; 10] = [26, 25, 26, 25, 26, 25, 26, 25, 26, 25];

/// Reads `width` bits of `input` starting at bit `offset`.
///
/// At most five bytes are touched: a limb never spans more than 33 bits once
/// the in-byte shift is included.
#[inline(always)]
fn load_bits(input: &[u8; 32], offset: u32, width: u32) -> i64 {
    let start = (offset / 8) as usize;
    let word = input[start..]
        .iter()
        .take(5)
        .enumerate()
        .fold(0u64, |acc, (index, &byte)| acc | ((byte as u64) << (8 * index)));

    ((word >> (offset % 8)) & ((1u64 << width) - 1)) as i64
}

/// Moves the excess of limb `index` into limb `index + 1`, rounding to the
/// nearest multiple so the remaining limb is centred around zero.
#[inline(always)]
fn carry_round(h: &mut [i64; 10], index: usize) {
    let width = LIMB_WIDTHS[index];
    let carry = (h[index] + (1i64 << (width - 1))) >> width;

    h[index] -= carry << width;

    if index == 9 {
        h[0] += carry * 19;
    } else {
        h[index + 1] += carry;
    }
}

/// Weak reduction shared by multiplication, squaring and decoding.
///
/// The carry order interleaves two chains (starting at limbs 0 and 4) so that
/// no limb is read before the carry feeding it has landed. On return every
/// limb is bounded by roughly `2^(width − 1)` in absolute value, which keeps
/// the next multiplication's 64-bit accumulators from overflowing.
#[inline(always)]
pub(super) fn reduce(mut h: [i64; 10]) -> [i64; 10] {
    for index in [0, 4, 1, 5, 2, 6, 3, 7, 4, 8, 9, 0] {
        carry_round(&mut h, index);
    }

    h
}

/// Field element modulo `2²⁵⁵ − 19` in radix `2^25.5`.
#[derive(Clone, Copy)]
pub struct FieldElement(pub(crate) [i32; 10]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = FieldElement([0; 10]);

    /// The multiplicative identity.
    pub const ONE: Self = FieldElement([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Builds an element from a small non-negative integer.
    pub const fn from_small(value: i32) -> Self {
        FieldElement([value, 0, 0, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Returns the raw limbs, reduced or not.
    ///
    /// Only meaningful for diagnostics: two limb arrays may differ while
    /// representing the same field element.
    pub fn limbs(&self) -> [i32; 10] {
        self.0
    }

    /// Decodes a 32-byte little-endian integer.
    ///
    /// Each limb is extracted at its bit offset and masked to its width, so
    /// bit 255 is ignored. A single carry pass then centres the limbs; values
    /// in `[p, 2²⁵⁵)` are accepted and only become canonical in
    /// [`FieldElement::to_bytes`].
    pub fn from_bytes(input: &[u8; 32]) -> Self {
        let h: [i64; 10] =
            array::from_fn(|index| load_bits(input, LIMB_OFFSETS[index], LIMB_WIDTHS[index]));

        Self::from_wide(reduce(h))
    }

    /// Encodes the element into its canonical 32-byte little-endian form.
    ///
    /// The limbs are first weakly reduced so that the value lies in
    /// `(-2²⁵⁵, 2·2²⁵⁵)`. The quotient `q` by `p` is then estimated by
    /// carrying `value + 19·q₀` through all limbs, where `q₀` is the rounded
    /// top limb. Adding `19·q` and dropping the final carry out of bit 255
    /// subtracts `q·p`, leaving the representative in `[0, p)`. The limbs are
    /// finally packed back at their bit offsets.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut h = reduce(self.0.map(i64::from));

        let mut q = (19 * h[9] + (1i64 << 24)) >> 25;
        for (limb, width) in h.iter().zip(LIMB_WIDTHS) {
            q = (limb + q) >> width;
        }

        h[0] += 19 * q;

        for index in 0..9 {
            let carry = h[index] >> LIMB_WIDTHS[index];
            h[index + 1] += carry;
            h[index] -= carry << LIMB_WIDTHS[index];
        }

        // Drops 2^255: this is where q·p leaves the value.
        h[9] &= (1i64 << 25) - 1;

        let mut output = [0u8; 32];
        for (limb, offset) in h.iter().zip(LIMB_OFFSETS) {
            let value = (*limb as u64) << (offset % 8);
            let start = (offset / 8) as usize;

            for (index, byte) in output[start..].iter_mut().take(5).enumerate() {
                *byte |= (value >> (8 * index)) as u8;
            }
        }

        output
    }

    /// Returns `true` if the element is zero modulo `p`.
    pub fn is_zero(&self) -> bool {
        self.to_bytes().ct_eq(&[0u8; 32])
    }

    /// Constant-time conditional swap.
    ///
    /// Exchanges `self` and `rhs` when `condition == 1` and leaves both
    /// untouched when `condition == 0`. The choice is applied through an
    /// all-ones or all-zeros mask, never a branch.
    pub fn swap(&mut self, rhs: &mut Self, condition: u32) {
        let mask = -(condition as i32);

        for (s, r) in self.0.iter_mut().zip(rhs.0.iter_mut()) {
            let tmp = (*s ^ *r) & mask;
            *s ^= tmp;
            *r ^= tmp;
        }
    }

    /// Multiplies by a small constant such as `a24` or the basepoint `9`.
    ///
    /// `k` must stay below `2²⁰` so that the scaled limbs fit comfortably in
    /// 64 bits before the carry chain.
    pub fn mul_small(&self, k: i32) -> Self {
        let h = self.0.map(|limb| limb as i64 * k as i64);

        Self::from_wide(reduce(h))
    }

    /// Computes `self²`.
    ///
    /// Only the upper triangle of the limb products is formed: each
    /// off-diagonal product is counted twice, odd×odd products twice more,
    /// and terms at or above limb 10 are folded back multiplied by 19.
    pub fn square(&self) -> Self {
        let f = self.0.map(i64::from);
        let mut h = [0i64; 10];

        for i in 0..10 {
            for j in i..10 {
                let mut factor = if i == j { 1 } else { 2 };

                if i & j & 1 == 1 {
                    factor *= 2;
                }

                let k = i + j;
                if k < 10 {
                    h[k] += f[i] * f[j] * factor;
                } else {
                    h[k - 10] += f[i] * f[j] * (factor * 19);
                }
            }
        }

        Self::from_wide(reduce(h))
    }

    /// Squares the element `n` times in a row, computing `self^(2ⁿ)`.
    pub fn n_square(&self, n: usize) -> Self {
        (0..n).fold(*self, |acc, _| acc.square())
    }

    /// Computes the multiplicative inverse `self^(p − 2)`.
    ///
    /// The exponent `p − 2 = 2²⁵⁵ − 21` is reached with the classic chain of
    /// 254 squarings and 11 multiplications through the intermediate powers
    ///
    /// ```text
    /// 11, 2⁵−1, 2¹⁰−1, 2²⁰−1, 2⁴⁰−1, 2⁵⁰−1, 2¹⁰⁰−1, 2²⁰⁰−1, 2²⁵⁰−1
    /// ```
    ///
    /// and finally `(2²⁵⁰−1)·2⁵ + 11`. Zero maps to zero.
    pub fn invert(&self) -> Self {
        let z2 = self.square();
        let z9 = *self * z2.n_square(2);
        let z11 = z2 * z9;

        let z_5_0 = z9 * z11.square();
        let z_10_0 = z_5_0.n_square(5) * z_5_0;
        let z_20_0 = z_10_0.n_square(10) * z_10_0;
        let z_40_0 = z_20_0.n_square(20) * z_20_0;
        let z_50_0 = z_40_0.n_square(10) * z_10_0;
        let z_100_0 = z_50_0.n_square(50) * z_50_0;
        let z_200_0 = z_100_0.n_square(100) * z_100_0;
        let z_250_0 = z_200_0.n_square(50) * z_50_0;

        z_250_0.n_square(5) * z11
    }

    #[inline(always)]
    pub(crate) fn from_wide(h: [i64; 10]) -> Self {
        FieldElement(h.map(|limb| limb as i32))
    }
}

/// Limb-wise addition without reduction.
impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        FieldElement(array::from_fn(|index| self.0[index] + rhs.0[index]))
    }
}

/// Limb-wise subtraction without reduction. Limbs may turn negative.
impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        FieldElement(array::from_fn(|index| self.0[index] - rhs.0[index]))
    }
}

/// Schoolbook multiplication modulo `2²⁵⁵ − 19`.
///
/// Inputs may be reduced elements or the sum/difference of two reduced
/// elements; anything larger risks overflowing the 64-bit accumulators.
///
/// 1. `g₁₉[j] = 19·g[j]` is precomputed so that every product landing at or
///    above limb 10 is folded back in place.
/// 2. Odd limbs of `f` are doubled up front (`f₂`), covering the extra bit
///    of every odd×odd product.
/// 3. All 100 products are accumulated into `h`, then one carry chain
///    restores the limb widths.
impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let f = self.0.map(i64::from);
        let g = rhs.0.map(i64::from);

        let g_19 = g.map(|limb| 19 * limb);
        let f_2: [i64; 10] = array::from_fn(|i| if i & 1 == 1 { 2 * f[i] } else { f[i] });

        let mut h = [0i64; 10];

        for i in 0..10 {
            for j in 0..10 {
                let fi = if i & j & 1 == 1 { f_2[i] } else { f[i] };

                if i + j < 10 {
                    h[i + j] += fi * g[j];
                } else {
                    h[i + j - 10] += fi * g_19[j];
                }
            }
        }

        Self::from_wide(reduce(h))
    }
}

/// Elements are equal when their canonical encodings are.
impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl Eq for FieldElement {}

/// Prints the canonical encoding as little-endian hex.
impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", hex::encode(self.to_bytes()))
    }
}
