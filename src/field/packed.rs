//! Lane-parallel field elements.
//!
//! [`PackedFieldElement`] holds [`LANES`] independent elements of 𝔽ₚ in
//! structure-of-arrays layout: `limbs[i][lane]` is limb `i` of lane `lane`.
//! Every operation walks the limbs in the same order as the scalar
//! [`FieldElement`] and applies the step to all lanes in an inner loop over
//! a fixed-size array, a shape the compiler turns into vector instructions.
//!
//! The radix, the folding by 19 and the carry order are identical to the
//! scalar type, so a lane of a packed result always encodes to the same bytes
//! as the scalar computation on that lane's inputs. Nothing here is
//! hardened against side channels beyond what falls out of the layout.

use std::array;
use std::ops::{Add, Mul, Sub};

use super::core::{FieldElement, LIMB_WIDTHS, reduce};

/// Number of field elements processed side by side.
pub const LANES: usize = 4;

/// [`LANES`] field elements, limb-major.
#[derive(Clone, Copy, Debug)]
pub struct PackedFieldElement(pub(crate) [[i64; LANES]; 10]);

impl PackedFieldElement {
    /// Zero in every lane.
    pub const ZERO: Self = PackedFieldElement([[0; LANES]; 10]);

    /// One in every lane.
    pub const ONE: Self = Self::splat_small(1);

    /// Broadcasts a small integer to every lane.
    pub const fn splat_small(value: i64) -> Self {
        let mut limbs = [[0; LANES]; 10];
        limbs[0] = [value; LANES];
        PackedFieldElement(limbs)
    }

    /// Broadcasts one scalar element to every lane.
    pub fn splat(element: &FieldElement) -> Self {
        Self::from_lanes(&[*element; LANES])
    }

    /// Gathers scalar elements into lanes.
    pub fn from_lanes(elements: &[FieldElement; LANES]) -> Self {
        PackedFieldElement(array::from_fn(|limb| {
            array::from_fn(|lane| elements[lane].0[limb] as i64)
        }))
    }

    /// Scatters the lanes back into scalar elements.
    ///
    /// Limbs are weakly reduced first so that they fit the scalar type's
    /// 32-bit storage whatever sequence of lazy operations produced them.
    pub fn to_lanes(&self) -> [FieldElement; LANES] {
        array::from_fn(|lane| {
            let wide: [i64; 10] = array::from_fn(|limb| self.0[limb][lane]);
            FieldElement::from_wide(reduce(wide))
        })
    }

    /// Canonical encoding of every lane.
    pub fn to_bytes(&self) -> [[u8; 32]; LANES] {
        self.to_lanes().map(|element| element.to_bytes())
    }

    /// Per-lane conditional swap: lane `l` is exchanged when `condition[l] == 1`.
    pub fn swap(&mut self, rhs: &mut Self, condition: [u32; LANES]) {
        let mask = condition.map(|bit| -(bit as i64));

        for (s, r) in self.0.iter_mut().zip(rhs.0.iter_mut()) {
            for lane in 0..LANES {
                let tmp = (s[lane] ^ r[lane]) & mask[lane];
                s[lane] ^= tmp;
                r[lane] ^= tmp;
            }
        }
    }

    /// Multiplies every lane by the same small constant.
    pub fn mul_small(&self, k: i64) -> Self {
        let mut out = self.0;
        for limb in out.iter_mut() {
            for value in limb.iter_mut() {
                *value *= k;
            }
        }

        Self::carry(out)
    }

    /// Squares every lane through the general product.
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// `self^(2ⁿ)` in every lane.
    pub fn n_square(&self, n: usize) -> Self {
        (0..n).fold(*self, |acc, _| acc.square())
    }

    /// Inverts every lane with the same addition chain as [`FieldElement::invert`].
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

    /// Runs the scalar carry chain on every lane.
    fn carry(mut h: [[i64; LANES]; 10]) -> Self {
        for index in [0, 4, 1, 5, 2, 6, 3, 7, 4, 8, 9, 0] {
            let width = LIMB_WIDTHS[index];

            for lane in 0..LANES {
                let carry = (h[index][lane] + (1i64 << (width - 1))) >> width;
                h[index][lane] -= carry << width;

                if index == 9 {
                    h[0][lane] += carry * 19;
                } else {
                    h[index + 1][lane] += carry;
                }
            }
        }

        PackedFieldElement(h)
    }
}

impl Add for PackedFieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        PackedFieldElement(array::from_fn(|limb| {
            array::from_fn(|lane| self.0[limb][lane] + rhs.0[limb][lane])
        }))
    }
}

impl Sub for PackedFieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        PackedFieldElement(array::from_fn(|limb| {
            array::from_fn(|lane| self.0[limb][lane] - rhs.0[limb][lane])
        }))
    }
}

/// Lane-wise schoolbook product, same term layout as the scalar multiply.
impl Mul for PackedFieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let f = self.0;
        let g = rhs.0;
        let mut h = [[0i64; LANES]; 10];

        for i in 0..10 {
            for j in 0..10 {
                let scale = match (i & j & 1 == 1, i + j >= 10) {
                    (false, false) => 1,
                    (true, false) => 2,
                    (false, true) => 19,
                    (true, true) => 38,
                };
                let k = (i + j) % 10;

                for lane in 0..LANES {
                    h[k][lane] += f[i][lane] * g[j][lane] * scale;
                }
            }
        }

        Self::carry(h)
    }
}
