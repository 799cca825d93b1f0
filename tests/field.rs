use meshkey::field::{A24, ConstantTimeEq, FieldElement, LANES, PackedFieldElement};
use meshkey::verify::reference;

use num_bigint::BigUint;
use num_traits::One;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn p_bytes(offset: u8) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    let value = reference::modulus() + BigUint::from(offset);
    for (byte, digit) in bytes.iter_mut().zip(value.to_bytes_le()) {
        *byte = digit;
    }
    bytes
}

fn pow2(k: u32) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[(k / 8) as usize] = 1 << (k % 8);
    bytes
}

#[test]
fn zero_and_one_encode_canonically() {
    assert_eq!(FieldElement::ZERO.to_bytes(), [0u8; 32]);

    let mut one = [0u8; 32];
    one[0] = 1;
    assert_eq!(FieldElement::ONE.to_bytes(), one);
    assert!(FieldElement::ZERO.is_zero());
    assert!(!FieldElement::ONE.is_zero());
}

#[test]
fn p_minus_one_round_trips() {
    let p_minus_one = reference::to_bytes(&(reference::modulus() - BigUint::one()));
    assert_eq!(FieldElement::from_bytes(&p_minus_one).to_bytes(), p_minus_one);
}

#[test]
fn every_power_of_two_round_trips() {
    for k in 0..255 {
        let bytes = pow2(k);
        assert_eq!(
            FieldElement::from_bytes(&bytes).to_bytes(),
            bytes,
            "2^{k} did not round-trip"
        );
    }
}

#[test]
fn values_between_p_and_2_255_reduce() {
    for offset in 0..19u8 {
        let mut expected = [0u8; 32];
        expected[0] = offset;

        assert_eq!(FieldElement::from_bytes(&p_bytes(offset)).to_bytes(), expected);
    }
}

#[test]
fn bit_255_is_ignored() {
    let mut bytes = [0u8; 32];
    bytes[0] = 5;
    bytes[31] = 0x80;

    let mut expected = [0u8; 32];
    expected[0] = 5;

    assert_eq!(FieldElement::from_bytes(&bytes).to_bytes(), expected);
}

#[test]
fn all_ones_reduces_to_18() {
    // 2^255 - 1 = p + 18
    let mut expected = [0u8; 32];
    expected[0] = 18;

    assert_eq!(FieldElement::from_bytes(&[0xff; 32]).to_bytes(), expected);
}

#[test]
fn invert_zero_is_zero() {
    assert!(FieldElement::ZERO.invert().is_zero());
}

#[test]
fn invert_one_and_p_minus_one() {
    assert_eq!(FieldElement::ONE.invert(), FieldElement::ONE);

    // -1 is its own inverse.
    let minus_one = FieldElement::ZERO - FieldElement::ONE;
    assert_eq!(minus_one.invert(), minus_one);
}

#[test]
fn swap_is_conditional() {
    let mut a = FieldElement::from_small(3);
    let mut b = FieldElement::from_small(7);

    a.swap(&mut b, 0);
    assert_eq!(a, FieldElement::from_small(3));
    assert_eq!(b, FieldElement::from_small(7));

    a.swap(&mut b, 1);
    assert_eq!(a, FieldElement::from_small(7));
    assert_eq!(b, FieldElement::from_small(3));
}

#[test]
fn unreduced_limbs_compare_equal() {
    let a = FieldElement::from_small(10);
    let b = FieldElement::from_small(4) + FieldElement::from_small(6);
    let c = FieldElement::from_small(20) - FieldElement::from_small(10);

    assert!(a.ct_eq(&b));
    assert_eq!(a, c);
    assert_ne!(a, FieldElement::from_small(11));
}

#[test]
fn n_square_matches_repeated_square() {
    let x = FieldElement::from_small(123_456);
    let mut expected = x;
    for _ in 0..7 {
        expected = expected.square();
    }

    assert_eq!(x.n_square(7), expected);
}

#[test]
fn packed_lanes_agree_with_scalar() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut random = || {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        FieldElement::from_bytes(&bytes)
    };

    let a: [FieldElement; LANES] = std::array::from_fn(|_| random());
    let b: [FieldElement; LANES] = std::array::from_fn(|_| random());
    let (pa, pb) = (PackedFieldElement::from_lanes(&a), PackedFieldElement::from_lanes(&b));

    let products = (pa * pb).to_bytes();
    let squares = pa.square().to_bytes();
    let sums = ((pa + pb) * pb).to_bytes();
    let scaled = (pa - pb).mul_small(A24 as i64).to_bytes();
    let inverses = pa.invert().to_bytes();

    for lane in 0..LANES {
        assert_eq!(products[lane], (a[lane] * b[lane]).to_bytes());
        assert_eq!(squares[lane], a[lane].square().to_bytes());
        assert_eq!(sums[lane], ((a[lane] + b[lane]) * b[lane]).to_bytes());
        assert_eq!(scaled[lane], (a[lane] - b[lane]).mul_small(A24).to_bytes());
        assert_eq!(inverses[lane], a[lane].invert().to_bytes());
    }
}

#[test]
fn packed_swap_is_per_lane() {
    let a: [FieldElement; LANES] = std::array::from_fn(|i| FieldElement::from_small(i as i32));
    let b: [FieldElement; LANES] =
        std::array::from_fn(|i| FieldElement::from_small(100 + i as i32));

    let (mut pa, mut pb) = (PackedFieldElement::from_lanes(&a), PackedFieldElement::from_lanes(&b));
    let condition: [u32; LANES] = std::array::from_fn(|i| (i % 2) as u32);
    pa.swap(&mut pb, condition);

    let (left, right) = (pa.to_lanes(), pb.to_lanes());
    for lane in 0..LANES {
        let (l, r) = if lane % 2 == 1 { (b[lane], a[lane]) } else { (a[lane], b[lane]) };
        assert_eq!(left[lane], l);
        assert_eq!(right[lane], r);
    }
}

proptest! {
    #[test]
    fn round_trip_matches_reference(bytes in any::<[u8; 32]>()) {
        prop_assert_eq!(
            FieldElement::from_bytes(&bytes).to_bytes(),
            reference::canonical(&bytes)
        );
    }

    #[test]
    fn mul_matches_reference(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let expected = reference::mul(&reference::from_bytes(&a), &reference::from_bytes(&b));
        let actual = FieldElement::from_bytes(&a) * FieldElement::from_bytes(&b);

        prop_assert_eq!(actual.to_bytes(), reference::to_bytes(&expected));
    }

    #[test]
    fn square_matches_mul(a in any::<[u8; 32]>()) {
        let x = FieldElement::from_bytes(&a);
        prop_assert_eq!(x.square(), x * x);
    }

    #[test]
    fn sub_then_add_restores(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (x, y) = (FieldElement::from_bytes(&a), FieldElement::from_bytes(&b));
        prop_assert_eq!((x - y) + y, x);
    }

    #[test]
    fn inverse_law(a in any::<[u8; 32]>()) {
        let x = FieldElement::from_bytes(&a);
        prop_assume!(!x.is_zero());

        prop_assert_eq!(x * x.invert(), FieldElement::ONE);
    }
}
