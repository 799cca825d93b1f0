//! Big-integer reference arithmetic modulo `p = 2²⁵⁵ − 19`.
//!
//! Every value is a [`BigUint`] kept in `[0, p)`. Inputs are decoded the way
//! the limb code decodes them (little-endian, bit 255 ignored) so that the two
//! can be compared on any 32-byte string.

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::field::{A24, BASEPOINT_U};
use crate::keys::x25519::{LADDER_STEPS, LadderTrace};

/// The field modulus.
pub fn modulus() -> &'static BigUint {
    static P: OnceLock<BigUint> = OnceLock::new();
    P.get_or_init(|| (BigUint::one() << 255u32) - BigUint::from(19u8))
}

/// Decodes 32 little-endian bytes, ignoring bit 255, and reduces mod `p`.
pub fn from_bytes(bytes: &[u8; 32]) -> BigUint {
    let mut masked = *bytes;
    masked[31] &= 0x7f;

    BigUint::from_bytes_le(&masked) % modulus()
}

/// Encodes `value mod p` as 32 little-endian bytes.
pub fn to_bytes(value: &BigUint) -> [u8; 32] {
    let reduced = value % modulus();
    let mut out = [0u8; 32];

    for (byte, digit) in out.iter_mut().zip(reduced.to_bytes_le()) {
        *byte = digit;
    }

    out
}

/// Canonical encoding of the element `bytes` decodes to.
pub fn canonical(bytes: &[u8; 32]) -> [u8; 32] {
    to_bytes(&from_bytes(bytes))
}

pub fn add(a: &BigUint, b: &BigUint) -> BigUint {
    (a + b) % modulus()
}

pub fn sub(a: &BigUint, b: &BigUint) -> BigUint {
    let p = modulus();
    (a + p - (b % p)) % p
}

pub fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) % modulus()
}

pub fn square(a: &BigUint) -> BigUint {
    mul(a, a)
}

pub fn mul_small(a: &BigUint, k: u32) -> BigUint {
    (a * BigUint::from(k)) % modulus()
}

/// `a^(p − 2)`, the inverse by Fermat's little theorem. Zero maps to zero.
pub fn invert(a: &BigUint) -> BigUint {
    let p = modulus();
    a.modpow(&(p - BigUint::from(2u8)), p)
}

/// RFC 7748 clamping as integer arithmetic on the raw 256-bit scalar.
pub fn clamp(raw: &[u8; 32]) -> [u8; 32] {
    let k = BigUint::from_bytes_le(raw);
    let low = &k % BigUint::from(8u8);
    let kept = (&k - low) % (BigUint::one() << 254u32);

    let mut out = [0u8; 32];
    let clamped = kept + (BigUint::one() << 254u32);
    for (byte, digit) in out.iter_mut().zip(clamped.to_bytes_le()) {
        *byte = digit;
    }

    out
}

/// Reference ladder state `[x2, z2, x3, z3]`.
type State = [BigUint; 4];

fn state_bytes(state: &State) -> [[u8; 32]; 4] {
    [
        to_bytes(&state[0]),
        to_bytes(&state[1]),
        to_bytes(&state[2]),
        to_bytes(&state[3]),
    ]
}

fn run<F: FnMut(&State)>(scalar: &[u8; 32], mut observe: F) -> (State, u32) {
    let x1 = BigUint::from(BASEPOINT_U as u32);
    let a24 = A24 as u32;

    let mut x2 = BigUint::one();
    let mut z2 = BigUint::zero();
    let mut x3 = x1.clone();
    let mut z3 = BigUint::one();
    let mut swap = 0u32;

    for t in (0..LADDER_STEPS).rev() {
        let bit = ((scalar[t / 8] >> (t % 8)) & 1) as u32;
        swap ^= bit;
        if swap == 1 {
            std::mem::swap(&mut x2, &mut x3);
            std::mem::swap(&mut z2, &mut z3);
        }
        swap = bit;

        let a = add(&x2, &z2);
        let aa = square(&a);
        let b = sub(&x2, &z2);
        let bb = square(&b);
        let e = sub(&aa, &bb);
        let c = add(&x3, &z3);
        let d = sub(&x3, &z3);
        let da = mul(&d, &a);
        let cb = mul(&c, &b);

        x3 = square(&add(&da, &cb));
        z3 = mul(&x1, &square(&sub(&da, &cb)));
        x2 = mul(&aa, &bb);
        z2 = mul(&e, &add(&aa, &mul_small(&e, a24)));

        let state = [x2, z2, x3, z3];
        observe(&state);
        [x2, z2, x3, z3] = state;
    }

    if swap == 1 {
        std::mem::swap(&mut x2, &mut x3);
        std::mem::swap(&mut z2, &mut z3);
    }

    ([x2, z2, x3, z3], swap)
}

/// RFC 7748 basepoint multiplication of an already clamped scalar.
pub fn scalar_mult_basepoint(scalar: &[u8; 32]) -> [u8; 32] {
    let ([x2, z2, _, _], _) = run(scalar, |_| {});
    to_bytes(&mul(&x2, &invert(&z2)))
}

/// Reference ladder with every intermediate state recorded.
pub fn ladder_trace(scalar: &[u8; 32]) -> LadderTrace {
    let mut steps = Vec::with_capacity(LADDER_STEPS);
    let ([x2, z2, _, _], final_swap) = run(scalar, |state| steps.push(state_bytes(state)));

    LadderTrace {
        steps,
        final_swap,
        output: to_bytes(&mul(&x2, &invert(&z2))),
    }
}
