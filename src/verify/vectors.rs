//! RFC 7748 known answers.
//!
//! Secrets are given raw, as printed in the RFC; clamp them before feeding
//! them to the ladder.

use hex_literal::hex;

/// §6.1 Alice's private key.
pub const ALICE_SECRET: [u8; 32] =
    hex!("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");

/// §6.1 Alice's public key.
pub const ALICE_PUBLIC: [u8; 32] =
    hex!("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a");

/// §6.1 Bob's private key.
pub const BOB_SECRET: [u8; 32] =
    hex!("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb");

/// §6.1 Bob's public key.
pub const BOB_PUBLIC: [u8; 32] =
    hex!("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f");

/// §5.2 iterated test, starting scalar `k = 9`.
pub const ITERATION_SCALAR: [u8; 32] =
    hex!("0900000000000000000000000000000000000000000000000000000000000000");

/// §5.2 iterated test, result after one iteration with `u = 9`.
pub const ITERATION_OUTPUT: [u8; 32] =
    hex!("422c8e7a6227d7bca1350b3e2bb7279f7897b87bb6854b783c60e80311ae3079");

/// Every `(raw secret, public key)` pair above.
pub const KNOWN_ANSWERS: [([u8; 32], [u8; 32]); 3] = [
    (ALICE_SECRET, ALICE_PUBLIC),
    (BOB_SECRET, BOB_PUBLIC),
    (ITERATION_SCALAR, ITERATION_OUTPUT),
];
