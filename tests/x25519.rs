use meshkey::keys::x25519::{
    ENCODED_LEN, LADDER_STEPS, LadderState, PublicKey, SecretKey, clamp, encode_key, ladder_trace,
    scalar_mult_basepoint,
};
use meshkey::rng::KeySource;
use meshkey::verify::{reference, vectors};

use hex_literal::hex;

#[test]
fn test_rfc7748_alice() {
    let secret = SecretKey::from_raw(vectors::ALICE_SECRET);
    assert_eq!(*secret.public_key().as_bytes(), vectors::ALICE_PUBLIC);
}

#[test]
fn test_rfc7748_bob() {
    let secret = SecretKey::from_raw(vectors::BOB_SECRET);
    assert_eq!(*secret.public_key().as_bytes(), vectors::BOB_PUBLIC);
}

#[test]
fn test_rfc7748_single_iteration() {
    let scalar = clamp(hex!(
        "0900000000000000000000000000000000000000000000000000000000000000"
    ));
    assert_eq!(
        scalar_mult_basepoint(&scalar),
        hex!("422c8e7a6227d7bca1350b3e2bb7279f7897b87bb6854b783c60e80311ae3079")
    );
}

#[test]
fn test_clamp_bits() {
    let clamped = clamp([0xff; 32]);
    assert_eq!(clamped[0], 0xf8);
    assert_eq!(clamped[31], 0x7f);

    let clamped = clamp([0x00; 32]);
    assert_eq!(clamped[0], 0x00);
    assert_eq!(clamped[31], 0x40);
}

#[test]
fn test_clamp_is_idempotent() {
    let mut source = KeySource::from_seed(1);

    for _ in 0..64 {
        let mut raw = [0u8; 32];
        source.fill(&mut raw);
        assert_eq!(clamp(clamp(raw)), clamp(raw));
    }
}

#[test]
fn test_derivation_is_deterministic() {
    let scalar = clamp(vectors::ALICE_SECRET);
    assert_eq!(scalar_mult_basepoint(&scalar), scalar_mult_basepoint(&scalar));
}

#[test]
fn test_all_zero_raw_scalar() {
    let scalar = clamp([0u8; 32]);
    let expected = hex!("2fe57da347cd62431528daac5fbb290730fff684afc4cfc2ed90995f58cb3b74");

    assert_eq!(scalar_mult_basepoint(&scalar), expected);
    assert_eq!(reference::scalar_mult_basepoint(&scalar), expected);

    #[cfg(feature = "dalek")]
    assert_eq!(
        x25519_dalek::x25519(scalar, x25519_dalek::X25519_BASEPOINT_BYTES),
        expected
    );
}

#[cfg(feature = "dalek")]
#[test]
fn test_random_scalars_match_library() {
    let mut source = KeySource::from_seed(0xdead_beef);

    for _ in 0..32 {
        let secret = SecretKey::random(&mut source);
        let expected = x25519_dalek::x25519(*secret.as_bytes(), x25519_dalek::X25519_BASEPOINT_BYTES);

        assert_eq!(*secret.public_key().as_bytes(), expected);
    }
}

#[test]
fn test_random_scalars_match_reference() {
    let mut source = KeySource::from_seed(42);

    for _ in 0..8 {
        let secret = SecretKey::random(&mut source);
        assert_eq!(
            *secret.public_key().as_bytes(),
            reference::scalar_mult_basepoint(secret.as_bytes())
        );
    }
}

#[test]
fn test_trace_ends_at_public_key() {
    let scalar = clamp(vectors::BOB_SECRET);
    let trace = ladder_trace(&scalar);

    assert_eq!(trace.steps.len(), LADDER_STEPS);
    assert_eq!(trace.output, vectors::BOB_PUBLIC);
    // Bit 0 of a clamped scalar is always clear.
    assert_eq!(trace.final_swap, 0);
    assert_ne!(trace.steps[0], LadderState::START.to_bytes());
}

#[test]
fn test_base64_encoding_length() {
    let public = PublicKey::from_bytes(vectors::ALICE_PUBLIC);
    let encoded = public.to_base64();

    assert_eq!(encoded.len(), ENCODED_LEN);
    assert!(encoded.ends_with('='));
    assert_eq!(encoded.matches('=').count(), 1);

    let mut buffer = [0u8; ENCODED_LEN];
    assert_eq!(encode_key(public.as_bytes(), &mut buffer), ENCODED_LEN);
    assert_eq!(&buffer[..], encoded.as_bytes());
}

#[test]
fn test_encode_key_fills_whole_buffer() {
    for key in [[0u8; 32], [0xff; 32]] {
        let mut buffer = [b'?'; ENCODED_LEN];

        assert_eq!(encode_key(&key, &mut buffer), ENCODED_LEN);
        assert_eq!(buffer[ENCODED_LEN - 1], b'=');
        assert!(!buffer.contains(&b'?'));
    }
    assert!(PublicKey::from_bytes([0u8; 32]).to_base64().starts_with("AAAA"));
}

#[test]
fn test_secret_key_from_slice() {
    let secret = SecretKey::try_from(&vectors::ALICE_SECRET[..]).unwrap();
    assert_eq!(*secret.as_bytes(), clamp(vectors::ALICE_SECRET));

    assert!(SecretKey::try_from(&[0u8; 31][..]).is_err());
    assert!(SecretKey::try_from(&[0u8; 33][..]).is_err());
}
