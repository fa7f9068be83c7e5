// Cross-mode integration tests for the ML-DSA signing core.

use mldsa::{
    keypair_internal, open, sign, signature_extmu, signature_internal, verify, verify_extmu,
    verify_internal, Error, ParamSet, CRHBYTES, ML_DSA_44, ML_DSA_65, ML_DSA_87, RNDBYTES,
    SEEDBYTES,
};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

const MODES: [&ParamSet; 3] = [&ML_DSA_44, &ML_DSA_65, &ML_DSA_87];

fn seeded_keypair(p: &ParamSet, seed_byte: u8) -> (Vec<u8>, Vec<u8>) {
    let mut pk = vec![0u8; p.public_key_bytes];
    let mut sk = vec![0u8; p.secret_key_bytes];
    let mut seed = [0u8; SEEDBYTES];
    for (i, b) in seed.iter_mut().enumerate() {
        *b = seed_byte.wrapping_add(i as u8);
    }
    keypair_internal(&mut pk, &mut sk, &seed, p);
    (pk, sk)
}

fn deterministic_signature(p: &ParamSet, sk: &[u8], m: &[u8], ctx: &[u8]) -> Vec<u8> {
    let mut sig = vec![0u8; p.signature_bytes];
    let mut pre = vec![0u8, ctx.len() as u8];
    pre.extend_from_slice(ctx);
    let rnd = [0u8; RNDBYTES];
    signature_internal(&mut sig, m, &pre, &rnd, sk, false, p);
    sig
}

#[test]
fn roundtrip_all_modes() {
    let long_message = [0xAAu8; 1000];
    let max_ctx = [0xFFu8; 255];
    for p in MODES {
        let (pk, sk) = seeded_keypair(p, 0);
        for (m, ctx) in [
            (b"".as_slice(), b"".as_slice()),
            (b"message".as_slice(), b"".as_slice()),
            (b"message".as_slice(), b"context".as_slice()),
            (long_message.as_slice(), max_ctx.as_slice()),
        ] {
            let sig = deterministic_signature(p, &sk, m, ctx);
            assert!(verify(&sig, m, ctx, &pk, p).is_ok());
        }
    }
}

#[test]
fn keygen_is_deterministic_per_mode_and_distinct_across_modes() {
    for p in MODES {
        let (pk1, sk1) = seeded_keypair(p, 0);
        let (pk2, sk2) = seeded_keypair(p, 0);
        assert_eq!(pk1, pk2);
        assert_eq!(sk1, sk2);
    }
    // The (k, l) domain separator feeds the seed expansion, so even the
    // shared 32-byte rho prefix differs between modes.
    let (pk44, _) = seeded_keypair(&ML_DSA_44, 0);
    let (pk65, _) = seeded_keypair(&ML_DSA_65, 0);
    let (pk87, _) = seeded_keypair(&ML_DSA_87, 0);
    assert_ne!(pk44[..32], pk65[..32]);
    assert_ne!(pk65[..32], pk87[..32]);
}

#[test]
fn deterministic_signatures_are_stable() {
    for p in MODES {
        let (pk, sk) = seeded_keypair(p, 7);
        let a = deterministic_signature(p, &sk, b"stable", b"ctx");
        let b = deterministic_signature(p, &sk, b"stable", b"ctx");
        assert_eq!(hex::encode(&a), hex::encode(&b));
        assert!(verify(&a, b"stable", b"ctx", &pk, p).is_ok());
    }
}

#[test]
fn tampered_signature_is_rejected() {
    let p = &ML_DSA_44;
    let (pk, sk) = seeded_keypair(p, 1);
    let sig = deterministic_signature(p, &sk, b"payload", b"");

    // Flip the lowest bit of the challenge hash.
    let mut bad = sig.clone();
    bad[0] ^= 1;
    assert_eq!(verify(&bad, b"payload", b"", &pk, p), Err(Error::VerificationFailed));

    // Flip one bit inside the packed z block.
    let mut bad = sig.clone();
    bad[p.ctilde_bytes + 100] ^= 0x10;
    assert_eq!(verify(&bad, b"payload", b"", &pk, p), Err(Error::VerificationFailed));

    // Flip one bit in the hint block.
    let mut bad = sig.clone();
    let hint_base = p.ctilde_bytes + p.l * p.polyz_packedbytes;
    bad[hint_base] ^= 1;
    assert_eq!(verify(&bad, b"payload", b"", &pk, p), Err(Error::VerificationFailed));

    // Wrong length.
    assert_eq!(
        verify(&sig[..sig.len() - 1], b"payload", b"", &pk, p),
        Err(Error::VerificationFailed)
    );
}

#[test]
fn tampered_message_and_key_are_rejected() {
    let p = &ML_DSA_65;
    let (pk, sk) = seeded_keypair(p, 2);
    let sig = deterministic_signature(p, &sk, b"payload", b"");

    assert!(verify(&sig, b"payloae", b"", &pk, p).is_err());
    assert!(verify(&sig, b"payload", b"x", &pk, p).is_err());

    let mut bad_pk = pk.clone();
    bad_pk[40] ^= 0x80;
    assert!(verify(&sig, b"payload", b"", &bad_pk, p).is_err());
}

#[test]
fn overlong_context_is_rejected_before_signing_or_verifying() {
    let p = &ML_DSA_44;
    let (pk, sk) = seeded_keypair(p, 3);
    let ctx = [0u8; 256];

    let mut sig = vec![0u8; p.signature_bytes];
    assert_eq!(
        mldsa::signature(&mut sig, b"m", &ctx, &sk, p),
        Err(Error::ContextTooLong)
    );
    assert_eq!(verify(&sig, b"m", &ctx, &pk, p), Err(Error::ContextTooLong));

    let mut sm = vec![0u8; p.signature_bytes + 1];
    assert_eq!(sign(&mut sm, b"m", &ctx, &sk, p), Err(Error::ContextTooLong));
}

#[test]
fn external_mu_matches_pure_path() {
    let p = &ML_DSA_87;
    let (pk, sk) = seeded_keypair(p, 4);

    // mu = SHAKE256(tr || 0x00 || len(ctx) || msg) with the empty context.
    let tr = &sk[2 * SEEDBYTES..2 * SEEDBYTES + 64];
    let mut hasher = Shake256::default();
    hasher.update(tr);
    hasher.update(&[0u8, 0u8]);
    hasher.update(b"abc");
    let mut mu = [0u8; CRHBYTES];
    hasher.finalize_xof().read(&mut mu);

    let pure = deterministic_signature(p, &sk, b"abc", b"");

    let mut extmu = vec![0u8; p.signature_bytes];
    let rnd = [0u8; RNDBYTES];
    signature_internal(&mut extmu, &mu, &[], &rnd, &sk, true, p);
    assert_eq!(pure, extmu);

    assert!(verify_extmu(&extmu, &mu, &pk, p).is_ok());
    assert!(verify_internal(&extmu, &mu, &[], &pk, true, p).is_ok());
    assert!(verify(&extmu, b"abc", b"", &pk, p).is_ok());

    let mut wrong_mu = mu;
    wrong_mu[0] ^= 1;
    assert!(verify_extmu(&extmu, &wrong_mu, &pk, p).is_err());
}

#[test]
fn hedged_extmu_signatures_verify() {
    let p = &ML_DSA_44;
    let (pk, sk) = seeded_keypair(p, 5);
    let mu = [0x42u8; CRHBYTES];
    let mut sig = vec![0u8; p.signature_bytes];
    let len = signature_extmu(&mut sig, &mu, &sk, p);
    assert_eq!(len, p.signature_bytes);
    assert!(verify_extmu(&sig, &mu, &pk, p).is_ok());
}

#[test]
fn signed_message_open_roundtrip() {
    let p = &ML_DSA_44;
    let (pk, sk) = seeded_keypair(p, 6);
    let msg = b"attached message";

    let mut sm = vec![0u8; p.signature_bytes + msg.len()];
    let smlen = sign(&mut sm, msg, b"", &sk, p).unwrap();
    assert_eq!(smlen, p.signature_bytes + msg.len());

    let mut m_out = vec![0u8; msg.len()];
    let mlen = open(&mut m_out, &sm, b"", &pk, p).unwrap();
    assert_eq!(&m_out[..mlen], msg);

    // A flipped byte in the attached message must fail to open.
    sm[p.signature_bytes] ^= 1;
    assert!(open(&mut m_out, &sm, b"", &pk, p).is_err());

    // A signed message shorter than a signature cannot be opened.
    assert!(open(&mut m_out, &sm[..10], b"", &pk, p).is_err());
}

#[test]
fn signatures_do_not_cross_modes() {
    let (pk44, _) = seeded_keypair(&ML_DSA_44, 8);
    let (_, sk65) = seeded_keypair(&ML_DSA_65, 8);
    let sig = deterministic_signature(&ML_DSA_65, &sk65, b"m", b"");
    // Wrong length for the 44 parameter set is rejected outright.
    assert!(verify(&sig, b"m", b"", &pk44, &ML_DSA_44).is_err());
}
