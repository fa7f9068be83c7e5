// This module was originally derived from CRYSTALS-Dilithium
// Source: https://github.com/pq-crystals/dilithium
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Changes made to the original code:
// - Generalized to the three ML-DSA (FIPS 204) parameter sets
// - External-mu and context-string paths per FIPS 204 final

use crate::error::{Error, Result};
use crate::packing;
use crate::params::{
    ParamSet, CRHBYTES, CTILDEBYTES_MAX, K_MAX, POLYW1_PACKEDBYTES_MAX, RNDBYTES, SEEDBYTES,
    TRBYTES,
};
use crate::poly::{self, Poly};
use crate::polyvec::{self, Polyveck, Polyvecl};
use crate::symmetric::shake256;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// FIPS 204: Algorithm 6 ML-DSA.KeyGen_internal.
/// Deterministically generates a key pair from a 32-byte seed.
///
/// pk and sk must be exactly p.public_key_bytes and p.secret_key_bytes long.
pub fn keypair_internal(pk: &mut [u8], sk: &mut [u8], seed: &[u8; SEEDBYTES], p: &ParamSet) {
    assert_eq!(pk.len(), p.public_key_bytes);
    assert_eq!(sk.len(), p.secret_key_bytes);

    // Expand the seed with the (k, l) domain separator into rho, rhoprime, key.
    let mut seedbuf = [0u8; 2 * SEEDBYTES + CRHBYTES];
    shake256(&mut seedbuf, &[seed, &[p.k as u8], &[p.l as u8]]);
    let (rho, rest) = seedbuf.split_at(SEEDBYTES);
    let (rhoprime, key) = rest.split_at(CRHBYTES);

    // Expand matrix
    let mut mat = [Polyvecl::default(); K_MAX];
    polyvec::matrix_expand(&mut mat, rho, p);

    // Sample short vectors s1 and s2
    let mut s1 = Polyvecl::default();
    let mut s2 = Polyveck::default();
    polyvec::polyvecl_uniform_eta(&mut s1, rhoprime, 0, p);
    polyvec::polyveck_uniform_eta(&mut s2, rhoprime, p.l as u16, p);

    // Matrix-vector multiplication
    let mut s1hat = s1;
    polyvec::polyvecl_ntt(&mut s1hat, p);
    let mut t1 = Polyveck::default();
    polyvec::matrix_pointwise_montgomery(&mut t1, &mat, &s1hat, p);
    polyvec::polyveck_reduce(&mut t1, p);
    polyvec::polyveck_invntt_tomont(&mut t1, p);

    // Add error vector s2
    polyvec::polyveck_add(&mut t1, &s2, p);

    // Extract t1 and write public key
    polyvec::polyveck_caddq(&mut t1, p);
    let mut t0 = Polyveck::default();
    polyvec::polyveck_power2round(&mut t1, &mut t0, p);
    packing::pack_pk(pk, rho, &t1, p);

    // Compute H(rho, t1) and write secret key
    let mut tr = [0u8; TRBYTES];
    shake256(&mut tr, &[pk]);
    packing::pack_sk(sk, rho, &tr, key, &t0, &s1, &s2, p);

    seedbuf.zeroize();
    s1.zeroize();
    s1hat.zeroize();
    s2.zeroize();
    t0.zeroize();
    tr.zeroize();
}

/// FIPS 204: Algorithm 1 ML-DSA.KeyGen.
/// Generates a key pair from fresh system entropy. The entropy oracle is
/// consumed exactly once, at the top of the call.
pub fn keypair(pk: &mut [u8], sk: &mut [u8], p: &ParamSet) {
    let mut seed = [0u8; SEEDBYTES];
    OsRng.fill_bytes(&mut seed);
    keypair_internal(pk, sk, &seed, p);
    seed.zeroize();
}

/// FIPS 204: Algorithm 7 ML-DSA.Sign_internal.
/// Computes a signature over m with prefix pre and signer randomness rnd.
/// With externalmu set, m is taken verbatim as the 64-byte message
/// representative and pre is ignored.
///
/// Returns the signature length, always p.signature_bytes.
pub fn signature_internal(
    sig: &mut [u8],
    m: &[u8],
    pre: &[u8],
    rnd: &[u8; RNDBYTES],
    sk: &[u8],
    externalmu: bool,
    p: &ParamSet,
) -> usize {
    assert_eq!(sig.len(), p.signature_bytes);
    assert_eq!(sk.len(), p.secret_key_bytes);

    let mut rho = [0u8; SEEDBYTES];
    let mut tr = [0u8; TRBYTES];
    let mut key = [0u8; SEEDBYTES];
    let mut t0 = Polyveck::default();
    let mut s1 = Polyvecl::default();
    let mut s2 = Polyveck::default();
    packing::unpack_sk(&mut rho, &mut tr, &mut key, &mut t0, &mut s1, &mut s2, sk, p);

    // Compute mu = CRH(tr, pre, msg)
    let mut mu = [0u8; CRHBYTES];
    if externalmu {
        mu.copy_from_slice(m);
    } else {
        shake256(&mut mu, &[&tr, pre, m]);
    }

    // Compute rhoprime = CRH(key, rnd, mu)
    let mut rhoprime = [0u8; CRHBYTES];
    shake256(&mut rhoprime, &[&key, rnd, &mu]);

    // Expand matrix and transform vectors
    let mut mat = [Polyvecl::default(); K_MAX];
    polyvec::matrix_expand(&mut mat, &rho, p);
    polyvec::polyvecl_ntt(&mut s1, p);
    polyvec::polyveck_ntt(&mut s2, p);
    polyvec::polyveck_ntt(&mut t0, p);

    let mut nonce: u16 = 0;
    let mut y = Polyvecl::default();
    let mut z;
    let mut w1 = Polyveck::default();
    let mut w0 = Polyveck::default();
    let mut h = Polyveck::default();
    let mut hint = Polyveck::default();
    let mut cp = Poly::default();
    let mut ctilde = [0u8; CTILDEBYTES_MAX];
    let mut w1_packed = [0u8; K_MAX * POLYW1_PACKEDBYTES_MAX];

    loop {
        // Sample intermediate vector y
        polyvec::polyvecl_uniform_gamma1(&mut y, &rhoprime, nonce, p);
        nonce += 1;

        // Matrix-vector multiplication
        z = y;
        polyvec::polyvecl_ntt(&mut z, p);
        polyvec::matrix_pointwise_montgomery(&mut w1, &mat, &z, p);
        polyvec::polyveck_reduce(&mut w1, p);
        polyvec::polyveck_invntt_tomont(&mut w1, p);

        // Decompose w and call the random oracle
        polyvec::polyveck_caddq(&mut w1, p);
        polyvec::polyveck_decompose(&mut w1, &mut w0, p);
        polyvec::polyveck_pack_w1(&mut w1_packed, &w1, p);

        shake256(
            &mut ctilde[..p.ctilde_bytes],
            &[&mu, &w1_packed[..p.k * p.polyw1_packedbytes]],
        );
        poly::challenge(&mut cp, &ctilde[..p.ctilde_bytes], p.tau);
        poly::poly_ntt(&mut cp);

        // Compute z, reject if it reveals secret
        polyvec::polyvecl_pointwise_poly_montgomery(&mut z, &cp, &s1, p);
        polyvec::polyvecl_invntt_tomont(&mut z, p);
        polyvec::polyvecl_add(&mut z, &y, p);
        polyvec::polyvecl_reduce(&mut z, p);
        if polyvec::polyvecl_chknorm(&z, p.gamma1 - p.beta, p) != 0 {
            continue;
        }

        // Check that subtracting cs2 does not change high bits of w and
        // low bits do not reveal secret information
        polyvec::polyveck_pointwise_poly_montgomery(&mut h, &cp, &s2, p);
        polyvec::polyveck_invntt_tomont(&mut h, p);
        polyvec::polyveck_sub(&mut w0, &h, p);
        polyvec::polyveck_reduce(&mut w0, p);
        if polyvec::polyveck_chknorm(&w0, p.gamma2 - p.beta, p) != 0 {
            continue;
        }

        // Compute hints for w1
        polyvec::polyveck_pointwise_poly_montgomery(&mut h, &cp, &t0, p);
        polyvec::polyveck_invntt_tomont(&mut h, p);
        polyvec::polyveck_reduce(&mut h, p);
        if polyvec::polyveck_chknorm(&h, p.gamma2, p) != 0 {
            continue;
        }

        polyvec::polyveck_add(&mut w0, &h, p);
        let n = polyvec::polyveck_make_hint(&mut hint, &w0, &w1, p);
        if n > p.omega as i32 {
            continue;
        }

        // Write signature
        packing::pack_sig(sig, Some(&ctilde[..p.ctilde_bytes]), &z, &hint, p);
        break;
    }

    key.zeroize();
    tr.zeroize();
    rhoprime.zeroize();
    t0.zeroize();
    s1.zeroize();
    s2.zeroize();
    y.zeroize();
    z.zeroize();
    w0.zeroize();
    h.zeroize();

    p.signature_bytes
}

/// FIPS 204: Algorithm 2 ML-DSA.Sign (hedged).
/// Computes a signature over m bound to the context string ctx.
///
/// Returns the signature length or Error::ContextTooLong.
pub fn signature(sig: &mut [u8], m: &[u8], ctx: &[u8], sk: &[u8], p: &ParamSet) -> Result<usize> {
    if ctx.len() > 255 {
        return Err(Error::ContextTooLong);
    }

    let mut rnd = [0u8; RNDBYTES];
    OsRng.fill_bytes(&mut rnd);

    // Prefix 0x00 marks the pure (non-prehashed) variant.
    let mut pre = [0u8; 257];
    pre[0] = 0;
    pre[1] = ctx.len() as u8;
    pre[2..2 + ctx.len()].copy_from_slice(ctx);

    let len = signature_internal(sig, m, &pre[..2 + ctx.len()], &rnd, sk, false, p);
    rnd.zeroize();
    Ok(len)
}

/// FIPS 204: Algorithm 2 ML-DSA.Sign, external-mu variant.
/// Signs a precomputed 64-byte message representative.
///
/// Returns the signature length, always p.signature_bytes.
pub fn signature_extmu(sig: &mut [u8], mu: &[u8; CRHBYTES], sk: &[u8], p: &ParamSet) -> usize {
    let mut rnd = [0u8; RNDBYTES];
    OsRng.fill_bytes(&mut rnd);
    let len = signature_internal(sig, mu, &[], &rnd, sk, true, p);
    rnd.zeroize();
    len
}

/// Compute a signed message sm = sig || m.
///
/// Returns the total length p.signature_bytes + m.len().
pub fn sign(sm: &mut [u8], m: &[u8], ctx: &[u8], sk: &[u8], p: &ParamSet) -> Result<usize> {
    if ctx.len() > 255 {
        return Err(Error::ContextTooLong);
    }
    assert!(sm.len() >= p.signature_bytes + m.len());

    sm[p.signature_bytes..p.signature_bytes + m.len()].copy_from_slice(m);
    let (sig, rest) = sm.split_at_mut(p.signature_bytes);
    signature(sig, &rest[..m.len()], ctx, sk, p)?;
    Ok(p.signature_bytes + m.len())
}

/// FIPS 204: Algorithm 8 ML-DSA.Verify_internal.
/// With externalmu set, m is taken verbatim as the 64-byte message
/// representative and pre is ignored.
pub fn verify_internal(
    sig: &[u8],
    m: &[u8],
    pre: &[u8],
    pk: &[u8],
    externalmu: bool,
    p: &ParamSet,
) -> Result<()> {
    if sig.len() != p.signature_bytes || pk.len() != p.public_key_bytes {
        return Err(Error::VerificationFailed);
    }

    let mut rho = [0u8; SEEDBYTES];
    let mut t1 = Polyveck::default();
    packing::unpack_pk(&mut rho, &mut t1, pk, p);

    let mut ctilde = [0u8; CTILDEBYTES_MAX];
    let mut z = Polyvecl::default();
    let mut h = Polyveck::default();
    if !packing::unpack_sig(&mut ctilde, &mut z, &mut h, sig, p) {
        return Err(Error::VerificationFailed);
    }
    if polyvec::polyvecl_chknorm(&z, p.gamma1 - p.beta, p) != 0 {
        return Err(Error::VerificationFailed);
    }

    // Compute CRH(H(rho, t1), pre, msg)
    let mut mu = [0u8; CRHBYTES];
    if externalmu {
        mu.copy_from_slice(m);
    } else {
        let mut tr = [0u8; TRBYTES];
        shake256(&mut tr, &[pk]);
        shake256(&mut mu, &[&tr, pre, m]);
    }

    // Matrix-vector multiplication; compute Az - c*2^d*t1
    let mut cp = Poly::default();
    poly::challenge(&mut cp, &ctilde[..p.ctilde_bytes], p.tau);
    let mut mat = [Polyvecl::default(); K_MAX];
    polyvec::matrix_expand(&mut mat, &rho, p);

    polyvec::polyvecl_ntt(&mut z, p);
    let mut w1 = Polyveck::default();
    polyvec::matrix_pointwise_montgomery(&mut w1, &mat, &z, p);

    poly::poly_ntt(&mut cp);
    polyvec::polyveck_shiftl(&mut t1, p);
    polyvec::polyveck_ntt(&mut t1, p);
    let mut ct1 = Polyveck::default();
    polyvec::polyveck_pointwise_poly_montgomery(&mut ct1, &cp, &t1, p);

    polyvec::polyveck_sub(&mut w1, &ct1, p);
    polyvec::polyveck_reduce(&mut w1, p);
    polyvec::polyveck_invntt_tomont(&mut w1, p);

    // Reconstruct w1
    polyvec::polyveck_caddq(&mut w1, p);
    polyvec::polyveck_use_hint(&mut w1, &h, p);
    let mut w1_packed = [0u8; K_MAX * POLYW1_PACKEDBYTES_MAX];
    polyvec::polyveck_pack_w1(&mut w1_packed, &w1, p);

    // Call random oracle and verify the challenge
    let mut c2 = [0u8; CTILDEBYTES_MAX];
    shake256(
        &mut c2[..p.ctilde_bytes],
        &[&mu, &w1_packed[..p.k * p.polyw1_packedbytes]],
    );
    if ctilde[..p.ctilde_bytes]
        .ct_eq(&c2[..p.ctilde_bytes])
        .into()
    {
        Ok(())
    } else {
        Err(Error::VerificationFailed)
    }
}

/// FIPS 204: Algorithm 3 ML-DSA.Verify.
/// Verifies a signature over m bound to the context string ctx.
pub fn verify(sig: &[u8], m: &[u8], ctx: &[u8], pk: &[u8], p: &ParamSet) -> Result<()> {
    if ctx.len() > 255 {
        return Err(Error::ContextTooLong);
    }

    let mut pre = [0u8; 257];
    pre[0] = 0;
    pre[1] = ctx.len() as u8;
    pre[2..2 + ctx.len()].copy_from_slice(ctx);

    verify_internal(sig, m, &pre[..2 + ctx.len()], pk, false, p)
}

/// FIPS 204: Algorithm 3 ML-DSA.Verify, external-mu variant.
pub fn verify_extmu(sig: &[u8], mu: &[u8; CRHBYTES], pk: &[u8], p: &ParamSet) -> Result<()> {
    verify_internal(sig, mu, &[], pk, true, p)
}

/// Verify a signed message sm = sig || m and recover m.
///
/// Returns the message length; m_out must hold at least
/// sm.len() - p.signature_bytes bytes.
pub fn open(m_out: &mut [u8], sm: &[u8], ctx: &[u8], pk: &[u8], p: &ParamSet) -> Result<usize> {
    if sm.len() < p.signature_bytes {
        return Err(Error::VerificationFailed);
    }
    let (sig, m) = sm.split_at(p.signature_bytes);
    verify(sig, m, ctx, pk, p)?;
    m_out[..m.len()].copy_from_slice(m);
    Ok(m.len())
}
