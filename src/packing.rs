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

use crate::params::{ParamSet, POLYT0_PACKEDBYTES, POLYT1_PACKEDBYTES, SEEDBYTES, TRBYTES};
use crate::poly;
use crate::polyvec::{Polyveck, Polyvecl};

/// Bit-pack public key pk = (rho, t1).
pub fn pack_pk(pk: &mut [u8], rho: &[u8], t1: &Polyveck, p: &ParamSet) {
    pk[..SEEDBYTES].copy_from_slice(&rho[..SEEDBYTES]);
    for i in 0..p.k {
        poly::t1_pack(&mut pk[SEEDBYTES + i * POLYT1_PACKEDBYTES..], &t1.vec[i]);
    }
}

/// Unpack public key pk = (rho, t1).
pub fn unpack_pk(rho: &mut [u8], t1: &mut Polyveck, pk: &[u8], p: &ParamSet) {
    rho[..SEEDBYTES].copy_from_slice(&pk[..SEEDBYTES]);
    for i in 0..p.k {
        poly::t1_unpack(&mut t1.vec[i], &pk[SEEDBYTES + i * POLYT1_PACKEDBYTES..]);
    }
}

/// Bit-pack secret key sk = (rho, key, tr, s1, s2, t0).
pub fn pack_sk(
    sk: &mut [u8],
    rho: &[u8],
    tr: &[u8],
    key: &[u8],
    t0: &Polyveck,
    s1: &Polyvecl,
    s2: &Polyveck,
    p: &ParamSet,
) {
    sk[..SEEDBYTES].copy_from_slice(&rho[..SEEDBYTES]);
    let mut idx = SEEDBYTES;

    sk[idx..idx + SEEDBYTES].copy_from_slice(&key[..SEEDBYTES]);
    idx += SEEDBYTES;

    sk[idx..idx + TRBYTES].copy_from_slice(&tr[..TRBYTES]);
    idx += TRBYTES;

    for i in 0..p.l {
        poly::eta_pack(&mut sk[idx + i * p.polyeta_packedbytes..], &s1.vec[i], p.eta);
    }
    idx += p.l * p.polyeta_packedbytes;

    for i in 0..p.k {
        poly::eta_pack(&mut sk[idx + i * p.polyeta_packedbytes..], &s2.vec[i], p.eta);
    }
    idx += p.k * p.polyeta_packedbytes;

    for i in 0..p.k {
        poly::t0_pack(&mut sk[idx + i * POLYT0_PACKEDBYTES..], &t0.vec[i]);
    }
}

/// Unpack secret key sk = (rho, key, tr, s1, s2, t0).
pub fn unpack_sk(
    rho: &mut [u8],
    tr: &mut [u8],
    key: &mut [u8],
    t0: &mut Polyveck,
    s1: &mut Polyvecl,
    s2: &mut Polyveck,
    sk: &[u8],
    p: &ParamSet,
) {
    rho[..SEEDBYTES].copy_from_slice(&sk[..SEEDBYTES]);
    let mut idx = SEEDBYTES;

    key[..SEEDBYTES].copy_from_slice(&sk[idx..idx + SEEDBYTES]);
    idx += SEEDBYTES;

    tr[..TRBYTES].copy_from_slice(&sk[idx..idx + TRBYTES]);
    idx += TRBYTES;

    for i in 0..p.l {
        poly::eta_unpack(&mut s1.vec[i], &sk[idx + i * p.polyeta_packedbytes..], p.eta);
    }
    idx += p.l * p.polyeta_packedbytes;

    for i in 0..p.k {
        poly::eta_unpack(&mut s2.vec[i], &sk[idx + i * p.polyeta_packedbytes..], p.eta);
    }
    idx += p.k * p.polyeta_packedbytes;

    for i in 0..p.k {
        poly::t0_unpack(&mut t0.vec[i], &sk[idx + i * POLYT0_PACKEDBYTES..]);
    }
}

/// Bit-pack signature sig = (ctilde, z, h).
pub fn pack_sig(sig: &mut [u8], ctilde: Option<&[u8]>, z: &Polyvecl, h: &Polyveck, p: &ParamSet) {
    if let Some(challenge) = ctilde {
        sig[..p.ctilde_bytes].copy_from_slice(&challenge[..p.ctilde_bytes]);
    }

    let mut idx = p.ctilde_bytes;
    for i in 0..p.l {
        poly::z_pack(&mut sig[idx + i * p.polyz_packedbytes..], &z.vec[i], p.gamma1);
    }
    idx += p.l * p.polyz_packedbytes;

    // Hint block: ascending nonzero positions per row, then the running
    // count of ones through each row.
    sig[idx..idx + p.polyvech_packedbytes()].fill(0);

    let mut k = 0;
    for i in 0..p.k {
        for j in 0..crate::params::N {
            if h.vec[i].coeffs[j] != 0 {
                sig[idx + k] = j as u8;
                k += 1;
            }
        }
        sig[idx + p.omega + i] = k as u8;
    }
}

/// Unpack signature sig = (ctilde, z, h).
///
/// Returns false if the hint encoding is malformed: more than omega set
/// positions, positions not strictly increasing within a row, row counts
/// not monotone, or nonzero padding after the last used index.
pub fn unpack_sig(
    ctilde: &mut [u8],
    z: &mut Polyvecl,
    h: &mut Polyveck,
    sig: &[u8],
    p: &ParamSet,
) -> bool {
    ctilde[..p.ctilde_bytes].copy_from_slice(&sig[..p.ctilde_bytes]);

    let mut idx = p.ctilde_bytes;
    for i in 0..p.l {
        poly::z_unpack(&mut z.vec[i], &sig[idx + i * p.polyz_packedbytes..], p.gamma1);
    }
    idx += p.l * p.polyz_packedbytes;

    let mut k: usize = 0;
    for i in 0..p.k {
        h.vec[i].coeffs.fill(0);

        let count = sig[idx + p.omega + i] as usize;
        if count < k || count > p.omega {
            return false;
        }
        for j in k..count {
            // Coefficients are ordered for strong unforgeability.
            if j > k && sig[idx + j] <= sig[idx + j - 1] {
                return false;
            }
            h.vec[i].coeffs[sig[idx + j] as usize] = 1;
        }
        k = count;
    }

    // Extra indices must be zero.
    for j in k..p.omega {
        if sig[idx + j] > 0 {
            return false;
        }
    }

    true
}
