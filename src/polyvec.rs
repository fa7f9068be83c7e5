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

use crate::params::{ParamSet, K_MAX, L_MAX};
use crate::poly::{self, Poly};
use zeroize::Zeroize;

/// Vector of polynomials of length L. Backed by an L_MAX array; only the
/// first p.l entries are live, all loops are bounded by the parameter set.
#[derive(Clone, Copy, Zeroize)]
pub struct Polyvecl {
    pub vec: [Poly; L_MAX],
}

impl Default for Polyvecl {
    fn default() -> Self {
        Polyvecl {
            vec: [Poly::default(); L_MAX],
        }
    }
}

/// Vector of polynomials of length K. Backed by a K_MAX array; only the
/// first p.k entries are live.
#[derive(Clone, Copy, Zeroize)]
pub struct Polyveck {
    pub vec: [Poly; K_MAX],
}

impl Default for Polyveck {
    fn default() -> Self {
        Polyveck {
            vec: [Poly::default(); K_MAX],
        }
    }
}

/// The public matrix A, kept row-wise in NTT domain.
pub type Mat = [Polyvecl; K_MAX];

/// Implementation of ExpandA. Generates matrix A with uniformly random
/// coefficients a_{i,j} by performing rejection sampling on the output
/// stream of SHAKE128(rho|j|i).
pub fn matrix_expand(mat: &mut Mat, rho: &[u8], p: &ParamSet) {
    for i in 0..p.k {
        for j in 0..p.l {
            poly::uniform(&mut mat[i].vec[j], rho, ((i << 8) + j) as u16);
        }
    }
}

/// Matrix-vector product A*v with v in NTT domain; each entry of the result
/// is an inner product accumulated through Montgomery reduction.
pub fn matrix_pointwise_montgomery(t: &mut Polyveck, mat: &Mat, v: &Polyvecl, p: &ParamSet) {
    for i in 0..p.k {
        polyvecl_pointwise_acc_montgomery(&mut t.vec[i], &mat[i], v, p);
    }
}

/**************************************************************/
/************ Vectors of polynomials of length L **************/
/**************************************************************/

pub fn polyvecl_uniform_eta(v: &mut Polyvecl, seed: &[u8], nonce: u16, p: &ParamSet) {
    for i in 0..p.l {
        poly::uniform_eta(&mut v.vec[i], seed, nonce + i as u16, p.eta);
    }
}

pub fn polyvecl_uniform_gamma1(v: &mut Polyvecl, seed: &[u8], nonce: u16, p: &ParamSet) {
    for i in 0..p.l {
        poly::uniform_gamma1(
            &mut v.vec[i],
            seed,
            p.l as u16 * nonce + i as u16,
            p.gamma1,
        );
    }
}

pub fn polyvecl_reduce(v: &mut Polyvecl, p: &ParamSet) {
    for i in 0..p.l {
        poly::reduce(&mut v.vec[i]);
    }
}

/// Add vectors of polynomials of length L. No modular reduction is performed.
pub fn polyvecl_add(w: &mut Polyvecl, u: &Polyvecl, p: &ParamSet) {
    for i in 0..p.l {
        poly::add_ip(&mut w.vec[i], &u.vec[i]);
    }
}

/// Forward NTT of all polynomials in vector of length L.
pub fn polyvecl_ntt(v: &mut Polyvecl, p: &ParamSet) {
    for i in 0..p.l {
        poly::poly_ntt(&mut v.vec[i]);
    }
}

pub fn polyvecl_invntt_tomont(v: &mut Polyvecl, p: &ParamSet) {
    for i in 0..p.l {
        poly::invntt_tomont(&mut v.vec[i]);
    }
}

pub fn polyvecl_pointwise_poly_montgomery(
    r: &mut Polyvecl,
    a: &Poly,
    v: &Polyvecl,
    p: &ParamSet,
) {
    for i in 0..p.l {
        poly::pointwise_montgomery(&mut r.vec[i], a, &v.vec[i]);
    }
}

/// Pointwise multiply vectors of polynomials of length L, multiply the
/// resulting vector by 2^{-32} and accumulate the polynomials in it.
/// Input/output vectors are in NTT domain representation.
pub fn polyvecl_pointwise_acc_montgomery(w: &mut Poly, u: &Polyvecl, v: &Polyvecl, p: &ParamSet) {
    let mut t = Poly::default();
    poly::pointwise_montgomery(w, &u.vec[0], &v.vec[0]);
    for i in 1..p.l {
        poly::pointwise_montgomery(&mut t, &u.vec[i], &v.vec[i]);
        poly::add_ip(w, &t);
    }
}

/// Check infinity norm of polynomials in vector of length L.
/// Assumes input vector to be reduced by polyvecl_reduce().
///
/// Returns 0 if norm of all polynomials is strictly smaller than B and
/// B <= (Q-1)/8, 1 otherwise.
pub fn polyvecl_chknorm(v: &Polyvecl, bound: i32, p: &ParamSet) -> i32 {
    let mut fail = 0;
    for i in 0..p.l {
        fail |= poly::chknorm(&v.vec[i], bound);
    }
    fail
}

/**************************************************************/
/************ Vectors of polynomials of length K **************/
/**************************************************************/

pub fn polyveck_uniform_eta(v: &mut Polyveck, seed: &[u8], nonce: u16, p: &ParamSet) {
    for i in 0..p.k {
        poly::uniform_eta(&mut v.vec[i], seed, nonce + i as u16, p.eta);
    }
}

/// Reduce coefficients of polynomials in vector of length K to
/// representatives in [-6283008,6283008].
pub fn polyveck_reduce(v: &mut Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::reduce(&mut v.vec[i]);
    }
}

/// For all coefficients of polynomials in vector of length K add Q if
/// coefficient is negative.
pub fn polyveck_caddq(v: &mut Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::caddq(&mut v.vec[i]);
    }
}

/// Add vectors of polynomials of length K. No modular reduction is performed.
pub fn polyveck_add(w: &mut Polyveck, u: &Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::add_ip(&mut w.vec[i], &u.vec[i]);
    }
}

/// Subtract vectors of polynomials of length K.
/// No modular reduction is performed.
pub fn polyveck_sub(w: &mut Polyveck, u: &Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::sub_ip(&mut w.vec[i], &u.vec[i]);
    }
}

/// Multiply vector of polynomials of length K by 2^D without modular
/// reduction. Assumes input coefficients to be less than 2^{31-D}.
pub fn polyveck_shiftl(v: &mut Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::shiftl(&mut v.vec[i]);
    }
}

/// Forward NTT of all polynomials in vector of length K.
pub fn polyveck_ntt(v: &mut Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::poly_ntt(&mut v.vec[i]);
    }
}

/// Inverse NTT and multiplication by 2^{32} of polynomials in vector of
/// length K. Input coefficients need to be less than 2*Q.
pub fn polyveck_invntt_tomont(v: &mut Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::invntt_tomont(&mut v.vec[i]);
    }
}

pub fn polyveck_pointwise_poly_montgomery(
    r: &mut Polyveck,
    a: &Poly,
    v: &Polyveck,
    p: &ParamSet,
) {
    for i in 0..p.k {
        poly::pointwise_montgomery(&mut r.vec[i], a, &v.vec[i]);
    }
}

/// Check infinity norm of polynomials in vector of length K.
/// Assumes input vector to be reduced by polyveck_reduce().
pub fn polyveck_chknorm(v: &Polyveck, bound: i32, p: &ParamSet) -> i32 {
    let mut fail = 0;
    for i in 0..p.k {
        fail |= poly::chknorm(&v.vec[i], bound);
    }
    fail
}

/// For all coefficients a of polynomials in vector of length K, compute a0,
/// a1 such that a mod^+ Q = a1*2^D + a0 with -2^{D-1} < a0 <= 2^{D-1}.
/// Assumes coefficients to be standard representatives.
/// Input is taken from v1, which afterwards holds the high part.
pub fn polyveck_power2round(v1: &mut Polyveck, v0: &mut Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::power2round(&mut v1.vec[i], &mut v0.vec[i]);
    }
}

/// For all coefficients a of polynomials in vector of length K, compute high
/// and low bits a0, a1 such that a mod^+ Q = a1*ALPHA + a0 with
/// -ALPHA/2 < a0 <= ALPHA/2 except a1 = (Q-1)/ALPHA where we set a1 = 0 and
/// -ALPHA/2 <= a0 = a mod Q - Q < 0.
/// Assumes coefficients to be standard representatives.
/// Input is taken from v1, which afterwards holds the high part.
pub fn polyveck_decompose(v1: &mut Polyveck, v0: &mut Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::decompose(&mut v1.vec[i], &mut v0.vec[i], p.gamma2);
    }
}

/// Compute hint vector.
///
/// Returns the number of 1 bits.
pub fn polyveck_make_hint(h: &mut Polyveck, v0: &Polyveck, v1: &Polyveck, p: &ParamSet) -> i32 {
    let mut s = 0;
    for i in 0..p.k {
        s += poly::make_hint(&mut h.vec[i], &v0.vec[i], &v1.vec[i], p.gamma2);
    }
    s
}

/// Use hint vector to correct the high bits of input vector.
pub fn polyveck_use_hint(w: &mut Polyveck, h: &Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::use_hint(&mut w.vec[i], &h.vec[i], p.gamma2);
    }
}

pub fn polyveck_pack_w1(r: &mut [u8], w1: &Polyveck, p: &ParamSet) {
    for i in 0..p.k {
        poly::w1_pack(
            &mut r[i * p.polyw1_packedbytes..],
            &w1.vec[i],
            p.gamma2,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ML_DSA_44, ML_DSA_87, Q};

    #[test]
    fn matrix_expand_is_deterministic_and_cellwise_distinct() {
        let p = &ML_DSA_44;
        let rho = [3u8; 32];
        let mut a = [Polyvecl::default(); K_MAX];
        let mut b = [Polyvecl::default(); K_MAX];
        matrix_expand(&mut a, &rho, p);
        matrix_expand(&mut b, &rho, p);
        for i in 0..p.k {
            for j in 0..p.l {
                assert_eq!(a[i].vec[j].coeffs, b[i].vec[j].coeffs);
                assert!(a[i].vec[j].coeffs.iter().all(|&c| (0..Q).contains(&c)));
            }
        }
        assert_ne!(a[0].vec[0].coeffs, a[0].vec[1].coeffs);
        assert_ne!(a[0].vec[0].coeffs, a[1].vec[0].coeffs);
    }

    #[test]
    fn inner_product_matches_schoolbook_on_constants() {
        // With u and v constant polynomials the NTT-domain accumulation
        // reduces to a plain sum of Montgomery products.
        let p = &ML_DSA_87;
        let mut u = Polyvecl::default();
        let mut v = Polyvecl::default();
        for i in 0..p.l {
            u.vec[i].coeffs.fill(1 + i as i32);
            v.vec[i].coeffs.fill(10);
        }
        let mut w = Poly::default();
        polyvecl_pointwise_acc_montgomery(&mut w, &u, &v, p);
        let expected: i64 = (0..p.l as i64).map(|i| (1 + i) * 10).sum();
        for &c in w.coeffs.iter() {
            // Each lane holds expected * 2^{-32} mod Q.
            let lifted = (c as i128) << 32;
            assert_eq!((lifted - expected as i128).rem_euclid(Q as i128), 0);
        }
    }
}
