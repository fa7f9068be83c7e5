// This module was originally derived from CRYSTALS-Dilithium
// Source: https://github.com/pq-crystals/dilithium
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Sized byte-level API for ML-DSA-87 (security category 5).

use crate::error::{Error, Result};
use crate::params::{CRHBYTES, ML_DSA_87, SEEDBYTES};
use crate::sign;
use zeroize::Zeroize;

pub const PUBLIC_KEY_BYTES: usize = 2592;
pub const SECRET_KEY_BYTES: usize = 4896;
pub const SIGNATURE_BYTES: usize = 4627;

/// A detached ML-DSA-87 signature.
pub type Signature = [u8; SIGNATURE_BYTES];

/// ML-DSA-87 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_BYTES],
}

/// ML-DSA-87 secret key. Wiped from memory when dropped.
#[derive(Clone)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_BYTES],
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// ML-DSA-87 keypair.
#[derive(Clone)]
pub struct Keypair {
    pub public: PublicKey,
    pub secret: SecretKey,
}

impl Keypair {
    /// Generate a keypair from system entropy.
    pub fn generate() -> Keypair {
        let mut public = PublicKey {
            bytes: [0u8; PUBLIC_KEY_BYTES],
        };
        let mut secret = SecretKey {
            bytes: [0u8; SECRET_KEY_BYTES],
        };
        sign::keypair(&mut public.bytes, &mut secret.bytes, &ML_DSA_87);
        Keypair { public, secret }
    }

    /// Deterministically derive a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEEDBYTES]) -> Keypair {
        let mut public = PublicKey {
            bytes: [0u8; PUBLIC_KEY_BYTES],
        };
        let mut secret = SecretKey {
            bytes: [0u8; SECRET_KEY_BYTES],
        };
        sign::keypair_internal(&mut public.bytes, &mut secret.bytes, seed, &ML_DSA_87);
        Keypair { public, secret }
    }
}

impl SecretKey {
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_BYTES] {
        self.bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<SecretKey> {
        if bytes.len() != SECRET_KEY_BYTES {
            return Err(Error::InvalidLength);
        }
        let mut sk = SecretKey {
            bytes: [0u8; SECRET_KEY_BYTES],
        };
        sk.bytes.copy_from_slice(bytes);
        Ok(sk)
    }

    /// Sign a message with an empty context string.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let mut sig = [0u8; SIGNATURE_BYTES];
        sign::signature(&mut sig, message, b"", &self.bytes, &ML_DSA_87)
            .expect("empty context is always valid");
        sig
    }

    /// Sign a message bound to a context string of at most 255 bytes.
    pub fn sign_ctx(&self, message: &[u8], ctx: &[u8]) -> Result<Signature> {
        let mut sig = [0u8; SIGNATURE_BYTES];
        sign::signature(&mut sig, message, ctx, &self.bytes, &ML_DSA_87)?;
        Ok(sig)
    }

    /// Sign a precomputed 64-byte message representative.
    pub fn sign_extmu(&self, mu: &[u8; CRHBYTES]) -> Signature {
        let mut sig = [0u8; SIGNATURE_BYTES];
        sign::signature_extmu(&mut sig, mu, &self.bytes, &ML_DSA_87);
        sig
    }
}

impl PublicKey {
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_BYTES] {
        self.bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey> {
        if bytes.len() != PUBLIC_KEY_BYTES {
            return Err(Error::InvalidLength);
        }
        let mut pk = PublicKey {
            bytes: [0u8; PUBLIC_KEY_BYTES],
        };
        pk.bytes.copy_from_slice(bytes);
        Ok(pk)
    }

    /// Verify a signature over a message with an empty context string.
    pub fn verify(&self, message: &[u8], sig: &[u8]) -> bool {
        sign::verify(sig, message, b"", &self.bytes, &ML_DSA_87).is_ok()
    }

    /// Verify a signature bound to a context string.
    pub fn verify_ctx(&self, message: &[u8], ctx: &[u8], sig: &[u8]) -> Result<()> {
        sign::verify(sig, message, ctx, &self.bytes, &ML_DSA_87)
    }

    /// Verify a signature over a precomputed message representative.
    pub fn verify_extmu(&self, mu: &[u8; CRHBYTES], sig: &[u8]) -> bool {
        sign::verify_extmu(sig, mu, &self.bytes, &ML_DSA_87).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let keypair = Keypair::generate();
        let sig = keypair.secret.sign(b"category five");
        assert!(keypair.public.verify(b"category five", &sig));
        assert!(!keypair.public.verify(b"category four", &sig));
    }

    #[test]
    fn seeded_keypairs_are_reproducible() {
        let a = Keypair::from_seed(&[87u8; SEEDBYTES]);
        let b = Keypair::from_seed(&[87u8; SEEDBYTES]);
        assert_eq!(a.public.to_bytes(), b.public.to_bytes());
        assert_eq!(a.secret.to_bytes(), b.secret.to_bytes());
    }
}
