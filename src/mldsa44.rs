// This module was originally derived from CRYSTALS-Dilithium
// Source: https://github.com/pq-crystals/dilithium
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Sized byte-level API for ML-DSA-44 (security category 2).

use crate::error::{Error, Result};
use crate::params::{CRHBYTES, ML_DSA_44, SEEDBYTES};
use crate::sign;
use zeroize::Zeroize;

pub const PUBLIC_KEY_BYTES: usize = 1312;
pub const SECRET_KEY_BYTES: usize = 2560;
pub const SIGNATURE_BYTES: usize = 2420;

/// A detached ML-DSA-44 signature.
pub type Signature = [u8; SIGNATURE_BYTES];

/// ML-DSA-44 public key.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_BYTES],
}

/// ML-DSA-44 secret key. Wiped from memory when dropped.
#[derive(Clone)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_BYTES],
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// ML-DSA-44 keypair.
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
        sign::keypair(&mut public.bytes, &mut secret.bytes, &ML_DSA_44);
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
        sign::keypair_internal(&mut public.bytes, &mut secret.bytes, seed, &ML_DSA_44);
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
        sign::signature(&mut sig, message, b"", &self.bytes, &ML_DSA_44)
            .expect("empty context is always valid");
        sig
    }

    /// Sign a message bound to a context string of at most 255 bytes.
    pub fn sign_ctx(&self, message: &[u8], ctx: &[u8]) -> Result<Signature> {
        let mut sig = [0u8; SIGNATURE_BYTES];
        sign::signature(&mut sig, message, ctx, &self.bytes, &ML_DSA_44)?;
        Ok(sig)
    }

    /// Sign a precomputed 64-byte message representative.
    pub fn sign_extmu(&self, mu: &[u8; CRHBYTES]) -> Signature {
        let mut sig = [0u8; SIGNATURE_BYTES];
        sign::signature_extmu(&mut sig, mu, &self.bytes, &ML_DSA_44);
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
        sign::verify(sig, message, b"", &self.bytes, &ML_DSA_44).is_ok()
    }

    /// Verify a signature bound to a context string.
    pub fn verify_ctx(&self, message: &[u8], ctx: &[u8], sig: &[u8]) -> Result<()> {
        sign::verify(sig, message, ctx, &self.bytes, &ML_DSA_44)
    }

    /// Verify a signature over a precomputed message representative.
    pub fn verify_extmu(&self, mu: &[u8; CRHBYTES], sig: &[u8]) -> bool {
        sign::verify_extmu(sig, mu, &self.bytes, &ML_DSA_44).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let keypair = Keypair::generate();
        let message = b"test message";
        let sig = keypair.secret.sign(message);
        assert!(keypair.public.verify(message, &sig));
        assert!(!keypair.public.verify(b"other message", &sig));
    }

    #[test]
    fn serialized_keys_keep_working() {
        let keypair = Keypair::from_seed(&[9u8; SEEDBYTES]);
        let sk = SecretKey::from_bytes(&keypair.secret.to_bytes()).unwrap();
        let pk = PublicKey::from_bytes(&keypair.public.to_bytes()).unwrap();
        let sig = sk.sign(b"carry on");
        assert!(pk.verify(b"carry on", &sig));
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert_eq!(
            PublicKey::from_bytes(&[0u8; 17]).unwrap_err(),
            Error::InvalidLength
        );
        assert_eq!(
            SecretKey::from_bytes(&[0u8; SECRET_KEY_BYTES - 1]).unwrap_err(),
            Error::InvalidLength
        );
    }
}
