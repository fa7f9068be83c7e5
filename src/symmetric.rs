// This module was originally derived from CRYSTALS-Dilithium
// Source: https://github.com/pq-crystals/dilithium
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Changes made to the original code:
// - Keccak permutation replaced by the sha3 crate's XOF/digest primitives

use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Digest, Sha3_256, Sha3_512, Shake128, Shake128Reader, Shake256, Shake256Reader,
};

pub const SHAKE128_RATE: usize = 168;
pub const SHAKE256_RATE: usize = 136;

/// SHAKE128 in streaming mode. The seed material is absorbed exactly once
/// at construction; afterwards the state only squeezes. The samplers rely
/// on this to refill their buffers one rate-sized block at a time.
pub struct Shake128Stream {
    reader: Shake128Reader,
}

impl Shake128Stream {
    /// Absorb seed || nonce (2 bytes little endian) and switch to squeezing.
    pub fn init(seed: &[u8], nonce: u16) -> Self {
        let mut state = Shake128::default();
        state.update(seed);
        state.update(&nonce.to_le_bytes());
        Self {
            reader: state.finalize_xof(),
        }
    }

    /// Squeeze nblocks full blocks into the front of out.
    pub fn squeezeblocks(&mut self, out: &mut [u8], nblocks: usize) {
        self.reader.read(&mut out[..nblocks * SHAKE128_RATE]);
    }
}

/// SHAKE256 in streaming mode, same absorb-once contract as above.
pub struct Shake256Stream {
    reader: Shake256Reader,
}

impl Shake256Stream {
    /// Absorb seed || nonce (2 bytes little endian) and switch to squeezing.
    pub fn init(seed: &[u8], nonce: u16) -> Self {
        let mut state = Shake256::default();
        state.update(seed);
        state.update(&nonce.to_le_bytes());
        Self {
            reader: state.finalize_xof(),
        }
    }

    /// Absorb the concatenation of inputs and switch to squeezing.
    pub fn absorb_once(inputs: &[&[u8]]) -> Self {
        let mut state = Shake256::default();
        for input in inputs {
            state.update(input);
        }
        Self {
            reader: state.finalize_xof(),
        }
    }

    /// Squeeze nblocks full blocks into the front of out.
    pub fn squeezeblocks(&mut self, out: &mut [u8], nblocks: usize) {
        self.reader.read(&mut out[..nblocks * SHAKE256_RATE]);
    }
}

/// One-shot SHAKE256 over the concatenation of inputs.
pub fn shake256(out: &mut [u8], inputs: &[&[u8]]) {
    let mut state = Shake256::default();
    for input in inputs {
        state.update(input);
    }
    state.finalize_xof().read(out);
}

/// One-shot SHA3-256.
pub fn sha3_256(input: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha3_256::digest(input));
    out
}

/// One-shot SHA3-512.
pub fn sha3_512(input: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Sha3_512::digest(input));
    out
}
