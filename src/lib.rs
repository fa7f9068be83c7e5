//! Pure Rust implementation of ML-DSA (FIPS 204), the standardized form of
//! CRYSTALS-Dilithium, for the three parameter sets ML-DSA-44, ML-DSA-65 and
//! ML-DSA-87.

mod error;
mod ntt;
mod packing;
mod params;
mod poly;
mod polyvec;
mod reduce;
mod rounding;
mod sign;
mod symmetric;

pub mod mldsa44;
pub mod mldsa65;
pub mod mldsa87;

pub use error::{Error, Result};
pub use params::{
    ParamSet, CRHBYTES, ML_DSA_44, ML_DSA_65, ML_DSA_87, RNDBYTES, SEEDBYTES, TRBYTES,
};
pub use sign::{
    keypair, keypair_internal, open, sign, signature, signature_extmu, signature_internal,
    verify, verify_extmu, verify_internal,
};
