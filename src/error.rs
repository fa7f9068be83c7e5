// This module was originally derived from CRYSTALS-Dilithium
// Source: https://github.com/pq-crystals/dilithium
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use thiserror::Error;

/// Errors surfaced by the signing and verification entry points.
///
/// A malformed signature encoding and a failed verification are deliberately
/// collapsed into [`Error::VerificationFailed`]; callers cannot distinguish
/// a forgery from a corrupted encoding.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("context string longer than 255 bytes")]
    ContextTooLong,
    #[error("input has wrong length")]
    InvalidLength,
    #[error("signature verification failed")]
    VerificationFailed,
}

pub type Result<T> = core::result::Result<T, Error>;
