//! Beacon verification for quicknet. The 32-byte output is the round's base
//! randomness; per-request values are derived from it with
//! `chance_giveaway_common::derive_request_randomness`.

use drand_verify::{G2PubkeyRfc, Pubkey};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Quicknet public key (G2, 96 bytes), hex encoded.
/// Network: drand quicknet (bls-unchained-g1-rfc9380)
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerifyError {
    #[error("invalid pubkey length (expected 96 bytes)")]
    InvalidPubkeyLength,

    #[error("invalid pubkey (failed to parse G2 point)")]
    InvalidPubkey,

    #[error("verification failed: {0}")]
    Backend(String),

    #[error("invalid BLS signature")]
    InvalidSignature,
}

/// Verify an unchained quicknet beacon and return its 32-byte randomness,
/// `sha256(signature)`.
pub fn verify_beacon(
    pubkey_bytes: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], VerifyError> {
    let pk_fixed: [u8; 96] = pubkey_bytes
        .try_into()
        .map_err(|_| VerifyError::InvalidPubkeyLength)?;
    let pk = G2PubkeyRfc::from_fixed(pk_fixed).map_err(|_| VerifyError::InvalidPubkey)?;

    // Unchained scheme: no previous signature
    let valid = pk
        .verify(round, &[], signature)
        .map_err(|e| VerifyError::Backend(format!("{:?}", e)))?;
    if !valid {
        return Err(VerifyError::InvalidSignature);
    }

    Ok(Sha256::digest(signature).into())
}
