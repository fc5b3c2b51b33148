use cosmwasm_std::{Uint256, Uint64};
use sha2::{Digest, Sha256};

/// Derive the random value delivered for one request from a verified beacon.
///
/// `random_value = sha256( beacon_randomness || request_id_u64_be )`, read as a
/// big-endian 256-bit integer. Mixing in the request id keeps values distinct
/// when several requests are served by the same round.
pub fn derive_request_randomness(beacon_randomness: &[u8], request_id: u64) -> Uint256 {
    let mut hasher = Sha256::new();
    hasher.update(beacon_randomness);
    hasher.update(request_id.to_be_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    Uint256::from_be_bytes(digest)
}

/// Map a random value onto a pool of `pool_size` entries: `random_value mod pool_size`.
///
/// Returns `None` for an empty pool. Modulo bias is accepted.
pub fn winning_index(random_value: Uint256, pool_size: u64) -> Option<u64> {
    if pool_size == 0 {
        return None;
    }
    let index = random_value % Uint256::from(pool_size);
    // index < pool_size, so the narrowing cannot fail
    Uint64::try_from(index).ok().map(|index| index.u64())
}

/// The drand round published at `now_seconds`, or 0 before genesis.
pub fn drand_round_at(genesis_time: u64, period_seconds: u64, now_seconds: u64) -> u64 {
    if period_seconds == 0 || now_seconds < genesis_time {
        return 0;
    }
    (now_seconds - genesis_time) / period_seconds + 1
}
