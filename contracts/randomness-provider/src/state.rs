use chance_giveaway_common::types::RequestStatus;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<ProviderConfig> = Item::new("config");
pub const BEACONS: Map<u64, StoredBeacon> = Map::new("beacons");
pub const LATEST_ROUND: Item<u64> = Item::new("latest_round");
pub const NEXT_REQUEST_ID: Item<u64> = Item::new("next_request_id");
pub const REQUESTS: Map<u64, RandomnessRequest> = Map::new("requests");
/// Pending requests keyed by (target_round, request_id). A beacon for round `r`
/// serves exactly the `r` prefix.
pub const ROUND_QUEUE: Map<(u64, u64), ()> = Map::new("round_queue");

#[cw_serde]
pub struct ProviderConfig {
    pub admin: Addr,
    pub operators: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: Vec<u8>,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
    /// How many rounds past the current one a new request targets
    pub round_delay: u64,
}

#[cw_serde]
pub struct StoredBeacon {
    pub round: u64,
    /// sha256(signature), 32 bytes
    pub randomness: Vec<u8>,
    /// BLS signature on G1, 48 bytes
    pub signature: Vec<u8>,
    pub submitted_at: Timestamp,
    pub submitted_by: Addr,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub id: u64,
    /// Contract that receives the `FulfillRandomness` callback
    pub consumer: Addr,
    pub target_round: u64,
    pub status: RequestStatus,
    pub requested_at: Timestamp,
    pub fulfilled_round: Option<u64>,
    pub random_value: Option<Uint256>,
}
