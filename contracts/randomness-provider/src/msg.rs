use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{ProviderConfig, RandomnessRequest, StoredBeacon};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
    /// Rounds between the current round and the round a request is served by
    pub round_delay: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Request a random value for the sender. Mirrors
    /// `chance_giveaway_common::ProviderExecuteMsg::RequestRandomness`.
    RequestRandomness {},
    /// Submit a drand beacon, verify it and serve every request due by its round.
    /// Operators only.
    SubmitBeacon {
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Serve requests left queued for a round whose beacon is already stored.
    /// Anyone can call this.
    ServeQueued { round: u64 },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ProviderConfig)]
    Config {},

    #[returns(Option<StoredBeacon>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},

    #[returns(Option<RandomnessRequest>)]
    Request { request_id: u64 },

    #[returns(PendingRequestsResponse)]
    PendingRequests {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct PendingRequestsResponse {
    pub requests: Vec<RandomnessRequest>,
}
