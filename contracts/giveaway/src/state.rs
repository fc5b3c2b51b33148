use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<GiveawayConfig> = Item::new("config");

/// Applicant pools keyed by (campaign_id, insertion index). Indices are dense
/// from 0 to `POOL_SIZES[campaign_id] - 1`, so an append is one write.
pub const APPLICANTS: Map<(&str, u64), String> = Map::new("applicants");
pub const POOL_SIZES: Map<&str, u64> = Map::new("pool_sizes");

/// Presence marks a campaign as decided. Never overwritten.
pub const WINNERS: Map<&str, String> = Map::new("winners");

/// Correlation table: provider request id -> draw it was issued for.
/// Entries are removed as soon as a fulfillment or expiry consumes them.
pub const DRAW_REQUESTS: Map<u64, DrawRequest> = Map::new("draw_requests");

/// The single outstanding request id per campaign.
pub const PENDING_DRAWS: Map<&str, u64> = Map::new("pending_draws");

#[cw_serde]
pub struct GiveawayConfig {
    pub admin: Addr,
    /// Addresses allowed (besides admin) to add applicants and draw winners
    pub operators: Vec<Addr>,
    /// Only this contract may deliver `FulfillRandomness`
    pub randomness_provider: Addr,
    /// Seconds after which anyone may expire an unanswered draw
    pub draw_timeout_seconds: u64,
    pub paused: bool,
}

impl GiveawayConfig {
    pub fn is_privileged(&self, caller: &Addr) -> bool {
        *caller == self.admin || self.operators.contains(caller)
    }
}

#[cw_serde]
pub struct DrawRequest {
    pub request_id: u64,
    pub campaign_id: String,
    /// Pool size when the provider acknowledged the request
    pub pool_size: u64,
    pub requested_at: Timestamp,
}
