use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint256;

use crate::state::{DrawRequest, GiveawayConfig};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    pub randomness_provider: String,
    pub draw_timeout_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Append one applicant to a campaign's pool. Admin or operator only.
    AddApplicant {
        campaign_id: String,
        applicant: String,
    },
    /// Append several applicants in order. Either all are added or none.
    /// Admin or operator only.
    BatchAddApplicants {
        campaign_id: String,
        applicants: Vec<String>,
    },
    /// Request randomness for a campaign. Admin or operator only.
    DrawWinner { campaign_id: String },
    /// Randomness callback. Only accepted from the configured provider.
    FulfillRandomness {
        request_id: u64,
        random_value: Uint256,
    },
    /// Drop a draw the provider never answered. Anyone can call after the timeout.
    ExpireDraw { campaign_id: String },
    /// Pause or resume applicant intake and draws. Admin only.
    SetPaused { paused: bool },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        randomness_provider: Option<String>,
        draw_timeout_seconds: Option<u64>,
    },
    /// Update operator list. Admin only.
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

/// Unpacked `ExecuteMsg::UpdateConfig` fields.
pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub randomness_provider: Option<String>,
    pub draw_timeout_seconds: Option<u64>,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(GiveawayConfig)]
    Config {},
    #[returns(CampaignResponse)]
    Campaign { campaign_id: String },
    #[returns(ApplicantsResponse)]
    Applicants {
        campaign_id: String,
        /// Insertion index to start after
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Option<String>)]
    Winner { campaign_id: String },
    #[returns(Option<DrawRequest>)]
    DrawRequest { request_id: u64 },
}

#[cw_serde]
pub struct CampaignResponse {
    pub campaign_id: String,
    pub applicant_count: u64,
    pub winner: Option<String>,
    pub pending_request_id: Option<u64>,
}

#[cw_serde]
pub struct ApplicantEntry {
    pub index: u64,
    pub applicant: String,
}

#[cw_serde]
pub struct ApplicantsResponse {
    pub campaign_id: String,
    pub total: u64,
    pub applicants: Vec<ApplicantEntry>,
}
