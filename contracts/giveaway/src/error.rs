use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("contract is paused")]
    Paused,

    #[error("applicant must not be empty (campaign {campaign_id})")]
    EmptyApplicant { campaign_id: String },

    #[error("batch for campaign {campaign_id} contains no applicants")]
    EmptyBatch { campaign_id: String },

    #[error("campaign {campaign_id} already has a winner")]
    CampaignDecided { campaign_id: String },

    #[error("campaign {campaign_id} has no applicants")]
    EmptyPool { campaign_id: String },

    #[error("campaign {campaign_id} already has draw request {request_id} pending")]
    DrawPending { campaign_id: String, request_id: u64 },

    #[error("campaign {campaign_id} has no pending draw")]
    NoPendingDraw { campaign_id: String },

    #[error("draw for campaign {campaign_id} has not expired yet (expires at: {expires_at})")]
    DrawNotExpired { campaign_id: String, expires_at: u64 },

    #[error("invalid draw timeout: {value} seconds (must be between {min} and {max})")]
    InvalidDrawTimeout { value: u64, min: u64, max: u64 },

    #[error("randomness provider did not return a request id")]
    MissingRequestId,

    #[error("request id {request_id} is already correlated to a draw")]
    DuplicateRequestId { request_id: u64 },

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
