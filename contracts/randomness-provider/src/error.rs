use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("beacon for round {round} already exists")]
    BeaconAlreadyExists { round: u64 },

    #[error("no beacon stored for round {round}")]
    BeaconNotFound { round: u64 },

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("invalid round delay {round_delay}: must be between {min} and {max}")]
    InvalidRoundDelay { round_delay: u64, min: u64, max: u64 },

    #[error("invalid period: period_seconds must be non-zero")]
    InvalidPeriod,

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
