pub mod randomness;
pub mod types;

pub use randomness::{derive_request_randomness, drand_round_at, winning_index};
pub use types::{
    parse_request_id, ConsumerExecuteMsg, ProviderExecuteMsg, RANDOMNESS_REQUESTED_EVENT,
    RequestStatus, REQUEST_ID_ATTRIBUTE,
};
