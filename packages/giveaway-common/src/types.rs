use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Event, Uint256};

/// Custom event emitted by the randomness provider when it accepts a request.
/// The runtime prefixes it with `wasm-` before the requesting contract sees it.
pub const RANDOMNESS_REQUESTED_EVENT: &str = "randomness_requested";

/// Attribute on [`RANDOMNESS_REQUESTED_EVENT`] carrying the issued request id.
pub const REQUEST_ID_ATTRIBUTE: &str = "request_id";

/// Lifecycle of a randomness request held by the provider.
#[cw_serde]
pub enum RequestStatus {
    /// Waiting for a beacon at or after its target round.
    Pending,
    /// Random value derived and callback dispatched.
    Fulfilled,
    /// Callback dispatched but the consumer rejected it.
    DeliveryFailed,
}

/// Messages a consumer contract sends to the randomness provider.
#[cw_serde]
pub enum ProviderExecuteMsg {
    /// Ask for one random value. The provider answers later with
    /// [`ConsumerExecuteMsg::FulfillRandomness`] addressed to the sender.
    RequestRandomness {},
}

/// Callback the randomness provider sends back to the requesting contract.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    FulfillRandomness {
        request_id: u64,
        random_value: Uint256,
    },
}

/// Extract the request id from the events returned by a `RequestRandomness`
/// submessage.
pub fn parse_request_id(events: &[Event]) -> Option<u64> {
    let event_type = format!("wasm-{}", RANDOMNESS_REQUESTED_EVENT);
    events
        .iter()
        .filter(|e| e.ty == event_type)
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == REQUEST_ID_ATTRIBUTE)
        .and_then(|a| a.value.parse().ok())
}
