use chance_giveaway_common::randomness::{derive_request_randomness, drand_round_at};
use chance_giveaway_common::types::{
    ConsumerExecuteMsg, RequestStatus, RANDOMNESS_REQUESTED_EVENT, REQUEST_ID_ATTRIBUTE,
};
use cosmwasm_std::{
    from_json, to_json_binary, DepsMut, Env, Event, MessageInfo, Order, Reply, Response,
    StdResult, Storage, SubMsg, WasmMsg,
};

use crate::error::ContractError;
use crate::state::{
    RandomnessRequest, StoredBeacon, BEACONS, CONFIG, LATEST_ROUND, NEXT_REQUEST_ID, REQUESTS,
    ROUND_QUEUE,
};
use crate::verify::verify_beacon;

/// Upper bound on callbacks dispatched by one call. Anything left over stays
/// queued for `ServeQueued`.
pub const MAX_FULFILLMENTS_PER_BEACON: usize = 50;

pub const MIN_ROUND_DELAY: u64 = 1;
pub const MAX_ROUND_DELAY: u64 = 1_000;

/// Reply id for consumer callbacks. Only failures come back.
pub const DELIVERY_REPLY_ID: u64 = 1;

pub fn validate_round_delay(round_delay: u64) -> Result<(), ContractError> {
    if !(MIN_ROUND_DELAY..=MAX_ROUND_DELAY).contains(&round_delay) {
        return Err(ContractError::InvalidRoundDelay {
            round_delay,
            min: MIN_ROUND_DELAY,
            max: MAX_ROUND_DELAY,
        });
    }
    Ok(())
}

/// Register a randomness request for the calling contract.
///
/// The request is bound to exactly one drand round, `current_round +
/// round_delay` (or the round after the latest stored beacon if that is
/// later), so its value is unknown to everyone, operators included, when the
/// request is made and cannot be picked among later beacons.
pub fn request_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let request_id = NEXT_REQUEST_ID.load(deps.storage)?;
    NEXT_REQUEST_ID.save(deps.storage, &(request_id + 1))?;

    let current_round = drand_round_at(
        config.genesis_time,
        config.period_seconds,
        env.block.time.seconds(),
    );
    let latest_round = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    let target_round = (current_round + config.round_delay).max(latest_round + 1);

    let request = RandomnessRequest {
        id: request_id,
        consumer: info.sender.clone(),
        target_round,
        status: RequestStatus::Pending,
        requested_at: env.block.time,
        fulfilled_round: None,
        random_value: None,
    };
    REQUESTS.save(deps.storage, request_id, &request)?;
    ROUND_QUEUE.save(deps.storage, (target_round, request_id), &())?;

    Ok(Response::new()
        .set_data(to_json_binary(&request_id)?)
        .add_attribute("action", "request_randomness")
        .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
        .add_event(
            Event::new(RANDOMNESS_REQUESTED_EVENT)
                .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("target_round", target_round.to_string())
                .add_attribute("current_round", current_round.to_string()),
        ))
}

/// Submit a drand beacon. Only operators can call this.
///
/// After BLS verification the beacon is stored and the requests bound to
/// `round` (up to [`MAX_FULFILLMENTS_PER_BEACON`]) receive their
/// `FulfillRandomness` callback.
pub fn submit_beacon(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can submit beacons".to_string(),
        });
    }

    if BEACONS.has(deps.storage, round) {
        return Err(ContractError::BeaconAlreadyExists { round });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;

    let randomness = verify_beacon(&config.quicknet_pubkey, round, &signature).map_err(|e| {
        ContractError::VerificationFailed {
            reason: e.to_string(),
        }
    })?;

    let beacon = StoredBeacon {
        round,
        randomness: randomness.to_vec(),
        signature,
        submitted_at: env.block.time,
        submitted_by: info.sender.clone(),
    };
    BEACONS.save(deps.storage, round, &beacon)?;

    let current_latest = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    if round > current_latest {
        LATEST_ROUND.save(deps.storage, &round)?;
    }

    let (callbacks, served) = serve_round(deps.storage, round, &randomness)?;

    Ok(Response::new()
        .add_submessages(callbacks)
        .add_attribute("action", "submit_beacon")
        .add_attribute("round", round.to_string())
        .add_attribute("submitted_by", info.sender.to_string())
        .add_attribute("fulfilled_requests", served.len().to_string())
        .add_event(
            Event::new("randomness_beacon_submitted")
                .add_attribute("round", round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("submitted_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string())
                .add_attribute("request_ids", served.join(",")),
        ))
}

/// Serve requests still queued for a round whose beacon is already stored.
/// Anyone can call this: the value of every request is fixed by the beacon.
pub fn serve_queued(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    round: u64,
) -> Result<Response, ContractError> {
    let beacon = BEACONS
        .may_load(deps.storage, round)?
        .ok_or(ContractError::BeaconNotFound { round })?;

    let (callbacks, served) = serve_round(deps.storage, round, &beacon.randomness)?;

    Ok(Response::new()
        .add_submessages(callbacks)
        .add_attribute("action", "serve_queued")
        .add_attribute("round", round.to_string())
        .add_attribute("fulfilled_requests", served.len().to_string())
        .add_event(
            Event::new("randomness_queue_served")
                .add_attribute("round", round.to_string())
                .add_attribute("request_ids", served.join(",")),
        ))
}

/// Fulfill up to [`MAX_FULFILLMENTS_PER_BEACON`] requests targeting exactly
/// `round`, lowest request id first. Returns the callbacks and served ids.
fn serve_round(
    storage: &mut dyn Storage,
    round: u64,
    randomness: &[u8],
) -> Result<(Vec<SubMsg>, Vec<String>), ContractError> {
    let due: Vec<u64> = ROUND_QUEUE
        .prefix(round)
        .keys(storage, None, None, Order::Ascending)
        .take(MAX_FULFILLMENTS_PER_BEACON)
        .collect::<StdResult<_>>()?;

    let mut callbacks = Vec::with_capacity(due.len());
    let mut served = Vec::with_capacity(due.len());
    for request_id in due {
        ROUND_QUEUE.remove(storage, (round, request_id));

        let mut request = REQUESTS.load(storage, request_id)?;
        let random_value = derive_request_randomness(randomness, request_id);

        request.status = RequestStatus::Fulfilled;
        request.fulfilled_round = Some(round);
        request.random_value = Some(random_value);
        REQUESTS.save(storage, request_id, &request)?;

        let callback = WasmMsg::Execute {
            contract_addr: request.consumer.to_string(),
            msg: to_json_binary(&ConsumerExecuteMsg::FulfillRandomness {
                request_id,
                random_value,
            })?,
            funds: vec![],
        };
        callbacks.push(
            SubMsg::reply_on_error(callback, DELIVERY_REPLY_ID)
                .with_payload(to_json_binary(&request_id)?),
        );
        served.push(request_id.to_string());
    }

    Ok((callbacks, served))
}

/// A consumer rejected its callback. The beacon stays stored; only the
/// request is marked as undelivered.
pub fn handle_delivery_failure(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let request_id: u64 = from_json(&msg.payload)?;
    let error = msg.result.into_result().err().unwrap_or_default();

    let mut request = REQUESTS.load(deps.storage, request_id)?;
    request.status = RequestStatus::DeliveryFailed;
    REQUESTS.save(deps.storage, request_id, &request)?;

    Ok(Response::new()
        .add_attribute("action", "delivery_failed")
        .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
        .add_event(
            Event::new("randomness_delivery_failed")
                .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
                .add_attribute("consumer", request.consumer.to_string())
                .add_attribute("error", error),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| a != &addr);
    }

    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}
