use chance_giveaway_common::randomness::winning_index;
use chance_giveaway_common::types::{parse_request_id, ProviderExecuteMsg};
use cosmwasm_std::{
    from_json, to_json_binary, Addr, DepsMut, Env, Event, MessageInfo, Reply, Response,
    StdError, Storage, SubMsg, Uint256, WasmMsg,
};

use crate::error::ContractError;
use crate::msg::UpdateConfigParams;
use crate::state::{
    DrawRequest, GiveawayConfig, APPLICANTS, CONFIG, DRAW_REQUESTS, PENDING_DRAWS, POOL_SIZES,
    WINNERS,
};

/// Reply id for the provider's acknowledgment of `RequestRandomness`.
pub const REQUEST_RANDOMNESS_REPLY_ID: u64 = 1;

/// Minimum draw timeout: 5 minutes
const MIN_DRAW_TIMEOUT: u64 = 300;
/// Maximum draw timeout: 7 days
const MAX_DRAW_TIMEOUT: u64 = 604_800;

pub fn validate_draw_timeout(seconds: u64) -> Result<(), ContractError> {
    if !(MIN_DRAW_TIMEOUT..=MAX_DRAW_TIMEOUT).contains(&seconds) {
        return Err(ContractError::InvalidDrawTimeout {
            value: seconds,
            min: MIN_DRAW_TIMEOUT,
            max: MAX_DRAW_TIMEOUT,
        });
    }
    Ok(())
}

/// Gate shared by every pool-mutating and draw entry point.
fn ensure_can_mutate(config: &GiveawayConfig, sender: &Addr) -> Result<(), ContractError> {
    if !config.is_privileged(sender) {
        return Err(ContractError::Unauthorized {
            reason: "only admin or operators can manage campaigns".to_string(),
        });
    }
    if config.paused {
        return Err(ContractError::Paused);
    }
    Ok(())
}

fn ensure_undecided(storage: &dyn Storage, campaign_id: &str) -> Result<(), ContractError> {
    if WINNERS.has(storage, campaign_id) {
        return Err(ContractError::CampaignDecided {
            campaign_id: campaign_id.to_string(),
        });
    }
    Ok(())
}

/// Append already-validated applicants and return the new pool size.
fn append_applicants(
    storage: &mut dyn Storage,
    campaign_id: &str,
    applicants: &[String],
) -> Result<u64, ContractError> {
    let mut size = POOL_SIZES.may_load(storage, campaign_id)?.unwrap_or(0);
    for applicant in applicants {
        APPLICANTS.save(storage, (campaign_id, size), applicant)?;
        size += 1;
    }
    POOL_SIZES.save(storage, campaign_id, &size)?;
    Ok(size)
}

/// Add a single applicant to a campaign. The campaign is created on first use.
pub fn add_applicant(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    campaign_id: String,
    applicant: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_can_mutate(&config, &info.sender)?;

    if applicant.is_empty() {
        return Err(ContractError::EmptyApplicant { campaign_id });
    }
    ensure_undecided(deps.storage, &campaign_id)?;

    let pool_size =
        append_applicants(deps.storage, &campaign_id, std::slice::from_ref(&applicant))?;

    Ok(Response::new()
        .add_attribute("action", "add_applicant")
        .add_attribute("campaign_id", campaign_id)
        .add_attribute("applicant", applicant)
        .add_attribute("pool_size", pool_size.to_string()))
}

/// Add applicants in order. Every item is checked before the first write, so
/// a bad item rejects the whole batch.
pub fn batch_add_applicants(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    campaign_id: String,
    applicants: Vec<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_can_mutate(&config, &info.sender)?;

    if applicants.is_empty() {
        return Err(ContractError::EmptyBatch { campaign_id });
    }
    if applicants.iter().any(|a| a.is_empty()) {
        return Err(ContractError::EmptyApplicant { campaign_id });
    }
    ensure_undecided(deps.storage, &campaign_id)?;

    let pool_size = append_applicants(deps.storage, &campaign_id, &applicants)?;

    Ok(Response::new()
        .add_attribute("action", "batch_add_applicants")
        .add_attribute("campaign_id", campaign_id)
        .add_attribute("added", applicants.len().to_string())
        .add_attribute("pool_size", pool_size.to_string()))
}

/// Ask the randomness provider for a value to decide `campaign_id`.
///
/// Returns immediately. The provider's acknowledgment comes back through
/// `reply` in the same transaction and records the correlation; the random
/// value itself arrives later via `FulfillRandomness`.
pub fn draw_winner(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    campaign_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_can_mutate(&config, &info.sender)?;

    let pool_size = POOL_SIZES
        .may_load(deps.storage, &campaign_id)?
        .unwrap_or(0);
    if pool_size == 0 {
        return Err(ContractError::EmptyPool { campaign_id });
    }
    ensure_undecided(deps.storage, &campaign_id)?;

    if let Some(request_id) = PENDING_DRAWS.may_load(deps.storage, &campaign_id)? {
        return Err(ContractError::DrawPending {
            campaign_id,
            request_id,
        });
    }

    let request = WasmMsg::Execute {
        contract_addr: config.randomness_provider.to_string(),
        msg: to_json_binary(&ProviderExecuteMsg::RequestRandomness {})?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(
            SubMsg::reply_on_success(request, REQUEST_RANDOMNESS_REPLY_ID)
                .with_payload(to_json_binary(&campaign_id)?),
        )
        .add_attribute("action", "draw_winner")
        .add_attribute("campaign_id", campaign_id)
        .add_attribute("pool_size", pool_size.to_string()))
}

/// Record the provider's acknowledgment: request id -> campaign.
pub fn handle_randomness_requested(
    deps: DepsMut,
    env: Env,
    msg: Reply,
) -> Result<Response, ContractError> {
    let campaign_id: String = from_json(&msg.payload)?;
    let response = msg.result.into_result().map_err(StdError::generic_err)?;
    let request_id = parse_request_id(&response.events).ok_or(ContractError::MissingRequestId)?;

    if DRAW_REQUESTS.has(deps.storage, request_id) {
        return Err(ContractError::DuplicateRequestId { request_id });
    }

    let pool_size = POOL_SIZES
        .may_load(deps.storage, &campaign_id)?
        .unwrap_or(0);
    let request = DrawRequest {
        request_id,
        campaign_id: campaign_id.clone(),
        pool_size,
        requested_at: env.block.time,
    };
    DRAW_REQUESTS.save(deps.storage, request_id, &request)?;
    PENDING_DRAWS.save(deps.storage, &campaign_id, &request_id)?;

    Ok(Response::new()
        .add_attribute("action", "draw_requested")
        .add_attribute("campaign_id", campaign_id.clone())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("giveaway_draw_requested")
                .add_attribute("campaign_id", campaign_id)
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("pool_size", pool_size.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Consume a randomness callback.
///
/// Only the configured provider may call this. Past that check it never
/// fails: unknown requests, decided campaigns and empty pools are no-ops
/// reported through the `outcome` attribute. The pool is read as it is now,
/// so applicants added while the draw was pending take part.
pub fn fulfill_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_value: Uint256,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.randomness_provider {
        return Err(ContractError::Unauthorized {
            reason: "only the randomness provider can fulfill draws".to_string(),
        });
    }

    let response = Response::new()
        .add_attribute("action", "fulfill_randomness")
        .add_attribute("request_id", request_id.to_string());

    let Some(request) = DRAW_REQUESTS.may_load(deps.storage, request_id)? else {
        return Ok(response.add_attribute("outcome", "unknown_request"));
    };
    let campaign_id = request.campaign_id;

    // Consumed whatever happens next
    DRAW_REQUESTS.remove(deps.storage, request_id);
    if PENDING_DRAWS.may_load(deps.storage, &campaign_id)? == Some(request_id) {
        PENDING_DRAWS.remove(deps.storage, &campaign_id);
    }
    let response = response.add_attribute("campaign_id", campaign_id.clone());

    if WINNERS.has(deps.storage, &campaign_id) {
        return Ok(response.add_attribute("outcome", "already_decided"));
    }

    let pool_size = POOL_SIZES
        .may_load(deps.storage, &campaign_id)?
        .unwrap_or(0);
    let Some(index) = winning_index(random_value, pool_size) else {
        return Ok(response.add_attribute("outcome", "empty_pool"));
    };

    let winner = APPLICANTS.load(deps.storage, (campaign_id.as_str(), index))?;
    WINNERS.save(deps.storage, &campaign_id, &winner)?;

    Ok(response
        .add_attribute("outcome", "winner_selected")
        .add_attribute("winner", winner.clone())
        .add_event(
            Event::new("giveaway_winner_announced")
                .add_attribute("campaign_id", campaign_id)
                .add_attribute("winner", winner)
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("random_value", random_value.to_string())
                .add_attribute("winning_index", index.to_string())
                .add_attribute("pool_size", pool_size.to_string())
                .add_attribute("requested_pool_size", request.pool_size.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Expire a draw the provider never answered. Anyone can call once the
/// timeout has passed; the campaign can then be drawn again.
pub fn expire_draw(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    campaign_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let request_id = PENDING_DRAWS
        .may_load(deps.storage, &campaign_id)?
        .ok_or_else(|| ContractError::NoPendingDraw {
            campaign_id: campaign_id.clone(),
        })?;
    let request = DRAW_REQUESTS.load(deps.storage, request_id)?;

    let expires_at = request
        .requested_at
        .plus_seconds(config.draw_timeout_seconds);
    if env.block.time <= expires_at {
        return Err(ContractError::DrawNotExpired {
            campaign_id,
            expires_at: expires_at.seconds(),
        });
    }

    DRAW_REQUESTS.remove(deps.storage, request_id);
    PENDING_DRAWS.remove(deps.storage, &campaign_id);

    Ok(Response::new()
        .add_attribute("action", "expire_draw")
        .add_attribute("campaign_id", campaign_id.clone())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("giveaway_draw_expired")
                .add_attribute("campaign_id", campaign_id)
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("requested_at", request.requested_at.seconds().to_string()),
        ))
}

/// Pause or resume the contract. Admin only.
pub fn set_paused(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can pause".to_string(),
        });
    }

    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_paused")
        .add_attribute("paused", paused.to_string())
        .add_event(
            Event::new("giveaway_paused")
                .add_attribute("paused", paused.to_string())
                .add_attribute("by", info.sender.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        randomness_provider,
        draw_timeout_seconds,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(provider) = randomness_provider {
        config.randomness_provider = deps.api.addr_validate(&provider)?;
    }
    if let Some(timeout) = draw_timeout_seconds {
        validate_draw_timeout(timeout)?;
        config.draw_timeout_seconds = timeout;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
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
