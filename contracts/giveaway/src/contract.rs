use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{self, REQUEST_RANDOMNESS_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{GiveawayConfig, CONFIG};

const CONTRACT_NAME: &str = "crates.io:chance-giveaway";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_draw_timeout(msg.draw_timeout_seconds)?;

    let mut operators = Vec::new();
    for op in &msg.operators {
        operators.push(deps.api.addr_validate(op)?);
    }

    let config = GiveawayConfig {
        admin: info.sender.clone(),
        operators,
        randomness_provider: deps.api.addr_validate(&msg.randomness_provider)?,
        draw_timeout_seconds: msg.draw_timeout_seconds,
        paused: false,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "giveaway")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("randomness_provider", config.randomness_provider.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddApplicant {
            campaign_id,
            applicant,
        } => execute::add_applicant(deps, env, info, campaign_id, applicant),
        ExecuteMsg::BatchAddApplicants {
            campaign_id,
            applicants,
        } => execute::batch_add_applicants(deps, env, info, campaign_id, applicants),
        ExecuteMsg::DrawWinner { campaign_id } => {
            execute::draw_winner(deps, env, info, campaign_id)
        }
        ExecuteMsg::FulfillRandomness {
            request_id,
            random_value,
        } => execute::fulfill_randomness(deps, env, info, request_id, random_value),
        ExecuteMsg::ExpireDraw { campaign_id } => {
            execute::expire_draw(deps, env, info, campaign_id)
        }
        ExecuteMsg::SetPaused { paused } => execute::set_paused(deps, env, info, paused),
        ExecuteMsg::UpdateConfig {
            admin,
            randomness_provider,
            draw_timeout_seconds,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                randomness_provider,
                draw_timeout_seconds,
            },
        ),
        ExecuteMsg::UpdateOperators { add, remove } => {
            execute::update_operators(deps, env, info, add, remove)
        }
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REQUEST_RANDOMNESS_REPLY_ID => execute::handle_randomness_requested(deps, env, msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Campaign { campaign_id } => query::query_campaign(deps, campaign_id),
        QueryMsg::Applicants {
            campaign_id,
            start_after,
            limit,
        } => query::query_applicants(deps, campaign_id, start_after, limit),
        QueryMsg::Winner { campaign_id } => query::query_winner(deps, campaign_id),
        QueryMsg::DrawRequest { request_id } => query::query_draw_request(deps, request_id),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
