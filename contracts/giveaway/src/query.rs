use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{ApplicantEntry, ApplicantsResponse, CampaignResponse};
use crate::state::{APPLICANTS, CONFIG, DRAW_REQUESTS, PENDING_DRAWS, POOL_SIZES, WINNERS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_campaign(deps: Deps, campaign_id: String) -> StdResult<Binary> {
    let applicant_count = POOL_SIZES
        .may_load(deps.storage, &campaign_id)?
        .unwrap_or(0);
    let winner = WINNERS.may_load(deps.storage, &campaign_id)?;
    let pending_request_id = PENDING_DRAWS.may_load(deps.storage, &campaign_id)?;

    to_json_binary(&CampaignResponse {
        campaign_id,
        applicant_count,
        winner,
        pending_request_id,
    })
}

pub fn query_applicants(
    deps: Deps,
    campaign_id: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(30).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let applicants: Vec<ApplicantEntry> = APPLICANTS
        .prefix(&campaign_id)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(index, applicant)| ApplicantEntry { index, applicant }))
        .collect::<StdResult<_>>()?;

    let total = POOL_SIZES
        .may_load(deps.storage, &campaign_id)?
        .unwrap_or(0);

    to_json_binary(&ApplicantsResponse {
        campaign_id,
        total,
        applicants,
    })
}

pub fn query_winner(deps: Deps, campaign_id: String) -> StdResult<Binary> {
    let winner = WINNERS.may_load(deps.storage, &campaign_id)?;
    to_json_binary(&winner)
}

pub fn query_draw_request(deps: Deps, request_id: u64) -> StdResult<Binary> {
    let request = DRAW_REQUESTS.may_load(deps.storage, request_id)?;
    to_json_binary(&request)
}
