//! Integration tests for the giveaway draw cycle.
//!
//! Both contracts run against their own `cosmwasm_std::testing` mocks. The
//! messages one contract emits are decoded and fed to the other's entry
//! points the way the chain would route them: the provider's acknowledgment
//! comes back to the giveaway as a `Reply`, and the randomness arrives later
//! as a `FulfillRandomness` execute from the provider address.
//!
//! Run:
//! ```bash
//! cargo test -p chance-giveaway-integration-tests
//! ```

use chance_giveaway_common::randomness::{derive_request_randomness, winning_index};
use chance_giveaway_common::types::RequestStatus;
use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    from_json, CosmosMsg, Env, Event, MemoryStorage, OwnedDeps, Reply, ReplyOn, Response, SubMsg,
    SubMsgResponse, SubMsgResult, Timestamp, WasmMsg,
};

use chance_giveaway::msg as giveaway_msg;
use chance_randomness_provider::msg as provider_msg;

type MockDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

const GENESIS_TIME: u64 = 1692803367;

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

/// Two rounds of delay, so requests made in round 998 are bound to round 1000
const ROUND_DELAY: u64 = 2;
const REQUEST_ROUND: u64 = 998;

// ─── Helpers ───

/// Env whose block time falls inside drand round `round`.
fn env_at_round(round: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(GENESIS_TIME + (round - 1) * 3);
    env
}

struct Harness {
    giveaway: MockDeps,
    provider: MockDeps,
}

impl Harness {
    fn new() -> Self {
        let mut giveaway = mock_dependencies();
        let mut provider = mock_dependencies();
        let admin = giveaway.api.addr_make("admin");
        let beacon_operator = provider.api.addr_make("beacon_operator").to_string();
        let operator = giveaway.api.addr_make("operator").to_string();
        let provider_addr = giveaway.api.addr_make("provider").to_string();

        chance_randomness_provider::contract::instantiate(
            provider.as_mut(),
            mock_env(),
            message_info(&admin, &[]),
            provider_msg::InstantiateMsg {
                operators: vec![beacon_operator],
                quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
                genesis_time: GENESIS_TIME,
                period_seconds: 3,
                round_delay: ROUND_DELAY,
            },
        )
        .unwrap();

        chance_giveaway::contract::instantiate(
            giveaway.as_mut(),
            env_at_round(REQUEST_ROUND),
            message_info(&admin, &[]),
            giveaway_msg::InstantiateMsg {
                operators: vec![operator],
                randomness_provider: provider_addr,
                draw_timeout_seconds: 3600,
            },
        )
        .unwrap();

        Harness { giveaway, provider }
    }

    fn giveaway_exec(
        &mut self,
        env: Env,
        sender: &str,
        msg: giveaway_msg::ExecuteMsg,
    ) -> Result<Response, chance_giveaway::ContractError> {
        let sender = self.giveaway.api.addr_make(sender);
        chance_giveaway::contract::execute(
            self.giveaway.as_mut(),
            env,
            message_info(&sender, &[]),
            msg,
        )
    }

    fn add_applicants(&mut self, campaign_id: &str, applicants: &[&str]) {
        self.giveaway_exec(
            env_at_round(REQUEST_ROUND),
            "operator",
            giveaway_msg::ExecuteMsg::BatchAddApplicants {
                campaign_id: campaign_id.to_string(),
                applicants: applicants.iter().map(|a| a.to_string()).collect(),
            },
        )
        .unwrap();
    }

    /// Run `DrawWinner`, route the submessage to the provider and hand the
    /// provider's events back to the giveaway's `reply`. Returns the request id.
    fn draw(&mut self, campaign_id: &str) -> u64 {
        let env = env_at_round(REQUEST_ROUND);
        let res = self
            .giveaway_exec(
                env.clone(),
                "operator",
                giveaway_msg::ExecuteMsg::DrawWinner {
                    campaign_id: campaign_id.to_string(),
                },
            )
            .unwrap();
        assert_eq!(res.messages.len(), 1);
        let sub = &res.messages[0];
        assert_eq!(sub.reply_on, ReplyOn::Success);

        let (contract_addr, body) = wasm_execute(sub);
        assert_eq!(contract_addr, self.provider.api.addr_make("provider").as_str());
        let request: provider_msg::ExecuteMsg = from_json(body).unwrap();

        let giveaway_addr = self.provider.api.addr_make("giveaway");
        let provider_res = chance_randomness_provider::contract::execute(
            self.provider.as_mut(),
            env.clone(),
            message_info(&giveaway_addr, &[]),
            request,
        )
        .unwrap();

        let request_id: u64 = from_json(provider_res.data.as_ref().unwrap()).unwrap();

        let ack = chance_giveaway::contract::reply(
            self.giveaway.as_mut(),
            env,
            reply_from(sub, &provider_res),
        )
        .unwrap();
        assert!(ack.events.iter().any(|e| e.ty == "giveaway_draw_requested"));

        request_id
    }

    /// Submit the round 1000 beacon and return the callbacks it dispatched.
    fn submit_beacon(&mut self) -> Vec<SubMsg> {
        let operator = self.provider.api.addr_make("beacon_operator");
        let res = chance_randomness_provider::contract::execute(
            self.provider.as_mut(),
            env_at_round(TEST_ROUND + 1),
            message_info(&operator, &[]),
            provider_msg::ExecuteMsg::SubmitBeacon {
                round: TEST_ROUND,
                signature_hex: TEST_SIG_HEX.to_string(),
            },
        )
        .unwrap();
        res.messages
    }

    /// Deliver a provider callback to the giveaway as the provider would.
    fn deliver(&mut self, callback: &SubMsg) -> Result<Response, chance_giveaway::ContractError> {
        assert_eq!(callback.reply_on, ReplyOn::Error);
        let (contract_addr, body) = wasm_execute(callback);
        assert_eq!(contract_addr, self.giveaway.api.addr_make("giveaway").as_str());
        let msg: giveaway_msg::ExecuteMsg = from_json(body).unwrap();
        self.giveaway_exec(env_at_round(TEST_ROUND + 1), "provider", msg)
    }

    fn winner(&self, campaign_id: &str) -> Option<String> {
        let res = chance_giveaway::contract::query(
            self.giveaway.as_ref(),
            mock_env(),
            giveaway_msg::QueryMsg::Winner {
                campaign_id: campaign_id.to_string(),
            },
        )
        .unwrap();
        from_json(&res).unwrap()
    }

    fn provider_request(
        &self,
        request_id: u64,
    ) -> chance_randomness_provider::state::RandomnessRequest {
        let res = chance_randomness_provider::contract::query(
            self.provider.as_ref(),
            mock_env(),
            provider_msg::QueryMsg::Request { request_id },
        )
        .unwrap();
        let request: Option<chance_randomness_provider::state::RandomnessRequest> =
            from_json(&res).unwrap();
        request.unwrap()
    }
}

fn wasm_execute(sub: &SubMsg) -> (&str, &cosmwasm_std::Binary) {
    match &sub.msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr,
            msg,
            funds,
        }) => {
            assert!(funds.is_empty());
            (contract_addr.as_str(), msg)
        }
        other => panic!("expected wasm execute, got {:?}", other),
    }
}

/// The chain reports a callee's custom events with a `wasm-` prefix.
#[allow(deprecated)]
fn reply_from(sub: &SubMsg, res: &Response) -> Reply {
    let events = res
        .events
        .iter()
        .map(|e| Event::new(format!("wasm-{}", e.ty)).add_attributes(e.attributes.clone()))
        .collect();
    Reply {
        id: sub.id,
        payload: sub.payload.clone(),
        gas_used: 0,
        result: SubMsgResult::Ok(SubMsgResponse {
            events,
            data: res.data.clone(),
            msg_responses: vec![],
        }),
    }
}

fn expected_winner(pool: &[&str], request_id: u64) -> String {
    let beacon = hex::decode(TEST_RANDOMNESS_HEX).unwrap();
    let value = derive_request_randomness(&beacon, request_id);
    let index = winning_index(value, pool.len() as u64).unwrap();
    pool[index as usize].to_string()
}

// ─── Tests ───

#[test]
fn test_full_draw_cycle() {
    let mut h = Harness::new();
    let pool = ["alice", "bob", "carol", "dave", "erin"];
    h.add_applicants("launch", &pool);

    let request_id = h.draw("launch");
    assert_eq!(request_id, 0);
    assert_eq!(h.provider_request(0).status, RequestStatus::Pending);
    assert_eq!(h.provider_request(0).target_round, REQUEST_ROUND + ROUND_DELAY);

    // Nothing decided until the beacon lands
    assert_eq!(h.winner("launch"), None);

    let callbacks = h.submit_beacon();
    assert_eq!(callbacks.len(), 1);

    let res = h.deliver(&callbacks[0]).unwrap();
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "outcome" && a.value == "winner_selected"));

    let winner = h.winner("launch").unwrap();
    assert_eq!(winner, expected_winner(&pool, request_id));

    let request = h.provider_request(request_id);
    assert_eq!(request.status, RequestStatus::Fulfilled);
    assert_eq!(request.fulfilled_round, Some(TEST_ROUND));

    // Redelivery of the same callback changes nothing
    let res = h.deliver(&callbacks[0]).unwrap();
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "outcome" && a.value == "unknown_request"));
    assert_eq!(h.winner("launch"), Some(winner));
}

#[test]
fn test_one_beacon_decides_several_campaigns() {
    let mut h = Harness::new();
    let first = ["alice", "bob", "carol"];
    let second = ["dave", "erin", "frank", "grace", "heidi", "ivan", "judy"];
    h.add_applicants("first", &first);
    h.add_applicants("second", &second);

    let first_id = h.draw("first");
    let second_id = h.draw("second");
    assert_ne!(first_id, second_id);

    let callbacks = h.submit_beacon();
    assert_eq!(callbacks.len(), 2);
    for callback in &callbacks {
        h.deliver(callback).unwrap();
    }

    assert_eq!(h.winner("first"), Some(expected_winner(&first, first_id)));
    assert_eq!(h.winner("second"), Some(expected_winner(&second, second_id)));
}

#[test]
fn test_rejected_callback_then_expire_and_redraw() {
    let mut h = Harness::new();
    let pool = ["alice", "bob"];
    h.add_applicants("launch", &pool);
    let request_id = h.draw("launch");

    // Point the giveaway at a different provider so the callback is refused
    let other_provider = h.giveaway.api.addr_make("other_provider").to_string();
    h.giveaway_exec(
        mock_env(),
        "admin",
        giveaway_msg::ExecuteMsg::UpdateConfig {
            admin: None,
            randomness_provider: Some(other_provider),
            draw_timeout_seconds: None,
        },
    )
    .unwrap();

    let callbacks = h.submit_beacon();
    let err = h.deliver(&callbacks[0]).unwrap_err();
    assert!(matches!(
        err,
        chance_giveaway::ContractError::Unauthorized { .. }
    ));

    // The chain hands the failure back to the provider
    let failure = Reply {
        id: callbacks[0].id,
        payload: callbacks[0].payload.clone(),
        gas_used: 0,
        result: SubMsgResult::Err(err.to_string()),
    };
    let res = chance_randomness_provider::contract::reply(
        h.provider.as_mut(),
        env_at_round(TEST_ROUND + 1),
        failure,
    )
    .unwrap();
    assert!(res.events.iter().any(|e| e.ty == "randomness_delivery_failed"));
    assert_eq!(
        h.provider_request(request_id).status,
        RequestStatus::DeliveryFailed
    );

    // The draw is still pending on the giveaway side until it times out
    let expire = giveaway_msg::ExecuteMsg::ExpireDraw {
        campaign_id: "launch".to_string(),
    };
    let mut late = env_at_round(REQUEST_ROUND);
    late.block.time = late.block.time.plus_seconds(3601);
    h.giveaway_exec(late, "anyone", expire).unwrap();
    assert_eq!(h.winner("launch"), None);

    // Restore the provider and draw again
    let provider = h.giveaway.api.addr_make("provider").to_string();
    h.giveaway_exec(
        mock_env(),
        "admin",
        giveaway_msg::ExecuteMsg::UpdateConfig {
            admin: None,
            randomness_provider: Some(provider),
            draw_timeout_seconds: None,
        },
    )
    .unwrap();
    let retry_id = h.draw("launch");
    assert_eq!(retry_id, request_id + 1);
}
