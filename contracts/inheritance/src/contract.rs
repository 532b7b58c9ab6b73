use cosmwasm_std::{
    coins, entry_point, to_json_binary, Addr, Api, BankMsg, Binary, Deps, DepsMut, Env,
    MessageInfo, Response, StdError, StdResult, Uint128,
};
use cw2::set_contract_version;
use cw_utils::nonpayable;

use crate::custody::{Custody, KeeperPolicy};
use crate::error::ContractError;
use crate::msg::{
    AddressResponse, BalanceResponse, CheckUpkeepResponse, ConfigResponse, EligibilityResponse,
    ExecuteMsg, InstantiateMsg, LastActivityResponse, QueryMsg,
};
use crate::state::{Config, CONFIG, CUSTODY};

const CONTRACT_NAME: &str = "crates.io:inheritance";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn validate_heir(api: &dyn Api, heir: &str) -> Result<Addr, ContractError> {
    if heir.trim().is_empty() {
        return Err(ContractError::InvalidHeir {});
    }
    Ok(api.addr_validate(heir)?)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    // The pool starts empty
    nonpayable(&info)?;
    let heir = validate_heir(deps.api, &msg.heir)?;
    if msg.denom.trim().is_empty() {
        return Err(StdError::generic_err("denom must not be empty").into());
    }
    let keeper = match msg.keeper {
        Some(keeper) => KeeperPolicy::Restricted {
            keeper: deps.api.addr_validate(&keeper)?,
        },
        None => KeeperPolicy::Public,
    };

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let custody = Custody::new(info.sender.clone(), heir, env.block.time, keeper)?;
    CUSTODY.save(deps.storage, &custody)?;
    CONFIG.save(
        deps.storage,
        &Config {
            denom: msg.denom.clone(),
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", info.sender)
        .add_attribute("heir", custody.heir)
        .add_attribute("denom", msg.denom)
        .add_attribute(
            "inactivity_threshold",
            custody.inactivity_threshold.to_string(),
        ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Deposit {} => execute_deposit(deps, info),
        ExecuteMsg::Withdraw { amount } => execute_withdraw(deps, env, info, amount),
        ExecuteMsg::TakeOver {} => execute_take_over(deps, env, info),
        ExecuteMsg::SetNewHeir { heir } => execute_set_new_heir(deps, info, heir),
        ExecuteMsg::PerformUpkeep { perform_data: _ } => execute_perform_upkeep(deps, env, info),
    }
}

pub fn execute_deposit(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    // Funds of any denom are accepted; only the pool denom is reported
    let amount: Uint128 = info
        .funds
        .iter()
        .filter(|coin| coin.denom == config.denom)
        .map(|coin| coin.amount)
        .sum();

    Ok(Response::new()
        .add_attribute("method", "deposit")
        .add_attribute("sender", info.sender)
        .add_attribute("amount", amount))
}

pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    // Attached funds would already be counted in the queried balance
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let mut custody = CUSTODY.load(deps.storage)?;
    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.denom)?
        .amount;

    let event = custody.withdraw(&info.sender, amount, balance, env.block.time)?;
    CUSTODY.save(deps.storage, &custody)?;

    let mut res = Response::new()
        .add_attribute("method", "withdraw")
        .add_attribute("owner", info.sender.clone())
        .add_attribute("amount", amount)
        .add_event(event.into());

    // The bank module rejects empty transfers
    if !amount.is_zero() {
        res = res.add_message(BankMsg::Send {
            to_address: info.sender.into_string(),
            amount: coins(amount.u128(), config.denom),
        });
    }

    Ok(res)
}

pub fn execute_take_over(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut custody = CUSTODY.load(deps.storage)?;
    let event = custody.take_over(&info.sender, env.block.time)?;
    CUSTODY.save(deps.storage, &custody)?;

    Ok(Response::new()
        .add_attribute("method", "take_over")
        .add_attribute("new_owner", custody.owner)
        .add_event(event.into()))
}

pub fn execute_set_new_heir(
    deps: DepsMut,
    info: MessageInfo,
    heir: String,
) -> Result<Response, ContractError> {
    let mut custody = CUSTODY.load(deps.storage)?;

    // Authorization comes before argument validation
    if info.sender != custody.owner {
        return Err(ContractError::NotOwner {});
    }
    let heir_addr = validate_heir(deps.api, &heir)?;

    let event = custody.set_new_heir(&info.sender, heir_addr)?;
    CUSTODY.save(deps.storage, &custody)?;

    Ok(Response::new()
        .add_attribute("method", "set_new_heir")
        .add_attribute("heir", heir)
        .add_event(event.into()))
}

pub fn execute_perform_upkeep(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut custody = CUSTODY.load(deps.storage)?;
    let event = custody.perform_upkeep(&info.sender, env.block.time)?;
    CUSTODY.save(deps.storage, &custody)?;

    Ok(Response::new()
        .add_attribute("method", "perform_upkeep")
        .add_attribute("keeper", info.sender)
        .add_attribute("new_owner", custody.owner)
        .add_event(event.into()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Owner {} => to_json_binary(&query_owner(deps)?),
        QueryMsg::Heir {} => to_json_binary(&query_heir(deps)?),
        QueryMsg::LastActivity {} => to_json_binary(&query_last_activity(deps)?),
        QueryMsg::Balance {} => to_json_binary(&query_balance(deps, env)?),
        QueryMsg::IsEligibleForTakeover {} => to_json_binary(&query_eligibility(deps, env)?),
        QueryMsg::CheckUpkeep { check_data } => {
            to_json_binary(&query_check_upkeep(deps, env, check_data)?)
        }
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    let custody = CUSTODY.load(deps.storage)?;
    Ok(ConfigResponse {
        denom: config.denom,
        inactivity_threshold: custody.inactivity_threshold,
        keeper: custody.keeper,
    })
}

fn query_owner(deps: Deps) -> StdResult<AddressResponse> {
    let custody = CUSTODY.load(deps.storage)?;
    Ok(AddressResponse {
        address: custody.owner,
    })
}

fn query_heir(deps: Deps) -> StdResult<AddressResponse> {
    let custody = CUSTODY.load(deps.storage)?;
    Ok(AddressResponse {
        address: custody.heir,
    })
}

fn query_last_activity(deps: Deps) -> StdResult<LastActivityResponse> {
    let custody = CUSTODY.load(deps.storage)?;
    Ok(LastActivityResponse {
        last_activity: custody.last_activity.seconds(),
    })
}

fn query_balance(deps: Deps, env: Env) -> StdResult<BalanceResponse> {
    let config = CONFIG.load(deps.storage)?;
    let balance = deps
        .querier
        .query_balance(env.contract.address, config.denom)?;
    Ok(BalanceResponse { balance })
}

fn query_eligibility(deps: Deps, env: Env) -> StdResult<EligibilityResponse> {
    let custody = CUSTODY.load(deps.storage)?;
    let now = env.block.time;
    Ok(EligibilityResponse {
        eligible: custody.is_eligible_for_takeover(now),
        status: custody.status(now),
        seconds_remaining: custody.seconds_until_eligible(now),
    })
}

fn query_check_upkeep(deps: Deps, env: Env, check_data: Binary) -> StdResult<CheckUpkeepResponse> {
    let custody = CUSTODY.load(deps.storage)?;
    let (upkeep_needed, perform_data) = custody.check_upkeep(env.block.time, &check_data);
    Ok(CheckUpkeepResponse {
        upkeep_needed,
        perform_data,
    })
}
