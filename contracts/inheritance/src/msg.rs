use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, Uint128};
use shared::CustodyStatus;

use crate::custody::KeeperPolicy;

#[cw_serde]
pub struct InstantiateMsg {
    /// Address that may claim the pool after the owner goes inactive
    pub heir: String,
    /// Native denomination held in the pool
    pub denom: String,
    /// Sole address allowed to perform upkeep (None = anyone)
    pub keeper: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Add attached funds to the pool (anyone)
    Deposit {},
    /// Withdraw from the pool (owner); resets the inactivity clock
    Withdraw { amount: Uint128 },
    /// Claim ownership after the inactivity window (heir)
    TakeOver {},
    /// Reassign the heir (owner)
    SetNewHeir { heir: String },
    /// Execute the handover on the heir's behalf (keeper)
    PerformUpkeep { perform_data: Binary },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Get config
    #[returns(ConfigResponse)]
    Config {},

    /// Get current owner
    #[returns(AddressResponse)]
    Owner {},

    /// Get current heir
    #[returns(AddressResponse)]
    Heir {},

    /// Get time of the last owner activity
    #[returns(LastActivityResponse)]
    LastActivity {},

    /// Get pool balance
    #[returns(BalanceResponse)]
    Balance {},

    /// Check if the heir may take over now
    #[returns(EligibilityResponse)]
    IsEligibleForTakeover {},

    /// Keeper poll
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep { check_data: Binary },
}

// Response types

#[cw_serde]
pub struct ConfigResponse {
    pub denom: String,
    pub inactivity_threshold: u64,
    pub keeper: KeeperPolicy,
}

#[cw_serde]
pub struct AddressResponse {
    pub address: Addr,
}

#[cw_serde]
pub struct LastActivityResponse {
    pub last_activity: u64,
}

#[cw_serde]
pub struct BalanceResponse {
    pub balance: Coin,
}

#[cw_serde]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub status: CustodyStatus,
    pub seconds_remaining: u64,
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    pub perform_data: Binary,
}
