use cosmwasm_schema::cw_serde;
use cw_storage_plus::Item;

use crate::custody::Custody;

#[cw_serde]
pub struct Config {
    /// Native denomination held in the pool
    pub denom: String,
}

/// Configuration
pub const CONFIG: Item<Config> = Item::new("config");

/// Owner, heir, activity clock and keeper policy
pub const CUSTODY: Item<Custody> = Item::new("custody");
