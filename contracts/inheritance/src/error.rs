use cosmwasm_std::{StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Invalid heir")]
    InvalidHeir {},

    #[error("Not owner")]
    NotOwner {},

    #[error("Insufficient balance")]
    InsufficientBalance {
        requested: Uint128,
        available: Uint128,
    },

    #[error("Not heir")]
    NotHeir {},

    #[error("Owner still active")]
    OwnerStillActive {},

    #[error("Not keeper")]
    NotKeeper {},
}
