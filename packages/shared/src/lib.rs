// Shared types and utilities for time-locked custody contracts on CosmWasm

use cosmwasm_schema::cw_serde;

/// Thirty days, in seconds
pub const THIRTY_DAYS: u64 = 30 * 24 * 60 * 60;

/// Whether an inactivity window is still running or has elapsed
#[cw_serde]
pub enum CustodyStatus {
    Active,
    Eligible,
}

impl CustodyStatus {
    pub fn at(current_time: u64, last_activity: u64, window: u64) -> Self {
        if window_elapsed(current_time, last_activity, window) {
            CustodyStatus::Eligible
        } else {
            CustodyStatus::Active
        }
    }
}

// Common helper functions

/// Seconds since `last_activity`; a clock behind `last_activity` counts as zero
pub fn elapsed_since(current_time: u64, last_activity: u64) -> u64 {
    current_time.saturating_sub(last_activity)
}

/// Check if `window` seconds have passed since `last_activity` (inclusive)
pub fn window_elapsed(current_time: u64, last_activity: u64, window: u64) -> bool {
    elapsed_since(current_time, last_activity) >= window
}

/// Seconds left before the window elapses, 0 once it has
pub fn seconds_remaining(current_time: u64, last_activity: u64, window: u64) -> u64 {
    window.saturating_sub(elapsed_since(current_time, last_activity))
}
