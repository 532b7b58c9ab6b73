//! Owner/heir custody state machine.
//!
//! Pure logic: no storage, no bank access. Every operation takes the acting
//! address and the current block time explicitly, checks all preconditions
//! first and only then mutates, so a returned error always leaves the record
//! exactly as it was. The contract layer loads the record, calls in, and saves
//! it back.
//!
//! ```text
//! Active --(time passes)--> Eligible --(take_over | perform_upkeep)--> Active
//! ```

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Event, Timestamp, Uint128};
use shared::{seconds_remaining, window_elapsed, CustodyStatus, THIRTY_DAYS};

use crate::error::ContractError;

/// Inactivity window after which the heir may claim the pool
pub const INACTIVITY_THRESHOLD: u64 = THIRTY_DAYS;

/// Who may call `perform_upkeep`
#[cw_serde]
pub enum KeeperPolicy {
    /// Anyone may execute the handover on the heir's behalf
    Public,
    /// Only the registered keeper address may execute it
    Restricted { keeper: Addr },
}

impl KeeperPolicy {
    pub fn permits(&self, caller: &Addr) -> bool {
        match self {
            KeeperPolicy::Public => true,
            KeeperPolicy::Restricted { keeper } => keeper == caller,
        }
    }
}

#[cw_serde]
pub struct Custody {
    /// Address allowed to withdraw and reassign the heir
    pub owner: Addr,
    /// Address allowed to claim ownership once the owner goes quiet
    pub heir: Addr,
    /// Time of the last owner withdrawal or take-over
    pub last_activity: Timestamp,
    /// Inactivity window (seconds)
    pub inactivity_threshold: u64,
    pub keeper: KeeperPolicy,
}

/// Observable outcome of a successful state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustodyEvent {
    Withdraw { owner: Addr, amount: Uint128 },
    OwnershipTransferred { previous_owner: Addr, new_owner: Addr },
    HeirChanged { new_heir: Addr },
}

impl From<CustodyEvent> for Event {
    fn from(event: CustodyEvent) -> Self {
        match event {
            CustodyEvent::Withdraw { owner, amount } => Event::new("withdraw")
                .add_attribute("owner", owner)
                .add_attribute("amount", amount),
            CustodyEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => Event::new("ownership_transferred")
                .add_attribute("previous_owner", previous_owner)
                .add_attribute("new_owner", new_owner),
            CustodyEvent::HeirChanged { new_heir } => {
                Event::new("heir_changed").add_attribute("new_heir", new_heir)
            }
        }
    }
}

fn ensure_heir(heir: &Addr) -> Result<(), ContractError> {
    if heir.as_str().trim().is_empty() {
        return Err(ContractError::InvalidHeir {});
    }
    Ok(())
}

impl Custody {
    /// Start custody with `owner` in control and the clock running from `now`.
    pub fn new(
        owner: Addr,
        heir: Addr,
        now: Timestamp,
        keeper: KeeperPolicy,
    ) -> Result<Self, ContractError> {
        ensure_heir(&heir)?;

        Ok(Custody {
            owner,
            heir,
            last_activity: now,
            inactivity_threshold: INACTIVITY_THRESHOLD,
            keeper,
        })
    }

    pub fn is_eligible_for_takeover(&self, now: Timestamp) -> bool {
        window_elapsed(
            now.seconds(),
            self.last_activity.seconds(),
            self.inactivity_threshold,
        )
    }

    pub fn status(&self, now: Timestamp) -> CustodyStatus {
        CustodyStatus::at(
            now.seconds(),
            self.last_activity.seconds(),
            self.inactivity_threshold,
        )
    }

    pub fn seconds_until_eligible(&self, now: Timestamp) -> u64 {
        seconds_remaining(
            now.seconds(),
            self.last_activity.seconds(),
            self.inactivity_threshold,
        )
    }

    /// Owner pulls `amount` out of a pool currently holding `balance`.
    ///
    /// A zero amount is valid and only restarts the inactivity clock.
    pub fn withdraw(
        &mut self,
        caller: &Addr,
        amount: Uint128,
        balance: Uint128,
        now: Timestamp,
    ) -> Result<CustodyEvent, ContractError> {
        if *caller != self.owner {
            return Err(ContractError::NotOwner {});
        }
        if amount > balance {
            return Err(ContractError::InsufficientBalance {
                requested: amount,
                available: balance,
            });
        }

        self.last_activity = now;

        Ok(CustodyEvent::Withdraw {
            owner: self.owner.clone(),
            amount,
        })
    }

    /// Heir claims ownership after the inactivity window.
    pub fn take_over(
        &mut self,
        caller: &Addr,
        now: Timestamp,
    ) -> Result<CustodyEvent, ContractError> {
        if *caller != self.heir {
            return Err(ContractError::NotHeir {});
        }
        if !self.is_eligible_for_takeover(now) {
            return Err(ContractError::OwnerStillActive {});
        }

        Ok(self.execute_transfer(now))
    }

    /// Reassign the heir. Does not count as owner activity.
    pub fn set_new_heir(
        &mut self,
        caller: &Addr,
        new_heir: Addr,
    ) -> Result<CustodyEvent, ContractError> {
        if *caller != self.owner {
            return Err(ContractError::NotOwner {});
        }
        ensure_heir(&new_heir)?;

        self.heir = new_heir.clone();

        Ok(CustodyEvent::HeirChanged { new_heir })
    }

    /// Keeper poll. The payload is always empty.
    pub fn check_upkeep(&self, now: Timestamp, _check_data: &Binary) -> (bool, Binary) {
        (self.is_eligible_for_takeover(now), Binary::default())
    }

    /// Keeper-driven handover: ownership goes to the current heir, never to
    /// the caller.
    pub fn perform_upkeep(
        &mut self,
        caller: &Addr,
        now: Timestamp,
    ) -> Result<CustodyEvent, ContractError> {
        if !self.keeper.permits(caller) {
            return Err(ContractError::NotKeeper {});
        }
        if !self.is_eligible_for_takeover(now) {
            return Err(ContractError::OwnerStillActive {});
        }

        Ok(self.execute_transfer(now))
    }

    fn execute_transfer(&mut self, now: Timestamp) -> CustodyEvent {
        let previous_owner = std::mem::replace(&mut self.owner, self.heir.clone());
        self.last_activity = now;

        CustodyEvent::OwnershipTransferred {
            previous_owner,
            new_owner: self.owner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 60 * 60;

    fn start() -> Timestamp {
        Timestamp::from_seconds(1_700_000_000)
    }

    fn custody() -> Custody {
        Custody::new(
            Addr::unchecked("owner"),
            Addr::unchecked("heir"),
            start(),
            KeeperPolicy::Public,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_empty_heir() {
        let err = Custody::new(
            Addr::unchecked("owner"),
            Addr::unchecked(""),
            start(),
            KeeperPolicy::Public,
        )
        .unwrap_err();
        assert_eq!(err, ContractError::InvalidHeir {});
    }

    #[test]
    fn eligibility_boundary_is_inclusive() {
        let c = custody();
        assert!(!c.is_eligible_for_takeover(start()));
        assert!(!c.is_eligible_for_takeover(start().plus_seconds(INACTIVITY_THRESHOLD - 1)));
        assert!(c.is_eligible_for_takeover(start().plus_seconds(INACTIVITY_THRESHOLD)));
        assert_eq!(c.status(start().plus_days(31)), CustodyStatus::Eligible);
        assert_eq!(c.seconds_until_eligible(start().plus_days(10)), 20 * DAY);
    }

    #[test]
    fn withdraw_resets_clock() {
        let mut c = custody();
        let later = start().plus_days(29);
        let event = c
            .withdraw(&Addr::unchecked("owner"), Uint128::zero(), Uint128::zero(), later)
            .unwrap();
        assert_eq!(
            event,
            CustodyEvent::Withdraw {
                owner: Addr::unchecked("owner"),
                amount: Uint128::zero(),
            }
        );
        assert_eq!(c.last_activity, later);
        assert!(!c.is_eligible_for_takeover(start().plus_days(31)));
    }

    #[test]
    fn failed_withdraw_leaves_state_untouched() {
        let mut c = custody();
        let before = c.clone();

        let err = c
            .withdraw(
                &Addr::unchecked("stranger"),
                Uint128::zero(),
                Uint128::new(10),
                start().plus_days(1),
            )
            .unwrap_err();
        assert_eq!(err, ContractError::NotOwner {});

        let err = c
            .withdraw(
                &Addr::unchecked("owner"),
                Uint128::new(11),
                Uint128::new(10),
                start().plus_days(1),
            )
            .unwrap_err();
        assert!(matches!(err, ContractError::InsufficientBalance { .. }));
        assert_eq!(c, before);
    }

    #[test]
    fn take_over_once_then_still_active() {
        let mut c = custody();
        let heir = Addr::unchecked("heir");
        let now = start().plus_days(31);

        assert_eq!(
            c.take_over(&heir, start().plus_days(5)).unwrap_err(),
            ContractError::OwnerStillActive {}
        );
        assert_eq!(
            c.take_over(&Addr::unchecked("stranger"), now).unwrap_err(),
            ContractError::NotHeir {}
        );

        let event = c.take_over(&heir, now).unwrap();
        assert_eq!(
            event,
            CustodyEvent::OwnershipTransferred {
                previous_owner: Addr::unchecked("owner"),
                new_owner: heir.clone(),
            }
        );
        assert_eq!(c.owner, heir);
        assert_eq!(c.last_activity, now);

        assert_eq!(
            c.take_over(&heir, now).unwrap_err(),
            ContractError::OwnerStillActive {}
        );
    }

    #[test]
    fn set_new_heir_does_not_touch_clock() {
        let mut c = custody();
        let event = c
            .set_new_heir(&Addr::unchecked("owner"), Addr::unchecked("cousin"))
            .unwrap();
        assert_eq!(
            event,
            CustodyEvent::HeirChanged {
                new_heir: Addr::unchecked("cousin"),
            }
        );
        assert_eq!(c.last_activity, start());

        // the old heir lost the claim, the new one has it
        let now = start().plus_days(30);
        assert_eq!(
            c.take_over(&Addr::unchecked("heir"), now).unwrap_err(),
            ContractError::NotHeir {}
        );
        c.take_over(&Addr::unchecked("cousin"), now).unwrap();
    }

    #[test]
    fn set_new_heir_rejects_bad_input() {
        let mut c = custody();
        assert_eq!(
            c.set_new_heir(&Addr::unchecked("heir"), Addr::unchecked("cousin"))
                .unwrap_err(),
            ContractError::NotOwner {}
        );
        assert_eq!(
            c.set_new_heir(&Addr::unchecked("owner"), Addr::unchecked(""))
                .unwrap_err(),
            ContractError::InvalidHeir {}
        );
        assert_eq!(c.heir, Addr::unchecked("heir"));
    }

    #[test]
    fn check_upkeep_tracks_eligibility() {
        let c = custody();
        let data = Binary::default();
        assert_eq!(c.check_upkeep(start(), &data), (false, Binary::default()));
        let (needed, payload) = c.check_upkeep(start().plus_days(30), &data);
        assert!(needed);
        assert!(payload.is_empty());
    }

    #[test]
    fn perform_upkeep_hands_over_to_heir() {
        let mut c = custody();
        let keeper = Addr::unchecked("anyone");
        assert_eq!(
            c.perform_upkeep(&keeper, start().plus_days(1)).unwrap_err(),
            ContractError::OwnerStillActive {}
        );

        c.perform_upkeep(&keeper, start().plus_days(31)).unwrap();
        assert_eq!(c.owner, Addr::unchecked("heir"));
    }

    #[test]
    fn restricted_keeper() {
        let mut c = Custody::new(
            Addr::unchecked("owner"),
            Addr::unchecked("heir"),
            start(),
            KeeperPolicy::Restricted {
                keeper: Addr::unchecked("keeper"),
            },
        )
        .unwrap();
        let now = start().plus_days(31);

        assert_eq!(
            c.perform_upkeep(&Addr::unchecked("heir"), now).unwrap_err(),
            ContractError::NotKeeper {}
        );
        c.perform_upkeep(&Addr::unchecked("keeper"), now).unwrap();
        assert_eq!(c.owner, Addr::unchecked("heir"));
    }
}
