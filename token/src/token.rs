//! Balance ledger with delegation and historical voting power.

use crate::checkpoint::{Checkpoint, CheckpointHistory};
use crate::error::TokenError;
use agora_types::{Address, TimeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The voting token.
///
/// Every balance-affecting write is stamped with the caller-supplied `now`;
/// writes must not go back in time. Reads of historical power are only
/// allowed for indices strictly before `now`, because the current index can
/// still change within the same time unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingToken {
    address: Address,
    name: String,
    symbol: String,
    /// Holder of the mint capability.
    governor: Address,
    balances: BTreeMap<Address, u128>,
    /// Delegator → delegatee. Absent means undelegated.
    delegates: BTreeMap<Address, Address>,
    checkpoints: BTreeMap<Address, CheckpointHistory>,
    total_supply: CheckpointHistory,
    /// Newest time index any write was stamped with.
    last_write: TimeIndex,
}

impl VotingToken {
    pub fn new(address: Address, name: &str, symbol: &str, governor: Address) -> Self {
        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            governor,
            balances: BTreeMap::new(),
            delegates: BTreeMap::new(),
            checkpoints: BTreeMap::new(),
            total_supply: CheckpointHistory::new(),
            last_write: TimeIndex::ZERO,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn governor(&self) -> Address {
        self.governor
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply.latest()
    }

    /// Current delegatee of `account`, if any.
    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.delegates.get(account).copied()
    }

    /// Current voting power held by `account` as a delegatee.
    pub fn get_votes(&self, account: &Address) -> u128 {
        self.checkpoints
            .get(account)
            .map(CheckpointHistory::latest)
            .unwrap_or(0)
    }

    /// Voting power of `account` at `at`. `at` must be strictly before `now`.
    pub fn get_past_votes(
        &self,
        account: &Address,
        at: TimeIndex,
        now: TimeIndex,
    ) -> Result<u128, TokenError> {
        Self::check_past(at, now)?;
        Ok(self
            .checkpoints
            .get(account)
            .map(|h| h.upper_lookup(at))
            .unwrap_or(0))
    }

    /// Total supply at `at`. `at` must be strictly before `now`.
    pub fn get_past_total_supply(&self, at: TimeIndex, now: TimeIndex) -> Result<u128, TokenError> {
        Self::check_past(at, now)?;
        Ok(self.total_supply.upper_lookup(at))
    }

    pub fn num_checkpoints(&self, account: &Address) -> usize {
        self.checkpoints.get(account).map_or(0, CheckpointHistory::len)
    }

    pub fn checkpoint_at(&self, account: &Address, pos: usize) -> Option<Checkpoint> {
        self.checkpoints.get(account)?.get(pos).copied()
    }

    /// Hand the governor capability to `new_governor`. Only the current holder may do this.
    pub fn set_governor(&mut self, caller: &Address, new_governor: Address) -> Result<(), TokenError> {
        self.check_governor(caller)?;
        info!(old = %self.governor, new = %new_governor, "token governor changed");
        self.governor = new_governor;
        Ok(())
    }

    /// Create `amount` new tokens for `to`. Restricted to the governor capability.
    pub fn mint(
        &mut self,
        caller: &Address,
        to: Address,
        amount: u128,
        now: TimeIndex,
    ) -> Result<(), TokenError> {
        self.check_governor(caller)?;
        if to.is_anyone() {
            return Err(TokenError::ZeroAddress);
        }
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        self.check_clock(now)?;
        let new_supply = self
            .total_supply
            .latest()
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let new_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.balances.insert(to, new_balance);
        self.total_supply.push(now, new_supply);
        self.move_voting_power(None, self.delegates(&to), amount, now);
        self.last_write = now;
        info!(to = %to, amount, total_supply = new_supply, at = %now, "minted");
        Ok(())
    }

    /// Move `amount` from `from` to `to`, carrying voting power between their delegatees.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: Address,
        amount: u128,
        now: TimeIndex,
    ) -> Result<(), TokenError> {
        if to.is_anyone() {
            return Err(TokenError::ZeroAddress);
        }
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        self.check_clock(now)?;
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if *from != to {
            let credited = self
                .balance_of(&to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            self.balances.insert(*from, available - amount);
            self.balances.insert(to, credited);
        }
        self.move_voting_power(self.delegates(from), self.delegates(&to), amount, now);
        self.last_write = now;
        debug!(from = %from, to = %to, amount, at = %now, "transferred");
        Ok(())
    }

    /// Point `delegator`'s balance at `delegatee`. Delegating to
    /// [`Address::ANYONE`] clears the delegation. Re-delegating to the current
    /// delegatee re-checkpoints it without changing its power.
    pub fn delegate(
        &mut self,
        delegator: &Address,
        delegatee: Address,
        now: TimeIndex,
    ) -> Result<(), TokenError> {
        self.check_clock(now)?;
        let old = self.delegates(delegator);
        let new = if delegatee.is_anyone() {
            None
        } else {
            Some(delegatee)
        };
        match new {
            Some(d) => {
                self.delegates.insert(*delegator, d);
            }
            None => {
                self.delegates.remove(delegator);
            }
        }
        let weight = self.balance_of(delegator);
        if old == new {
            if let Some(d) = new {
                let current = self.get_votes(&d);
                self.checkpoints.entry(d).or_default().push(now, current);
            }
        } else {
            self.move_voting_power(old, new, weight, now);
        }
        self.last_write = now;
        info!(
            delegator = %delegator,
            from = ?old,
            to = ?new,
            weight,
            at = %now,
            "delegate changed"
        );
        Ok(())
    }

    /// Shift `amount` of voting power between delegatees and checkpoint both.
    ///
    /// Balances already bound every delegatee's power, so the arithmetic here
    /// cannot leave the `[0, total_supply]` range.
    fn move_voting_power(
        &mut self,
        from: Option<Address>,
        to: Option<Address>,
        amount: u128,
        now: TimeIndex,
    ) {
        if from == to || amount == 0 {
            return;
        }
        if let Some(src) = from {
            let history = self.checkpoints.entry(src).or_default();
            let votes = history.latest().saturating_sub(amount);
            history.push(now, votes);
            debug!(delegatee = %src, votes, at = %now, "checkpoint written");
        }
        if let Some(dst) = to {
            let history = self.checkpoints.entry(dst).or_default();
            let votes = history.latest().saturating_add(amount);
            history.push(now, votes);
            debug!(delegatee = %dst, votes, at = %now, "checkpoint written");
        }
    }

    fn check_governor(&self, caller: &Address) -> Result<(), TokenError> {
        if *caller != self.governor {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn check_clock(&self, now: TimeIndex) -> Result<(), TokenError> {
        if now < self.last_write {
            return Err(TokenError::TimeRegression {
                last: self.last_write,
                now,
            });
        }
        Ok(())
    }

    fn check_past(at: TimeIndex, now: TimeIndex) -> Result<(), TokenError> {
        if at >= now {
            return Err(TokenError::InvalidTimeIndex { requested: at, now });
        }
        Ok(())
    }
}
