//! Proportional reward accumulator.
//!
//! A pool tracks stake per account and a single global accumulator,
//! `bond_value`, holding the cumulative reward earned per precision unit of
//! stake. Distributing a reward bumps the accumulator once; each account
//! settles lazily against it the next time its own record is touched, so
//! every operation is O(1) in the number of stakers.
//!
//! The pool is a library aggregate, not a contract: the hosting contract
//! loads it from its own storage under a pool id, mutates it, moves assets,
//! and finally commits it. Several pools can live side by side in one
//! contract as long as their ids differ.

#![no_std]

pub mod events;
pub mod math;
mod pool;
pub mod storage;

use soroban_sdk::{contracttype, Address};

pub use math::{Fold, INITIAL_BOND_VALUE, PRECISION};
pub use pool::{zero_account, RewardPool};

// ── Errors ───────────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PoolError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAccount = 3,
    InvalidAmount = 4,
    InsufficientStake = 5,
    InsufficientReward = 6,
    Overflow = 7,
}

// ── Types ────────────────────────────────────────────────────────────────────

/// Asset a pool pays its rewards in.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RewardAsset {
    /// The network's native value.
    Native,
    /// A fungible token contract.
    Token(Address),
}

/// Global accumulator state of one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub reward_asset: RewardAsset,
    /// Cumulative reward per precision unit of stake. Never decreases.
    pub bond_value: i128,
    /// Sum of every entry's `amount`.
    pub total_staked: i128,
    /// Reward carried forward because it did not divide into a whole
    /// accumulator step.
    pub to_distribute: i128,
    /// Entries with a non-zero `amount`.
    pub investor_count: u32,
    /// Reward units held in custody: everything distributed minus everything
    /// withdrawn.
    pub reward_reserve: i128,
}

impl PoolState {
    pub fn new(reward_asset: RewardAsset) -> Self {
        Self {
            reward_asset,
            bond_value: INITIAL_BOND_VALUE,
            total_staked: 0,
            to_distribute: 0,
            investor_count: 0,
            reward_reserve: 0,
        }
    }
}

/// Per-account ledger entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeEntry {
    pub amount: i128,
    /// `bond_value` at the last settlement.
    pub reward_debt: i128,
    /// Settled reward not yet withdrawn.
    pub stored_reward: i128,
}

impl StakeEntry {
    /// The value an account's entry has before its first stake.
    pub fn fresh(bond_value: i128) -> Self {
        Self {
            amount: 0,
            reward_debt: bond_value,
            stored_reward: 0,
        }
    }

    /// Fold everything accrued since `reward_debt` into `stored_reward` and
    /// move the snapshot to `bond_value`. Returns the accrued amount.
    ///
    /// Must run before `amount` changes, otherwise the new amount would earn
    /// reward distributed before it was staked.
    pub fn settle(&mut self, bond_value: i128) -> Result<i128, PoolError> {
        let accrued = math::accrued(self.amount, bond_value, self.reward_debt)?;
        self.stored_reward = self
            .stored_reward
            .checked_add(accrued)
            .ok_or(PoolError::Overflow)?;
        self.reward_debt = bond_value;
        Ok(accrued)
    }

    /// Reward owed right now, without settling.
    pub fn pending(&self, bond_value: i128) -> Result<i128, PoolError> {
        math::earned(self.amount, bond_value, self.reward_debt, self.stored_reward)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_invariants;
