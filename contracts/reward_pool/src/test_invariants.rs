//! Property tests for the ledger invariants.
//!
//! Random sequences of stake / unstake / distribute / withdraw / commit are
//! replayed against one pool, checking after every step that
//! - `total_staked` equals the sum of all entries,
//! - `investor_count` equals the number of entries with stake,
//! - `bond_value` never decreases,
//! - a fold over a non-zero unit leaves less than one unit as remainder,
//! - a rejected operation leaves the pool untouched.

#![cfg(test)]

extern crate std;

use proptest::prelude::*;
use soroban_sdk::{contract, contractimpl, symbol_short, testutils::Address as _, Address, Env};
use std::vec::Vec;

use crate::*;

const ACCOUNTS: usize = 4;

#[contract]
pub struct InvariantHost;

#[contractimpl]
impl InvariantHost {}

#[derive(Clone, Debug)]
enum Op {
    Stake(usize, i128),
    Unstake(usize, i128),
    Distribute(i128),
    Withdraw(usize, i128),
    Commit,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS, 1i128..500 * PRECISION).prop_map(|(i, a)| Op::Stake(i, a)),
        (0..ACCOUNTS, 1i128..500 * PRECISION).prop_map(|(i, a)| Op::Unstake(i, a)),
        (1i128..1_000 * PRECISION).prop_map(Op::Distribute),
        (0..ACCOUNTS, 1i128..1_000 * PRECISION).prop_map(|(i, a)| Op::Withdraw(i, a)),
        Just(Op::Commit),
    ]
}

struct Ledger {
    env: Env,
    pool: Option<RewardPool>,
    accounts: Vec<Address>,
}

impl Ledger {
    fn pool(&mut self) -> &mut RewardPool {
        self.pool.as_mut().unwrap()
    }

    fn check(&self, prev_bond: i128) -> Result<(), TestCaseError> {
        let pool = self.pool.as_ref().unwrap();
        let mut sum = 0i128;
        let mut holders = 0u32;
        for account in self.accounts.iter() {
            let amount = pool.total_staked_for(account);
            prop_assert!(amount >= 0);
            sum += amount;
            if amount > 0 {
                holders += 1;
            }
        }
        prop_assert_eq!(sum, pool.total_staked());
        prop_assert_eq!(holders, pool.investor_count());
        prop_assert!(pool.bond_value() >= prev_bond);
        prop_assert!(pool.to_distribute() >= 0);
        prop_assert!(pool.reward_reserve() >= 0);
        Ok(())
    }
}

fn apply(ledger: &mut Ledger, op: &Op) -> Result<(), TestCaseError> {
    let prev_bond = ledger.pool().bond_value();
    let before = ledger.pool().state().clone();

    let result = match *op {
        Op::Stake(i, amount) => {
            let account = ledger.accounts[i].clone();
            let owed = ledger.pool().get_reward(&account);
            let result = ledger.pool().stake_for(&account, amount).map(|_| ());
            if result.is_ok() {
                // Settlement is bookkeeping only: the owed value is unchanged.
                prop_assert_eq!(ledger.pool().get_reward(&account), owed);
            }
            result
        }
        Op::Unstake(i, amount) => {
            let account = ledger.accounts[i].clone();
            ledger.pool().unstake_from(&account, amount).map(|_| ())
        }
        Op::Distribute(amount) => {
            let funder = ledger.accounts[0].clone();
            let units = before.total_staked / PRECISION;
            let result = ledger.pool().distribute(amount, &funder).map(|_| ());
            if result.is_ok() && units > 0 {
                prop_assert!(ledger.pool().to_distribute() < units);
            }
            result
        }
        Op::Withdraw(i, amount) => {
            let account = ledger.accounts[i].clone();
            let to_distribute = before.to_distribute;
            let result = ledger.pool().withdraw_from(&account, amount).map(|_| ());
            prop_assert_eq!(ledger.pool().to_distribute(), to_distribute);
            result
        }
        Op::Commit => {
            let pool = ledger.pool.take().unwrap();
            pool.commit();
            ledger.pool = Some(RewardPool::load(&ledger.env, symbol_short!("POOL")).unwrap());
            prop_assert_eq!(ledger.pool().state(), &before);
            Ok(())
        }
    };

    if result.is_err() {
        prop_assert_eq!(ledger.pool().state(), &before);
    }
    ledger.check(prev_bond)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ledger_invariants_hold(ops in prop::collection::vec(op(), 1..48)) {
        let env = Env::default();
        let host = env.register(InvariantHost, ());

        env.as_contract(&host, || -> Result<(), TestCaseError> {
            let accounts: Vec<Address> = (0..ACCOUNTS).map(|_| Address::generate(&env)).collect();
            let pool =
                RewardPool::create(&env, symbol_short!("POOL"), RewardAsset::Native).unwrap();
            let mut ledger = Ledger { env: env.clone(), pool: Some(pool), accounts };

            for op in ops.iter() {
                apply(&mut ledger, op)?;
            }
            Ok(())
        })?;
    }
}
