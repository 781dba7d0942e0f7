#![no_std]

//! Dual-currency staking.
//!
//! One stake, two reward streams: every stake and unstake is booked in a
//! native-value reward pool and a reward-token pool at once, while each
//! distribution only feeds the pool of its own asset.

mod assets;
pub mod events;
pub mod pools;

use reward_pool::{PoolError, PoolState};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, Address, Bytes, Env, Symbol,
};

use pools::DualPool;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");

const INSTANCE_TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const INSTANCE_TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAccount = 3,
    InvalidAmount = 4,
    InsufficientStake = 5,
    InsufficientReward = 6,
    AssetTransferFailed = 7,
    Overflow = 8,
}

impl From<PoolError> for ContractError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::NotInitialized => ContractError::NotInitialized,
            PoolError::AlreadyInitialized => ContractError::AlreadyInitialized,
            PoolError::InvalidAccount => ContractError::InvalidAccount,
            PoolError::InvalidAmount => ContractError::InvalidAmount,
            PoolError::InsufficientStake => ContractError::InsufficientStake,
            PoolError::InsufficientReward => ContractError::InsufficientReward,
            PoolError::Overflow => ContractError::Overflow,
        }
    }
}

// ── Types ────────────────────────────────────────────────────────────────────

/// Assets the contract works with, fixed at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token users stake.
    pub stake_token: Address,
    /// Token paid out by the token pool.
    pub reward_token: Address,
    /// Asset contract of the network's native value, paid out by the native
    /// pool.
    pub native_token: Address,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct DualStakingContract;

#[contractimpl]
impl DualStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Record the three assets and open both reward pools.
    pub fn initialize(
        env: Env,
        stake_token: Address,
        reward_token: Address,
        native_token: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        DualPool::create(&env, &reward_token)?.commit();

        let config = Config {
            stake_token: stake_token.clone(),
            reward_token: reward_token.clone(),
            native_token: native_token.clone(),
        };
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&INITIALIZED, &true);
        extend_instance_ttl(&env);

        events::publish_initialized(&env, stake_token, reward_token, native_token);

        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_config(env: Env) -> Result<Config, ContractError> {
        load_config(&env)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Stake `amount` of the stake token from `staker` for `staker`.
    pub fn stake(
        env: Env,
        staker: Address,
        amount: i128,
        data: Bytes,
    ) -> Result<(), ContractError> {
        staker.require_auth();
        stake_into(&env, &staker, &staker, amount, data)
    }

    /// Stake `amount` of the stake token paid by `funder` on behalf of
    /// `account`.
    pub fn stake_for(
        env: Env,
        funder: Address,
        account: Address,
        amount: i128,
        data: Bytes,
    ) -> Result<(), ContractError> {
        funder.require_auth();
        stake_into(&env, &funder, &account, amount, data)
    }

    /// Return `amount` of stake to `staker`. Rewards already earned stay in
    /// both pools until withdrawn.
    pub fn unstake(
        env: Env,
        staker: Address,
        amount: i128,
        data: Bytes,
    ) -> Result<(), ContractError> {
        staker.require_auth();
        let config = load_config(&env)?;

        let mut pools = DualPool::load(&env)?;
        let total = pools.unstake_from(&staker, amount)?;
        assets::push(&env, &config.stake_token, &staker, amount)?;
        pools.commit();
        extend_instance_ttl(&env);

        events::publish_unstaked(&env, staker, amount, total, data);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay `amount` of native value and `amount` of reward token to
    /// `staker`. Fails without paying anything unless both pools owe at
    /// least `amount`.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        let config = load_config(&env)?;

        let mut pools = DualPool::load(&env)?;
        pools.withdraw_from(&staker, amount)?;
        assets::push(&env, &config.native_token, &staker, amount)?;
        assets::push(&env, &config.reward_token, &staker, amount)?;
        pools.commit();
        extend_instance_ttl(&env);

        events::publish_reward_withdrawn(&env, staker, amount);

        Ok(())
    }

    /// Distribute `amount` of reward token from `funder` to the token pool.
    pub fn distribute(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        funder.require_auth();
        let config = load_config(&env)?;

        let mut pool = pools::load_token(&env)?;
        pool.distribute(amount, &funder)?;
        assets::pull(&env, &config.reward_token, &funder, amount)?;
        let (bond_value, to_distribute) = (pool.bond_value(), pool.to_distribute());
        pool.commit();
        extend_instance_ttl(&env);

        events::publish_token_reward_distributed(&env, funder, amount, bond_value, to_distribute);

        Ok(())
    }

    /// Distribute `amount` of native value from `funder` to the native pool.
    pub fn distribute_native(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        funder.require_auth();
        let config = load_config(&env)?;

        let mut pool = pools::load_native(&env)?;
        pool.distribute(amount, &funder)?;
        assets::pull(&env, &config.native_token, &funder, amount)?;
        let (bond_value, to_distribute) = (pool.bond_value(), pool.to_distribute());
        pool.commit();
        extend_instance_ttl(&env);

        events::publish_native_reward_distributed(&env, funder, amount, bond_value, to_distribute);

        Ok(())
    }

    /// Distribute reward token that reached the contract by plain transfer.
    ///
    /// Everything the contract holds in the reward token beyond what is
    /// already accounted for (the token pool's reserve, plus stake custody or
    /// the native pool's reserve when those share the same asset) goes to the
    /// token pool, funded by the contract itself. Returns the amount
    /// forwarded; zero when there is nothing to sweep.
    pub fn forward(env: Env) -> Result<i128, ContractError> {
        let config = load_config(&env)?;
        let mut pools = DualPool::load(&env)?;

        let mut accounted = pools.token.reward_reserve();
        if config.reward_token == config.stake_token {
            accounted = accounted
                .checked_add(pools.total_staked())
                .ok_or(ContractError::Overflow)?;
        }
        if config.reward_token == config.native_token {
            accounted = accounted
                .checked_add(pools.native.reward_reserve())
                .ok_or(ContractError::Overflow)?;
        }

        let surplus = assets::held(&env, &config.reward_token)
            .checked_sub(accounted)
            .ok_or(ContractError::Overflow)?;
        if surplus <= 0 {
            return Ok(0);
        }

        let here = env.current_contract_address();
        pools.token.distribute(surplus, &here)?;
        let (bond_value, to_distribute) = (pools.token.bond_value(), pools.token.to_distribute());
        pools.token.commit();
        extend_instance_ttl(&env);

        log!(&env, "forwarded stray reward", surplus);
        events::publish_token_reward_distributed(&env, here, surplus, bond_value, to_distribute);

        Ok(surplus)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn total_staked_for(env: Env, account: Address) -> Result<i128, ContractError> {
        Ok(pools::load_native(&env)?.total_staked_for(&account))
    }

    pub fn total_staked(env: Env) -> Result<i128, ContractError> {
        Ok(pools::load_native(&env)?.total_staked())
    }

    /// Reward held in custody as `(token_reward, native_reward)`.
    pub fn total_reward(env: Env) -> Result<(i128, i128), ContractError> {
        let pools = DualPool::load(&env)?;
        Ok((pools.token.reward_reserve(), pools.native.reward_reserve()))
    }

    /// Reward owed to `account` as `(native_reward, token_reward)`.
    pub fn get_reward(env: Env, account: Address) -> Result<(i128, i128), ContractError> {
        let pools = DualPool::load(&env)?;
        Ok((
            pools.native.get_reward(&account)?,
            pools.token.get_reward(&account)?,
        ))
    }

    pub fn investor_count(env: Env) -> Result<u32, ContractError> {
        Ok(pools::load_native(&env)?.investor_count())
    }

    pub fn native_pool(env: Env) -> Result<PoolState, ContractError> {
        Ok(pools::load_native(&env)?.state().clone())
    }

    pub fn token_pool(env: Env) -> Result<PoolState, ContractError> {
        Ok(pools::load_token(&env)?.state().clone())
    }

    /// The staked asset.
    pub fn token(env: Env) -> Result<Address, ContractError> {
        Ok(load_config(&env)?.stake_token)
    }

    /// Stake history is not kept.
    pub fn supports_history() -> bool {
        false
    }

    pub fn version() -> u32 {
        1
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────────

/// Book `amount` for `account` in both pools, then pull it from `funder`.
/// Nothing is committed unless both steps succeed.
fn stake_into(
    env: &Env,
    funder: &Address,
    account: &Address,
    amount: i128,
    data: Bytes,
) -> Result<(), ContractError> {
    let config = load_config(env)?;

    let mut pools = DualPool::load(env)?;
    let total = pools.stake_for(account, amount)?;
    assets::pull(env, &config.stake_token, funder, amount)?;
    pools.commit();
    extend_instance_ttl(env);

    events::publish_staked(env, account.clone(), amount, total, data);

    Ok(())
}

fn load_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
