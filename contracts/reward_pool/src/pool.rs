use soroban_sdk::{log, Address, Env, Map, String, Symbol};

use crate::math::{self, Fold};
use crate::{events, storage, PoolError, PoolState, RewardAsset, StakeEntry};

/// The Stellar account whose public key is all zeroes.
const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

/// One reward pool, loaded into memory.
///
/// Every mutating operation validates first and works on copies of the
/// global state and the touched entry; the aggregate only changes once the
/// whole operation has succeeded. Nothing is written to storage until
/// [`RewardPool::commit`], so dropping an uncommitted pool discards every
/// change made through it.
#[derive(Clone)]
pub struct RewardPool {
    env: Env,
    id: Symbol,
    state: PoolState,
    loaded_total: i128,
    touched: Map<Address, StakeEntry>,
}

impl RewardPool {
    /// Start a new pool under `id`.
    pub fn create(env: &Env, id: Symbol, reward_asset: RewardAsset) -> Result<Self, PoolError> {
        if storage::has_state(env, &id) {
            return Err(PoolError::AlreadyInitialized);
        }

        Ok(Self {
            env: env.clone(),
            id,
            state: PoolState::new(reward_asset),
            loaded_total: 0,
            touched: Map::new(env),
        })
    }

    /// Load the pool stored under `id`.
    pub fn load(env: &Env, id: Symbol) -> Result<Self, PoolError> {
        let state = storage::read_state(env, &id).ok_or(PoolError::NotInitialized)?;

        Ok(Self {
            env: env.clone(),
            id,
            loaded_total: state.total_staked,
            state,
            touched: Map::new(env),
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn id(&self) -> &Symbol {
        &self.id
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn reward_asset(&self) -> &RewardAsset {
        &self.state.reward_asset
    }

    pub fn bond_value(&self) -> i128 {
        self.state.bond_value
    }

    pub fn total_staked(&self) -> i128 {
        self.state.total_staked
    }

    pub fn to_distribute(&self) -> i128 {
        self.state.to_distribute
    }

    pub fn investor_count(&self) -> u32 {
        self.state.investor_count
    }

    pub fn reward_reserve(&self) -> i128 {
        self.state.reward_reserve
    }

    /// The ledger entry of `account`, if it has ever staked.
    pub fn entry(&self, account: &Address) -> Option<StakeEntry> {
        self.touched
            .get(account.clone())
            .or_else(|| storage::read_entry(&self.env, &self.id, account))
    }

    pub fn total_staked_for(&self, account: &Address) -> i128 {
        self.entry(account).map(|entry| entry.amount).unwrap_or(0)
    }

    /// Reward owed to `account` right now: the settled balance plus what a
    /// settlement would add.
    pub fn get_reward(&self, account: &Address) -> Result<i128, PoolError> {
        match self.entry(account) {
            Some(entry) => entry.pending(self.state.bond_value),
            None => Ok(0),
        }
    }

    // ── Stake ───────────────────────────────────────────────────────────────

    /// Add `amount` to the stake of `account`. Returns its new stake.
    ///
    /// The caller is responsible for taking custody of `amount` of the
    /// staked asset.
    pub fn stake_for(&mut self, account: &Address, amount: i128) -> Result<i128, PoolError> {
        self.require_valid_account(account)?;
        require_positive(amount)?;

        let mut entry = self.entry_or_insert(account);
        self.settle(&mut entry)?;

        let mut investor_count = self.state.investor_count;
        if entry.amount == 0 {
            investor_count = investor_count.checked_add(1).ok_or(PoolError::Overflow)?;
        }
        entry.amount = entry
            .amount
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;
        let total_staked = self
            .state
            .total_staked
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;

        self.state.investor_count = investor_count;
        self.state.total_staked = total_staked;
        self.touched.set(account.clone(), entry.clone());

        Ok(entry.amount)
    }

    /// Remove `amount` from the stake of `account`. Returns its remaining
    /// stake.
    ///
    /// The caller is responsible for returning `amount` of the staked asset.
    pub fn unstake_from(&mut self, account: &Address, amount: i128) -> Result<i128, PoolError> {
        self.require_valid_account(account)?;
        require_positive(amount)?;

        let mut entry = self.entry(account).ok_or(PoolError::InsufficientStake)?;
        if entry.amount < amount {
            return Err(PoolError::InsufficientStake);
        }
        self.settle(&mut entry)?;

        entry.amount -= amount;
        let total_staked = self
            .state
            .total_staked
            .checked_sub(amount)
            .ok_or(PoolError::Overflow)?;
        let mut investor_count = self.state.investor_count;
        if entry.amount == 0 {
            investor_count = investor_count.checked_sub(1).ok_or(PoolError::Overflow)?;
        }

        self.state.investor_count = investor_count;
        self.state.total_staked = total_staked;
        self.touched.set(account.clone(), entry.clone());

        Ok(entry.amount)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay `amount` of settled reward out of the entry of `account`. Returns
    /// the settled reward left.
    ///
    /// Fails with `InsufficientReward` when the account is owed less than
    /// `amount`, or when the pool holds less than `amount` in custody. The
    /// caller is responsible for transferring `amount` of the reward asset.
    pub fn withdraw_from(&mut self, account: &Address, amount: i128) -> Result<i128, PoolError> {
        self.require_valid_account(account)?;
        require_positive(amount)?;

        let mut entry = self.entry(account).ok_or(PoolError::InsufficientReward)?;
        self.settle(&mut entry)?;

        if amount > entry.stored_reward || amount > self.state.reward_reserve {
            return Err(PoolError::InsufficientReward);
        }
        entry.stored_reward -= amount;

        self.state.reward_reserve -= amount;
        self.touched.set(account.clone(), entry.clone());

        Ok(entry.stored_reward)
    }

    /// Fold `amount` of fresh reward from `funder` into the accumulator.
    ///
    /// The reward plus the carried remainder is divided by the number of
    /// whole precision units staked; the quotient raises `bond_value` and the
    /// rest is carried to the next distribution. With less than one unit
    /// staked the whole pool is carried.
    ///
    /// The caller is responsible for taking custody of `amount` of the reward
    /// asset.
    pub fn distribute(&mut self, amount: i128, funder: &Address) -> Result<Fold, PoolError> {
        require_positive(amount)?;

        let pool = amount
            .checked_add(self.state.to_distribute)
            .ok_or(PoolError::Overflow)?;
        let reward_reserve = self
            .state
            .reward_reserve
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;

        let fold = math::fold(pool, self.state.total_staked);
        let bond_value = self
            .state
            .bond_value
            .checked_add(fold.increase)
            .ok_or(PoolError::Overflow)?;

        if fold.increase == 0 {
            log!(
                &self.env,
                "reward held as remainder",
                self.id.clone(),
                funder.clone(),
                self.state.total_staked,
                fold.remainder
            );
        }

        self.state.bond_value = bond_value;
        self.state.to_distribute = fold.remainder;
        self.state.reward_reserve = reward_reserve;

        Ok(fold)
    }

    // ── Persistence ─────────────────────────────────────────────────────────

    /// Write the state and every touched entry back to storage.
    ///
    /// Publishes a `TOT_STK` event when the aggregate stake moved since the
    /// pool was loaded.
    pub fn commit(self) {
        storage::write_state(&self.env, &self.id, &self.state);
        for (account, entry) in self.touched.iter() {
            storage::write_entry(&self.env, &self.id, &account, &entry);
        }

        if self.state.total_staked != self.loaded_total {
            events::publish_total_stake_changed(&self.env, self.id, self.state.total_staked);
        }
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    /// Lookup-or-insert on the ledger.
    ///
    /// An account without an entry gets `amount = 0`,
    /// `reward_debt = bond_value`, `stored_reward = 0`. The entry joins the
    /// ledger when the calling operation stores it.
    fn entry_or_insert(&self, account: &Address) -> StakeEntry {
        self.entry(account)
            .unwrap_or_else(|| StakeEntry::fresh(self.state.bond_value))
    }

    fn settle(&self, entry: &mut StakeEntry) -> Result<(), PoolError> {
        let accrued = entry.settle(self.state.bond_value)?;
        if accrued > 0 {
            log!(&self.env, "settled", self.id.clone(), accrued);
        }
        Ok(())
    }

    /// Guard: reject the zero account and the hosting contract itself.
    fn require_valid_account(&self, account: &Address) -> Result<(), PoolError> {
        if *account == zero_account(&self.env) || *account == self.env.current_contract_address() {
            return Err(PoolError::InvalidAccount);
        }
        Ok(())
    }
}

fn require_positive(amount: i128) -> Result<(), PoolError> {
    if amount <= 0 {
        return Err(PoolError::InvalidAmount);
    }
    Ok(())
}

/// The all-zero Stellar account, never a valid staker.
pub fn zero_account(env: &Env) -> Address {
    Address::from_string(&String::from_str(env, ZERO_ACCOUNT))
}
