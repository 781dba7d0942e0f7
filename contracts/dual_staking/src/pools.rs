use reward_pool::{PoolError, RewardAsset, RewardPool};
use soroban_sdk::{symbol_short, Address, Env, Symbol};

/// Storage namespace of the pool paying native value.
pub const NATIVE_POOL: Symbol = symbol_short!("NATIVE");
/// Storage namespace of the pool paying the reward token.
pub const TOKEN_POOL: Symbol = symbol_short!("TOKEN");

/// The contract's two reward pools, loaded together so that stake moves in
/// both or in neither.
///
/// Changes stay in memory until [`DualPool::commit`]. Dropping a `DualPool`
/// after an error therefore discards everything done through it.
pub struct DualPool {
    pub native: RewardPool,
    pub token: RewardPool,
}

impl DualPool {
    pub fn create(env: &Env, reward_token: &Address) -> Result<Self, PoolError> {
        Ok(Self {
            native: RewardPool::create(env, NATIVE_POOL, RewardAsset::Native)?,
            token: RewardPool::create(
                env,
                TOKEN_POOL,
                RewardAsset::Token(reward_token.clone()),
            )?,
        })
    }

    pub fn load(env: &Env) -> Result<Self, PoolError> {
        Ok(Self {
            native: load_native(env)?,
            token: load_token(env)?,
        })
    }

    /// Stake held by `account`. Identical in both pools.
    pub fn total_staked_for(&self, account: &Address) -> i128 {
        self.native.total_staked_for(account)
    }

    /// Aggregate stake. Identical in both pools.
    pub fn total_staked(&self) -> i128 {
        self.native.total_staked()
    }

    pub fn stake_for(&mut self, account: &Address, amount: i128) -> Result<i128, PoolError> {
        self.lockstep(|pool| pool.stake_for(account, amount))
    }

    pub fn unstake_from(&mut self, account: &Address, amount: i128) -> Result<i128, PoolError> {
        self.lockstep(|pool| pool.unstake_from(account, amount))
    }

    /// Take `amount` of settled reward out of both pools. Returns the settled
    /// reward left in the native pool and in the token pool.
    pub fn withdraw_from(
        &mut self,
        account: &Address,
        amount: i128,
    ) -> Result<(i128, i128), PoolError> {
        let native_before = self.native.clone();
        let native = self.native.withdraw_from(account, amount)?;
        match self.token.withdraw_from(account, amount) {
            Ok(token) => Ok((native, token)),
            Err(err) => {
                self.native = native_before;
                Err(err)
            }
        }
    }

    pub fn commit(self) {
        self.native.commit();
        self.token.commit();
    }

    /// Apply `op` to the native pool, then to the token pool. If the second
    /// call fails the native pool is put back as it was before the first, so
    /// the error leaves both pools untouched.
    fn lockstep<F>(&mut self, op: F) -> Result<i128, PoolError>
    where
        F: Fn(&mut RewardPool) -> Result<i128, PoolError>,
    {
        let native_before = self.native.clone();
        let native = op(&mut self.native)?;
        match op(&mut self.token) {
            Ok(token) => {
                debug_assert_eq!(native, token);
                Ok(native)
            }
            Err(err) => {
                self.native = native_before;
                Err(err)
            }
        }
    }
}

pub fn load_native(env: &Env) -> Result<RewardPool, PoolError> {
    RewardPool::load(env, NATIVE_POOL)
}

pub fn load_token(env: &Env) -> Result<RewardPool, PoolError> {
    RewardPool::load(env, TOKEN_POOL)
}
