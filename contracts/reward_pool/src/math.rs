use crate::PoolError;

/// Fixed-point scaling factor.
///
/// One whole unit of a 9-decimal stake asset. `bond_value` grows by
/// `reward / (total_staked / PRECISION)` per distribution, so an account
/// holding `amount` earns `amount * Δbond / PRECISION`.
pub const PRECISION: i128 = 1_000_000_000;

/// Starting accumulator value of every pool.
///
/// Non-zero so that the first snapshots taken by accounts are never the
/// zero default of an absent storage key.
pub const INITIAL_BOND_VALUE: i128 = 1_000_000;

// ── Core accumulator arithmetic ─────────────────────────────────────────────

/// Outcome of folding a reward pool into the accumulator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fold {
    /// Amount added to `bond_value`.
    pub increase: i128,
    /// Amount carried forward as the new `to_distribute`.
    pub remainder: i128,
}

/// Number of whole precision units in `total_staked`.
pub fn stake_units(total_staked: i128) -> i128 {
    total_staked / PRECISION
}

/// Split `pool` over the current stake.
///
/// ```text
/// unit      = total_staked / PRECISION
/// increase  = pool / unit
/// remainder = pool % unit
/// ```
///
/// A zero `unit` (no stake, or less than one whole unit staked) holds the
/// whole pool as remainder and leaves the accumulator untouched.
pub fn fold(pool: i128, total_staked: i128) -> Fold {
    let unit = stake_units(total_staked);
    if unit <= 0 {
        return Fold {
            increase: 0,
            remainder: pool,
        };
    }

    Fold {
        increase: pool / unit,
        remainder: pool % unit,
    }
}

/// Reward accrued by `amount` since the snapshot `reward_debt`.
///
/// ```text
/// accrued = amount × (bond_value − reward_debt) / PRECISION
/// ```
pub fn accrued(amount: i128, bond_value: i128, reward_debt: i128) -> Result<i128, PoolError> {
    let delta = bond_value
        .checked_sub(reward_debt)
        .ok_or(PoolError::Overflow)?;

    amount
        .checked_mul(delta)
        .map(|scaled| scaled / PRECISION)
        .ok_or(PoolError::Overflow)
}

/// Total reward owed: the settled balance plus everything accrued since the
/// last snapshot.
pub fn earned(
    amount: i128,
    bond_value: i128,
    reward_debt: i128,
    stored_reward: i128,
) -> Result<i128, PoolError> {
    stored_reward
        .checked_add(accrued(amount, bond_value, reward_debt)?)
        .ok_or(PoolError::Overflow)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure arithmetic, no Soroban environment needed.
