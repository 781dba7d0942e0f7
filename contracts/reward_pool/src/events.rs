use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

/// Published on commit whenever a pool's aggregate stake moved.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TotalStakeChangedEvent {
    pub total: i128,
    pub timestamp: u64,
}

pub fn publish_total_stake_changed(env: &Env, pool: Symbol, total: i128) {
    let topics = (symbol_short!("TOT_STK"), pool);
    let data = TotalStakeChangedEvent {
        total,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
