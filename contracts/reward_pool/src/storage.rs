use soroban_sdk::{contracttype, Address, Env, Symbol};

use crate::{PoolState, StakeEntry};

const POOL_TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const POOL_TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

/// Persistent storage keys, namespaced by pool id so one contract can host
/// several independent pools.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PoolKey {
    State(Symbol),
    Entry(Symbol, Address),
}

fn extend_pool_ttl(env: &Env, key: &PoolKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, POOL_TTL_THRESHOLD, POOL_TTL_EXTEND_TO);
}

pub fn has_state(env: &Env, id: &Symbol) -> bool {
    env.storage()
        .persistent()
        .has(&PoolKey::State(id.clone()))
}

pub fn read_state(env: &Env, id: &Symbol) -> Option<PoolState> {
    let key = PoolKey::State(id.clone());
    let state = env.storage().persistent().get(&key);
    if state.is_some() {
        extend_pool_ttl(env, &key);
    }
    state
}

pub fn write_state(env: &Env, id: &Symbol, state: &PoolState) {
    let key = PoolKey::State(id.clone());
    env.storage().persistent().set(&key, state);
    extend_pool_ttl(env, &key);
}

/// Read a ledger entry without creating it.
pub fn read_entry(env: &Env, id: &Symbol, account: &Address) -> Option<StakeEntry> {
    let key = PoolKey::Entry(id.clone(), account.clone());
    let entry = env.storage().persistent().get(&key);
    if entry.is_some() {
        extend_pool_ttl(env, &key);
    }
    entry
}

pub fn write_entry(env: &Env, id: &Symbol, account: &Address, entry: &StakeEntry) {
    let key = PoolKey::Entry(id.clone(), account.clone());
    env.storage().persistent().set(&key, entry);
    extend_pool_ttl(env, &key);
}
