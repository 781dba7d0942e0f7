use soroban_sdk::{contracttype, symbol_short, Address, Bytes, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub stake_token: Address,
    pub reward_token: Address,
    pub native_token: Address,
}

/// Payload of both `STAKED` and `UNSTAKED`. `total` is the account's stake
/// after the call.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeChangedEvent {
    pub account: Address,
    pub amount: i128,
    pub total: i128,
    pub data: Bytes,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardDistributedEvent {
    pub funder: Address,
    pub amount: i128,
    pub bond_value: i128,
    pub to_distribute: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardWithdrawnEvent {
    pub account: Address,
    pub amount: i128,
}

pub fn publish_initialized(
    env: &Env,
    stake_token: Address,
    reward_token: Address,
    native_token: Address,
) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        stake_token,
        reward_token,
        native_token,
    };
    env.events().publish(topics, data);
}

pub fn publish_staked(env: &Env, account: Address, amount: i128, total: i128, data: Bytes) {
    let topics = (symbol_short!("STAKED"), account.clone());
    let data = StakeChangedEvent {
        account,
        amount,
        total,
        data,
    };
    env.events().publish(topics, data);
}

pub fn publish_unstaked(env: &Env, account: Address, amount: i128, total: i128, data: Bytes) {
    let topics = (symbol_short!("UNSTAKED"), account.clone());
    let data = StakeChangedEvent {
        account,
        amount,
        total,
        data,
    };
    env.events().publish(topics, data);
}

pub fn publish_native_reward_distributed(
    env: &Env,
    funder: Address,
    amount: i128,
    bond_value: i128,
    to_distribute: i128,
) {
    let topics = (symbol_short!("DIST_NAT"), funder.clone());
    let data = RewardDistributedEvent {
        funder,
        amount,
        bond_value,
        to_distribute,
    };
    env.events().publish(topics, data);
}

pub fn publish_token_reward_distributed(
    env: &Env,
    funder: Address,
    amount: i128,
    bond_value: i128,
    to_distribute: i128,
) {
    let topics = (symbol_short!("DIST_TOK"), funder.clone());
    let data = RewardDistributedEvent {
        funder,
        amount,
        bond_value,
        to_distribute,
    };
    env.events().publish(topics, data);
}

pub fn publish_reward_withdrawn(env: &Env, account: Address, amount: i128) {
    let topics = (symbol_short!("WITHDRAW"), account.clone());
    let data = RewardWithdrawnEvent { account, amount };
    env.events().publish(topics, data);
}
