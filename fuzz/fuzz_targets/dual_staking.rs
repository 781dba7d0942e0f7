#![no_main]

use arbitrary::Arbitrary;
use dual_staking::{DualStakingContract, DualStakingContractClient};
use libfuzzer_sys::fuzz_target;
use reward_pool::PRECISION;
use soroban_sdk::{testutils::Address as _, token, Address, Bytes, Env};

const ACCOUNTS: usize = 3;

#[derive(Arbitrary, Debug)]
enum Op {
    Stake { account: u8, amount: u32 },
    StakeFor { payer: u8, account: u8, amount: u32 },
    Unstake { account: u8, amount: u32 },
    Distribute { amount: u32 },
    DistributeNative { amount: u32 },
    Withdraw { account: u8, amount: u32 },
    Stray { amount: u32 },
    Forward,
}

#[derive(Arbitrary, Debug)]
struct Input {
    ops: Vec<Op>,
}

/// Amounts are drawn in thousandths of a unit so both sub-unit and
/// multi-unit stakes show up.
fn scaled(amount: u32) -> i128 {
    amount as i128 * (PRECISION / 1_000)
}

fuzz_target!(|input: Input| {
    let env = Env::default();
    env.mock_all_auths();

    let issuer = Address::generate(&env);
    let stake = env.register_stellar_asset_contract_v2(issuer.clone()).address();
    let reward = env.register_stellar_asset_contract_v2(issuer.clone()).address();
    let native = env.register_stellar_asset_contract_v2(issuer).address();

    let contract_id = env.register(DualStakingContract, ());
    let client = DualStakingContractClient::new(&env, &contract_id);
    client.initialize(&stake, &reward, &native);

    let accounts: Vec<Address> = (0..ACCOUNTS).map(|_| Address::generate(&env)).collect();
    let funder = Address::generate(&env);
    let stake_sac = token::StellarAssetClient::new(&env, &stake);
    let reward_sac = token::StellarAssetClient::new(&env, &reward);
    let native_sac = token::StellarAssetClient::new(&env, &native);
    for account in accounts.iter() {
        stake_sac.mint(account, &(1_000_000 * PRECISION));
    }
    reward_sac.mint(&funder, &(1_000_000 * PRECISION));
    native_sac.mint(&funder, &(1_000_000 * PRECISION));

    let pick = |i: u8| &accounts[i as usize % ACCOUNTS];
    let no_data = Bytes::new(&env);
    let mut bonds = (
        client.native_pool().bond_value,
        client.token_pool().bond_value,
    );

    for op in input.ops.iter().take(64) {
        match *op {
            Op::Stake { account, amount } => {
                let _ = client.try_stake(pick(account), &scaled(amount), &no_data);
            }
            Op::StakeFor { payer, account, amount } => {
                let _ = client.try_stake_for(pick(payer), pick(account), &scaled(amount), &no_data);
            }
            Op::Unstake { account, amount } => {
                let _ = client.try_unstake(pick(account), &scaled(amount), &no_data);
            }
            Op::Distribute { amount } => {
                let _ = client.try_distribute(&funder, &scaled(amount));
            }
            Op::DistributeNative { amount } => {
                let _ = client.try_distribute_native(&funder, &scaled(amount));
            }
            Op::Withdraw { account, amount } => {
                let _ = client.try_withdraw(pick(account), &scaled(amount));
            }
            Op::Stray { amount } => {
                reward_sac.mint(&contract_id, &scaled(amount));
            }
            Op::Forward => {
                let _ = client.try_forward();
            }
        }

        let native_pool = client.native_pool();
        let token_pool = client.token_pool();

        // Both pools always carry the same stake.
        assert_eq!(native_pool.total_staked, token_pool.total_staked);
        assert_eq!(native_pool.investor_count, token_pool.investor_count);

        let mut sum = 0i128;
        let mut holders = 0u32;
        for account in accounts.iter() {
            let staked = client.total_staked_for(account);
            assert!(staked >= 0);
            sum += staked;
            if staked > 0 {
                holders += 1;
            }
        }
        assert_eq!(sum, native_pool.total_staked);
        assert_eq!(holders, native_pool.investor_count);

        // Custody covers every obligation.
        assert_eq!(token::Client::new(&env, &stake).balance(&contract_id), sum);
        assert!(
            token::Client::new(&env, &reward).balance(&contract_id) >= token_pool.reward_reserve
        );
        assert_eq!(
            token::Client::new(&env, &native).balance(&contract_id),
            native_pool.reward_reserve
        );

        assert!(native_pool.bond_value >= bonds.0);
        assert!(token_pool.bond_value >= bonds.1);
        bonds = (native_pool.bond_value, token_pool.bond_value);
    }
});
