use soroban_sdk::{log, token, Address, Env};

use crate::ContractError;

/// Move `amount` of `asset` from `from` into the contract's custody.
pub fn pull(env: &Env, asset: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    transfer(env, asset, from, &env.current_contract_address(), amount)
}

/// Pay `amount` of `asset` out of the contract's custody to `to`.
pub fn push(env: &Env, asset: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
    transfer(env, asset, &env.current_contract_address(), to, amount)
}

/// Balance of `asset` held by the contract.
pub fn held(env: &Env, asset: &Address) -> i128 {
    token::Client::new(env, asset).balance(&env.current_contract_address())
}

/// A refused transfer (missing balance, failed auth inside the token) comes
/// back as `AssetTransferFailed` rather than trapping the whole call.
fn transfer(
    env: &Env,
    asset: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    match token::Client::new(env, asset).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "asset transfer refused", asset.clone(), from.clone(), amount);
            Err(ContractError::AssetTransferFailed)
        }
    }
}
