//! Collaborator interfaces shared by the gamm and tx-fees pallets.

extern crate alloc;

use crate::{
  assets::{AssetKind, Coin, SwapAmountInRoute, SwapAmountOutRoute},
  ecosystem::{Balance, PoolId},
};
use alloc::vec::Vec;
use core::marker::PhantomData;
use polkadot_sdk::sp_runtime::{DispatchError, DispatchResult, FixedU128, Permill};

/// Pool manager routing interface.
///
/// Implementations must leave no partial state behind when they return an error
/// from a routing call, or callers must run them inside a storage layer.
pub trait PoolManager<AccountId> {
  /// Swap exactly `token_in` along `routes`, returning the amount of the last hop's asset.
  fn route_exact_amount_in(
    sender: &AccountId,
    routes: &[SwapAmountInRoute],
    token_in: Coin,
    token_out_min_amount: Balance,
  ) -> Result<Balance, DispatchError>;

  /// Buy exactly `token_out` along `routes`, returning the amount of the first hop's asset paid.
  fn route_exact_amount_out(
    sender: &AccountId,
    routes: &[SwapAmountOutRoute],
    token_in_max_amount: Balance,
    token_out: Coin,
  ) -> Result<Balance, DispatchError>;

  /// Input amount `route_exact_amount_out` would charge, without touching state.
  fn estimate_exact_amount_out(
    routes: &[SwapAmountOutRoute],
    token_out: Coin,
  ) -> Result<Balance, DispatchError>;

  /// Assets held by the pool, `None` if the pool does not exist.
  fn pool_assets(pool_id: PoolId) -> Option<Vec<AssetKind>>;

  /// Units of `quote_asset` paid for one unit of `asset` in the pool.
  fn spot_price(
    pool_id: PoolId,
    asset: AssetKind,
    quote_asset: AssetKind,
  ) -> Result<FixedU128, DispatchError>;

  /// Swap fee rate charged by the pool itself.
  fn swap_fee(pool_id: PoolId) -> Option<Permill>;
}

/// Taker-fee settlement as seen by the swap entry points.
pub trait FeeSettlement<AccountId> {
  /// Move `fee` from `payer` to the fee collection account, then settle it.
  fn charge_fees_from_payer(
    payer: &AccountId,
    fee: Coin,
    beneficiary: Option<&AccountId>,
  ) -> DispatchResult;

  /// Settle `fee` already resident in the fee collection account.
  fn charge_fees(
    fee: Coin,
    beneficiary: Option<&AccountId>,
    payer: Option<&AccountId>,
  ) -> DispatchResult;

  /// Whether `asset` is the base asset or a registered fee token.
  fn is_fee_asset(asset: &AssetKind) -> bool;
}

/// Destination for fees that cannot be converted to the base asset.
pub trait CommunityPool<AccountId> {
  fn fund_community_pool(source: &AccountId, coin: Coin) -> DispatchResult;
}

/// Rollapp ownership lookup.
pub trait RollappOwnerOracle<AccountId> {
  /// Owner of the rollapp that issued `denom`, `None` for non-rollapp assets.
  fn rollapp_owner_by_denom(denom: &AssetKind) -> Option<AccountId>;
}

/// Optional rollapp ownership capability.
///
/// Deployments without rollapps configure `()`; the others wrap their oracle in [`Deployed`].
pub trait MaybeRollappOwners<AccountId> {
  fn oracle() -> Option<fn(&AssetKind) -> Option<AccountId>>;
}

impl<AccountId> MaybeRollappOwners<AccountId> for () {
  fn oracle() -> Option<fn(&AssetKind) -> Option<AccountId>> {
    None
  }
}

/// Marks a [`RollappOwnerOracle`] as deployed.
pub struct Deployed<O>(PhantomData<O>);

impl<AccountId, O: RollappOwnerOracle<AccountId>> MaybeRollappOwners<AccountId> for Deployed<O> {
  fn oracle() -> Option<fn(&AssetKind) -> Option<AccountId>> {
    Some(O::rollapp_owner_by_denom as fn(&AssetKind) -> Option<AccountId>)
  }
}
