//! In-memory pool router for mock runtimes.
//!
//! Pools live in unhashed storage so that storage layers roll them back together with
//! balances. Swaps burn the input from the sender and mint the output to it.

use crate::Config;
use alloc::{collections::BTreeMap, vec::Vec};
use codec::{Decode, Encode};
use core::marker::PhantomData;
use frame::deps::{
  frame_support::{
    storage::unhashed,
    traits::{
      fungible::Mutate as NativeMutate,
      fungibles::Mutate as FungiblesMutate,
      tokens::{Fortitude, Precision, Preservation},
    },
  },
  sp_runtime::{
    DispatchError, DispatchResult, FixedPointNumber, FixedU128, PerThing, Permill, traits::One,
  },
};
use primitives::{
  AssetKind, Balance, Coin, PoolId, SwapAmountInRoute, SwapAmountOutRoute, traits::PoolManager,
};
use std::cell::RefCell;

/// Failure injected into the mock router
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouterFailure {
  /// Reject the swap before touching balances
  Reject,
  /// Take the input, then fail
  FailAfterDebit,
  /// Take the input and return nothing
  ZeroOutput,
}

thread_local! {
    pub static ROUTER_FAILURE: RefCell<Option<RouterFailure>> = const { RefCell::new(None) };
}

pub fn set_router_failure(failure: Option<RouterFailure>) {
  ROUTER_FAILURE.with(|f| *f.borrow_mut() = failure);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode)]
pub enum Curve {
  /// x + y = k, trades 1:1 minus the swap fee until the output reserve is exhausted
  ConstantSum,
  /// x * y = k
  ConstantProduct,
}

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct MockPool {
  pub assets: [AssetKind; 2],
  pub reserves: [Balance; 2],
  pub curve: Curve,
  pub swap_fee: Permill,
}

impl MockPool {
  fn sides(&self, asset_in: AssetKind, asset_out: AssetKind) -> Result<(usize, usize), DispatchError> {
    let position = |asset: AssetKind| {
      self
        .assets
        .iter()
        .position(|a| *a == asset)
        .ok_or(DispatchError::Other("asset not in pool"))
    };
    let (i, o) = (position(asset_in)?, position(asset_out)?);
    if i == o {
      return Err(DispatchError::Other("identical assets"));
    }
    Ok((i, o))
  }

  fn swap_in(&mut self, asset_in: AssetKind, asset_out: AssetKind, amount_in: Balance) -> Result<Balance, DispatchError> {
    let (i, o) = self.sides(asset_in, asset_out)?;
    let net_in = self.swap_fee.left_from_one().mul_floor(amount_in);
    let amount_out = match self.curve {
      Curve::ConstantSum => net_in,
      Curve::ConstantProduct => {
        if self.reserves[i] == 0 || self.reserves[o] == 0 {
          return Err(DispatchError::Other("empty reserves"));
        }
        net_in.saturating_mul(self.reserves[o]) / self.reserves[i].saturating_add(net_in)
      }
    };
    if amount_out >= self.reserves[o] {
      return Err(DispatchError::Other("insufficient liquidity"));
    }
    self.reserves[i] = self.reserves[i].saturating_add(amount_in);
    self.reserves[o] -= amount_out;
    Ok(amount_out)
  }

  fn swap_out(&mut self, asset_in: AssetKind, asset_out: AssetKind, amount_out: Balance) -> Result<Balance, DispatchError> {
    let (i, o) = self.sides(asset_in, asset_out)?;
    if amount_out >= self.reserves[o] {
      return Err(DispatchError::Other("insufficient liquidity"));
    }
    let net_in = match self.curve {
      Curve::ConstantSum => amount_out,
      Curve::ConstantProduct => self.reserves[i]
        .saturating_mul(amount_out)
        .div_ceil(self.reserves[o] - amount_out),
    };
    let amount_in = self.swap_fee.left_from_one().saturating_reciprocal_mul_ceil(net_in);
    self.reserves[i] = self.reserves[i].saturating_add(amount_in);
    self.reserves[o] -= amount_out;
    Ok(amount_in)
  }
}

const POOLS_KEY: &[u8] = b":mock:pools";

pub fn pools() -> BTreeMap<PoolId, MockPool> {
  unhashed::get(POOLS_KEY).unwrap_or_default()
}

fn put_pools(pools: &BTreeMap<PoolId, MockPool>) {
  unhashed::put(POOLS_KEY, pools);
}

pub fn pool(pool_id: PoolId) -> Option<MockPool> {
  pools().get(&pool_id).cloned()
}

/// Register a pool seeded with `a` and `b` as reserves, returning its id
pub fn create_pool(a: Coin, b: Coin, curve: Curve) -> PoolId {
  let mut all = pools();
  let pool_id = all.keys().last().map(|id| id + 1).unwrap_or(1);
  all.insert(
    pool_id,
    MockPool {
      assets: [a.asset, b.asset],
      reserves: [a.amount, b.amount],
      curve,
      swap_fee: Permill::zero(),
    },
  );
  put_pools(&all);
  pool_id
}

pub fn set_swap_fee(pool_id: PoolId, swap_fee: Permill) {
  let mut all = pools();
  if let Some(pool) = all.get_mut(&pool_id) {
    pool.swap_fee = swap_fee;
  }
  put_pools(&all);
}

/// Mint `coin` into `who`
pub fn credit<T: Config>(who: &T::AccountId, coin: Coin) -> DispatchResult {
  if coin.is_zero() {
    return Ok(());
  }
  match coin.asset {
    AssetKind::Native => {
      <T::Currency as NativeMutate<T::AccountId>>::mint_into(who, coin.amount)?;
    }
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <T::Assets as FungiblesMutate<T::AccountId>>::mint_into(id, who, coin.amount)?;
    }
  }
  Ok(())
}

fn debit<T: Config>(who: &T::AccountId, coin: Coin) -> DispatchResult {
  match coin.asset {
    AssetKind::Native => {
      <T::Currency as NativeMutate<T::AccountId>>::burn_from(
        who,
        coin.amount,
        Preservation::Expendable,
        Precision::Exact,
        Fortitude::Polite,
      )?;
    }
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <T::Assets as FungiblesMutate<T::AccountId>>::burn_from(
        id,
        who,
        coin.amount,
        Preservation::Expendable,
        Precision::Exact,
        Fortitude::Polite,
      )?;
    }
  }
  Ok(())
}

/// Injected failure for the current swap, if any. Balances are debited first when the
/// failure mode asks for it.
fn injected_failure<T: Config>(sender: &T::AccountId, token_in: Coin) -> Option<Result<Balance, DispatchError>> {
  let failure = ROUTER_FAILURE.with(|f| *f.borrow())?;
  Some(match failure {
    RouterFailure::Reject => Err(DispatchError::Other("router rejected swap")),
    RouterFailure::FailAfterDebit => {
      debit::<T>(sender, token_in).and(Err(DispatchError::Other("pool exploded")))
    }
    RouterFailure::ZeroOutput => debit::<T>(sender, token_in).map(|_| 0),
  })
}

fn quote_exact_out(
  all: &mut BTreeMap<PoolId, MockPool>,
  routes: &[SwapAmountOutRoute],
  token_out: Coin,
) -> Result<Balance, DispatchError> {
  if routes.is_empty() {
    return Err(DispatchError::Other("empty route"));
  }
  let mut amount = token_out.amount;
  for (hop, route) in routes.iter().enumerate().rev() {
    let denom_out = routes.get(hop + 1).map(|r| r.token_in_denom).unwrap_or(token_out.asset);
    let pool = all.get_mut(&route.pool_id).ok_or(DispatchError::Other("pool not found"))?;
    amount = pool.swap_out(route.token_in_denom, denom_out, amount)?;
  }
  Ok(amount)
}

/// Router over the mock pools, moving balances through `T`'s currencies
pub struct MockPoolManager<T>(PhantomData<T>);

impl<T: Config> PoolManager<T::AccountId> for MockPoolManager<T> {
  fn route_exact_amount_in(
    sender: &T::AccountId,
    routes: &[SwapAmountInRoute],
    token_in: Coin,
    token_out_min_amount: Balance,
  ) -> Result<Balance, DispatchError> {
    if let Some(result) = injected_failure::<T>(sender, token_in) {
      return result;
    }
    if routes.is_empty() {
      return Err(DispatchError::Other("empty route"));
    }
    let mut all = pools();
    let mut current = token_in;
    for route in routes {
      let pool = all.get_mut(&route.pool_id).ok_or(DispatchError::Other("pool not found"))?;
      let amount_out = pool.swap_in(current.asset, route.token_out_denom, current.amount)?;
      current = Coin::new(route.token_out_denom, amount_out);
    }
    if current.amount < token_out_min_amount {
      return Err(DispatchError::Other("slippage exceeded"));
    }
    debit::<T>(sender, token_in)?;
    credit::<T>(sender, current)?;
    put_pools(&all);
    Ok(current.amount)
  }

  fn route_exact_amount_out(
    sender: &T::AccountId,
    routes: &[SwapAmountOutRoute],
    token_in_max_amount: Balance,
    token_out: Coin,
  ) -> Result<Balance, DispatchError> {
    let first = routes.first().ok_or(DispatchError::Other("empty route"))?;
    if let Some(result) =
      injected_failure::<T>(sender, Coin::new(first.token_in_denom, token_in_max_amount))
    {
      return result;
    }
    let mut all = pools();
    let amount_in = quote_exact_out(&mut all, routes, token_out)?;
    if amount_in > token_in_max_amount {
      return Err(DispatchError::Other("excessive input"));
    }
    debit::<T>(sender, Coin::new(first.token_in_denom, amount_in))?;
    credit::<T>(sender, token_out)?;
    put_pools(&all);
    Ok(amount_in)
  }

  fn estimate_exact_amount_out(
    routes: &[SwapAmountOutRoute],
    token_out: Coin,
  ) -> Result<Balance, DispatchError> {
    quote_exact_out(&mut pools(), routes, token_out)
  }

  fn pool_assets(pool_id: PoolId) -> Option<Vec<AssetKind>> {
    pool(pool_id).map(|p| p.assets.to_vec())
  }

  fn spot_price(pool_id: PoolId, asset: AssetKind, quote_asset: AssetKind) -> Result<FixedU128, DispatchError> {
    let pool = pool(pool_id).ok_or(DispatchError::Other("pool not found"))?;
    let (i, o) = pool.sides(asset, quote_asset)?;
    match pool.curve {
      Curve::ConstantSum => Ok(FixedU128::one()),
      Curve::ConstantProduct => FixedU128::checked_from_rational(pool.reserves[o], pool.reserves[i])
        .ok_or(DispatchError::Other("empty reserves")),
    }
  }

  fn swap_fee(pool_id: PoolId) -> Option<Permill> {
    pool(pool_id).map(|p| p.swap_fee)
  }
}
