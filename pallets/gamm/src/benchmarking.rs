use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::{BoundedVec, traits::Get};
use polkadot_sdk::frame_system::RawOrigin;
use polkadot_sdk::sp_runtime::Permill;
use primitives::{AssetKind, Coin, SwapAmountInRoute, SwapAmountOutRoute};

const RESERVE: u128 = 1_000_000_000_000_000;
const AMOUNT: u128 = 1_000_000_000;

/// Chain of `n` pools from the native asset through `Foreign(0..n)`
fn create_chain<T: Config>(n: u32) -> alloc::vec::Vec<(primitives::PoolId, AssetKind, AssetKind)> {
  let mut hops = alloc::vec::Vec::new();
  let mut previous = AssetKind::Native;
  for id in 0..n {
    let next = AssetKind::Foreign(id);
    let pool_id = T::BenchmarkHelper::create_pool(Coin::new(previous, RESERVE), Coin::new(next, RESERVE))
      .expect("Failed to create pool");
    hops.push((pool_id, previous, next));
    previous = next;
  }
  hops
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn swap_exact_amount_in(n: Linear<1, { T::MaxRouteHops::get() }>) {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, Coin::new(AssetKind::Native, AMOUNT * 2))
      .expect("Failed to fund caller");
    let routes: BoundedVec<SwapAmountInRoute, T::MaxRouteHops> = create_chain::<T>(n)
      .into_iter()
      .map(|(pool_id, _, token_out_denom)| SwapAmountInRoute {
        pool_id,
        token_out_denom,
      })
      .collect::<alloc::vec::Vec<_>>()
      .try_into()
      .expect("Route within bounds");

    #[extrinsic_call]
    swap_exact_amount_in(
      RawOrigin::Signed(caller),
      routes,
      Coin::new(AssetKind::Native, AMOUNT),
      0,
    );
  }

  #[benchmark]
  fn swap_exact_amount_out(n: Linear<1, { T::MaxRouteHops::get() }>) {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, Coin::new(AssetKind::Native, AMOUNT * 4))
      .expect("Failed to fund caller");
    let routes: BoundedVec<SwapAmountOutRoute, T::MaxRouteHops> = create_chain::<T>(n)
      .into_iter()
      .map(|(pool_id, token_in_denom, _)| SwapAmountOutRoute {
        pool_id,
        token_in_denom,
      })
      .collect::<alloc::vec::Vec<_>>()
      .try_into()
      .expect("Route within bounds");
    let token_out = Coin::new(AssetKind::Foreign(n - 1), AMOUNT / 2);

    #[extrinsic_call]
    swap_exact_amount_out(RawOrigin::Signed(caller), routes, AMOUNT * 2, token_out);
  }

  #[benchmark]
  fn set_taker_fee() {
    let new_fee = Permill::from_percent(2);

    #[extrinsic_call]
    set_taker_fee(RawOrigin::Root, new_fee);

    assert_eq!(TakerFee::<T>::get(), new_fee);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
