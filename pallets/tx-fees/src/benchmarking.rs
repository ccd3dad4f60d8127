extern crate alloc;

use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::Get;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{AssetKind, Coin};

const RESERVE: u128 = 1_000_000_000_000;
const FEE: u128 = 1_000_000_000;

fn fee_token_pool<T: Config>(denom: AssetKind) -> primitives::PoolId {
  T::BenchmarkHelper::create_pool(
    Coin::new(denom, RESERVE),
    Coin::new(Pallet::<T>::base_denom(), RESERVE),
  )
  .expect("Failed to create pool")
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn set_base_denom(n: Linear<0, { T::MaxFeeTokens::get() }>) {
    for id in 0..n {
      let denom = AssetKind::Foreign(id);
      let pool_id = fee_token_pool::<T>(denom);
      FeeTokens::<T>::insert(denom, pool_id);
    }
    let new_denom = AssetKind::Local(u32::MAX);

    #[extrinsic_call]
    set_base_denom(RawOrigin::Root, new_denom);

    assert_eq!(BaseDenom::<T>::get(), new_denom);
    assert_eq!(FeeTokens::<T>::count(), 0);
  }

  #[benchmark]
  fn set_fee_token() {
    let denom = AssetKind::Local(1);
    let pool_id = fee_token_pool::<T>(denom);

    #[extrinsic_call]
    set_fee_token(RawOrigin::Root, denom, pool_id);

    assert_eq!(FeeTokens::<T>::get(denom), Some(pool_id));
  }

  #[benchmark]
  fn remove_fee_token() {
    let denom = AssetKind::Local(1);
    let pool_id = fee_token_pool::<T>(denom);
    FeeTokens::<T>::insert(denom, pool_id);

    #[extrinsic_call]
    remove_fee_token(RawOrigin::Root, denom);

    assert!(!FeeTokens::<T>::contains_key(denom));
  }

  #[benchmark]
  fn sweep_fee_token() {
    let account = Pallet::<T>::account_id();
    let denom = AssetKind::Local(1);
    let pool_id = fee_token_pool::<T>(denom);
    FeeTokens::<T>::insert(denom, pool_id);
    T::BenchmarkHelper::ensure_funded(&account, Coin::new(denom, FEE))
      .expect("Failed to fund fee account");
    let registry = FeeTokenRegistry::<T>::snapshot();
    let conversion;

    #[block]
    {
      conversion = Pallet::<T>::convert_to_base(&registry, Coin::new(denom, FEE));
    }

    assert!(matches!(conversion, FeeConversion::Converted(_)));
  }

  #[benchmark]
  fn burn_residual() {
    let account = Pallet::<T>::account_id();
    let base = Coin::new(Pallet::<T>::base_denom(), FEE);
    T::BenchmarkHelper::ensure_funded(&account, base).expect("Failed to fund fee account");

    #[block]
    {
      Pallet::<T>::burn_coin(&account, base).expect("Failed to burn");
    }

    assert_eq!(Pallet::<T>::balance_of(&account, base.asset), 0);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
