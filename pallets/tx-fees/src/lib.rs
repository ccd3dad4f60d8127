//! Tx Fees Pallet
//!
//! Settles taker fees. A fee collected in any asset is converted to the base asset
//! through the pool registered for it, half of the converted amount is paid to the
//! rollapp owner (if any) and the rest is burned. Fees that cannot be converted are
//! handed to the configured [`UnswappableFeePolicy`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::*;

#[cfg(test)]
pub mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock_pools;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::tx-fees";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  fn ensure_funded(who: &AccountId, coin: primitives::Coin) -> frame::deps::sp_runtime::DispatchResult;
  /// Create a pool holding both coins as reserves.
  fn create_pool(
    reserve_a: primitives::Coin,
    reserve_b: primitives::Coin,
  ) -> Result<primitives::PoolId, frame::deps::sp_runtime::DispatchError>;
}

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use crate::types::{ExecutionScope, FeeConversion, UnswappableDisposition, UnswappableFeePolicy};
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::traits::{
      fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
      fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
      tokens::{DepositConsequence, Fortitude, Precision, Preservation, Provenance},
    },
    sp_runtime::{
      DispatchError, FixedPointNumber,
      traits::{AccountIdConversion, Zero},
    },
  };
  use frame::prelude::*;
  use primitives::{
    AssetKind, Balance, Coin, FeeToken, PoolId, SwapAmountInRoute,
    traits::{FeeSettlement, PoolManager},
  };

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// The assets pallet for managing local fungible tokens (AssetKind::Local)
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// The currency trait for managing native tokens (AssetKind::Native)
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Router used to convert fee tokens to the base asset
    type PoolManager: PoolManager<Self::AccountId>;

    /// Disposal of fees with no conversion path
    type UnswappableFeePolicy: UnswappableFeePolicy<Self::AccountId>;

    /// The pallet ID for the fee collection account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Base asset used until governance sets another one
    #[pallet::constant]
    type DefaultBaseDenom: Get<AssetKind>;

    /// Whether conversion swaps deposit their own `FeeTokenSwapped` event
    #[pallet::constant]
    type EmitConversionEvents: Get<bool>;

    /// Maximum number of registered fee tokens
    #[pallet::constant]
    type MaxFeeTokens: Get<u32>;

    /// Maximum number of fee tokens visited by one idle sweep
    #[pallet::constant]
    type MaxSweepPerBlock: Get<u32>;

    /// Origin that can perform governance operations
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Asset all fees are converted to before being split and burned
  #[pallet::storage]
  #[pallet::getter(fn base_denom)]
  pub type BaseDenom<T: Config> = StorageValue<_, AssetKind, ValueQuery, T::DefaultBaseDenom>;

  /// Fee token registry: accepted non-base asset -> pool converting it to the base asset
  #[pallet::storage]
  pub type FeeTokens<T: Config> =
    CountedStorageMap<_, Blake2_128Concat, AssetKind, PoolId, OptionQuery>;

  /// Cumulative amount burned per asset
  #[pallet::storage]
  #[pallet::getter(fn total_burned)]
  pub type TotalBurned<T: Config> =
    StorageMap<_, Blake2_128Concat, AssetKind, Balance, ValueQuery>;

  /// Last fee token visited by the idle sweep
  #[pallet::storage]
  pub type SweepCursor<T: Config> = StorageValue<_, AssetKind, OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A taker fee was settled
    FeeCharged {
      payer: Option<T::AccountId>,
      /// Amount burned, or the original coin when it could not be converted
      taker_fee: Coin,
      beneficiary: Option<T::AccountId>,
      beneficiary_revenue: Option<Coin>,
      community_pool: bool,
    },
    /// A fee token was swapped to the base asset
    FeeTokenSwapped {
      pool_id: PoolId,
      token_in: Coin,
      token_out: Coin,
    },
    /// Base asset left in the fee account was burned by the idle sweep
    ResidualFeesBurned { burned: Coin },
    /// Base asset changed, `pruned` fee tokens lost their conversion path
    BaseDenomUpdated {
      old_denom: AssetKind,
      new_denom: AssetKind,
      pruned: u32,
    },
    /// Fee token registered or moved to another pool
    FeeTokenSet { denom: AssetKind, pool_id: PoolId },
    /// Fee token unregistered
    FeeTokenRemoved { denom: AssetKind },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// The base asset cannot be registered as a fee token
    FeeTokenIsBaseDenom,
    /// Pool does not exist
    PoolNotFound,
    /// Pool does not hold both the fee token and the base asset
    PoolAssetsMismatch,
    /// Pool cannot price the fee token in the base asset
    SpotPriceUnavailable,
    /// Asset is not a registered fee token
    FeeTokenNotFound,
    /// Fee token registry is full
    TooManyFeeTokens,
    /// Conversion swap returned nothing
    ZeroConversionOutput,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Change the base asset (governance only).
    ///
    /// Fee tokens whose pool does not hold the new base asset are unregistered, as is
    /// the new base asset itself.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::set_base_denom(T::MaxFeeTokens::get()))]
    pub fn set_base_denom(origin: OriginFor<T>, new_denom: AssetKind) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let old_denom = BaseDenom::<T>::get();
      let stale: Vec<AssetKind> = FeeTokens::<T>::iter()
        .filter(|(denom, pool_id)| {
          *denom == new_denom
            || !T::PoolManager::pool_assets(*pool_id).is_some_and(|assets| assets.contains(&new_denom))
        })
        .map(|(denom, _)| denom)
        .collect();
      for denom in stale.iter() {
        FeeTokens::<T>::remove(denom);
      }
      BaseDenom::<T>::put(new_denom);
      Self::deposit_event(Event::BaseDenomUpdated {
        old_denom,
        new_denom,
        pruned: stale.len() as u32,
      });
      Ok(())
    }

    /// Register `denom` as a fee token converted through `pool_id` (governance only)
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_fee_token())]
    pub fn set_fee_token(origin: OriginFor<T>, denom: AssetKind, pool_id: PoolId) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Self::ensure_conversion_path(denom, pool_id, BaseDenom::<T>::get())?;
      if !FeeTokens::<T>::contains_key(denom) {
        ensure!(
          FeeTokens::<T>::count() < T::MaxFeeTokens::get(),
          Error::<T>::TooManyFeeTokens
        );
      }
      FeeTokens::<T>::insert(denom, pool_id);
      Self::deposit_event(Event::FeeTokenSet { denom, pool_id });
      Ok(())
    }

    /// Unregister a fee token (governance only)
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::remove_fee_token())]
    pub fn remove_fee_token(origin: OriginFor<T>, denom: AssetKind) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        FeeTokens::<T>::contains_key(denom),
        Error::<T>::FeeTokenNotFound
      );
      FeeTokens::<T>::remove(denom);
      Self::deposit_event(Event::FeeTokenRemoved { denom });
      Ok(())
    }
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn on_idle(_n: BlockNumberFor<T>, remaining_weight: Weight) -> Weight {
      let mut consumed = Weight::zero();
      // Phase 1: convert fee tokens held by the fee account, resuming after the last visited one
      let sweep_weight = T::WeightInfo::sweep_fee_token();
      let account = Self::account_id();
      let registry = FeeTokenRegistry::<T>::snapshot();
      let mut entries = match SweepCursor::<T>::get() {
        Some(last) => FeeTokens::<T>::iter_from(FeeTokens::<T>::hashed_key_for(last)),
        None => FeeTokens::<T>::iter(),
      };
      let mut visited = 0u32;
      let mut last_visited = None;
      let mut exhausted = false;
      while visited < T::MaxSweepPerBlock::get()
        && remaining_weight.all_gte(consumed.saturating_add(sweep_weight))
      {
        let Some((denom, _)) = entries.next() else {
          exhausted = true;
          break;
        };
        consumed = consumed.saturating_add(sweep_weight);
        visited += 1;
        last_visited = Some(denom);
        let balance = Self::balance_of(&account, denom);
        if balance.is_zero() {
          continue;
        }
        let _ = Self::convert_to_base(&registry, Coin::new(denom, balance));
      }
      if exhausted {
        SweepCursor::<T>::kill();
      } else if let Some(denom) = last_visited {
        SweepCursor::<T>::put(denom);
      }
      // Phase 2: burn the base asset left on the fee account
      let burn_weight = T::WeightInfo::burn_residual();
      if remaining_weight.all_gte(consumed.saturating_add(burn_weight)) {
        let base = Coin::new(
          registry.base_denom(),
          Self::balance_of(&account, registry.base_denom()),
        );
        if !base.is_zero() {
          match Self::burn_coin(&account, base) {
            Ok(()) => Self::deposit_event(Event::ResidualFeesBurned { burned: base }),
            Err(err) => {
              log::warn!(target: LOG_TARGET, "failed to burn residual fees {}: {:?}", base, err)
            }
          }
        }
        consumed = consumed.saturating_add(burn_weight);
      }
      consumed
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Checks that `pool_id` can price and convert `denom` into `base_denom`
    pub fn ensure_conversion_path(denom: AssetKind, pool_id: PoolId, base_denom: AssetKind) -> DispatchResult {
      ensure!(denom != base_denom, Error::<T>::FeeTokenIsBaseDenom);
      let assets = T::PoolManager::pool_assets(pool_id).ok_or(Error::<T>::PoolNotFound)?;
      ensure!(
        assets.contains(&denom) && assets.contains(&base_denom),
        Error::<T>::PoolAssetsMismatch
      );
      let price = T::PoolManager::spot_price(pool_id, denom, base_denom)
        .map_err(|_| Error::<T>::SpotPriceUnavailable)?;
      ensure!(!price.into_inner().is_zero(), Error::<T>::SpotPriceUnavailable);
      Ok(())
    }

    /// Registry entry for `denom`
    pub fn fee_token(denom: AssetKind) -> Option<FeeToken> {
      FeeTokens::<T>::get(denom).map(|pool_id| FeeToken { denom, pool_id })
    }

    /// Move `fee` from `payer` to the fee account and settle it
    pub fn charge_fees_from_payer(
      payer: &T::AccountId,
      fee: Coin,
      beneficiary: Option<&T::AccountId>,
    ) -> DispatchResult {
      if fee.is_zero() {
        return Ok(());
      }
      Self::transfer_coin(payer, &Self::account_id(), fee, Preservation::Preserve)?;
      Self::settle(fee, beneficiary, Some(payer))
    }

    /// Settle `fee` already held by the fee account. `payer` is only reported in the event.
    pub fn charge_fees(
      fee: Coin,
      beneficiary: Option<&T::AccountId>,
      payer: Option<&T::AccountId>,
    ) -> DispatchResult {
      if fee.is_zero() {
        return Ok(());
      }
      Self::settle(fee, beneficiary, payer)
    }

    fn settle(
      fee: Coin,
      beneficiary: Option<&T::AccountId>,
      payer: Option<&T::AccountId>,
    ) -> DispatchResult {
      let account = Self::account_id();
      let registry = FeeTokenRegistry::<T>::snapshot();
      let converted = match Self::convert_to_base(&registry, fee) {
        FeeConversion::Converted(coin) => coin,
        FeeConversion::Unswappable => {
          let disposition = T::UnswappableFeePolicy::dispose(&account, fee)?;
          log::debug!(
            target: LOG_TARGET,
            "fee {} has no conversion path to the base asset, disposed: {:?}",
            fee,
            disposition,
          );
          Self::deposit_event(Event::FeeCharged {
            payer: payer.cloned(),
            taker_fee: fee,
            beneficiary: beneficiary.cloned(),
            beneficiary_revenue: None,
            community_pool: disposition.is_community_pool(),
          });
          return Ok(());
        }
      };
      let mut burned = converted;
      let mut beneficiary_revenue = None;
      if let Some(who) = beneficiary {
        let share = converted.with_amount(converted.amount / 2);
        // A share the beneficiary cannot hold, e.g. below its minimum balance, is burned too
        if !share.is_zero() && Self::can_receive(who, share) {
          Self::transfer_coin(&account, who, share, Preservation::Expendable)?;
          burned = converted.with_amount(converted.amount.saturating_sub(share.amount));
          beneficiary_revenue = Some(share);
        } else if !share.is_zero() {
          log::debug!(
            target: LOG_TARGET,
            "beneficiary {:?} cannot receive {}, burning the whole fee",
            who,
            share,
          );
        }
      }
      Self::burn_coin(&account, burned)?;
      Self::deposit_event(Event::FeeCharged {
        payer: payer.cloned(),
        taker_fee: burned,
        beneficiary: beneficiary.cloned(),
        beneficiary_revenue,
        community_pool: false,
      });
      Ok(())
    }

    /// Swap `fee`, held by the fee account, to the base asset.
    ///
    /// Never fails: router errors and empty outputs roll the swap back and
    /// classify the fee as unswappable.
    pub fn convert_to_base(registry: &FeeTokenRegistry<T>, fee: Coin) -> FeeConversion {
      if registry.is_base_denom(&fee.asset) {
        return FeeConversion::Converted(fee);
      }
      let Some(fee_token) = registry.lookup(&fee.asset) else {
        return FeeConversion::Unswappable;
      };
      let base_denom = registry.base_denom();
      let route = [SwapAmountInRoute {
        pool_id: fee_token.pool_id,
        token_out_denom: base_denom,
      }];
      let account = Self::account_id();
      let outcome = ExecutionScope::<Event<T>>::run(|scope| {
        let amount_out =
          T::PoolManager::route_exact_amount_in(&account, &route, fee, Zero::zero())?;
        if amount_out.is_zero() {
          log::error!(
            target: LOG_TARGET,
            "swapping fee {} through pool {} returned nothing",
            fee,
            fee_token.pool_id,
          );
          return Err(Error::<T>::ZeroConversionOutput.into());
        }
        let token_out = Coin::new(base_denom, amount_out);
        scope.record(Event::FeeTokenSwapped {
          pool_id: fee_token.pool_id,
          token_in: fee,
          token_out,
        });
        Ok(token_out)
      });
      if T::EmitConversionEvents::get() {
        for event in outcome.events {
          Self::deposit_event(event);
        }
      }
      match outcome.result {
        Ok(token_out) => FeeConversion::Converted(token_out),
        Err(err) => {
          log::debug!(
            target: LOG_TARGET,
            "failed to swap fee {} through pool {}: {:?}",
            fee,
            fee_token.pool_id,
            err,
          );
          FeeConversion::Unswappable
        }
      }
    }

    /// Value of `coin` in the base asset at the fee token pool's spot price
    pub fn convert_to_base_token(coin: Coin) -> Result<Coin, DispatchError> {
      let base_denom = BaseDenom::<T>::get();
      if coin.asset == base_denom {
        return Ok(coin);
      }
      let pool_id = FeeTokens::<T>::get(coin.asset).ok_or(Error::<T>::FeeTokenNotFound)?;
      let price = T::PoolManager::spot_price(pool_id, coin.asset, base_denom)?;
      Ok(Coin::new(base_denom, price.saturating_mul_int(coin.amount)))
    }

    pub fn balance_of(who: &T::AccountId, asset: AssetKind) -> Balance {
      match asset {
        AssetKind::Native => T::Currency::balance(who),
        AssetKind::Local(id) | AssetKind::Foreign(id) => T::Assets::balance(id, who),
      }
    }

    /// Whether depositing `coin` into `who` would succeed, minimum balance included
    pub fn can_receive(who: &T::AccountId, coin: Coin) -> bool {
      let consequence = match coin.asset {
        AssetKind::Native => {
          <T::Currency as NativeInspect<T::AccountId>>::can_deposit(who, coin.amount, Provenance::Extant)
        }
        AssetKind::Local(id) | AssetKind::Foreign(id) => {
          <T::Assets as FungiblesInspect<T::AccountId>>::can_deposit(
            id,
            who,
            coin.amount,
            Provenance::Extant,
          )
        }
      };
      consequence == DepositConsequence::Success
    }

    pub fn transfer_coin(
      from: &T::AccountId,
      to: &T::AccountId,
      coin: Coin,
      preservation: Preservation,
    ) -> DispatchResult {
      if coin.is_zero() {
        return Ok(());
      }
      match coin.asset {
        AssetKind::Native => {
          <T::Currency as NativeMutate<T::AccountId>>::transfer(from, to, coin.amount, preservation)?;
        }
        AssetKind::Local(id) | AssetKind::Foreign(id) => {
          <T::Assets as FungiblesMutate<T::AccountId>>::transfer(
            id,
            from,
            to,
            coin.amount,
            preservation,
          )?;
        }
      }
      Ok(())
    }

    /// Burn exactly `coin` from `from` and account for it in [`TotalBurned`]
    pub fn burn_coin(from: &T::AccountId, coin: Coin) -> DispatchResult {
      if coin.is_zero() {
        return Ok(());
      }
      let burned = match coin.asset {
        AssetKind::Native => T::Currency::burn_from(
          from,
          coin.amount,
          Preservation::Expendable,
          Precision::Exact,
          Fortitude::Polite,
        )?,
        AssetKind::Local(id) | AssetKind::Foreign(id) => T::Assets::burn_from(
          id,
          from,
          coin.amount,
          Preservation::Expendable,
          Precision::Exact,
          Fortitude::Polite,
        )?,
      };
      TotalBurned::<T>::mutate(coin.asset, |total| *total = total.saturating_add(burned));
      Ok(())
    }
  }

  /// Read-only view of the fee token registry taken at the start of a settlement.
  ///
  /// The base asset is captured once; entries are read on demand and cannot change
  /// during the settlement since only governance calls write them.
  pub struct FeeTokenRegistry<T: Config> {
    base_denom: AssetKind,
    _marker: PhantomData<T>,
  }

  impl<T: Config> FeeTokenRegistry<T> {
    pub fn snapshot() -> Self {
      Self {
        base_denom: BaseDenom::<T>::get(),
        _marker: PhantomData,
      }
    }

    pub fn base_denom(&self) -> AssetKind {
      self.base_denom
    }

    pub fn is_base_denom(&self, denom: &AssetKind) -> bool {
      *denom == self.base_denom
    }

    /// `None` for the base asset and for unregistered assets
    pub fn lookup(&self, denom: &AssetKind) -> Option<FeeToken> {
      if self.is_base_denom(denom) {
        return None;
      }
      Pallet::<T>::fee_token(*denom)
    }
  }

  /// Burns unswappable fees instead of funding the community pool.
  pub struct BurnUnswappable<T>(PhantomData<T>);

  impl<T: Config> UnswappableFeePolicy<T::AccountId> for BurnUnswappable<T> {
    fn dispose(source: &T::AccountId, fee: Coin) -> Result<UnswappableDisposition, DispatchError> {
      Pallet::<T>::burn_coin(source, fee)?;
      Ok(UnswappableDisposition::Burned)
    }
  }

  impl<T: Config> FeeSettlement<T::AccountId> for Pallet<T> {
    fn charge_fees_from_payer(
      payer: &T::AccountId,
      fee: Coin,
      beneficiary: Option<&T::AccountId>,
    ) -> DispatchResult {
      Self::charge_fees_from_payer(payer, fee, beneficiary)
    }

    fn charge_fees(
      fee: Coin,
      beneficiary: Option<&T::AccountId>,
      payer: Option<&T::AccountId>,
    ) -> DispatchResult {
      Self::charge_fees(fee, beneficiary, payer)
    }

    fn is_fee_asset(asset: &AssetKind) -> bool {
      let registry = FeeTokenRegistry::<T>::snapshot();
      registry.is_base_denom(asset) || registry.lookup(asset).is_some()
    }
  }

  /// Genesis configuration
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Overrides `DefaultBaseDenom`
    pub base_denom: Option<AssetKind>,
    /// Pools must already exist, so the pool manager's genesis has to run first
    pub fee_tokens: Vec<(AssetKind, PoolId)>,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Some(base_denom) = self.base_denom {
        BaseDenom::<T>::put(base_denom);
      }
      let base_denom = BaseDenom::<T>::get();
      assert!(
        self.fee_tokens.len() as u32 <= T::MaxFeeTokens::get(),
        "Fee tokens exceed max limit"
      );
      for (denom, pool_id) in self.fee_tokens.iter() {
        assert!(!FeeTokens::<T>::contains_key(denom), "Duplicate fee token {:?}", denom);
        if let Err(err) = Pallet::<T>::ensure_conversion_path(*denom, *pool_id, base_denom) {
          panic!("Fee token {:?} cannot be converted through pool {}: {:?}", denom, pool_id, err);
        }
        FeeTokens::<T>::insert(denom, pool_id);
      }
      // Fee account survives zero native balance via provider reference
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());
    }
  }
}
