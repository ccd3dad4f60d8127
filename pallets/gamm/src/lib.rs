//! Gamm Pallet
//!
//! Swap entry points over the pool router. Every swap pays a protocol taker fee in the
//! input asset which is handed to the fee settlement pallet, optionally rewarding the
//! owner of the rollapp whose token is traded.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::gamm";

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
  use super::{LOG_TARGET, WeightInfo, add_taker_fee, sub_taker_fee};
  use frame::deps::{
    frame_support::storage::with_storage_layer,
    sp_runtime::{DispatchError, FixedPointNumber, FixedU128, Permill, traits::Zero},
  };
  use frame::prelude::*;
  use primitives::{
    AssetKind, Balance, Coin, PoolId, SwapAmountInRoute, SwapAmountOutRoute,
    traits::{FeeSettlement, MaybeRollappOwners, PoolManager},
  };

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Router executing the swaps
    type PoolManager: PoolManager<Self::AccountId>;

    /// Settlement of collected taker fees
    type TxFees: FeeSettlement<Self::AccountId>;

    /// Rollapp ownership lookup, `()` when rollapps are not deployed
    type RollappOwners: MaybeRollappOwners<Self::AccountId>;

    /// Origin that can perform governance operations
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Taker fee used until governance sets another one
    #[pallet::constant]
    type DefaultTakerFee: Get<Permill>;

    /// Maximum number of hops in a swap route
    #[pallet::constant]
    type MaxRouteHops: Get<u32>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Fraction of every swap input charged as taker fee
  #[pallet::storage]
  #[pallet::getter(fn taker_fee)]
  pub type TakerFee<T: Config> = StorageValue<_, Permill, ValueQuery, T::DefaultTakerFee>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A route was swapped. Amounts exclude the taker fee.
    TokenSwapped {
      sender: T::AccountId,
      /// Last pool of the route
      pool_id: PoolId,
      tokens_in: Coin,
      tokens_out: Coin,
      /// Input units paid per output unit
      closing_price: FixedU128,
      taker_fee: Permill,
      /// Swap fee of the last pool of the route
      swap_fee: Permill,
    },
    /// Taker fee rate changed
    TakerFeeUpdated { old_fee: Permill, new_fee: Permill },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Route has no hops
    EmptyRoutes,
    /// Taker fee must be below 100%
    TakerFeeTooHigh,
    /// Input plus taker fee exceeds the sender's maximum
    TokenInExceedsMax,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Swap exactly `token_in` (taker fee included) along `routes`
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::swap_exact_amount_in(routes.len() as u32))]
    pub fn swap_exact_amount_in(
      origin: OriginFor<T>,
      routes: BoundedVec<SwapAmountInRoute, T::MaxRouteHops>,
      token_in: Coin,
      token_out_min_amount: Balance,
    ) -> DispatchResult {
      let sender = ensure_signed(origin)?;
      ensure!(!routes.is_empty(), Error::<T>::EmptyRoutes);
      with_storage_layer(|| {
        Self::do_swap_exact_amount_in(&sender, &routes, token_in, token_out_min_amount)
      })?;
      Ok(())
    }

    /// Buy exactly `token_out` along `routes`, paying at most `token_in_max_amount`
    /// including the taker fee
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::swap_exact_amount_out(routes.len() as u32))]
    pub fn swap_exact_amount_out(
      origin: OriginFor<T>,
      routes: BoundedVec<SwapAmountOutRoute, T::MaxRouteHops>,
      token_in_max_amount: Balance,
      token_out: Coin,
    ) -> DispatchResult {
      let sender = ensure_signed(origin)?;
      ensure!(!routes.is_empty(), Error::<T>::EmptyRoutes);
      with_storage_layer(|| {
        Self::do_swap_exact_amount_out(&sender, &routes, token_in_max_amount, token_out)
      })?;
      Ok(())
    }

    /// Update the taker fee (governance only)
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::set_taker_fee())]
    pub fn set_taker_fee(origin: OriginFor<T>, new_fee: Permill) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(new_fee < Permill::one(), Error::<T>::TakerFeeTooHigh);
      let old_fee = TakerFee::<T>::get();
      TakerFee::<T>::put(new_fee);
      Self::deposit_event(Event::TakerFeeUpdated { old_fee, new_fee });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Returns the amount of the last hop's asset received
    pub fn do_swap_exact_amount_in(
      sender: &T::AccountId,
      routes: &[SwapAmountInRoute],
      token_in: Coin,
      token_out_min_amount: Balance,
    ) -> Result<Balance, DispatchError> {
      let (Some(first), Some(last)) = (routes.first(), routes.last()) else {
        return Err(Error::<T>::EmptyRoutes.into());
      };
      let taker_fee = TakerFee::<T>::get();
      let split = sub_taker_fee(token_in, taker_fee);
      let beneficiary = Self::taker_fee_beneficiary(&token_in.asset, &last.token_out_denom);
      Self::charge_taker_fee(sender, split.fee, first, beneficiary.as_ref())?;

      let amount_out =
        T::PoolManager::route_exact_amount_in(sender, routes, split.net, token_out_min_amount)?;
      Self::deposit_swap_event(
        sender,
        last.pool_id,
        split.net,
        Coin::new(last.token_out_denom, amount_out),
        taker_fee,
      );
      Ok(amount_out)
    }

    /// Returns the amount of the first hop's asset paid, taker fee included
    pub fn do_swap_exact_amount_out(
      sender: &T::AccountId,
      routes: &[SwapAmountOutRoute],
      token_in_max_amount: Balance,
      token_out: Coin,
    ) -> Result<Balance, DispatchError> {
      let (Some(first), Some(last)) = (routes.first(), routes.last()) else {
        return Err(Error::<T>::EmptyRoutes.into());
      };
      let taker_fee = TakerFee::<T>::get();
      let required = T::PoolManager::estimate_exact_amount_out(routes, token_out)?;
      let split = add_taker_fee(Coin::new(first.token_in_denom, required), taker_fee);
      ensure!(
        split.gross().amount <= token_in_max_amount,
        Error::<T>::TokenInExceedsMax
      );
      let beneficiary = Self::taker_fee_beneficiary(&first.token_in_denom, &token_out.asset);
      let first_hop = SwapAmountInRoute {
        pool_id: first.pool_id,
        token_out_denom: routes.get(1).map(|r| r.token_in_denom).unwrap_or(token_out.asset),
      };
      Self::charge_taker_fee(sender, split.fee, &first_hop, beneficiary.as_ref())?;

      // A taker fee pre-swap may have moved the first pool; the net swap may use
      // whatever is left of the maximum
      let amount_in = T::PoolManager::route_exact_amount_out(
        sender,
        routes,
        token_in_max_amount.saturating_sub(split.fee.amount),
        token_out,
      )?;
      Self::deposit_swap_event(
        sender,
        last.pool_id,
        Coin::new(first.token_in_denom, amount_in),
        token_out,
        taker_fee,
      );
      Ok(amount_in.saturating_add(split.fee.amount))
    }

    /// Rollapp owner rewarded with part of the taker fee.
    ///
    /// The owner of the input asset's rollapp takes precedence over the output's.
    pub fn taker_fee_beneficiary(in_denom: &AssetKind, out_denom: &AssetKind) -> Option<T::AccountId> {
      let owner_by_denom = T::RollappOwners::oracle()?;
      if let Some(owner) = owner_by_denom(in_denom) {
        return Some(owner);
      }
      if let Some(owner) = owner_by_denom(out_denom) {
        return Some(owner);
      }
      log::debug!(
        target: LOG_TARGET,
        "swap without beneficiary: neither {:?} nor {:?} is a rollapp asset",
        in_denom,
        out_denom,
      );
      None
    }

    /// Hand `fee` to the fee settlement.
    ///
    /// A fee in an asset the settlement does not accept is first swapped through the
    /// route's first pool into that hop's output asset.
    pub fn charge_taker_fee(
      sender: &T::AccountId,
      fee: Coin,
      first_hop: &SwapAmountInRoute,
      beneficiary: Option<&T::AccountId>,
    ) -> DispatchResult {
      if fee.is_zero() {
        return Ok(());
      }
      let fee = if T::TxFees::is_fee_asset(&fee.asset) {
        fee
      } else {
        log::debug!(
          target: LOG_TARGET,
          "taker fee {} is not accepted by the fee settlement, swapping through pool {}",
          fee,
          first_hop.pool_id,
        );
        let amount_out = T::PoolManager::route_exact_amount_in(
          sender,
          core::slice::from_ref(first_hop),
          fee,
          Zero::zero(),
        )?;
        Coin::new(first_hop.token_out_denom, amount_out)
      };
      T::TxFees::charge_fees_from_payer(sender, fee, beneficiary)
    }

    fn deposit_swap_event(
      sender: &T::AccountId,
      pool_id: PoolId,
      tokens_in: Coin,
      tokens_out: Coin,
      taker_fee: Permill,
    ) {
      let closing_price =
        FixedU128::checked_from_rational(tokens_in.amount, tokens_out.amount).unwrap_or_default();
      Self::deposit_event(Event::TokenSwapped {
        sender: sender.clone(),
        pool_id,
        tokens_in,
        tokens_out,
        closing_price,
        taker_fee,
        swap_fee: T::PoolManager::swap_fee(pool_id).unwrap_or_default(),
      });
    }
  }

  /// Genesis configuration
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Overrides `DefaultTakerFee`
    pub taker_fee: Option<Permill>,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Some(taker_fee) = self.taker_fee {
        assert!(taker_fee < Permill::one(), "Taker fee must be below 100%");
        TakerFee::<T>::put(taker_fee);
      }
    }
  }
}
