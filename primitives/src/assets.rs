use crate::ecosystem::{Balance, PoolId};
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Asset identifier shared by every pallet in the workspace.
///
/// - `Native`: The system's native token (managed by pallet-balances).
/// - `Local(u32)`: Local assets (managed by pallet-assets).
/// - `Foreign(u32)`: Bridged assets (managed by pallet-assets).
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum AssetKind {
  /// Native token managed by pallet-balances
  #[default]
  Native,
  /// Local asset managed by pallet-assets
  Local(u32),
  /// Foreign asset managed by pallet-assets
  Foreign(u32),
}

impl AssetKind {
  /// pallet-assets id backing this asset, `None` for the native token.
  pub fn asset_id(&self) -> Option<u32> {
    match self {
      AssetKind::Local(id) | AssetKind::Foreign(id) => Some(*id),
      AssetKind::Native => None,
    }
  }
}

/// An amount of a single asset.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct Coin {
  pub asset: AssetKind,
  pub amount: Balance,
}

impl Coin {
  pub const fn new(asset: AssetKind, amount: Balance) -> Self {
    Self { asset, amount }
  }

  pub const fn zero(asset: AssetKind) -> Self {
    Self { asset, amount: 0 }
  }

  pub fn is_zero(&self) -> bool {
    self.amount == 0
  }

  /// Same asset, different amount.
  pub fn with_amount(&self, amount: Balance) -> Self {
    Self {
      asset: self.asset,
      amount,
    }
  }
}

impl core::fmt::Display for Coin {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self.asset {
      AssetKind::Native => write!(f, "{}native", self.amount),
      AssetKind::Local(id) => write!(f, "{}local/{}", self.amount, id),
      AssetKind::Foreign(id) => write!(f, "{}foreign/{}", self.amount, id),
    }
  }
}

/// Non-base asset accepted for fees together with the pool that converts it to the base asset.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct FeeToken {
  pub denom: AssetKind,
  pub pool_id: PoolId,
}

/// One hop of an exact-in route: swap the current asset in `pool_id` for `token_out_denom`.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct SwapAmountInRoute {
  pub pool_id: PoolId,
  pub token_out_denom: AssetKind,
}

/// One hop of an exact-out route: pay `token_in_denom` into `pool_id`.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub struct SwapAmountOutRoute {
  pub pool_id: PoolId,
  pub token_in_denom: AssetKind,
}
