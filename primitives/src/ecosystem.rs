//! Ecosystem constants shared by the fee pallets.
//!
//! Pallet IDs and economic defaults live here so that runtimes and test mocks
//! configure the pallets from a single source.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Identifier of a liquidity pool managed by the pool manager.
pub type PoolId = u64;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// Used with `PalletId::into_account_truncating()` to derive the fee collection account.
pub mod pallet_ids {
  /// Tx fees pallet ID (fee collection and settlement account)
  pub const TX_FEES_PALLET_ID: &[u8; 8] = b"py/txfee";
}

/// Economic parameters.
pub mod params {
  use sp_arithmetic::Permill;

  /// Default taker fee charged on every swap (1%).
  pub const DEFAULT_TAKER_FEE: Permill = Permill::from_percent(1);

  /// Maximum number of hops accepted by the swap extrinsics.
  pub const MAX_ROUTE_HOPS: u32 = 8;

  /// Maximum number of fee tokens the idle sweep visits per block.
  pub const MAX_SWEEP_PER_BLOCK: u32 = 4;
}
