use polkadot_sdk::sp_runtime::{PerThing, Permill};
use primitives::Coin;

/// A coin split into the part that reaches the pools and the taker fee.
///
/// Both halves are in the asset of the original coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TakerFeeSplit {
  /// Amount swapped through the route
  pub net: Coin,
  /// Amount paid by the sender on top of `net`
  pub fee: Coin,
}

impl TakerFeeSplit {
  pub fn gross(&self) -> Coin {
    self.net.with_amount(self.net.amount.saturating_add(self.fee.amount))
  }
}

/// Take the taker fee out of `gross`: `net = floor(gross * (1 - rate))`.
pub fn sub_taker_fee(gross: Coin, rate: Permill) -> TakerFeeSplit {
  if rate.is_zero() {
    return TakerFeeSplit {
      net: gross,
      fee: Coin::zero(gross.asset),
    };
  }
  let net = rate.left_from_one().mul_floor(gross.amount);
  TakerFeeSplit {
    net: gross.with_amount(net),
    fee: gross.with_amount(gross.amount.saturating_sub(net)),
  }
}

/// Put the taker fee on top of `net`: `gross = ceil(net / (1 - rate))`.
///
/// Rounds up so that the sender never under-pays the amount the pools require.
pub fn add_taker_fee(net: Coin, rate: Permill) -> TakerFeeSplit {
  if rate.is_zero() {
    return TakerFeeSplit {
      net,
      fee: Coin::zero(net.asset),
    };
  }
  let gross = rate.left_from_one().saturating_reciprocal_mul_ceil(net.amount);
  TakerFeeSplit {
    net,
    fee: net.with_amount(gross.saturating_sub(net.amount)),
  }
}
