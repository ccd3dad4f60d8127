#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn swap_exact_amount_in(n: u32) -> Weight;
	fn swap_exact_amount_out(n: u32) -> Weight;
	fn set_taker_fee() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	/// The range of component `n` is `[1, 8]`.
	fn swap_exact_amount_in(n: u32) -> Weight {
		Weight::from_parts(160_000_000, 12000)
			.saturating_add(Weight::from_parts(45_000_000, 4000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(12))
			.saturating_add(T::DbWeight::get().reads((3_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(9))
			.saturating_add(T::DbWeight::get().writes((3_u64).saturating_mul(n.into())))
	}
	/// The range of component `n` is `[1, 8]`.
	fn swap_exact_amount_out(n: u32) -> Weight {
		Weight::from_parts(175_000_000, 12000)
			.saturating_add(Weight::from_parts(52_000_000, 4000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(12))
			.saturating_add(T::DbWeight::get().reads((4_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(9))
			.saturating_add(T::DbWeight::get().writes((3_u64).saturating_mul(n.into())))
	}
	fn set_taker_fee() -> Weight {
		Weight::from_parts(9_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn swap_exact_amount_in(n: u32) -> Weight {
		Weight::from_parts(160_000_000, 12000)
			.saturating_add(Weight::from_parts(45_000_000, 4000).saturating_mul(n.into()))
			.saturating_add(RocksDbWeight::get().reads(12))
			.saturating_add(RocksDbWeight::get().writes(9))
	}
	fn swap_exact_amount_out(n: u32) -> Weight {
		Weight::from_parts(175_000_000, 12000)
			.saturating_add(Weight::from_parts(52_000_000, 4000).saturating_mul(n.into()))
			.saturating_add(RocksDbWeight::get().reads(12))
			.saturating_add(RocksDbWeight::get().writes(9))
	}
	fn set_taker_fee() -> Weight {
		Weight::from_parts(9_000_000, 1500)
			.saturating_add(RocksDbWeight::get().reads(1))
			.saturating_add(RocksDbWeight::get().writes(1))
	}
}
