use crate as pallet_tx_fees;
use polkadot_sdk::frame_support::traits::{
  fungible::Mutate as NativeMutate, fungibles::Mutate as FungiblesMutate, tokens::Preservation,
};
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl,
  traits::{ConstU32, ConstU128, Get},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{AssetKind, Balance, Coin, traits::CommunityPool};
use std::cell::RefCell;

pub use crate::mock_pools::{
  Curve, MockPoolManager, RouterFailure, create_pool, credit, pool, set_router_failure,
  set_swap_fee,
};

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
pub const COMMUNITY_POOL: u64 = 777;

pub const INITIAL_BALANCE: Balance = 1_000_000_000;

/// Base asset of the mock runtime
pub const BASE: AssetKind = AssetKind::Native;
/// Converts 1:1 through a constant-sum pool once registered
pub const STABLE: AssetKind = AssetKind::Local(1);
/// Priced through a constant-product pool
pub const VOLATILE: AssetKind = AssetKind::Local(2);
/// Never registered
pub const UNKNOWN: AssetKind = AssetKind::Local(3);

thread_local! {
    pub static EMIT_CONVERSION_EVENTS: RefCell<bool> = const { RefCell::new(true) };
    pub static COMMUNITY_POOL_FAILS: RefCell<bool> = const { RefCell::new(false) };
}

pub fn set_emit_conversion_events(emit: bool) {
  EMIT_CONVERSION_EVENTS.with(|e| *e.borrow_mut() = emit);
}

pub fn set_community_pool_fails(fails: bool) {
  COMMUNITY_POOL_FAILS.with(|f| *f.borrow_mut() = fails);
}

pub fn fund(who: &u64, coin: Coin) {
  match coin.asset {
    AssetKind::Native => {
      <Balances as NativeMutate<u64>>::mint_into(who, coin.amount).unwrap();
    }
    AssetKind::Local(id) | AssetKind::Foreign(id) => {
      <Assets as FungiblesMutate<u64>>::mint_into(id, who, coin.amount).unwrap();
    }
  }
}

pub fn balance(who: &u64, asset: AssetKind) -> Balance {
  TxFees::balance_of(who, asset)
}

pub struct MockCommunityPool;
impl CommunityPool<u64> for MockCommunityPool {
  fn fund_community_pool(source: &u64, coin: Coin) -> DispatchResult {
    if COMMUNITY_POOL_FAILS.with(|f| *f.borrow()) {
      return Err(DispatchError::Other("community pool unavailable"));
    }
    TxFees::transfer_coin(source, &COMMUNITY_POOL, coin, Preservation::Expendable)
  }
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    TxFees: pallet_tx_fees,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

pub struct PalletIdStub;
impl Get<PalletId> for PalletIdStub {
  fn get() -> PalletId {
    PalletId(*primitives::ecosystem::pallet_ids::TX_FEES_PALLET_ID)
  }
}

pub struct BaseDenomStub;
impl Get<AssetKind> for BaseDenomStub {
  fn get() -> AssetKind {
    BASE
  }
}

pub struct EmitConversionEventsStub;
impl Get<bool> for EmitConversionEventsStub {
  fn get() -> bool {
    EMIT_CONVERSION_EVENTS.with(|e| *e.borrow())
  }
}

impl pallet_tx_fees::Config for Test {
  type Assets = Assets;
  type Currency = Balances;
  type PoolManager = MockPoolManager<Test>;
  type UnswappableFeePolicy = pallet_tx_fees::FundCommunityPool<MockCommunityPool>;
  type PalletId = PalletIdStub;
  type DefaultBaseDenom = BaseDenomStub;
  type EmitConversionEvents = EmitConversionEventsStub;
  type MaxFeeTokens = ConstU32<8>;
  type MaxSweepPerBlock = ConstU32<{ primitives::ecosystem::params::MAX_SWEEP_PER_BLOCK }>;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = TxFeesBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct TxFeesBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u64> for TxFeesBenchmarkHelper {
  fn ensure_funded(who: &u64, coin: Coin) -> DispatchResult {
    credit::<Test>(who, coin)
  }

  fn create_pool(reserve_a: Coin, reserve_b: Coin) -> Result<primitives::PoolId, DispatchError> {
    Ok(create_pool(reserve_a, reserve_b, Curve::ConstantProduct))
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: vec![
      (ALICE, INITIAL_BALANCE),
      (BOB, INITIAL_BALANCE),
      (CHARLIE, INITIAL_BALANCE),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    // Asset, owner, sufficient, min balance
    assets: vec![(1, ALICE, true, 1), (2, ALICE, true, 1), (3, ALICE, true, 1)],
    metadata: vec![],
    accounts: vec![
      (1, ALICE, INITIAL_BALANCE),
      (2, ALICE, INITIAL_BALANCE),
      (3, ALICE, INITIAL_BALANCE),
    ],
    reserves: vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Fee account gets a provider reference (ED-free)
  pallet_tx_fees::GenesisConfig::<Test>::default()
    .assimilate_storage(&mut t)
    .unwrap();

  set_router_failure(None);
  set_emit_conversion_events(true);
  set_community_pool_fails(false);

  t.into()
}
