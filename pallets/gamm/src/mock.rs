use crate as pallet_gamm;
use alloc::collections::BTreeMap;
use polkadot_sdk::frame_support::traits::tokens::Preservation;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl,
  traits::{ConstU32, ConstU128, Get},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchResult, Permill,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  AssetKind, Balance, Coin,
  traits::{CommunityPool, Deployed, MaybeRollappOwners, RollappOwnerOracle},
};
use std::cell::RefCell;

pub use pallet_tx_fees::mock_pools::{
  Curve, MockPoolManager, create_pool, credit, pool, set_swap_fee,
};

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
/// Owner of the rollapp issuing `ROLLAPP_A`
pub const CHARLIE: u64 = 3;
/// Owner of the rollapp issuing `ROLLAPP_B`
pub const DAVE: u64 = 4;
pub const COMMUNITY_POOL: u64 = 777;

pub const INITIAL_BALANCE: Balance = 1_000_000_000;

pub const BASE: AssetKind = AssetKind::Native;
pub const STABLE: AssetKind = AssetKind::Local(1);
pub const ROLLAPP_A: AssetKind = AssetKind::Local(2);
pub const ROLLAPP_B: AssetKind = AssetKind::Local(3);
/// Neither a fee token nor a rollapp asset
pub const OTHER: AssetKind = AssetKind::Local(4);

thread_local! {
    pub static ORACLE_DEPLOYED: RefCell<bool> = const { RefCell::new(true) };
    pub static ROLLAPP_OWNERS: RefCell<BTreeMap<AssetKind, u64>> = const { RefCell::new(BTreeMap::new()) };
}

pub fn set_oracle_deployed(deployed: bool) {
  ORACLE_DEPLOYED.with(|d| *d.borrow_mut() = deployed);
}

pub fn set_rollapp_owner(denom: AssetKind, owner: u64) {
  ROLLAPP_OWNERS.with(|o| {
    o.borrow_mut().insert(denom, owner);
  });
}

pub struct OwnerRegistry;
impl RollappOwnerOracle<u64> for OwnerRegistry {
  fn rollapp_owner_by_denom(denom: &AssetKind) -> Option<u64> {
    ROLLAPP_OWNERS.with(|o| o.borrow().get(denom).copied())
  }
}

/// Switches between a deployed oracle and none at runtime
pub struct MockRollappOwners;
impl MaybeRollappOwners<u64> for MockRollappOwners {
  fn oracle() -> Option<fn(&AssetKind) -> Option<u64>> {
    if ORACLE_DEPLOYED.with(|d| *d.borrow()) {
      <Deployed<OwnerRegistry> as MaybeRollappOwners<u64>>::oracle()
    } else {
      <() as MaybeRollappOwners<u64>>::oracle()
    }
  }
}

pub fn balance(who: &u64, asset: AssetKind) -> Balance {
  TxFees::balance_of(who, asset)
}

pub struct MockCommunityPool;
impl CommunityPool<u64> for MockCommunityPool {
  fn fund_community_pool(source: &u64, coin: Coin) -> DispatchResult {
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
    Gamm: pallet_gamm,
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

pub struct TxFeesPalletId;
impl Get<PalletId> for TxFeesPalletId {
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

pub struct TakerFeeStub;
impl Get<Permill> for TakerFeeStub {
  fn get() -> Permill {
    primitives::ecosystem::params::DEFAULT_TAKER_FEE
  }
}

impl pallet_tx_fees::Config for Test {
  type Assets = Assets;
  type Currency = Balances;
  type PoolManager = MockPoolManager<Test>;
  type UnswappableFeePolicy = pallet_tx_fees::FundCommunityPool<MockCommunityPool>;
  type PalletId = TxFeesPalletId;
  type DefaultBaseDenom = BaseDenomStub;
  type EmitConversionEvents = polkadot_sdk::frame_support::traits::ConstBool<true>;
  type MaxFeeTokens = ConstU32<8>;
  type MaxSweepPerBlock = ConstU32<{ primitives::ecosystem::params::MAX_SWEEP_PER_BLOCK }>;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = MockBenchmarkHelper;
}

impl pallet_gamm::Config for Test {
  type PoolManager = MockPoolManager<Test>;
  type TxFees = TxFees;
  type RollappOwners = MockRollappOwners;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type DefaultTakerFee = TakerFeeStub;
  type MaxRouteHops = ConstU32<{ primitives::ecosystem::params::MAX_ROUTE_HOPS }>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = MockBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct MockBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_tx_fees::BenchmarkHelper<u64> for MockBenchmarkHelper {
  fn ensure_funded(who: &u64, coin: Coin) -> DispatchResult {
    credit::<Test>(who, coin)
  }

  fn create_pool(reserve_a: Coin, reserve_b: Coin) -> Result<primitives::PoolId, polkadot_sdk::sp_runtime::DispatchError> {
    Ok(create_pool(reserve_a, reserve_b, Curve::ConstantProduct))
  }
}

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u64> for MockBenchmarkHelper {
  fn ensure_funded(who: &u64, coin: Coin) -> DispatchResult {
    credit::<Test>(who, coin)
  }

  fn create_pool(reserve_a: Coin, reserve_b: Coin) -> Result<primitives::PoolId, polkadot_sdk::sp_runtime::DispatchError> {
    use polkadot_sdk::frame_support::traits::fungibles::Inspect;
    // Route outputs are minted to the caller, so every pool asset must exist
    for asset in [reserve_a.asset, reserve_b.asset] {
      if let Some(id) = asset.asset_id() {
        if !<Assets as Inspect<u64>>::asset_exists(id) {
          Assets::force_create(RuntimeOrigin::root(), id, ALICE, true, 1)?;
        }
      }
    }
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
      (DAVE, INITIAL_BALANCE),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let asset_ids = [1u32, 2, 3, 4];
  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    // Asset, owner, sufficient, min balance
    assets: asset_ids.iter().map(|id| (*id, ALICE, true, 1)).collect(),
    metadata: vec![],
    accounts: asset_ids.iter().map(|id| (*id, ALICE, INITIAL_BALANCE)).collect(),
    reserves: vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_tx_fees::GenesisConfig::<Test>::default()
    .assimilate_storage(&mut t)
    .unwrap();

  ORACLE_DEPLOYED.with(|d| *d.borrow_mut() = true);
  ROLLAPP_OWNERS.with(|o| o.borrow_mut().clear());
  set_rollapp_owner(ROLLAPP_A, CHARLIE);
  set_rollapp_owner(ROLLAPP_B, DAVE);

  t.into()
}
